//! Events emitted by the controller for subscribers.

use qcat_types::{AccountId, Amount, BlockHeight, DataHash};
use qcat_vrf::RandomnessSource;
use serde::Serialize;

/// Controller events, emitted after the state change they describe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// SUPER was burned and a commitment stored.
    CommitObserve {
        account: AccountId,
        amount: Amount,
        data_hash: DataHash,
        ref_block: BlockHeight,
    },
    /// The committer revealed and the commitment resolved.
    Observed {
        account: AccountId,
        alive: Amount,
        dead: Amount,
    },
    /// A third party resolved an abandoned commitment.
    Forced {
        caller: AccountId,
        target: AccountId,
        alive: Amount,
        dead: Amount,
    },
    /// Pairs of ALIVE and DEAD were recombined into SUPER.
    Reboxed {
        account: AccountId,
        pairs: Amount,
        minted: Amount,
        fee: Amount,
    },
    /// Which entropy source fed the resolution that follows.
    RandomnessSourceUsed {
        account: AccountId,
        source: RandomnessSource,
    },
}

impl ControllerEvent {
    /// The account whose balances the event concerns.
    pub fn account(&self) -> &AccountId {
        match self {
            ControllerEvent::CommitObserve { account, .. }
            | ControllerEvent::Observed { account, .. }
            | ControllerEvent::Reboxed { account, .. }
            | ControllerEvent::RandomnessSourceUsed { account, .. } => account,
            ControllerEvent::Forced { target, .. } => target,
        }
    }
}

/// Synchronous fan-out event bus for controller events.
///
/// Listeners are invoked inline on the emitting thread while the account's
/// lock is held; keep handlers fast and never call back into the controller.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&ControllerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&ControllerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &ControllerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&ControllerEvent::Observed {
            account: AccountId::from_index(1),
            alive: Amount::from(5u64),
            dead: Amount::ZERO,
        });

        assert_eq!(counter.load(Ordering::SeqCst), 11);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&ControllerEvent::RandomnessSourceUsed {
            account: AccountId::from_index(1),
            source: RandomnessSource::Fallback,
        });
    }

    #[test]
    fn forced_event_concerns_the_target() {
        let event = ControllerEvent::Forced {
            caller: AccountId::from_index(1),
            target: AccountId::from_index(2),
            alive: Amount::ZERO,
            dead: Amount::from(3u64),
        };
        assert_eq!(event.account(), &AccountId::from_index(2));
    }

    #[test]
    fn serializes_with_event_tag() {
        let event = ControllerEvent::Reboxed {
            account: AccountId::from_index(1),
            pairs: Amount::from(10u64),
            minted: Amount::from(19u64),
            fee: Amount::from(1u64),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "reboxed");
        assert_eq!(json["minted"], "19");
    }
}
