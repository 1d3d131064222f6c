//! The controller: commit, reveal, force and rebox.

use crate::{
    AccountLocks, ControllerError, ControllerEvent, EventBus, ReboxCalculator, ReboxQuote,
    ReboxReceipt,
};
use qcat_crypto::verify_commitment;
use qcat_ledger::{Ledger, LedgerError};
use qcat_store::{PendingObservation, PendingStore};
use qcat_types::{
    AccountId, Amount, BlockHeight, DataHash, Entropy, ProtocolParams, TokenKind, DATA_MAX, GRACE,
    REVEAL_DELAY,
};
use qcat_vrf::{derive_outcome, ChainHistory, OutcomeSeed, Payload, RandomOutput, RandomnessSource};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// How a commitment resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub account: AccountId,
    pub kind: TokenKind,
    pub amount: Amount,
    pub ref_block: BlockHeight,
    pub source: RandomnessSource,
    /// Set when a third party forced the resolution.
    pub forced_by: Option<AccountId>,
}

impl Resolution {
    pub fn alive(&self) -> Amount {
        if self.kind == TokenKind::Alive {
            self.amount
        } else {
            Amount::ZERO
        }
    }

    pub fn dead(&self) -> Amount {
        if self.kind == TokenKind::Dead {
            self.amount
        } else {
            Amount::ZERO
        }
    }

    pub fn is_forced(&self) -> bool {
        self.forced_by.is_some()
    }
}

/// Last height at which a commitment made at `ref_block` may not yet be
/// revealed.
fn reveal_after(ref_block: BlockHeight) -> BlockHeight {
    ref_block.saturating_add(REVEAL_DELAY)
}

fn force_after(ref_block: BlockHeight) -> BlockHeight {
    ref_block.saturating_add(REVEAL_DELAY).saturating_add(GRACE)
}

/// A commitment at `ref_block` must stay forceable: some height above
/// `force_after(ref_block)` has to exist.
fn check_resolvable(ref_block: BlockHeight) -> Result<(), ControllerError> {
    ref_block
        .checked_add(REVEAL_DELAY + GRACE + 1)
        .map(|_| ())
        .ok_or(ControllerError::ReferenceBlockTooHigh(ref_block))
}

/// The QuantumCat controller.
///
/// Owns nothing but its fee rate and event listeners; balances live in the
/// [`Ledger`] and commitments in the [`PendingStore`]. Every mutating
/// operation holds the account's lock for its whole duration and either
/// completes or leaves ledger and store as they were.
pub struct Controller {
    ledger: Arc<dyn Ledger>,
    pending: Arc<dyn PendingStore>,
    rebox: ReboxCalculator,
    locks: AccountLocks,
    events: EventBus,
}

impl Controller {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        pending: Arc<dyn PendingStore>,
        params: ProtocolParams,
    ) -> Result<Self, ControllerError> {
        let rebox = ReboxCalculator::new(params.rebox_fee_bps)?;
        info!(fee_bps = params.rebox_fee_bps, "controller ready");
        Ok(Self {
            ledger,
            pending,
            rebox,
            locks: AccountLocks::new(),
            events: EventBus::new(),
        })
    }

    /// Register a listener. Events are delivered synchronously.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&ControllerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn fee_bps(&self) -> u32 {
        self.rebox.fee_bps()
    }

    /// Burn `amount` SUPER and record a commitment to `data_hash`.
    ///
    /// The commitment's reference block is the chain's current height.
    pub fn commit_observe(
        &self,
        account: &AccountId,
        amount: Amount,
        data_hash: DataHash,
        user_entropy: Entropy,
        chain: &dyn ChainHistory,
    ) -> Result<PendingObservation, ControllerError> {
        if amount.is_zero() {
            return Err(ControllerError::InvalidAmount);
        }
        if user_entropy.is_zero() {
            return Err(ControllerError::ZeroEntropy);
        }

        self.locks.with_account(account, || {
            if self.pending.get_pending(account)?.active {
                return Err(ControllerError::PendingObservationExists(*account));
            }

            let ref_block = chain.height();
            check_resolvable(ref_block)?;
            self.ledger.burn(account, TokenKind::Super, amount)?;

            let observation = PendingObservation::new(amount, data_hash, user_entropy, ref_block);
            if let Err(err) = self.pending.put_pending(account, &observation) {
                self.undo_mint(account, TokenKind::Super, amount);
                return Err(err.into());
            }

            debug!(%account, %amount, ref_block, "observation committed");
            self.events.emit(&ControllerEvent::CommitObserve {
                account: *account,
                amount,
                data_hash,
                ref_block,
            });
            Ok(observation)
        })
    }

    /// Reveal the committed data and resolve the caller's own commitment.
    ///
    /// Checks run in order: a commitment exists, the data matches it, the
    /// data fits `DATA_MAX`, and more than `REVEAL_DELAY` blocks have passed.
    pub fn observe(
        &self,
        account: &AccountId,
        data: &[u8],
        chain: &dyn ChainHistory,
    ) -> Result<Resolution, ControllerError> {
        self.locks.with_account(account, || {
            let pending = self.active_pending(account)?;
            if !verify_commitment(data, &pending.data_hash) {
                return Err(ControllerError::HashMismatch);
            }
            if data.len() > DATA_MAX {
                return Err(ControllerError::DataTooLarge {
                    len: data.len(),
                    max: DATA_MAX,
                });
            }
            let current = chain.height();
            let after = reveal_after(pending.ref_block);
            if current <= after {
                return Err(ControllerError::InsufficientDelay { current, after });
            }

            let output = derive_outcome(
                chain,
                &OutcomeSeed {
                    account,
                    ref_block: pending.ref_block,
                    user_entropy: &pending.user_entropy,
                    payload: Payload::Reveal(data),
                },
            );
            self.resolve(account, &pending, output, None)
        })
    }

    /// Resolve someone else's abandoned commitment once the grace period is
    /// over. The resolved balance goes to `target`, never to `caller`.
    pub fn force_observe(
        &self,
        caller: &AccountId,
        target: &AccountId,
        chain: &dyn ChainHistory,
    ) -> Result<Resolution, ControllerError> {
        self.locks.with_account(target, || {
            let pending = self.active_pending(target)?;
            let current = chain.height();
            let after = force_after(pending.ref_block);
            if current <= after {
                return Err(ControllerError::GracePeriodNotPassed { current, after });
            }

            let output = derive_outcome(
                chain,
                &OutcomeSeed {
                    account: target,
                    ref_block: pending.ref_block,
                    user_entropy: &pending.user_entropy,
                    payload: Payload::Forced,
                },
            );
            self.resolve(target, &pending, output, Some(*caller))
        })
    }

    /// Whether `observe` would pass its timing check at `current_block`.
    pub fn can_observe(
        &self,
        account: &AccountId,
        current_block: BlockHeight,
    ) -> Result<bool, ControllerError> {
        let pending = self.pending.get_pending(account)?;
        Ok(pending.active && current_block > reveal_after(pending.ref_block))
    }

    /// Whether `force_observe` would pass its timing check at `current_block`.
    pub fn can_force_observe(
        &self,
        account: &AccountId,
        current_block: BlockHeight,
    ) -> Result<bool, ControllerError> {
        let pending = self.pending.get_pending(account)?;
        Ok(pending.active && current_block > force_after(pending.ref_block))
    }

    /// The account's slot; inactive when nothing is committed.
    pub fn pending_of(&self, account: &AccountId) -> Result<PendingObservation, ControllerError> {
        Ok(self.pending.get_pending(account)?)
    }

    /// Quote a rebox of `pairs` without touching any balance.
    pub fn calculate_rebox_output(&self, pairs: Amount) -> Result<ReboxQuote, ControllerError> {
        let quote = self.rebox.quote(pairs)?;
        debug!(%pairs, out = %quote.out, fee = %quote.fee, "rebox quoted");
        Ok(quote)
    }

    /// Burn `pairs` ALIVE and `pairs` DEAD, mint `2 * pairs - fee` SUPER.
    pub fn rebox(&self, account: &AccountId, pairs: Amount) -> Result<ReboxReceipt, ControllerError> {
        let quote = self.rebox.quote(pairs)?;
        self.locks.with_account(account, || self.execute_rebox(account, quote))
    }

    /// Rebox as many pairs as the account holds, optionally capped.
    ///
    /// `None` means no cap.
    pub fn rebox_max(
        &self,
        account: &AccountId,
        cap: Option<Amount>,
    ) -> Result<ReboxReceipt, ControllerError> {
        if let Some(cap) = cap {
            if cap > Amount::MAX_PAIRS {
                return Err(ControllerError::PairsOverflow(cap));
            }
        }

        self.locks.with_account(account, || {
            let alive = self.ledger.balance_of(account, TokenKind::Alive);
            let dead = self.ledger.balance_of(account, TokenKind::Dead);
            let mut pairs = alive.min(dead);
            if let Some(cap) = cap {
                pairs = pairs.min(cap);
            }
            let quote = self.rebox.quote(pairs)?;
            self.execute_rebox(account, quote)
        })
    }

    fn active_pending(&self, account: &AccountId) -> Result<PendingObservation, ControllerError> {
        let pending = self.pending.get_pending(account)?;
        if !pending.active {
            return Err(ControllerError::NoPendingObservation(*account));
        }
        Ok(pending)
    }

    /// Mint the outcome and free the slot. Caller holds the account's lock.
    fn resolve(
        &self,
        account: &AccountId,
        pending: &PendingObservation,
        output: RandomOutput,
        forced_by: Option<AccountId>,
    ) -> Result<Resolution, ControllerError> {
        let kind = output.kind();
        self.ledger.mint(account, kind, pending.amount)?;
        if let Err(err) = self.pending.clear_pending(account) {
            self.undo_burn(account, kind, pending.amount);
            return Err(err.into());
        }

        let resolution = Resolution {
            account: *account,
            kind,
            amount: pending.amount,
            ref_block: pending.ref_block,
            source: output.source,
            forced_by,
        };

        if output.source.is_fallback() {
            warn!(%account, ref_block = pending.ref_block, "resolved with fallback randomness");
        }
        self.events.emit(&ControllerEvent::RandomnessSourceUsed {
            account: *account,
            source: output.source,
        });
        match forced_by {
            Some(caller) => {
                info!(%caller, target = %account, %kind, amount = %pending.amount, "observation forced");
                self.events.emit(&ControllerEvent::Forced {
                    caller,
                    target: *account,
                    alive: resolution.alive(),
                    dead: resolution.dead(),
                });
            }
            None => {
                info!(%account, %kind, amount = %pending.amount, "observation resolved");
                self.events.emit(&ControllerEvent::Observed {
                    account: *account,
                    alive: resolution.alive(),
                    dead: resolution.dead(),
                });
            }
        }
        Ok(resolution)
    }

    /// Caller holds the account's lock.
    fn execute_rebox(
        &self,
        account: &AccountId,
        quote: ReboxQuote,
    ) -> Result<ReboxReceipt, ControllerError> {
        let pairs = quote.pairs;
        // Check both sides first so a DEAD shortfall never touches ALIVE.
        for kind in [TokenKind::Alive, TokenKind::Dead] {
            let available = self.ledger.balance_of(account, kind);
            if available < pairs {
                return Err(LedgerError::InsufficientBalance {
                    account: *account,
                    kind,
                    needed: pairs,
                    available,
                }
                .into());
            }
        }

        self.ledger.burn(account, TokenKind::Alive, pairs)?;
        if let Err(err) = self.ledger.burn(account, TokenKind::Dead, pairs) {
            self.undo_mint(account, TokenKind::Alive, pairs);
            return Err(err.into());
        }
        if let Err(err) = self.ledger.mint(account, TokenKind::Super, quote.out) {
            self.undo_mint(account, TokenKind::Alive, pairs);
            self.undo_mint(account, TokenKind::Dead, pairs);
            return Err(err.into());
        }

        info!(%account, %pairs, minted = %quote.out, fee = %quote.fee, "reboxed");
        self.events.emit(&ControllerEvent::Reboxed {
            account: *account,
            pairs,
            minted: quote.out,
            fee: quote.fee,
        });
        Ok(ReboxReceipt {
            account: *account,
            pairs,
            minted: quote.out,
            fee: quote.fee,
        })
    }

    fn undo_mint(&self, account: &AccountId, kind: TokenKind, amount: Amount) {
        if let Err(err) = self.ledger.mint(account, kind, amount) {
            error!(%account, %kind, %amount, %err, "failed to restore burned balance");
        }
    }

    fn undo_burn(&self, account: &AccountId, kind: TokenKind, amount: Amount) {
        if let Err(err) = self.ledger.burn(account, kind, amount) {
            error!(%account, %kind, %amount, %err, "failed to revert minted balance");
        }
    }
}
