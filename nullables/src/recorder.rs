//! Event capture for assertions on emitted events.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Collects every event delivered to its listeners, in order.
pub struct EventRecorder<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E: Clone + Send + 'static> EventRecorder<E> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A listener that appends to this recorder. Hand it to `subscribe`.
    pub fn listener(&self) -> Box<dyn Fn(&E) + Send + Sync> {
        let events = Arc::clone(&self.events);
        Box::new(move |event: &E| {
            events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        })
    }

    pub fn events(&self) -> Vec<E> {
        self.guard().clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<E> {
        std::mem::take(&mut *self.guard())
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<E>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Clone + Send + 'static> Default for EventRecorder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventRecorder<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let recorder = EventRecorder::<u32>::new();
        let listener = recorder.listener();
        listener(&1);
        listener(&2);
        assert_eq!(recorder.events(), vec![1, 2]);
        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn take_drains() {
        let recorder = EventRecorder::<&'static str>::new();
        recorder.listener()(&"a");
        assert_eq!(recorder.take(), vec!["a"]);
        assert!(recorder.is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let recorder = EventRecorder::<u8>::new();
        let other = recorder.clone();
        recorder.listener()(&9);
        assert_eq!(other.events(), vec![9]);
    }
}
