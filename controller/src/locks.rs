//! Per-account serialization.
//!
//! Operations on one account run one at a time; operations on different
//! accounts proceed in parallel.

use qcat_types::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A lazily populated map of per-account mutexes.
///
/// Entries are dropped once no caller holds or waits on them, so the map only
/// grows with the number of accounts currently in flight.
#[derive(Default)]
pub struct AccountLocks {
    slots: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding `account`'s lock.
    pub fn with_account<T>(&self, account: &AccountId, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(*account).or_default())
        };

        let result = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one here: nobody else is waiting.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(account);
        }
        result
    }

    /// Accounts with a live lock entry.
    pub fn in_flight(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
