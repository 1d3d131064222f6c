//! In-memory pending store, keyed by account.

use crate::{PendingObservation, PendingStore, StoreError};
use qcat_types::AccountId;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe in-memory [`PendingStore`].
///
/// Only active commitments are kept in the map; a cleared account has no
/// entry at all.
#[derive(Default)]
pub struct MemoryPendingStore {
    slots: Mutex<HashMap<AccountId, PendingObservation>>,
}

impl MemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<AccountId, PendingObservation>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every active commitment, sorted by account.
    pub fn active(&self) -> Vec<(AccountId, PendingObservation)> {
        let mut entries: Vec<_> = self
            .slots()
            .iter()
            .map(|(account, obs)| (*account, obs.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl PendingStore for MemoryPendingStore {
    fn put_pending(
        &self,
        account: &AccountId,
        observation: &PendingObservation,
    ) -> Result<(), StoreError> {
        if !observation.active || observation.amount.is_zero() {
            return Err(StoreError::InvalidRecord(*account));
        }
        let mut slots = self.slots();
        if slots.contains_key(account) {
            return Err(StoreError::Occupied(*account));
        }
        slots.insert(*account, observation.clone());
        Ok(())
    }

    fn get_pending(&self, account: &AccountId) -> Result<PendingObservation, StoreError> {
        Ok(self
            .slots()
            .get(account)
            .cloned()
            .unwrap_or_else(PendingObservation::inactive))
    }

    fn clear_pending(&self, account: &AccountId) -> Result<(), StoreError> {
        self.slots().remove(account);
        Ok(())
    }

    fn pending_count(&self) -> Result<u64, StoreError> {
        Ok(self.slots().len() as u64)
    }
}
