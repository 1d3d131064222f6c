//! The pending-observation record and its storage trait.

use crate::StoreError;
use qcat_types::{AccountId, Amount, BlockHeight, DataHash, Entropy};
use serde::{Deserialize, Serialize};

/// A commitment awaiting resolution.
///
/// The committed SUPER has already been burned; this record is the only
/// trace of it until `observe` or `force_observe` mints the resolved kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingObservation {
    pub active: bool,
    pub amount: Amount,
    pub data_hash: DataHash,
    pub user_entropy: Entropy,
    /// Block height at which the commitment was made.
    pub ref_block: BlockHeight,
}

impl PendingObservation {
    pub fn new(
        amount: Amount,
        data_hash: DataHash,
        user_entropy: Entropy,
        ref_block: BlockHeight,
    ) -> Self {
        Self {
            active: true,
            amount,
            data_hash,
            user_entropy,
            ref_block,
        }
    }

    /// The value of an empty slot.
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Trait for the one-slot-per-account commitment store.
///
/// There is no expiry: an active slot stays until it is explicitly cleared.
pub trait PendingStore: Send + Sync {
    /// Store a commitment. Fails with [`StoreError::Occupied`] if the account
    /// already has an active one.
    fn put_pending(
        &self,
        account: &AccountId,
        observation: &PendingObservation,
    ) -> Result<(), StoreError>;

    /// Current slot value; [`PendingObservation::inactive`] when empty.
    fn get_pending(&self, account: &AccountId) -> Result<PendingObservation, StoreError>;

    /// Reset the slot to inactive. Clearing an empty slot is a no-op.
    fn clear_pending(&self, account: &AccountId) -> Result<(), StoreError>;

    /// Number of active commitments across all accounts.
    fn pending_count(&self) -> Result<u64, StoreError>;
}
