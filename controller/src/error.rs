//! Controller errors.
//!
//! Every error is returned before, or in place of, any lasting state change.

use qcat_ledger::LedgerError;
use qcat_store::StoreError;
use qcat_types::{AccountId, Amount, BlockHeight};
use thiserror::Error;

/// Coarse grouping used by callers to decide how to react.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input; retry with corrected arguments.
    Validation,
    /// Timing or commitment mismatch; wait or use the right payload.
    State,
    /// Propagated from the ledger (e.g. insufficient balance).
    Ledger,
    /// Pending-store backend failure.
    Store,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("amount must be non-zero")]
    InvalidAmount,

    #[error("user entropy must be non-zero")]
    ZeroEntropy,

    #[error("reveal data is {len} bytes, maximum is {max}")]
    DataTooLarge { len: usize, max: usize },

    #[error("rebox fee {bps} bps exceeds maximum of {max} bps")]
    FeeExceedsMaximum { bps: u32, max: u32 },

    #[error("{0} pairs would overflow when doubled")]
    PairsOverflow(Amount),

    #[error("no pairs available to rebox")]
    NoPairsAvailable,

    #[error("commitment at block {0} could never be resolved")]
    ReferenceBlockTooHigh(BlockHeight),

    #[error("pending observation already exists for {0}")]
    PendingObservationExists(AccountId),

    #[error("no pending observation for {0}")]
    NoPendingObservation(AccountId),

    #[error("reveal data does not match the committed hash")]
    HashMismatch,

    #[error("reveal too early: at block {current}, allowed after block {after}")]
    InsufficientDelay { current: BlockHeight, after: BlockHeight },

    #[error("grace period not passed: at block {current}, allowed after block {after}")]
    GracePeriodNotPassed { current: BlockHeight, after: BlockHeight },

    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),

    #[error("pending store: {0}")]
    Store(StoreError),
}

impl ControllerError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ControllerError::InvalidAmount
            | ControllerError::ZeroEntropy
            | ControllerError::DataTooLarge { .. }
            | ControllerError::FeeExceedsMaximum { .. }
            | ControllerError::PairsOverflow(_)
            | ControllerError::NoPairsAvailable
            | ControllerError::ReferenceBlockTooHigh(_) => ErrorClass::Validation,
            ControllerError::PendingObservationExists(_)
            | ControllerError::NoPendingObservation(_)
            | ControllerError::HashMismatch
            | ControllerError::InsufficientDelay { .. }
            | ControllerError::GracePeriodNotPassed { .. } => ErrorClass::State,
            ControllerError::Ledger(_) => ErrorClass::Ledger,
            ControllerError::Store(_) => ErrorClass::Store,
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Occupied(account) => ControllerError::PendingObservationExists(account),
            other => ControllerError::Store(other),
        }
    }
}
