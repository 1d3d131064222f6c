use qcat_types::AccountId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The account already has an active commitment.
    #[error("pending observation already exists for {0}")]
    Occupied(AccountId),

    /// A slot was written with `active == false` or a zero amount.
    #[error("refusing to store inactive or empty observation for {0}")]
    InvalidRecord(AccountId),

    #[error("storage backend error: {0}")]
    Backend(String),
}
