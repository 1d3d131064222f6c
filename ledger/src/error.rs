use qcat_types::{AccountId, Amount, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient {kind} balance for {account}: need {needed}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        kind: TokenKind,
        needed: Amount,
        available: Amount,
    },

    #[error("{kind} supply would exceed 2^256-1")]
    SupplyOverflow { kind: TokenKind },

    #[error("zero account is not a valid holder")]
    ZeroAddress,

    #[error("initial supply must be non-zero")]
    ZeroSupply,

    #[error("ledger backend error: {0}")]
    Backend(String),
}
