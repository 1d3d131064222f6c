//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid account id: {0}")]
    InvalidAccount(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid 32-byte hex value: {0}")]
    InvalidHex(String),

    #[error("unknown token kind: {0}")]
    UnknownToken(String),

    #[error("fee {bps} bps exceeds maximum of {max} bps")]
    FeeExceedsMaximum { bps: u32, max: u32 },
}
