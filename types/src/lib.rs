//! Fundamental types for the QuantumCat protocol.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: accounts, 256-bit amounts, digests, token kinds and the protocol
//! constants that govern observation and rebox.

pub mod address;
pub mod amount;
pub mod block;
pub mod error;
pub mod hash;
pub mod params;
pub mod token;

pub use address::AccountId;
pub use amount::Amount;
pub use block::{BlockHash, BlockHeight};
pub use error::TypeError;
pub use hash::{DataHash, Entropy};
pub use params::{ProtocolParams, DATA_MAX, GRACE, HISTORY_WINDOW, MAX_BPS, REVEAL_DELAY};
pub use token::TokenKind;
