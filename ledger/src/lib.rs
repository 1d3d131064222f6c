//! Three-balance token ledger.
//!
//! Every account holds three independent balances: SUPER (QCAT), ALIVE
//! (ALIVECAT) and DEAD (DEADCAT). The controller only ever mints and burns;
//! holders may also transfer resolved balances between themselves.

pub mod error;
pub mod genesis;
pub mod ledger;
pub mod memory;

pub use error::LedgerError;
pub use genesis::Genesis;
pub use ledger::Ledger;
pub use memory::{LedgerSummary, MemoryLedger};
