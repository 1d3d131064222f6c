//! Randomness for resolving observations.
//!
//! One bit per resolution, derived from:
//! - the hash of the block `REVEAL_DELAY` blocks after the commit (unknown to
//!   the committer when committing),
//! - the committer's own entropy (unknown to block producers),
//! - the reveal payload, or the account for forced resolutions,
//! - the account and commit height.
//!
//! When the delayed block hash has aged out of the chain's history the
//! derivation falls back to a weaker source so funds never get stuck. Callers
//! must surface [`RandomnessSource::Fallback`] to observers.

pub mod chain;
pub mod derive;

pub use chain::ChainHistory;
pub use derive::{derive_outcome, fallback_source, OutcomeSeed, Payload, RandomOutput, RandomnessSource};
