//! Pending-observation storage for the QuantumCat protocol.
//!
//! One slot per account holds the commitment awaiting resolution. Backends
//! implement [`PendingStore`]; the rest of the workspace depends only on the
//! trait. [`MemoryPendingStore`] is the in-process backend.

pub mod error;
pub mod memory;
pub mod pending;

pub use error::StoreError;
pub use memory::MemoryPendingStore;
pub use pending::{PendingObservation, PendingStore};
