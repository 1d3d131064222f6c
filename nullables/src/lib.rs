//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The chain the protocol reads from and the listeners it reports to are
//! abstracted behind traits and callbacks. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! The daemon's simulator drives the controller with the same [`NullChain`].

pub mod chain;
pub mod recorder;

pub use chain::NullChain;
pub use recorder::EventRecorder;
