//! Shared utilities for the QuantumCat workspace.

pub mod logging;
pub mod stats;

pub use logging::{init_logging, LogFormat, LoggingError};
pub use stats::{StatsCounter, StatsSnapshot};
