//! The QuantumCat controller.
//!
//! Turns SUPER into exactly one of ALIVE or DEAD through a commit-reveal
//! observation, and turns equal ALIVE/DEAD pairs back into SUPER minus a fee.
//!
//! ```text
//! NoPending --commit_observe--> Committed --observe (after REVEAL_DELAY)------> NoPending
//!                                         \-force_observe (after +GRACE)-----/
//! ```
//!
//! Committed SUPER is burned at commit time. A commitment can never be
//! cancelled; once `REVEAL_DELAY + GRACE` blocks pass anyone may resolve it,
//! so funds are never stuck.

pub mod engine;
pub mod error;
pub mod event;
pub mod locks;
pub mod rebox;

pub use engine::{Controller, Resolution};
pub use error::{ControllerError, ErrorClass};
pub use event::{ControllerEvent, EventBus};
pub use locks::AccountLocks;
pub use rebox::{ReboxCalculator, ReboxQuote, ReboxReceipt};
