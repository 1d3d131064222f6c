//! Protocol constants and the per-deployment parameters.
//!
//! The timing constants are fixed for every deployment. Only the rebox fee
//! varies, and it is immutable once a controller is built.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};

/// Blocks that must pass after a commit before the reveal (strictly greater).
pub const REVEAL_DELAY: u64 = 5;

/// Additional blocks after the reveal delay before anyone may force a resolution.
pub const GRACE: u64 = 64;

/// Maximum length of a reveal payload, in bytes.
pub const DATA_MAX: usize = 256;

/// How far back the chain's block-hash history reaches.
pub const HISTORY_WINDOW: u64 = 256;

/// 100% in basis points.
pub const MAX_BPS: u32 = 10_000;

fn default_rebox_fee_bps() -> u32 {
    500
}

/// Deployment parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Fraction of every rebox destroyed as a fee, in basis points (0..=10000).
    #[serde(default = "default_rebox_fee_bps")]
    pub rebox_fee_bps: u32,
}

impl ProtocolParams {
    pub fn new(rebox_fee_bps: u32) -> Self {
        Self { rebox_fee_bps }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        if self.rebox_fee_bps > MAX_BPS {
            return Err(TypeError::FeeExceedsMaximum {
                bps: self.rebox_fee_bps,
                max: MAX_BPS,
            });
        }
        Ok(())
    }

    pub fn reveal_delay(&self) -> u64 {
        REVEAL_DELAY
    }

    pub fn grace(&self) -> u64 {
        GRACE
    }

    pub fn data_max(&self) -> usize {
        DATA_MAX
    }

    pub fn history_window(&self) -> u64 {
        HISTORY_WINDOW
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            rebox_fee_bps: default_rebox_fee_bps(),
        }
    }
}
