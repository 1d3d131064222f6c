//! Rebox fee arithmetic.
//!
//! `pairs` ALIVE plus `pairs` DEAD become `2 * pairs - fee` SUPER, where
//! `fee = floor(2 * pairs * bps / 10_000)`. The fee is never minted.

use crate::ControllerError;
use primitive_types::U256;
use qcat_types::{AccountId, Amount, MAX_BPS};
use serde::Serialize;

/// The result of a rebox computation, before any balance moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReboxQuote {
    pub pairs: Amount,
    /// SUPER minted to the caller.
    pub out: Amount,
    /// SUPER withheld; reduces total supply.
    pub fee: Amount,
}

/// What an executed rebox did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReboxReceipt {
    pub account: AccountId,
    pub pairs: Amount,
    pub minted: Amount,
    pub fee: Amount,
}

/// Computes rebox outputs for a fixed fee rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReboxCalculator {
    fee_bps: u32,
}

impl ReboxCalculator {
    /// Fails with `FeeExceedsMaximum` above 10 000 bps; 0 and 10 000 are both
    /// accepted.
    pub fn new(fee_bps: u32) -> Result<Self, ControllerError> {
        if fee_bps > MAX_BPS {
            return Err(ControllerError::FeeExceedsMaximum {
                bps: fee_bps,
                max: MAX_BPS,
            });
        }
        Ok(Self { fee_bps })
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    pub fn quote(&self, pairs: Amount) -> Result<ReboxQuote, ControllerError> {
        if pairs.is_zero() {
            return Err(ControllerError::NoPairsAvailable);
        }
        if pairs > Amount::MAX_PAIRS {
            return Err(ControllerError::PairsOverflow(pairs));
        }
        let base = pairs.raw() << 1;
        let fee = fee_of(base, self.fee_bps);
        Ok(ReboxQuote {
            pairs,
            out: Amount::new(base - fee),
            fee: Amount::new(fee),
        })
    }
}

/// `floor(base * bps / 10_000)` without a 512-bit intermediate.
///
/// Splitting `base = q * 10_000 + r` gives `q * bps + floor(r * bps / 10_000)`
/// exactly; `q * bps <= base` and `r * bps < 10^8`, so nothing overflows.
fn fee_of(base: U256, bps: u32) -> U256 {
    let denom = U256::from(MAX_BPS);
    let bps = U256::from(bps);
    let (q, r) = base.div_mod(denom);
    q * bps + r * bps / denom
}
