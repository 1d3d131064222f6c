//! Initial SUPER supply for a fresh deployment.
//!
//! ALIVE and DEAD start with zero supply; they only come into existence
//! through observation.

use crate::LedgerError;
use qcat_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};

fn default_holder() -> AccountId {
    AccountId::from_index(1)
}

fn default_initial_supply() -> Amount {
    Amount::whole(1_000_000)
}

/// Configuration for seeding the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    /// Account receiving the whole initial SUPER supply.
    #[serde(default = "default_holder")]
    pub holder: AccountId,
    /// Initial SUPER supply, in raw units.
    #[serde(default = "default_initial_supply")]
    pub initial_supply: Amount,
}

impl Genesis {
    pub fn new(holder: AccountId, initial_supply: Amount) -> Self {
        Self {
            holder,
            initial_supply,
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.holder.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if self.initial_supply.is_zero() {
            return Err(LedgerError::ZeroSupply);
        }
        Ok(())
    }
}

impl Default for Genesis {
    fn default() -> Self {
        Self {
            holder: default_holder(),
            initial_supply: default_initial_supply(),
        }
    }
}
