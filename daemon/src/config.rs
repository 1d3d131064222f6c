//! Daemon configuration with TOML file support.

use anyhow::Context;
use qcat_ledger::Genesis;
use qcat_types::{Amount, ProtocolParams, HISTORY_WINDOW, REVEAL_DELAY};
use qcat_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the `qcat` binary.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Protocol parameters (the rebox fee).
    #[serde(default)]
    pub params: ProtocolParams,

    /// Initial SUPER supply and its holder.
    #[serde(default)]
    pub genesis: Genesis,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Shape of a simulated run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Participating accounts, funded from the genesis holder.
    #[serde(default = "default_accounts")]
    pub accounts: u64,

    /// Commit/resolve rounds each account plays.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// SUPER committed per account per round.
    #[serde(default = "default_stake")]
    pub stake: Amount,

    /// Chain height when the run starts.
    #[serde(default = "default_start_height")]
    pub start_height: u64,

    /// Blocks mined between commit and reveal; must exceed `REVEAL_DELAY`.
    #[serde(default = "default_reveal_lag")]
    pub reveal_lag: u64,

    /// Every Nth account abandons its commitment, which the genesis holder
    /// then forces. 0 disables.
    #[serde(default = "default_abandon_every")]
    pub abandon_every: u64,

    /// Every Nth round reveals only after the block-hash history has moved
    /// past the commitment, exercising fallback randomness. 0 disables.
    #[serde(default = "default_stale_round_every")]
    pub stale_round_every: u32,

    /// Mixed into every account's entropy; change it for different outcomes.
    #[serde(default)]
    pub seed: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_accounts() -> u64 {
    8
}

fn default_rounds() -> u32 {
    4
}

fn default_stake() -> Amount {
    Amount::whole(10)
}

fn default_start_height() -> u64 {
    1_000
}

fn default_reveal_lag() -> u64 {
    REVEAL_DELAY + 1
}

fn default_abandon_every() -> u64 {
    5
}

fn default_stale_round_every() -> u32 {
    4
}

// ── Impl ───────────────────────────────────────────────────────────────

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: ProtocolParams::default(),
            genesis: Genesis::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            rounds: default_rounds(),
            stake: default_stake(),
            start_height: default_start_height(),
            reveal_lag: default_reveal_lag(),
            abandon_every: default_abandon_every(),
            stale_round_every: default_stale_round_every(),
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Blocks to wait before revealing in round `round` (1-based).
    pub fn lag_for_round(&self, round: u32) -> u64 {
        if self.stale_round_every != 0 && round % self.stale_round_every == 0 {
            REVEAL_DELAY + HISTORY_WINDOW + 1
        } else {
            self.reveal_lag
        }
    }

    pub fn abandons(&self, account_index: u64) -> bool {
        self.abandon_every != 0 && account_index % self.abandon_every == 0
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.params.validate()?;
        self.genesis.validate()?;
        let sim = &self.simulation;
        anyhow::ensure!(sim.accounts > 0, "simulation needs at least one account");
        anyhow::ensure!(!sim.stake.is_zero(), "simulation stake must be non-zero");
        anyhow::ensure!(
            sim.reveal_lag > REVEAL_DELAY,
            "reveal_lag {} must exceed the reveal delay of {} blocks",
            sim.reveal_lag,
            REVEAL_DELAY
        );
        Ok(())
    }
}
