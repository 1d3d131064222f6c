//! `qcat`: QuantumCat protocol parameters, rebox quotes and simulated runs.

mod config;
mod simulate;

use anyhow::Context;
use clap::Parser;
use config::DaemonConfig;
use qcat_controller::ReboxCalculator;
use qcat_types::{Amount, TokenKind, DATA_MAX, GRACE, HISTORY_WINDOW, MAX_BPS, REVEAL_DELAY};
use qcat_utils::{init_logging, LogFormat};
use serde::Serialize;
use simulate::Simulation;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qcat", about = "QuantumCat protocol tools", version)]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "QCAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "QCAT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "QCAT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Rebox fee in basis points (0-10000).
    #[arg(long, env = "QCAT_REBOX_FEE_BPS")]
    fee_bps: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective protocol parameters and token metadata.
    Params,
    /// Quote a rebox of N pairs without touching any balance.
    Quote {
        /// Pairs of ALIVE and DEAD, in raw units.
        #[arg(long)]
        pairs: Amount,
    },
    /// Run many accounts through commit, reveal, force and rebox on a
    /// simulated chain, then print a summary.
    Simulate {
        #[arg(long)]
        accounts: Option<u64>,
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Serialize)]
struct TokenView {
    kind: TokenKind,
    name: &'static str,
    symbol: &'static str,
    decimals: u8,
}

#[derive(Serialize)]
struct ParamsView {
    rebox_fee_bps: u32,
    max_bps: u32,
    reveal_delay: u64,
    grace: u64,
    data_max: usize,
    history_window: u64,
    tokens: Vec<TokenView>,
}

fn load_config(cli: &Cli) -> anyhow::Result<DaemonConfig> {
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(bps) = cli.fee_bps {
        config.params.rebox_fee_bps = bps;
    }
    if let Command::Simulate { accounts, rounds, seed } = &cli.command {
        let sim = &mut config.simulation;
        sim.accounts = accounts.unwrap_or(sim.accounts);
        sim.rounds = rounds.unwrap_or(sim.rounds);
        sim.seed = seed.unwrap_or(sim.seed);
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Params => {
            let params = &config.params;
            print_json(&ParamsView {
                rebox_fee_bps: params.rebox_fee_bps,
                max_bps: MAX_BPS,
                reveal_delay: REVEAL_DELAY,
                grace: GRACE,
                data_max: DATA_MAX,
                history_window: HISTORY_WINDOW,
                tokens: TokenKind::ALL
                    .iter()
                    .map(|kind| TokenView {
                        kind: *kind,
                        name: kind.name(),
                        symbol: kind.symbol(),
                        decimals: kind.decimals(),
                    })
                    .collect(),
            })?;
        }
        Command::Quote { pairs } => {
            let quote = ReboxCalculator::new(config.params.rebox_fee_bps)?.quote(pairs)?;
            print_json(&quote)?;
        }
        Command::Simulate { .. } => {
            let report = Simulation::new(&config)?.run().await?;
            print_json(&report)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "qcat", "--fee-bps", "100", "--log-format", "json", "simulate", "--accounts", "3",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.params.rebox_fee_bps, 100);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.simulation.accounts, 3);
        assert_eq!(config.simulation.rounds, 4);
    }

    #[test]
    fn quote_parses_decimal_pairs() {
        let cli = Cli::try_parse_from(["qcat", "quote", "--pairs", "10"]).unwrap();
        match cli.command {
            Command::Quote { pairs } => assert_eq!(pairs, Amount::from(10u64)),
            _ => panic!("expected quote"),
        }
    }

    #[test]
    fn excessive_fee_flag_is_rejected() {
        let cli = Cli::try_parse_from(["qcat", "--fee-bps", "10001", "params"]).unwrap();
        assert!(load_config(&cli).is_err());
    }
}
