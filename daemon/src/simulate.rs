//! Simulated runs: many accounts committing and resolving against one shared
//! controller on a fake chain.
//!
//! Each round funds every participant with `stake` SUPER from the genesis
//! holder, has them all commit in parallel, mines `reveal_lag` blocks, then
//! reveals. Participants marked as abandoning never reveal; the genesis
//! holder forces their commitments once the grace period has passed. After
//! the last round every participant reboxes whatever pairs they hold.

use crate::config::{DaemonConfig, SimulationConfig};
use anyhow::Context;
use qcat_controller::{Controller, ControllerError, ControllerEvent};
use qcat_crypto::{blake2b_256, blake2b_256_multi, commitment};
use qcat_ledger::{LedgerSummary, MemoryLedger};
use qcat_nullables::NullChain;
use qcat_store::{MemoryPendingStore, PendingStore};
use qcat_types::{AccountId, Amount, Entropy, TokenKind, GRACE};
use qcat_utils::{StatsCounter, StatsSnapshot};
use qcat_vrf::ChainHistory;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

const COUNTERS: &[&str] = &[
    "commits", "observed", "forced", "alive", "dead", "fallback", "reboxes",
];

/// Summary printed at the end of a run.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub accounts: u64,
    pub rounds: u32,
    pub fee_bps: u32,
    pub final_height: u64,
    pub events: StatsSnapshot,
    pub supply: LedgerSummary,
    /// Genesis supply minus everything still in circulation: the rebox fees.
    pub destroyed: Amount,
    /// Commitments left unresolved; always zero for a completed run.
    pub pending: u64,
}

pub struct Simulation {
    controller: Arc<Controller>,
    ledger: Arc<MemoryLedger>,
    store: Arc<MemoryPendingStore>,
    chain: Arc<NullChain>,
    stats: Arc<StatsCounter>,
    sim: SimulationConfig,
    holder: AccountId,
    initial_supply: Amount,
}

fn record(stats: &StatsCounter, event: &ControllerEvent) {
    let outcome = |alive: &Amount| if alive.is_zero() { "dead" } else { "alive" };
    match event {
        ControllerEvent::CommitObserve { .. } => stats.increment("commits"),
        ControllerEvent::Observed { alive, .. } => {
            stats.increment("observed");
            stats.increment(outcome(alive));
        }
        ControllerEvent::Forced { alive, .. } => {
            stats.increment("forced");
            stats.increment(outcome(alive));
        }
        ControllerEvent::Reboxed { .. } => stats.increment("reboxes"),
        ControllerEvent::RandomnessSourceUsed { source, .. } => {
            if source.is_fallback() {
                stats.increment("fallback");
            }
        }
    }
}

fn reveal_data(seed: u64, round: u32, account: &AccountId) -> Vec<u8> {
    format!("qcat-sim:{seed}:{round}:{account}").into_bytes()
}

fn entropy_for(seed: u64, round: u32, account: &AccountId) -> Entropy {
    Entropy::new(blake2b_256_multi(&[
        b"qcat-sim:entropy",
        &seed.to_be_bytes(),
        &round.to_be_bytes(),
        account.as_bytes(),
    ]))
}

impl Simulation {
    pub fn new(config: &DaemonConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let ledger = Arc::new(MemoryLedger::from_genesis(&config.genesis)?);
        let store = Arc::new(MemoryPendingStore::new());
        let stats = Arc::new(StatsCounter::new(COUNTERS));

        let mut controller = Controller::new(ledger.clone(), store.clone(), config.params.clone())?;
        let counters = Arc::clone(&stats);
        controller.subscribe(Box::new(move |event: &ControllerEvent| record(&counters, event)));

        let sim = config.simulation.clone();
        let chain = NullChain::with_seed(blake2b_256(&sim.seed.to_be_bytes()), sim.start_height);

        Ok(Self {
            controller: Arc::new(controller),
            ledger,
            store,
            chain: Arc::new(chain),
            stats,
            sim,
            holder: config.genesis.holder,
            initial_supply: config.genesis.initial_supply,
        })
    }

    /// `(index, account)` for every participant; indices start at 1.
    fn participants(&self) -> impl Iterator<Item = (u64, AccountId)> {
        (1..=self.sim.accounts).map(|index| (index, AccountId::from_index(index + 1)))
    }

    /// Run `step` for every participant on the blocking pool and wait for all.
    async fn in_parallel<F>(&self, step: F) -> anyhow::Result<()>
    where
        F: Fn(&Controller, &NullChain, u64, AccountId) -> Result<(), ControllerError>
            + Send
            + Sync
            + 'static,
    {
        let step = Arc::new(step);
        let handles: Vec<_> = self
            .participants()
            .map(|(index, account)| {
                let controller = Arc::clone(&self.controller);
                let chain = Arc::clone(&self.chain);
                let step = Arc::clone(&step);
                tokio::task::spawn_blocking(move || {
                    step(controller.as_ref(), chain.as_ref(), index, account)
                        .with_context(|| format!("participant {account}"))
                })
            })
            .collect();
        for handle in handles {
            handle.await??;
        }
        Ok(())
    }

    async fn play_round(&self, round: u32) -> anyhow::Result<()> {
        for (_, account) in self.participants() {
            self.ledger
                .transfer(&self.holder, &account, TokenKind::Super, self.sim.stake)
                .context("funding participants")?;
        }

        let (stake, seed) = (self.sim.stake, self.sim.seed);
        self.in_parallel(move |controller, chain, _, account| {
            let data = reveal_data(seed, round, &account);
            controller
                .commit_observe(&account, stake, commitment(&data), entropy_for(seed, round, &account), chain)
                .map(|_| ())
        })
        .await?;

        self.chain.advance(self.sim.lag_for_round(round));
        let sim = self.sim.clone();
        self.in_parallel(move |controller, chain, index, account| {
            if sim.abandons(index) {
                return Ok(());
            }
            controller
                .observe(&account, &reveal_data(seed, round, &account), chain)
                .map(|_| ())
        })
        .await?;

        if self.participants().any(|(index, _)| self.sim.abandons(index)) {
            self.chain.advance(GRACE);
            let (sim, keeper) = (self.sim.clone(), self.holder);
            self.in_parallel(move |controller, chain, index, account| {
                if !sim.abandons(index) {
                    return Ok(());
                }
                controller.force_observe(&keeper, &account, chain).map(|_| ())
            })
            .await?;
        }

        self.chain.advance(1);
        debug!(round, height = self.chain.height(), "round complete");
        Ok(())
    }

    pub async fn run(self) -> anyhow::Result<SimulationReport> {
        info!(
            accounts = self.sim.accounts,
            rounds = self.sim.rounds,
            fee_bps = self.controller.fee_bps(),
            "simulation starting"
        );
        for round in 1..=self.sim.rounds {
            self.play_round(round).await?;
        }

        self.in_parallel(|controller, _, _, account| match controller.rebox_max(&account, None) {
            Ok(_) | Err(ControllerError::NoPairsAvailable) => Ok(()),
            Err(err) => Err(err),
        })
        .await?;

        let supply = self.ledger.summary();
        let circulating = supply
            .super_supply
            .checked_add(supply.alive_supply)
            .and_then(|t| t.checked_add(supply.dead_supply))
            .context("circulating supply overflowed")?;
        let report = SimulationReport {
            accounts: self.sim.accounts,
            rounds: self.sim.rounds,
            fee_bps: self.controller.fee_bps(),
            final_height: self.chain.height(),
            events: self.stats.snapshot(),
            destroyed: self.initial_supply.saturating_sub(circulating),
            pending: self.store.pending_count()?,
            supply,
        };
        info!(
            height = report.final_height,
            destroyed = %report.destroyed,
            "simulation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(accounts: u64, rounds: u32) -> DaemonConfig {
        let mut config = DaemonConfig::default();
        config.simulation.accounts = accounts;
        config.simulation.rounds = rounds;
        config
    }

    #[tokio::test]
    async fn default_run_resolves_everything() {
        let report = Simulation::new(&config(8, 4)).unwrap().run().await.unwrap();
        let events = &report.events;
        assert_eq!(events.get("commits"), 32);
        assert_eq!(events.get("observed") + events.get("forced"), 32);
        assert_eq!(events.get("alive") + events.get("dead"), 32);
        // Participant 5 abandons every round.
        assert_eq!(events.get("forced"), 4);
        // Round 4 reveals after the history window.
        assert_eq!(events.get("fallback"), 8);
        assert_eq!(report.pending, 0);
    }

    #[tokio::test]
    async fn supply_is_conserved_up_to_fees() {
        let report = Simulation::new(&config(6, 3)).unwrap().run().await.unwrap();
        let total = report
            .supply
            .super_supply
            .checked_add(report.supply.alive_supply)
            .and_then(|t| t.checked_add(report.supply.dead_supply))
            .unwrap();
        assert_eq!(total.checked_add(report.destroyed), Some(Amount::whole(1_000_000)));
    }

    #[tokio::test]
    async fn zero_fee_destroys_nothing() {
        let mut cfg = config(4, 2);
        cfg.params.rebox_fee_bps = 0;
        let report = Simulation::new(&cfg).unwrap().run().await.unwrap();
        assert_eq!(report.destroyed, Amount::ZERO);
    }

    #[tokio::test]
    async fn same_seed_same_outcomes() {
        let a = Simulation::new(&config(5, 2)).unwrap().run().await.unwrap();
        let b = Simulation::new(&config(5, 2)).unwrap().run().await.unwrap();
        assert_eq!(a.events, b.events);
        assert_eq!(a.supply, b.supply);
    }

    #[tokio::test]
    async fn underfunded_holder_fails() {
        let mut cfg = config(4, 1);
        cfg.genesis.initial_supply = Amount::from(1u64);
        let err = Simulation::new(&cfg).unwrap().run().await.unwrap_err();
        assert!(err.to_string().contains("funding participants"));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut cfg = config(0, 1);
        assert!(Simulation::new(&cfg).is_err());
        cfg.simulation.accounts = 1;
        cfg.params.rebox_fee_bps = 20_000;
        assert!(Simulation::new(&cfg).is_err());
    }
}
