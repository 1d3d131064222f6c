//! Named counters for run summaries.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe, fixed set of named counters.
///
/// Unknown names are ignored on write and read as zero.
pub struct StatsCounter {
    counters: BTreeMap<&'static str, AtomicU64>,
}

/// Point-in-time copy of every counter, ordered by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatsSnapshot(pub BTreeMap<&'static str, u64>);

impl StatsSnapshot {
    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            counters: names.iter().map(|&name| (name, AtomicU64::new(0))).collect(),
        }
    }

    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot(
            self.counters
                .iter()
                .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn counts_known_names_only() {
        let stats = StatsCounter::new(&["alive", "dead"]);
        stats.increment("alive");
        stats.add("dead", 3);
        stats.increment("unknown");
        assert_eq!(stats.get("alive"), 1);
        assert_eq!(stats.get("dead"), 3);
        assert_eq!(stats.get("unknown"), 0);
        assert_eq!(stats.snapshot().0.len(), 2);
    }

    #[test]
    fn concurrent_increments() {
        let stats = Arc::new(StatsCounter::new(&["hits"]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        stats.increment("hits");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(stats.snapshot().get("hits"), 4_000);
    }
}
