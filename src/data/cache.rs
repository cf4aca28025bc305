use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::data::types::SimulationResult;

/// TTL cache over fetched simulation results, keyed by game id. Keeps scan
/// passes from hammering the backend when the polling interval is short.
pub struct SimulationCache {
    cache: DashMap<String, CachedSimulation>,
    ttl: Duration,
}

struct CachedSimulation {
    simulation: SimulationResult,
    fetched_at: Instant,
}

impl SimulationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: DashMap::new(),
            ttl,
        }
    }

    pub fn insert(&self, game_id: String, simulation: SimulationResult) {
        self.cache.insert(
            game_id,
            CachedSimulation {
                simulation,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Get a simulation if not expired (evict on read)
    pub fn get(&self, game_id: &str) -> Option<SimulationResult> {
        let entry = self.cache.get(game_id)?;
        if entry.fetched_at.elapsed() > self.ttl {
            drop(entry); // Drop the read lock
            self.cache.remove(game_id); // Evict stale entry
            None
        } else {
            Some(entry.simulation.clone())
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
