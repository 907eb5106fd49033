//! Odds service facade: routes pre-flop requests through the persisted
//! cache and post-flop requests straight to the simulator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{CacheKey, ResultCache};
use crate::cards::Card;
use crate::error::OddsResult;
use crate::simulator::{
    run_trials, SimulationRequest, SimulationResult, POSTFLOP_TRIALS, PREFLOP_TRIALS,
};

pub struct OddsService {
    cache: ResultCache,
    preflop_trials: usize,
    postflop_trials: usize,
    postflop_deadline: Option<Duration>,
    seed: Option<u64>,
}

impl OddsService {
    /// Service backed by the default cache directory.
    pub fn new() -> Self {
        Self::with_cache_dir(default_cache_dir())
    }

    pub fn with_cache_dir(dir: impl AsRef<Path>) -> Self {
        OddsService {
            cache: ResultCache::with_dir(dir),
            preflop_trials: PREFLOP_TRIALS,
            postflop_trials: POSTFLOP_TRIALS,
            postflop_deadline: None,
            seed: None,
        }
    }

    pub fn preflop_trials(mut self, trials: usize) -> Self {
        self.preflop_trials = trials;
        self
    }

    pub fn postflop_trials(mut self, trials: usize) -> Self {
        self.postflop_trials = trials;
        self
    }

    /// Wall-clock budget for post-flop requests; the estimate returned at
    /// cutoff is based on the trials that completed.
    pub fn postflop_deadline(mut self, deadline: Duration) -> Self {
        self.postflop_deadline = Some(deadline);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Estimate odds for a hero hand against `opponents` random hands.
    ///
    /// An empty board is the pre-flop case: the result is served from the
    /// persisted cache, computed once at the high trial count on first
    /// request. A revealed board is always simulated fresh at the
    /// interactive trial count.
    pub fn get_odds(
        &self,
        hero: [Card; 2],
        community: &[Card],
        opponents: usize,
    ) -> OddsResult<SimulationResult> {
        if community.is_empty() {
            let mut request = SimulationRequest::new(hero, Vec::new(), opponents, self.preflop_trials);
            request.seed = self.seed;
            request.validate()?;
            let key = CacheKey::preflop(hero, opponents, self.preflop_trials);
            Ok(self.cache.get_or_compute(&key, || run_trials(&request)))
        } else {
            let mut request =
                SimulationRequest::new(hero, community.to_vec(), opponents, self.postflop_trials);
            request.seed = self.seed;
            request.deadline = self.postflop_deadline;
            request.validate()?;
            Ok(run_trials(&request))
        }
    }

    /// Remove every persisted pre-flop entry.
    pub fn clear_cache(&self) {
        self.cache.clear();
        log::info!("pre-flop cache cleared");
    }

    /// Keys of the persisted pre-flop entries.
    pub fn cache_keys(&self) -> Vec<String> {
        self.cache.keys()
    }
}

impl Default for OddsService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_cache_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".holdem-odds").join("cache")
}
