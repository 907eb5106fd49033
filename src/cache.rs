//! Persisted cache for pre-flop simulation results: one JSON file per key
//! under a cache directory. A missing, corrupt, or unwritable store never
//! surfaces to the caller; the cache degrades to always-compute.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cards::Card;
use crate::simulator::SimulationResult;

/// Bump when the result layout or the simulation methodology changes, so
/// stale entries are never read back as current ones.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

const FILE_PREFIX: &str = "preflop_";
const FILE_SUFFIX: &str = ".json";

/// Canonical encoding of (sorted hero pair, opponent count) plus the schema
/// version and trial count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn preflop(hero: [Card; 2], opponents: usize, trials: usize) -> Self {
        let mut pair = hero;
        pair.sort_unstable_by_key(|c| (c.rank, c.suit.to_char()));
        CacheKey(format!(
            "v{}_{}{}_{}_{}",
            CACHE_SCHEMA_VERSION, pair[0], pair[1], opponents, trials,
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Small key-value interface so the storage mechanism can be swapped
/// without touching the cache or the odds service.
pub trait CacheStore: Send + Sync {
    fn load(&self, key: &CacheKey) -> Option<SimulationResult>;
    fn store(&self, key: &CacheKey, result: &SimulationResult);
    fn keys(&self) -> Vec<String>;
    fn clear(&self);
}

/// One JSON file per key under a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", FILE_PREFIX, key.as_str(), FILE_SUFFIX))
    }
}

impl CacheStore for JsonFileStore {
    fn load(&self, key: &CacheKey) -> Option<SimulationResult> {
        let path = self.entry_path(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("cache entry {} unreadable: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(result) => Some(result),
            Err(e) => {
                log::warn!("cache entry {} corrupt, recomputing: {e}", path.display());
                None
            }
        }
    }

    fn store(&self, key: &CacheKey, result: &SimulationResult) {
        let json = match serde_json::to_string(result) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("cache entry {} not serializable: {e}", key.as_str());
                return;
            }
        };
        if let Err(e) = fs::create_dir_all(&self.dir) {
            log::warn!("cache dir {} unavailable: {e}", self.dir.display());
            return;
        }
        // Write to a sibling temp file and rename so readers never observe
        // a partially written entry.
        let path = self.entry_path(key);
        let tmp = path.with_extension("tmp");
        let written = fs::write(&tmp, json).and_then(|_| fs::rename(&tmp, &path));
        if let Err(e) = written {
            log::warn!("cache entry {} not persisted: {e}", path.display());
        }
    }

    fn keys(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        let mut keys: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let key = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
                Some(key.to_string())
            })
            .collect();
        keys.sort();
        keys
    }

    fn clear(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
                if let Err(e) = fs::remove_file(entry.path()) {
                    log::warn!("cache entry {name} not removed: {e}");
                }
            }
        }
    }
}

/// Scoped lookup over a persisted store, with at most one concurrent
/// compute per key.
pub struct ResultCache {
    store: Box<dyn CacheStore>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ResultCache {
    pub fn new(store: Box<dyn CacheStore>) -> Self {
        ResultCache {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(Box::new(JsonFileStore::new(dir.as_ref())))
    }

    fn key_lock(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(key.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Return the stored result for `key`, computing and persisting it on a
    /// miss. Concurrent callers on the same uncached key block behind one
    /// compute instead of duplicating it.
    pub fn get_or_compute(
        &self,
        key: &CacheKey,
        compute: impl FnOnce() -> SimulationResult,
    ) -> SimulationResult {
        if let Some(hit) = self.store.load(key) {
            log::debug!("cache hit: {}", key.as_str());
            return hit;
        }
        let lock = self.key_lock(key);
        let _guard = lock.lock();
        // A concurrent caller may have finished while we waited.
        if let Some(hit) = self.store.load(key) {
            log::debug!("cache hit after wait: {}", key.as_str());
            return hit;
        }
        log::debug!("cache miss, computing: {}", key.as_str());
        let result = compute();
        self.store.store(key, &result);
        result
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
