//! Memoization of per-shape results keyed by unstyled geometry keys.

use crate::shape::Shape;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Default number of entries kept before the oldest is evicted.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// Cache errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("shape has no stable key and cannot be cached")]
    Uncacheable,
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entries kept before the oldest is evicted. Zero disables eviction.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Values keyed by shape geometry.
///
/// Shapes without a stable key are refused on insert and always miss.
/// Entries are evicted oldest first.
#[derive(Debug)]
pub struct ShapeCache<V> {
    config: CacheConfig,
    entries: HashMap<Vec<u32>, V>,
    order: VecDeque<Vec<u32>>,
    stats: CacheStats,
}

impl<V> Default for ShapeCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<V> ShapeCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            order: VecDeque::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Store `value` for the shape's geometry, replacing any previous value.
    pub fn insert(&mut self, shape: &Shape, value: V) -> CacheResult<()> {
        let key = shape.unstyled_key().ok_or(CacheError::Uncacheable)?;
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
            self.evict_over_capacity();
        }
        Ok(())
    }

    /// Look up the value stored for the shape's geometry.
    pub fn get(&mut self, shape: &Shape) -> Option<&V> {
        let found = shape
            .unstyled_key()
            .and_then(|key| self.entries.get(&key));
        if found.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        found
    }

    pub fn contains(&self, shape: &Shape) -> bool {
        shape
            .unstyled_key()
            .is_some_and(|key| self.entries.contains_key(&key))
    }

    pub fn remove(&mut self, shape: &Shape) -> Option<V> {
        let key = shape.unstyled_key()?;
        let value = self.entries.remove(&key)?;
        self.order.retain(|k| *k != key);
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn evict_over_capacity(&mut self) {
        if self.config.max_entries == 0 {
            return;
        }
        while self.entries.len() > self.config.max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if self.entries.remove(&oldest).is_some() {
                self.stats.evictions += 1;
                log::debug!("evicted shape cache entry with {} key words", oldest.len());
            }
        }
    }
}
