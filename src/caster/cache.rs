//! # Cast Cache
//!
//! Memoizes cast results keyed by (type tag, field options, serialized raw
//! value). Raw JSON values are immutable once parsed, so a cast result is a
//! pure function of its key and concurrent recomputation is harmless.

use super::value::CastValue;
use crate::error::CastError;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

pub type CastOutcome = Result<CastValue, CastError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CastKey {
    tag: String,
    options: Vec<(String, String)>,
    value: String,
}

impl CastKey {
    pub fn new(tag: &str, options: &BTreeMap<String, String>, value: &Value) -> Self {
        Self {
            tag: tag.to_string(),
            options: options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            // serde_json::Map is ordered, so equal values serialize identically
            value: value.to_string(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct CastCache {
    entries: DashMap<CastKey, CastOutcome>,
    max_entries: usize,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for CastCache {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_CAST_CACHE_MAX_ENTRIES)
    }
}

impl CastCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            enabled: true,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(0)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Return the memoized outcome for `key`, computing it on a miss.
    ///
    /// Once `max_entries` is reached new outcomes are still computed and
    /// returned, just not stored.
    pub fn get_or_compute(&self, key: CastKey, compute: impl FnOnce() -> CastOutcome) -> CastOutcome {
        if !self.enabled {
            return compute();
        }

        if let Some(hit) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.value().clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let outcome = compute();

        if self.entries.len() < self.max_entries {
            self.entries.entry(key).or_insert_with(|| outcome.clone());
        } else {
            trace!(max_entries = self.max_entries, "Cast cache full, result not stored");
        }

        outcome
    }

    pub fn stats(&self) -> CastCacheStats {
        CastCacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
