//! Document caching with TTL support
//!
//! Entries past their TTL are reported as stale rather than dropped:
//! the fallback resolver may still serve a stale entry when a live
//! refresh fails. Entries only leave the map through `clear` or an
//! explicit `cleanup` call.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use crate::api::{Document, RegistryKey};

/// Freshness of a cache hit against the configured TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Cache entry for one document
///
/// Immutable once stored; a refetch replaces the entry wholesale.
#[derive(Debug, Clone)]
struct CacheEntry {
    document: Document,
    fetched_at: Instant,
}

impl CacheEntry {
    fn new(document: Document) -> Self {
        Self {
            document,
            fetched_at: Instant::now(),
        }
    }

    fn freshness(&self, ttl: Duration) -> Freshness {
        if self.fetched_at.elapsed() < ttl {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }
}

/// In-memory document cache with TTL
#[derive(Debug)]
pub struct DocumentCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl DocumentCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a document, reporting whether the hit is fresh or stale.
    ///
    /// Non-destructive: stale entries are returned, not evicted.
    pub fn get(&self, key: &RegistryKey) -> Option<(Document, Freshness)> {
        let entry = self.entries.get(&key.cache_key())?;
        Some((entry.document.clone(), entry.freshness(self.ttl)))
    }

    /// Store a document, replacing any previous entry for the key
    pub fn put(&self, key: &RegistryKey, document: Document) {
        self.entries.insert(key.cache_key(), CacheEntry::new(document));
    }

    /// Check if the key is cached and still fresh
    pub fn contains_fresh(&self, key: &RegistryKey) -> bool {
        self.entries
            .get(&key.cache_key())
            .map(|entry| entry.freshness(self.ttl) == Freshness::Fresh)
            .unwrap_or(false)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut fresh_count = 0;
        let mut stale_count = 0;
        let mut oldest: Option<Duration> = None;

        for entry in self.entries.iter() {
            match entry.freshness(self.ttl) {
                Freshness::Fresh => fresh_count += 1,
                Freshness::Stale => stale_count += 1,
            }
            let age = entry.fetched_at.elapsed();
            if oldest.map(|o| age > o).unwrap_or(true) {
                oldest = Some(age);
            }
        }

        CacheStats {
            entry_count: self.entries.len(),
            fresh_count,
            stale_count,
            oldest_entry_age_seconds: oldest.map(|age| age.as_secs()),
        }
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop stale entries, returning how many were removed.
    ///
    /// Never called automatically; evicting stale entries forfeits the
    /// serve-stale-on-error fallback for those keys.
    pub fn cleanup(&self) -> usize {
        let mut removed = 0;
        let ttl = self.ttl;
        self.entries.retain(|_, entry| {
            if entry.freshness(ttl) == Freshness::Fresh {
                true
            } else {
                removed += 1;
                false
            }
        });
        removed
    }
}

/// Cache statistics for the diagnostics surface
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub fresh_count: usize,
    pub stale_count: usize,
    /// Age of the oldest entry, None when the cache is empty
    pub oldest_entry_age_seconds: Option<u64>,
}

#[cfg(test)]
mod tests;
