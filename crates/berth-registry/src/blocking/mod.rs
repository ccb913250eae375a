//! Blocking registry surface
//!
//! A thin adapter that drives the async resolution core to completion on
//! the calling thread, for short-lived command-line style callers. The
//! adapter shares cache and health state with any async clones of the
//! same client, so both call shapes observe identical fallback behavior.

use berth_core::Requirements;

use crate::api::{Manifest, Record};
use crate::cache::CacheStats;
use crate::health::HealthReport;
use crate::registry::RegistryConfig;
use crate::resolve::ResolveStats;
use crate::RegistryResult;

/// Blocking metadata registry client.
///
/// Every call suspends the calling thread until resolution completes.
/// Must not be used from inside an async runtime; the underlying
/// `block_on` panics there. Use the async [`crate::Registry`] instead.
#[derive(Debug)]
pub struct Registry {
    inner: crate::Registry,
    runtime: tokio::runtime::Runtime,
}

impl Registry {
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        Self::from_async(crate::Registry::new(config)?)
    }

    /// Wrap an existing async client, sharing its cache and health state
    pub fn from_async(inner: crate::Registry) -> RegistryResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| berth_core::BerthError::io("failed to build blocking runtime".to_string(), e))?;
        Ok(Self { inner, runtime })
    }

    /// Clone of the shared async client
    pub fn as_async(&self) -> crate::Registry {
        self.inner.clone()
    }

    /// Fetch the root manifest
    pub fn get_manifest(&self) -> RegistryResult<Manifest> {
        self.runtime.block_on(self.inner.get_manifest())
    }

    /// Fetch one record by category and id
    pub fn get_record(&self, category: &str, id: &str) -> RegistryResult<Record> {
        self.runtime.block_on(self.inner.get_record(category, id))
    }

    /// Resolve every record the manifest lists, in manifest order
    pub fn list(&self, category: Option<&str>) -> RegistryResult<Vec<Record>> {
        self.runtime.block_on(self.inner.list(category))
    }

    /// Find records satisfying every supplied requirement facet
    pub fn find(&self, requirements: &Requirements) -> RegistryResult<Vec<Record>> {
        self.runtime.block_on(self.inner.find(requirements))
    }

    /// Current health classification; performs no I/O
    pub fn health(&self) -> HealthReport {
        self.inner.health()
    }

    /// Current cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache_stats()
    }

    /// Counters for stale and snapshot serves
    pub fn resolve_stats(&self) -> ResolveStats {
        self.inner.resolve_stats()
    }

    /// Drop every cached document
    pub fn clear_cache(&self) {
        self.inner.clear_cache()
    }
}

#[cfg(test)]
mod tests;
