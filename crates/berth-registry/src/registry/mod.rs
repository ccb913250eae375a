//! Public registry surface
//!
//! `Registry` is the async entry point; `blocking::Registry` drives the
//! same resolution core to completion on the calling thread. Both shapes
//! share one cache and one health state through cheap clones.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use berth_core::{BerthError, Requirements};

use crate::api::{Manifest, Record, RegistryKey};
use crate::cache::{CacheStats, DocumentCache};
use crate::client::{RegistryClient, RetryConfig};
use crate::health::{HealthMonitor, HealthReport};
use crate::query;
use crate::resolve::{ResolveStats, Resolver, Snapshot};
use crate::RegistryResult;

/// Default endpoint for the published metadata store
pub const DEFAULT_BASE_URL: &str = "https://meta.berth.host";

/// Registry client configuration, passed at construction.
///
/// There is no global default instance; dependents receive a constructed
/// `Registry` explicitly.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL of the metadata store
    pub base_url: String,
    /// How long a cached document stays fresh
    pub cache_ttl: Duration,
    /// Per-attempt network timeout
    pub timeout: Duration,
    /// Retry/backoff shape for transient failures
    pub retry: RetryConfig,
    /// Embedded fallback documents served when every other tier fails
    pub fallback_snapshot: Option<Snapshot>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(300),
            timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
            fallback_snapshot: None,
        }
    }
}

/// Async metadata registry client.
///
/// Cheap to clone; clones share the cache, health state, and connection
/// pool.
#[derive(Debug, Clone)]
pub struct Registry {
    resolver: Arc<Resolver>,
}

impl Registry {
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        let health = Arc::new(HealthMonitor::new());
        let client = RegistryClient::new(
            &config.base_url,
            config.timeout,
            config.retry,
            health,
        )?;
        let cache = DocumentCache::new(config.cache_ttl);
        Ok(Self {
            resolver: Arc::new(Resolver::new(client, cache, config.fallback_snapshot)),
        })
    }

    /// Fetch the root manifest
    pub async fn get_manifest(&self) -> RegistryResult<Manifest> {
        let key = RegistryKey::Manifest;
        let document = self.resolver.resolve(&key).await?;
        document.into_manifest().ok_or_else(|| {
            BerthError::data(key.cache_key(), "resolved document is not a manifest")
        })
    }

    /// Fetch one record by category and id
    pub async fn get_record(&self, category: &str, id: &str) -> RegistryResult<Record> {
        let key = RegistryKey::record(category, id);
        let document = self.resolver.resolve(&key).await?;
        document
            .into_record()
            .ok_or_else(|| BerthError::data(key.cache_key(), "resolved document is not a record"))
    }

    /// Resolve every record the manifest lists, in manifest order.
    ///
    /// A manifest failure propagates; an id that fails to resolve is
    /// skipped with a warning rather than failing the whole read. A
    /// category absent from the catalog yields an empty list.
    pub async fn list(&self, category: Option<&str>) -> RegistryResult<Vec<Record>> {
        let manifest = self.get_manifest().await?;
        let mut records = Vec::new();

        for (cat, record_ids) in &manifest.catalog {
            if let Some(wanted) = category {
                if cat != wanted {
                    continue;
                }
            }
            for id in record_ids {
                match self.get_record(cat, id).await {
                    Ok(record) => records.push(record),
                    Err(error) => {
                        warn!(
                            category = %cat,
                            id = %id,
                            error = %error,
                            "skipping record listed in manifest"
                        );
                    }
                }
            }
        }

        Ok(records)
    }

    /// Find records satisfying every supplied requirement facet, ranked
    /// deterministically
    pub async fn find(&self, requirements: &Requirements) -> RegistryResult<Vec<Record>> {
        let candidates = self.list(requirements.category.as_deref()).await?;
        Ok(query::filter_and_rank(candidates, requirements))
    }

    /// Current health classification; performs no I/O
    pub fn health(&self) -> HealthReport {
        self.resolver.client().health().report()
    }

    /// Current cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.resolver.cache().stats()
    }

    /// Counters for stale and snapshot serves
    pub fn resolve_stats(&self) -> ResolveStats {
        self.resolver.stats()
    }

    /// Drop every cached document
    pub fn clear_cache(&self) {
        self.resolver.cache().clear();
    }
}
