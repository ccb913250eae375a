//! Multi-tier document resolution
//!
//! Tier order is a hard contract: fresh cache, then live fetch, then
//! stale cache, then the embedded snapshot, then the live-fetch error
//! unchanged. A fresh cache hit never triggers a network call, and a
//! stale entry is never preferred over a successful live fetch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{Document, Manifest, Record, RegistryKey};
use crate::cache::{DocumentCache, Freshness};
use crate::client::RegistryClient;
use crate::RegistryResult;

/// Embedded fallback documents, keyed identically to the remote store.
///
/// Served only when the live fetch fails and no cached copy exists, so a
/// snapshot baked in at build time cannot shadow newer published data.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    documents: HashMap<String, Document>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.documents
            .insert(RegistryKey::Manifest.cache_key(), Document::Manifest(manifest));
        self
    }

    pub fn with_record(mut self, record: Record) -> Self {
        let key = RegistryKey::record(record.category.clone(), record.id.clone());
        self.documents.insert(key.cache_key(), Document::Record(record));
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub(crate) fn get(&self, key: &RegistryKey) -> Option<Document> {
        self.documents.get(&key.cache_key()).cloned()
    }
}

/// Counters for degraded serves, for the diagnostics surface
#[derive(Debug, Clone, Serialize)]
pub struct ResolveStats {
    /// Documents served from a stale cache entry after a failed refresh
    pub stale_serves: u64,
    /// Documents served from the embedded snapshot
    pub snapshot_serves: u64,
}

/// Orchestrates the fallback tiers over one cache and one client
#[derive(Debug)]
pub(crate) struct Resolver {
    client: RegistryClient,
    cache: DocumentCache,
    snapshot: Option<Snapshot>,
    stale_serves: AtomicU64,
    snapshot_serves: AtomicU64,
}

impl Resolver {
    pub(crate) fn new(
        client: RegistryClient,
        cache: DocumentCache,
        snapshot: Option<Snapshot>,
    ) -> Self {
        Self {
            client,
            cache,
            snapshot,
            stale_serves: AtomicU64::new(0),
            snapshot_serves: AtomicU64::new(0),
        }
    }

    pub(crate) fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub(crate) fn client(&self) -> &RegistryClient {
        &self.client
    }

    pub(crate) fn stats(&self) -> ResolveStats {
        ResolveStats {
            stale_serves: self.stale_serves.load(Ordering::Relaxed),
            snapshot_serves: self.snapshot_serves.load(Ordering::Relaxed),
        }
    }

    /// Resolve one key through the fallback tiers
    pub(crate) async fn resolve(&self, key: &RegistryKey) -> RegistryResult<Document> {
        let mut stale: Option<Document> = None;
        if let Some((document, freshness)) = self.cache.get(key) {
            match freshness {
                Freshness::Fresh => {
                    debug!(key = %key, "fresh cache hit");
                    return Ok(document);
                }
                Freshness::Stale => stale = Some(document),
            }
        }

        match self.client.fetch_with_retry(key).await {
            Ok(document) => {
                self.cache.put(key, document.clone());
                Ok(document)
            }
            Err(error) => {
                if let Some(document) = stale {
                    self.stale_serves.fetch_add(1, Ordering::Relaxed);
                    warn!(key = %key, error = %error, "live fetch failed, serving stale cache entry");
                    return Ok(document);
                }
                if let Some(document) = self.snapshot.as_ref().and_then(|s| s.get(key)) {
                    self.snapshot_serves.fetch_add(1, Ordering::Relaxed);
                    warn!(key = %key, error = %error, "live fetch failed, serving embedded snapshot");
                    return Ok(document);
                }
                Err(error)
            }
        }
    }
}
