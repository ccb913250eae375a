//! Metadata registry client for Berth tooling
//!
//! This crate resolves provider and deployable-template metadata from a
//! versioned, CDN-distributed JSON store. Reads go through an in-process
//! TTL cache with multi-tier fallback (fresh cache, live fetch, stale
//! cache, embedded snapshot) plus bounded retry with exponential backoff,
//! and every fetch outcome feeds a health classification. The same
//! resolution core is offered in async and blocking call shapes.

pub mod api;
pub mod blocking;
pub mod cache;
pub mod client;
pub mod health;
pub mod query;
pub mod registry;
pub mod resolve;

// Re-export main types
pub use api::{Document, Manifest, Record, RegistryKey, SUPPORTED_SCHEMA_MAJOR};
pub use cache::{CacheStats, DocumentCache, Freshness};
pub use client::{RegistryClient, RetryConfig};
pub use health::{HealthMonitor, HealthReport, HealthStatus};
pub use registry::{Registry, RegistryConfig, DEFAULT_BASE_URL};
pub use resolve::{ResolveStats, Snapshot};

pub use berth_core::{BerthError, NumericRange, Requirements};

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, BerthError>;
