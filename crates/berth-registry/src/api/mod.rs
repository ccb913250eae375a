//! Registry wire types
//!
//! Documents are versioned JSON objects fetched by path: the manifest at
//! `manifest.json` and one record per `{category}/{id}.json`. Unknown
//! extra fields are tolerated for forward compatibility; a document whose
//! `schema_version` major component is not understood is rejected before
//! it can reach the cache.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use berth_core::{BerthError, NumericRange};

use crate::RegistryResult;

/// Schema major version this client understands
pub const SUPPORTED_SCHEMA_MAJOR: u64 = 1;

/// Root index document listing known record ids per category.
///
/// Category order and the id order within each category are the publisher's
/// and are preserved on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: String,
    pub last_updated: DateTime<Utc>,
    pub catalog: IndexMap<String, Vec<String>>,
}

impl Manifest {
    /// Ids listed for one category, in manifest order
    pub fn ids(&self, category: &str) -> &[String] {
        self.catalog.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of listed ids across all categories
    pub fn len(&self) -> usize {
        self.catalog.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One described entity (provider or deployable template) from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub display_fields: HashMap<String, String>,
    #[serde(default)]
    pub numeric_ranges: HashMap<String, NumericRange>,
    #[serde(default)]
    pub feature_tags: BTreeSet<String>,
    #[serde(default)]
    pub compatibility_tags: BTreeSet<String>,
    pub schema_version: String,
    pub last_updated: DateTime<Utc>,
}

/// Typed address of one document in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    Manifest,
    Record { category: String, id: String },
}

impl RegistryKey {
    pub fn record(category: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Record {
            category: category.into(),
            id: id.into(),
        }
    }

    /// URL path of the document relative to the registry base
    pub fn path(&self) -> String {
        match self {
            Self::Manifest => "manifest.json".to_string(),
            Self::Record { category, id } => format!("{}/{}.json", category, id),
        }
    }

    /// Key used for the cache and the embedded snapshot
    pub fn cache_key(&self) -> String {
        match self {
            Self::Manifest => "manifest".to_string(),
            Self::Record { category, id } => format!("{}/{}", category, id),
        }
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

/// One fetched document, the unit the cache and resolver traffic in
#[derive(Debug, Clone)]
pub enum Document {
    Manifest(Manifest),
    Record(Record),
}

impl Document {
    /// Parse and validate the JSON body fetched for `key`.
    ///
    /// Rejects bodies that do not deserialize for the key's document kind,
    /// documents with an unsupported schema major, and record documents
    /// whose embedded id/category disagree with the key they were fetched
    /// under (an upstream publishing defect).
    pub fn parse(key: &RegistryKey, value: serde_json::Value) -> RegistryResult<Self> {
        match key {
            RegistryKey::Manifest => {
                let manifest: Manifest = serde_json::from_value(value).map_err(|e| {
                    BerthError::data(key.cache_key(), format!("invalid manifest: {}", e))
                })?;
                ensure_supported_schema(key, &manifest.schema_version)?;
                Ok(Self::Manifest(manifest))
            }
            RegistryKey::Record { category, id } => {
                let record: Record = serde_json::from_value(value).map_err(|e| {
                    BerthError::data(key.cache_key(), format!("invalid record: {}", e))
                })?;
                ensure_supported_schema(key, &record.schema_version)?;
                if record.id != *id || record.category != *category {
                    return Err(BerthError::data(
                        key.cache_key(),
                        format!(
                            "document identifies itself as '{}/{}'",
                            record.category, record.id
                        ),
                    ));
                }
                Ok(Self::Record(record))
            }
        }
    }

    pub fn schema_version(&self) -> &str {
        match self {
            Self::Manifest(m) => &m.schema_version,
            Self::Record(r) => &r.schema_version,
        }
    }

    pub fn into_manifest(self) -> Option<Manifest> {
        match self {
            Self::Manifest(m) => Some(m),
            Self::Record(_) => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Record(r) => Some(r),
            Self::Manifest(_) => None,
        }
    }
}

/// Major component of a `schema_version` string such as "1.2"
fn schema_major(version: &str) -> Option<u64> {
    version.split('.').next()?.parse().ok()
}

/// Reject documents whose schema major this client does not understand
pub(crate) fn ensure_supported_schema(key: &RegistryKey, version: &str) -> RegistryResult<()> {
    match schema_major(version) {
        Some(SUPPORTED_SCHEMA_MAJOR) => Ok(()),
        Some(major) => Err(BerthError::data(
            key.cache_key(),
            format!(
                "unsupported schema major {} (client supports {})",
                major, SUPPORTED_SCHEMA_MAJOR
            ),
        )),
        None => Err(BerthError::data(
            key.cache_key(),
            format!("unparsable schema_version '{}'", version),
        )),
    }
}
