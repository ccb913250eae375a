//! Requirement facets for querying the metadata registry.
//!
//! Facets are a closed set of typed fields rather than free-form string
//! keys, so a misspelled facet fails at construction instead of silently
//! matching nothing. Display-field matching stays an open bag because the
//! registry schema allows arbitrary display keys.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Inclusive numeric range declared by a record for one facet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check whether a value falls inside the range, bounds included
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Conjunctive requirement set matched against registry records.
///
/// Every supplied facet must hold for a record to match; a record failing
/// any single facet is excluded entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Requirements {
    /// Restrict candidates to one manifest category
    pub category: Option<String>,
    /// Feature tags the record must carry (subset test)
    pub features: BTreeSet<String>,
    /// Compatibility tags the record must carry (subset test)
    pub compatible_with: BTreeSet<String>,
    /// Point values that must fall inside the record's declared ranges
    pub numeric: HashMap<String, f64>,
    /// Exact-match display fields (open bag)
    pub display: HashMap<String, String>,
    /// Optional scoring weights over feature tags; when non-empty, results
    /// are ranked by descending weighted score instead of id order
    pub score_weights: HashMap<String, f64>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a single category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Require a feature tag
    pub fn feature(mut self, tag: impl Into<String>) -> Self {
        self.features.insert(tag.into());
        self
    }

    /// Require a compatibility tag
    pub fn compatible_with(mut self, tag: impl Into<String>) -> Self {
        self.compatible_with.insert(tag.into());
        self
    }

    /// Require a numeric facet value to fall inside the record's range
    pub fn numeric(mut self, facet: impl Into<String>, value: f64) -> Self {
        self.numeric.insert(facet.into(), value);
        self
    }

    /// Require an exact display-field match
    pub fn display(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.display.insert(field.into(), value.into());
        self
    }

    /// Weight a feature tag for score-ranked results
    pub fn weight(mut self, tag: impl Into<String>, weight: f64) -> Self {
        self.score_weights.insert(tag.into(), weight);
        self
    }

    /// True when no facet has been supplied
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.features.is_empty()
            && self.compatible_with.is_empty()
            && self.numeric.is_empty()
            && self.display.is_empty()
    }

    /// True when score-weighted ranking was requested
    pub fn is_scored(&self) -> bool {
        !self.score_weights.is_empty()
    }
}
