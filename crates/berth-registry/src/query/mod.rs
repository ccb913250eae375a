//! Requirement matching over registry records
//!
//! Matching is conjunctive: a record failing any single facet is excluded
//! entirely. Ranking is deterministic: id ascending, unless score weights
//! were supplied, in which case descending weighted score with id as the
//! tie-break.

use std::cmp::Ordering;
use std::collections::HashMap;

use berth_core::Requirements;

use crate::api::Record;

/// Check whether a record satisfies every supplied facet
pub fn matches(record: &Record, requirements: &Requirements) -> bool {
    if let Some(category) = &requirements.category {
        if record.category != *category {
            return false;
        }
    }

    if !requirements.features.is_subset(&record.feature_tags) {
        return false;
    }
    if !requirements.compatible_with.is_subset(&record.compatibility_tags) {
        return false;
    }

    for (facet, value) in &requirements.numeric {
        match record.numeric_ranges.get(facet) {
            Some(range) if range.contains(*value) => {}
            // A record that does not declare the facet cannot satisfy it
            _ => return false,
        }
    }

    for (field, expected) in &requirements.display {
        if record.display_fields.get(field) != Some(expected) {
            return false;
        }
    }

    true
}

/// Weighted score of a record: sum of weights over the tags it carries
fn score(record: &Record, weights: &HashMap<String, f64>) -> f64 {
    weights
        .iter()
        .filter(|(tag, _)| record.feature_tags.contains(*tag))
        .map(|(_, weight)| weight)
        .sum()
}

/// Filter candidates by the requirements and rank the survivors
pub fn filter_and_rank(candidates: Vec<Record>, requirements: &Requirements) -> Vec<Record> {
    let mut matched: Vec<Record> = candidates
        .into_iter()
        .filter(|record| matches(record, requirements))
        .collect();

    if requirements.is_scored() {
        matched.sort_by(|a, b| {
            let score_a = score(a, &requirements.score_weights);
            let score_b = score(b, &requirements.score_weights);
            score_b
                .partial_cmp(&score_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
    } else {
        matched.sort_by(|a, b| a.id.cmp(&b.id));
    }

    matched
}
