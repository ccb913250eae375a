//! Unit tests for the document cache

use super::*;
use std::collections::BTreeSet;
use std::thread::sleep;

use chrono::Utc;

use crate::api::Record;

fn test_record(id: &str) -> Document {
    Document::Record(Record {
        id: id.to_string(),
        category: "cms".to_string(),
        display_fields: Default::default(),
        numeric_ranges: Default::default(),
        feature_tags: BTreeSet::new(),
        compatibility_tags: BTreeSet::new(),
        schema_version: "1.0".to_string(),
        last_updated: Utc::now(),
    })
}

fn record_id(document: &Document) -> &str {
    match document {
        Document::Record(r) => &r.id,
        Document::Manifest(_) => panic!("expected record"),
    }
}

#[test]
fn test_put_and_get_fresh() {
    let cache = DocumentCache::new(Duration::from_secs(300));
    let key = RegistryKey::record("cms", "wordpress");

    assert!(cache.get(&key).is_none());
    cache.put(&key, test_record("wordpress"));

    let (document, freshness) = cache.get(&key).unwrap();
    assert_eq!(freshness, Freshness::Fresh);
    assert_eq!(record_id(&document), "wordpress");
    assert!(cache.contains_fresh(&key));
}

#[test]
fn test_stale_entries_are_retained() {
    let cache = DocumentCache::new(Duration::from_millis(10));
    let key = RegistryKey::record("cms", "wordpress");
    cache.put(&key, test_record("wordpress"));

    sleep(Duration::from_millis(20));

    // Past the TTL the entry is stale but still servable
    let (document, freshness) = cache.get(&key).unwrap();
    assert_eq!(freshness, Freshness::Stale);
    assert_eq!(record_id(&document), "wordpress");
    assert!(!cache.contains_fresh(&key));

    // A second read still finds it: stale reads are non-destructive
    assert!(cache.get(&key).is_some());
}

#[test]
fn test_put_replaces_wholesale() {
    let cache = DocumentCache::new(Duration::from_millis(10));
    let key = RegistryKey::record("cms", "wordpress");
    cache.put(&key, test_record("wordpress"));
    sleep(Duration::from_millis(20));

    // Refetch replaces the stale entry and restores freshness
    cache.put(&key, test_record("wordpress"));
    let (_, freshness) = cache.get(&key).unwrap();
    assert_eq!(freshness, Freshness::Fresh);

    let stats = cache.stats();
    assert_eq!(stats.entry_count, 1);
}

#[test]
fn test_stats() {
    let cache = DocumentCache::new(Duration::from_millis(50));

    let stats = cache.stats();
    assert_eq!(stats.entry_count, 0);
    assert_eq!(stats.oldest_entry_age_seconds, None);

    cache.put(&RegistryKey::record("cms", "wordpress"), test_record("wordpress"));
    cache.put(&RegistryKey::record("cms", "ghost"), test_record("ghost"));
    sleep(Duration::from_millis(60));
    cache.put(&RegistryKey::Manifest, test_record("ignored"));

    let stats = cache.stats();
    assert_eq!(stats.entry_count, 3);
    assert_eq!(stats.fresh_count, 1);
    assert_eq!(stats.stale_count, 2);
    assert_eq!(stats.oldest_entry_age_seconds, Some(0));
}

#[test]
fn test_clear() {
    let cache = DocumentCache::new(Duration::from_secs(300));
    let key = RegistryKey::Manifest;
    cache.put(&key, test_record("wordpress"));

    cache.clear();
    assert!(cache.get(&key).is_none());
    assert_eq!(cache.stats().entry_count, 0);
}

#[test]
fn test_cleanup_drops_only_stale() {
    let cache = DocumentCache::new(Duration::from_millis(50));
    cache.put(&RegistryKey::record("cms", "wordpress"), test_record("wordpress"));
    sleep(Duration::from_millis(60));
    cache.put(&RegistryKey::record("cms", "ghost"), test_record("ghost"));

    let removed = cache.cleanup();
    assert_eq!(removed, 1);

    assert!(cache.get(&RegistryKey::record("cms", "wordpress")).is_none());
    assert!(cache.contains_fresh(&RegistryKey::record("cms", "ghost")));
}
