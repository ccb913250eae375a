//! Unit tests for the blocking adapter

use super::*;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::RetryConfig;

fn fast_config(base_url: &str) -> RegistryConfig {
    RegistryConfig {
        base_url: base_url.to_string(),
        cache_ttl: Duration::from_secs(300),
        timeout: Duration::from_secs(5),
        retry: RetryConfig {
            max_retries: 0,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            multiplier: 2.0,
            max_jitter: Duration::ZERO,
        },
        fallback_snapshot: None,
    }
}

async fn mock_manifest(server: &MockServer, expect: u64) {
    Mock::given(method("GET"))
        .and(path("/manifest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schema_version": "1.0",
            "last_updated": "2026-01-15T08:00:00Z",
            "catalog": {"cms": ["wordpress"]}
        })))
        .expect(expect)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cms/wordpress.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "wordpress",
            "category": "cms",
            "feature_tags": ["cdn"],
            "schema_version": "1.0",
            "last_updated": "2026-01-15T08:00:00Z"
        })))
        .mount(server)
        .await;
}

// The blocking adapter owns a private runtime, so these tests run it on a
// spawn_blocking thread while the multi-thread test runtime keeps serving
// the mock.

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_calls_resolve() {
    let server = MockServer::start().await;
    mock_manifest(&server, 1).await;
    let config = fast_config(&server.uri());

    let records = tokio::task::spawn_blocking(move || {
        let registry = Registry::new(config).unwrap();
        let manifest = registry.get_manifest().unwrap();
        assert_eq!(manifest.ids("cms"), ["wordpress"]);

        let record = registry.get_record("cms", "wordpress").unwrap();
        assert_eq!(record.id, "wordpress");

        registry.find(&Requirements::new().feature("cdn")).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "wordpress");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_shares_state_with_async_clone() {
    let server = MockServer::start().await;
    mock_manifest(&server, 1).await;
    let config = fast_config(&server.uri());

    let async_clone = tokio::task::spawn_blocking(move || {
        let registry = Registry::new(config).unwrap();
        registry.get_manifest().unwrap();
        registry.as_async()
    })
    .await
    .unwrap();

    // The blocking fetch populated the shared cache; the async clone
    // reads the same fresh entry without a second network call.
    async_clone.get_manifest().await.unwrap();
    assert!(async_clone.cache_stats().entry_count >= 1);
    assert!(async_clone.health().last_success_at.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_diagnostics_need_no_runtime() {
    let server = MockServer::start().await;
    mock_manifest(&server, 1).await;
    let config = fast_config(&server.uri());

    tokio::task::spawn_blocking(move || {
        let registry = Registry::new(config).unwrap();
        registry.get_manifest().unwrap();

        let stats = registry.cache_stats();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(registry.resolve_stats().stale_serves, 0);

        registry.clear_cache();
        assert_eq!(registry.cache_stats().entry_count, 0);
    })
    .await
    .unwrap();
}
