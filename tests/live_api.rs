//! Checks against the real Pulse Live API
//!
//! These hit the network and depend on the remote shape, so they are
//! feature-gated:
//!
//! ```bash
//! cargo test --features live-tests --test live_api
//! ```

#![cfg(feature = "live-tests")]
// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use rugby_scrape::config::LayoutConfig;
use rugby_scrape::{Config, Entity, RankingsSource, RetryConfig, Scraper};
use std::time::Duration;

fn live_config(root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.layout = LayoutConfig::rooted_at(root);
    config.retry = RetryConfig {
        max_attempts: Some(3),
        delay: Duration::from_secs(2),
        ..RetryConfig::default()
    };
    config.client.timeout = Some(Duration::from_secs(30));
    config
}

#[tokio::test]
async fn live_country_probe_reports_a_total() {
    let dir = tempfile::tempdir().unwrap();
    let scraper = Scraper::new(live_config(dir.path())).unwrap();

    let metadata = scraper.probe(Entity::Countries).await.unwrap();

    assert!(metadata.total_records > 0);
    assert!(dir.path().join("json").join("country_meta.json").exists());
}

#[tokio::test]
async fn live_rankings_snapshot_has_ranked_teams() {
    let dir = tempfile::tempdir().unwrap();
    let scraper = Scraper::new(live_config(dir.path())).unwrap();
    let entity = Entity::Rankings(RankingsSource::V3);

    scraper.probe(entity).await.unwrap();
    let summary = scraper.collect(entity).await.unwrap();

    assert!(summary.stats.records > 0);
    let text = std::fs::read_to_string(&summary.output).unwrap();
    let first = text.lines().next().unwrap();
    assert!(!first.is_empty());
}
