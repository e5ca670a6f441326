//! Shared helpers for the integration tests

#![allow(dead_code)]

use rugby_scrape::config::LayoutConfig;
use rugby_scrape::{Config, RetryConfig};
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;

/// Config pointed at a mock server, writing under `root`, retrying without delay
pub fn config_for(server_uri: &str, root: &Path, page_size: u32) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{server_uri}/rugby/");
    config.api.rankings_v3_url = format!("{server_uri}/rugby/v3/rankings/mru?language=en");
    config.api.rankings_legacy_url = format!("{server_uri}/rugby/rankings/mru.json");
    config.layout = LayoutConfig::rooted_at(root);
    config.retry = RetryConfig {
        max_attempts: Some(5),
        delay: Duration::ZERO,
        ..RetryConfig::default()
    };
    config.page_size = page_size;
    config
}

/// Paged response in the API's envelope
pub fn paged(content: Value, page: u64, page_size: u64, num_entries: u64) -> Value {
    json!({
        "pageInfo": {
            "page": page,
            "numPages": num_entries.div_ceil(page_size.max(1)),
            "pageSize": page_size,
            "numEntries": num_entries
        },
        "content": content
    })
}

/// A country record
pub fn country(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "teams": [{"id": id * 10, "name": name}]
    })
}

/// A match record with both teams, scores and one event
pub fn fixture_match(id: u64, home: &str, away: &str) -> Value {
    json!({
        "matchId": id,
        "description": format!("{home} v {away}"),
        "venue": {"id": 1, "name": "Twickenham", "city": "London", "country": "England"},
        "time": {"millis": 1_442_602_800_000_u64, "gmtOffset": 1.0, "label": "2015-09-18"},
        "attendance": 80_000,
        "teams": [
            {"id": 34, "name": home, "abbreviation": "ENG"},
            {"id": 49, "name": away, "abbreviation": "FIJ"}
        ],
        "scores": [35, 11],
        "status": "C",
        "outcome": "A",
        "events": [{
            "id": 1238,
            "label": "Rugby World Cup 2015",
            "sport": "mru",
            "start": {"millis": 1_442_534_400_000_u64, "label": "2015-09-18"},
            "end": {"millis": 1_446_336_000_000_u64, "label": "2015-10-31"}
        }]
    })
}

/// Rows of a header-less CSV file
pub fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap_or_else(|e| panic!("cannot open {}: {e}", path.display()));
    reader
        .records()
        .map(|r| r.unwrap_or_else(|e| panic!("bad row in {}: {e}", path.display())))
        .collect()
}
