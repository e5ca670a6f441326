//! Configuration types for rugby-scrape

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main configuration for rugby-scrape
///
/// Every field has a default, so an empty JSON object (or no config file at
/// all) reproduces the stock behavior: 100 records per page, retry forever
/// every 5 seconds, `json/` and `csv/` under the working directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoints
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Retry policy for page and probe fetches
    #[serde(default)]
    pub retry: RetryConfig,

    /// Where probe files and CSV output live
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Records requested per page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            client: ClientConfig::default(),
            retry: RetryConfig::default(),
            layout: LayoutConfig::default(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the collector cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size", "must be greater than zero"));
        }
        if self.client.user_agent.trim().is_empty() {
            return Err(Error::config("client.user_agent", "must not be empty"));
        }
        self.api.base()?;
        parse_url("api.rankings_v3_url", &self.api.rankings_v3_url)?;
        parse_url("api.rankings_legacy_url", &self.api.rankings_legacy_url)?;
        if let Backoff::Exponential { multiplier, .. } = self.retry.backoff {
            if multiplier < 1.0 {
                return Err(Error::config(
                    "retry.backoff.multiplier",
                    "must be at least 1.0",
                ));
            }
        }
        Ok(())
    }
}

/// Remote API endpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for `country.json` and `match.json`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Versioned rankings endpoint
    #[serde(default = "default_rankings_v3_url")]
    pub rankings_v3_url: String,

    /// Legacy rankings endpoint
    #[serde(default = "default_rankings_legacy_url")]
    pub rankings_legacy_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            rankings_v3_url: default_rankings_v3_url(),
            rankings_legacy_url: default_rankings_legacy_url(),
        }
    }
}

impl ApiConfig {
    /// Base URL, normalized to end in `/` so relative joins keep the last segment
    pub fn base(&self) -> Result<Url> {
        let mut raw = self.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        parse_url("api.base_url", &raw)
    }
}

/// HTTP client configuration
///
/// The client never keeps cookies or page history between requests, and it
/// does not consult robots.txt: the API is a data endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header sent with every request (default: "Mozilla/5.0")
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Follow HTTP redirects (default: true)
    #[serde(default = "default_true")]
    pub follow_redirects: bool,

    /// Redirect hop limit when following redirects (default: 10)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Whole-request timeout (None = transport default)
    #[serde(default, with = "optional_duration_serde")]
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            follow_redirects: true,
            max_redirects: default_max_redirects(),
            timeout: None,
        }
    }
}

/// Delay growth between retries
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Backoff {
    /// Same delay before every retry
    #[default]
    Fixed,
    /// Delay multiplied after each retry, capped at `max_delay`
    Exponential {
        /// Growth factor applied after each retry
        multiplier: f64,
        /// Upper bound for the delay
        #[serde(with = "duration_serde")]
        max_delay: Duration,
    },
}

/// Retry configuration for remote fetches
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (None = retry forever)
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Delay before the first retry (default: 5 seconds)
    #[serde(default = "default_retry_delay", with = "duration_serde")]
    pub delay: Duration,

    /// Delay growth (default: fixed)
    #[serde(default)]
    pub backoff: Backoff,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            delay: default_retry_delay(),
            backoff: Backoff::Fixed,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Delay to use after `delay` has been waited once
    pub fn next_delay(&self, delay: Duration) -> Duration {
        match self.backoff {
            Backoff::Fixed => delay,
            Backoff::Exponential {
                multiplier,
                max_delay,
            } => Duration::try_from_secs_f64(delay.as_secs_f64() * multiplier)
                .unwrap_or(max_delay)
                .min(max_delay),
        }
    }

    /// Whether another retry is allowed after `retries` retries have run
    pub fn allows_retry(&self, retries: u32) -> bool {
        self.max_attempts.is_none_or(|max| retries < max)
    }
}

/// Output directory layout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Directory for probe responses (default: "./json")
    #[serde(default = "default_json_dir")]
    pub json_dir: PathBuf,

    /// Directory for CSV output (default: "./csv")
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            json_dir: default_json_dir(),
            csv_dir: default_csv_dir(),
        }
    }
}

impl LayoutConfig {
    /// Place both directories under `root`, keeping their configured names
    pub fn rooted_at(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            json_dir: root.join(defaults.json_dir),
            csv_dir: root.join(defaults.csv_dir),
        }
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::config(key, format!("invalid URL `{raw}`: {e}")))
}

fn default_page_size() -> u32 {
    100
}

fn default_base_url() -> String {
    "http://cmsapi.pulselive.com/rugby/".to_string()
}

fn default_rankings_v3_url() -> String {
    "https://api.wr-rims-prod.pulselive.com/rugby/v3/rankings/mru?language=en".to_string()
}

fn default_rankings_legacy_url() -> String {
    "http://cmsapi.pulselive.com/rugby/rankings/mru.json".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_redirects() -> usize {
    10
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_json_dir() -> PathBuf {
    PathBuf::from("json")
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("csv")
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_stock_defaults() {
        let config: Config = serde_json::from_str("{}").expect("empty config must parse");

        assert_eq!(config.page_size, 100);
        assert_eq!(config.client.user_agent, "Mozilla/5.0");
        assert!(config.client.follow_redirects);
        assert_eq!(config.client.timeout, None);
        assert_eq!(config.retry.max_attempts, None, "default is retry forever");
        assert_eq!(config.retry.delay, Duration::from_secs(5));
        assert_eq!(config.retry.backoff, Backoff::Fixed);
        assert!(!config.retry.jitter);
        assert_eq!(config.layout.json_dir, PathBuf::from("json"));
        assert_eq!(config.layout.csv_dir, PathBuf::from("csv"));
        config.validate().expect("defaults must validate");
    }

    #[test]
    fn retry_config_deserializes_durations_from_seconds() {
        let json = r#"{"max_attempts":3,"delay":2,"backoff":{"kind":"exponential","multiplier":2.0,"max_delay":30},"jitter":true}"#;
        let retry: RetryConfig = serde_json::from_str(json).expect("deserialize failed");

        assert_eq!(retry.max_attempts, Some(3));
        assert_eq!(retry.delay, Duration::from_secs(2));
        assert_eq!(
            retry.backoff,
            Backoff::Exponential {
                multiplier: 2.0,
                max_delay: Duration::from_secs(30)
            }
        );
        assert!(retry.jitter);
    }

    #[test]
    fn retry_config_serializes_delay_as_seconds() {
        let retry = RetryConfig {
            delay: Duration::from_secs(7),
            ..RetryConfig::default()
        };
        let json = serde_json::to_value(&retry).expect("serialize failed");
        assert_eq!(json["delay"], 7);
        assert_eq!(json["backoff"]["kind"], "fixed");
    }

    #[test]
    fn fixed_backoff_keeps_delay() {
        let retry = RetryConfig::default();
        assert_eq!(
            retry.next_delay(Duration::from_secs(5)),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn exponential_backoff_grows_and_caps() {
        let retry = RetryConfig {
            backoff: Backoff::Exponential {
                multiplier: 2.0,
                max_delay: Duration::from_secs(12),
            },
            ..RetryConfig::default()
        };
        assert_eq!(
            retry.next_delay(Duration::from_secs(5)),
            Duration::from_secs(10)
        );
        assert_eq!(
            retry.next_delay(Duration::from_secs(10)),
            Duration::from_secs(12),
            "delay must be capped at max_delay"
        );
    }

    #[test]
    fn allows_retry_respects_optional_limit() {
        let forever = RetryConfig::default();
        assert!(forever.allows_retry(0));
        assert!(forever.allows_retry(u32::MAX));

        let bounded = RetryConfig {
            max_attempts: Some(2),
            ..RetryConfig::default()
        };
        assert!(bounded.allows_retry(0));
        assert!(bounded.allows_retry(1));
        assert!(!bounded.allows_retry(2));
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        match config.validate() {
            Err(Error::Config { key, .. }) => assert_eq!(key.as_deref(), Some("page_size")),
            other => panic!("expected page_size config error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_unparsable_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8080/rugby".to_string();
        let base = config.api.base().unwrap();
        assert_eq!(base.as_str(), "http://localhost:8080/rugby/");
        assert_eq!(
            base.join("country.json").unwrap().as_str(),
            "http://localhost:8080/rugby/country.json"
        );
    }

    #[test]
    fn load_reads_partial_file_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"page_size":50,"retry":{"max_attempts":4}}"#).unwrap();

        let config = Config::load(&path).expect("load failed");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.retry.max_attempts, Some(4));
        assert_eq!(config.retry.delay, Duration::from_secs(5));
    }

    #[test]
    fn load_reports_parse_errors_as_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ page_size: ").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn layout_rooted_at_joins_default_names() {
        let layout = LayoutConfig::rooted_at(Path::new("/data/run"));
        assert_eq!(layout.json_dir, PathBuf::from("/data/run/json"));
        assert_eq!(layout.csv_dir, PathBuf::from("/data/run/csv"));
    }
}
