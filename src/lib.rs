//! # rugby-scrape
//!
//! Collects rugby statistics (countries, matches, world rankings) from the
//! Pulse Live JSON API and flattens them into header-less CSV files.
//!
//! ## How a collection works
//!
//! 1. **Probe**: one request for a single record; the response is stored
//!    under `json/` and tells how many records exist.
//! 2. **Paginate**: pages `0..ceil(total / page_size)` are fetched in order,
//!    one at a time, each retried until it succeeds.
//! 3. **Flatten**: each record becomes a fixed-width row by safe path
//!    extraction, followed by the record itself as JSON.
//! 4. **Write**: rows are appended to a CSV file under `csv/`, flushed after
//!    every page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rugby_scrape::{Config, Entity, Scraper};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scraper = Scraper::new(Config::default())?;
//!
//!     scraper.probe(Entity::Matches { year: 2015 }).await?;
//!     let summary = scraper.collect(Entity::Matches { year: 2015 }).await?;
//!     println!("{} matches", summary.stats.records);
//!
//!     Ok(())
//! }
//! ```
//!
//! The default retry policy never gives up: an unreachable API keeps the
//! process waiting. Set `retry.max_attempts` to bound it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Paginated collection
pub mod collect;
/// Configuration types
pub mod config;
/// Collectable entities, URLs and file names
pub mod entity;
/// Error types
pub mod error;
/// HTTP fetching with retry
pub mod fetch;
/// Record flattening
pub mod flatten;
/// Probe metadata
pub mod metadata;
/// Safe path extraction
pub mod path;
/// Retry policy execution
pub mod retry;
/// Column schemas per entity
pub mod schema;
/// Probe and collect operations
pub mod scraper;
/// CSV output
pub mod sink;

// Re-export commonly used types
pub use collect::{CollectStats, Page, Pages};
pub use config::{ApiConfig, Backoff, ClientConfig, Config, LayoutConfig, RetryConfig};
pub use entity::{Entity, RankingsSource, YearRange};
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpTransport, Transport};
pub use flatten::{Cell, ColumnKind, FlatRow, Schema};
pub use metadata::PageMetadata;
pub use path::FieldPath;
pub use retry::{Sleeper, TokioSleeper};
pub use scraper::{CollectSummary, Scraper};
pub use sink::{CsvSink, RowSink};
