//! Error types for rugby-scrape
//!
//! Errors fall into three groups:
//! - Remote failures (network, HTTP status, malformed page bodies) which the
//!   retry layer absorbs according to the configured policy
//! - Fatal local failures (metadata files, output files, configuration)
//!   which abort the current run
//! - Path parsing failures, raised only while building column schemas

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rugby-scrape operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rugby-scrape
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "page_size")
        key: Option<String>,
    },

    /// Transport-level failure (connect, TLS, read, redirect policy)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// URL that was requested
        url: String,
    },

    /// A body or file could not be parsed as JSON
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A page body parsed but did not hold a record list at the expected path
    #[error("unexpected response shape from {url}: no array at `{path}`")]
    UnexpectedShape {
        /// URL of the page
        url: String,
        /// Content path that was expected to hold the records
        path: String,
    },

    /// Stored probe metadata is missing or unusable
    #[error("metadata error in {}: {reason}", path.display())]
    Metadata {
        /// Metadata file that was read
        path: PathBuf,
        /// Why the metadata could not be used
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field path in a column schema could not be parsed
    #[error("invalid field path `{path}`: {reason}")]
    InvalidPath {
        /// The offending dotted path
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// Year range with the first year after the last
    #[error("invalid year range: {first} is after {last}")]
    InvalidYearRange {
        /// First year of the range
        first: i32,
        /// Last year of the range
        last: i32,
    },
}

impl Error {
    /// Shorthand for a configuration error tied to a key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Shorthand for a metadata error on a given file
    pub fn metadata(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Metadata {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
