//! HTTP fetching
//!
//! [`Transport`] performs a single GET. [`Fetcher`] layers the retry policy
//! on top and, for pages, the JSON parse and record extraction, so a body
//! that arrives truncated is fetched again just like a failed request.

use crate::config::{ClientConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::path::{FieldPath, Segment};
use crate::retry::{Sleeper, TokioSleeper, with_retry};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use serde_json::Value;
use url::Url;

/// A single GET request returning the body text
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` once; non-success statuses are errors
    async fn get(&self, url: &Url) -> Result<String>;
}

/// [`Transport`] backed by `reqwest`
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client from explicit configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let redirect = if config.follow_redirects {
            Policy::limited(config.max_redirects)
        } else {
            Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(redirect);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| Error::Config {
            message: format!("failed to create HTTP client: {e}"),
            key: Some("client".to_string()),
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Retrying fetcher
pub struct Fetcher<T = HttpTransport, S = TokioSleeper> {
    transport: T,
    retry: RetryConfig,
    sleeper: S,
}

impl Fetcher {
    /// Fetcher over a `reqwest` client using the Tokio timer
    pub fn http(client: &ClientConfig, retry: RetryConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(client)?, retry, TokioSleeper))
    }
}

impl<T: Transport, S: Sleeper> Fetcher<T, S> {
    /// Fetcher from explicit parts
    pub fn new(transport: T, retry: RetryConfig, sleeper: S) -> Self {
        Self {
            transport,
            retry,
            sleeper,
        }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The sleeper used between retries
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// GET `url`, retrying failures per policy
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        with_retry(&self.retry, &self.sleeper, || self.transport.get(url)).await
    }

    /// GET `url` and parse the body as JSON; an unparsable body is refetched
    ///
    /// Returns the body text alongside the parsed value so callers can store
    /// it verbatim.
    pub async fn fetch_json(&self, url: &Url) -> Result<(String, Value)> {
        with_retry(&self.retry, &self.sleeper, || async move {
            let body = self.transport.get(url).await?;
            let value: Value = serde_json::from_str(&body)?;
            Ok::<_, Error>((body, value))
        })
        .await
    }

    /// GET one page and return the records found at `content`
    ///
    /// A body that is not JSON or has no array at `content` is refetched.
    pub async fn fetch_records(&self, url: &Url, content: &FieldPath) -> Result<Vec<Value>> {
        with_retry(&self.retry, &self.sleeper, || async move {
            let body = self.transport.get(url).await?;
            let mut value: Value = serde_json::from_str(&body)?;
            take_array(&mut value, content).ok_or_else(|| Error::UnexpectedShape {
                url: url.to_string(),
                path: content.to_string(),
            })
        })
        .await
    }
}

/// Move the array at `path` out of `value`
fn take_array(value: &mut Value, path: &FieldPath) -> Option<Vec<Value>> {
    path.extract(value)?.as_array()?;
    let mut current = value;
    for segment in path.segments() {
        current = match segment {
            Segment::Key(key) => current.get_mut(key.as_str())?,
            Segment::Index(index) => current.get_mut(*index)?,
        };
    }
    match current.take() {
        Value::Array(records) => Some(records),
        _ => None,
    }
}
