//! Paginated collection
//!
//! [`Pages`] walks pages `0..num_pages` strictly in order, one request at a
//! time. [`write_pages`] drains it into a [`RowSink`], flushing after every
//! page so that a crash loses at most the page in flight.

use crate::config::ApiConfig;
use crate::entity::Entity;
use crate::error::Result;
use crate::fetch::{Fetcher, Transport};
use crate::flatten::Schema;
use crate::metadata::PageMetadata;
use crate::path::FieldPath;
use crate::retry::Sleeper;
use crate::sink::RowSink;
use serde_json::Value;
use tracing::debug;

/// One fetched page
#[derive(Clone, Debug)]
pub struct Page {
    /// Zero-based page index
    pub index: u64,
    /// Records in API order
    pub records: Vec<Value>,
}

/// Lazy, finite sequence of pages for one entity
///
/// Nothing is fetched until [`Pages::next_page`] is awaited. Restarting means
/// building a new `Pages`, which begins again at page 0.
pub struct Pages<'a, T, S> {
    fetcher: &'a Fetcher<T, S>,
    api: &'a ApiConfig,
    entity: Entity,
    content: FieldPath,
    metadata: PageMetadata,
    next: u64,
}

impl<'a, T: Transport, S: Sleeper> Pages<'a, T, S> {
    /// Pages of `entity` as sized by `metadata`
    pub fn new(
        fetcher: &'a Fetcher<T, S>,
        api: &'a ApiConfig,
        entity: Entity,
        metadata: PageMetadata,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            api,
            entity,
            content: FieldPath::parse(entity.content_path())?,
            metadata,
            next: 0,
        })
    }

    /// Number of pages this sequence yields in total
    pub fn num_pages(&self) -> u64 {
        self.metadata.num_pages()
    }

    /// Fetch the next page, or `None` once every page has been yielded
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        if self.next >= self.metadata.num_pages() {
            return Ok(None);
        }
        let index = self.next;
        let url = self
            .entity
            .page_url(self.api, self.metadata.page_size, index)?;

        debug!(entity = %self.entity, page = index, url = %url, "Fetching page");
        let records = self.fetcher.fetch_records(&url, &self.content).await?;

        self.next += 1;
        Ok(Some(Page { index, records }))
    }
}

/// Totals of one collection run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Pages fetched
    pub pages: u64,
    /// Rows written
    pub records: u64,
}

/// Flatten every record of every page into `sink`, flushing per page
pub async fn write_pages<T, S, K>(
    pages: &mut Pages<'_, T, S>,
    schema: &Schema,
    sink: &mut K,
) -> Result<CollectStats>
where
    T: Transport,
    S: Sleeper,
    K: RowSink,
{
    let mut stats = CollectStats::default();

    while let Some(page) = pages.next_page().await? {
        for record in &page.records {
            sink.write_row(&schema.flatten(record))?;
        }
        sink.flush()?;

        stats.pages += 1;
        stats.records += page.records.len() as u64;
        debug!(
            page = page.index,
            records = page.records.len(),
            total = stats.records,
            "Page written"
        );
    }

    Ok(stats)
}
