//! Page metadata: probing the API and persisting the probe
//!
//! A probe asks for a single record. For paged endpoints the response's
//! `pageInfo` then holds the total record count; for the rankings snapshot
//! the count is the length of the entry list. The response is written
//! verbatim to the metadata store so later collection runs need no network
//! round trip to size themselves.

use crate::config::LayoutConfig;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::path::FieldPath;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Record count and page size for one entity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMetadata {
    /// Records available on the remote side
    pub total_records: u64,
    /// Records per page
    pub page_size: u32,
}

impl PageMetadata {
    /// Metadata for `total_records` records fetched `page_size` at a time
    pub fn new(total_records: u64, page_size: u32) -> Self {
        Self {
            total_records,
            page_size,
        }
    }

    /// Metadata for an unpaged snapshot: every record on one page
    pub fn single_page(total_records: u64) -> Self {
        let page_size = u32::try_from(total_records.max(1)).unwrap_or(u32::MAX);
        Self {
            total_records,
            page_size,
        }
    }

    /// `ceil(total_records / page_size)`; zero records means zero pages
    pub fn num_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_records.div_ceil(u64::from(self.page_size))
    }
}

/// Probe responses on disk, one file per entity (and year)
#[derive(Clone, Debug)]
pub struct MetadataStore {
    layout: LayoutConfig,
}

/// A stored probe: the parsed body and the metadata derived from it
#[derive(Clone, Debug)]
pub struct StoredProbe {
    /// File the probe was read from
    pub path: PathBuf,
    /// The probe response
    pub body: Value,
    /// Total record count and page size
    pub metadata: PageMetadata,
}

impl MetadataStore {
    /// Store rooted at the layout's JSON directory
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// File holding the probe for `entity`
    pub fn path_for(&self, entity: &Entity) -> PathBuf {
        entity.metadata_path(&self.layout)
    }

    /// Persist a probe body verbatim and return the metadata it implies
    ///
    /// The body must already be valid JSON with a usable record count;
    /// nothing is written otherwise.
    pub fn save(
        &self,
        entity: &Entity,
        body: &str,
        parsed: &Value,
        page_size: u32,
    ) -> Result<PageMetadata> {
        let path = self.path_for(entity);
        let metadata = metadata_from_probe(entity, parsed, page_size, &path)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, body)?;

        info!(
            entity = %entity,
            path = %path.display(),
            total_records = metadata.total_records,
            "Saved probe metadata"
        );
        Ok(metadata)
    }

    /// Read the stored probe for `entity`
    ///
    /// # Errors
    /// Returns [`Error::Metadata`] if the file is missing, is not JSON, or
    /// holds no record count. Collection cannot proceed without it.
    pub fn load(&self, entity: &Entity, page_size: u32) -> Result<StoredProbe> {
        let path = self.path_for(entity);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            Error::metadata(
                &path,
                format!("cannot read probe file ({e}); run the matching *-meta command first"),
            )
        })?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| Error::metadata(&path, format!("probe file is not valid JSON: {e}")))?;
        let metadata = metadata_from_probe(entity, &body, page_size, &path)?;

        debug!(
            entity = %entity,
            total_records = metadata.total_records,
            num_pages = metadata.num_pages(),
            "Loaded probe metadata"
        );
        Ok(StoredProbe {
            path,
            body,
            metadata,
        })
    }
}

/// Derive metadata from a probe response
///
/// Paged entities read `pageInfo.numEntries`, falling back to
/// `pageInfo.numPages` (equal to the record count for a probe of page size
/// one). Snapshot entities count the entries at their content path.
pub fn metadata_from_probe(
    entity: &Entity,
    probe: &Value,
    page_size: u32,
    path: &Path,
) -> Result<PageMetadata> {
    if entity.is_paged() {
        let total = ["pageInfo.numEntries", "pageInfo.numPages"]
            .iter()
            .filter_map(|raw| FieldPath::parse(raw).ok())
            .find_map(|field| field.extract(probe).and_then(count_of))
            .ok_or_else(|| Error::metadata(path, "no pageInfo.numEntries or pageInfo.numPages"))?;
        Ok(PageMetadata::new(total, page_size))
    } else {
        let content = FieldPath::parse(entity.content_path())?;
        let entries = content
            .extract(probe)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::metadata(path, format!("no array at `{content}`")))?;
        Ok(PageMetadata::single_page(entries.len() as u64))
    }
}

/// Non-negative integer, possibly sent as text
fn count_of(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
