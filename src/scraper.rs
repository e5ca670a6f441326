//! Top-level operations: probe an entity, collect an entity
//!
//! A [`Scraper`] owns the configuration, the retrying fetcher and the
//! metadata store. Each public method is one unit of work as exposed on the
//! command line; years are walked sequentially by the caller.

use crate::collect::{CollectStats, Pages, write_pages};
use crate::config::Config;
use crate::entity::{Entity, YearRange};
use crate::error::Result;
use crate::fetch::{Fetcher, HttpTransport, Transport};
use crate::metadata::{MetadataStore, PageMetadata};
use crate::path::FieldPath;
use crate::retry::{Sleeper, TokioSleeper};
use crate::schema;
use crate::sink::{CsvSink, RowSink, write_lookup};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

/// Lookup lists shipped with the countries probe, and their CSV names
const COUNTRY_LOOKUPS: &[(&str, &str)] = &[
    ("content.sportLookup", "sports.csv"),
    ("content.typeLookup", "types.csv"),
];

/// Outcome of one collection run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectSummary {
    /// What was collected
    pub entity: Entity,
    /// CSV file written
    pub output: PathBuf,
    /// Page and record totals
    pub stats: CollectStats,
}

/// Drives probes and collections against the API
pub struct Scraper<T = HttpTransport, S = TokioSleeper> {
    config: Config,
    fetcher: Fetcher<T, S>,
    store: MetadataStore,
}

impl Scraper {
    /// Scraper over HTTP with the Tokio timer
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::http(&config.client, config.retry.clone())?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<T: Transport, S: Sleeper> Scraper<T, S> {
    /// Scraper over an explicit fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher<T, S>) -> Self {
        let store = MetadataStore::new(config.layout.clone());
        Self {
            config,
            fetcher,
            store,
        }
    }

    /// The fetcher in use
    pub fn fetcher(&self) -> &Fetcher<T, S> {
        &self.fetcher
    }

    /// Probe `entity` with a single-record request and persist the response
    pub async fn probe(&self, entity: Entity) -> Result<PageMetadata> {
        let url = entity.probe_url(&self.config.api)?;
        info!(entity = %entity, url = %url, "Probing");

        let (body, parsed) = self.fetcher.fetch_json(&url).await?;
        self.store
            .save(&entity, &body, &parsed, self.config.page_size)
    }

    /// Probe matches for every year of `years`, in order
    pub async fn probe_years(&self, years: YearRange) -> Result<Vec<PageMetadata>> {
        let mut out = Vec::new();
        for year in years.years() {
            out.push(self.probe(Entity::Matches { year }).await?);
        }
        Ok(out)
    }

    /// Collect every record of `entity` into its CSV file
    ///
    /// Reads the stored probe (fatal if missing), truncates the output file,
    /// then writes page by page.
    pub async fn collect(&self, entity: Entity) -> Result<CollectSummary> {
        let probe = self.store.load(&entity, self.config.page_size)?;
        let schema = schema::for_entity(&entity)?;
        let output = entity.output_path(&self.config.layout);

        if entity == Entity::Countries {
            self.write_country_lookups(&probe.body)?;
        }

        info!(
            entity = %entity,
            total_records = probe.metadata.total_records,
            num_pages = probe.metadata.num_pages(),
            output = %output.display(),
            "Collecting"
        );

        let mut sink = CsvSink::create(&output)?;
        let mut pages = Pages::new(&self.fetcher, &self.config.api, entity, probe.metadata)?;
        let stats = write_pages(&mut pages, &schema, &mut sink).await?;
        sink.close()?;

        info!(
            entity = %entity,
            pages = stats.pages,
            records = stats.records,
            "Collection finished"
        );
        Ok(CollectSummary {
            entity,
            output,
            stats,
        })
    }

    /// Collect matches for every year of `years`, one year at a time
    pub async fn collect_years(&self, years: YearRange) -> Result<Vec<CollectSummary>> {
        let mut out = Vec::new();
        for year in years.years() {
            let summary = self.collect(Entity::Matches { year }).await?;
            info!(year, matches = summary.stats.records, "Matches for year");
            out.push(summary);
        }
        Ok(out)
    }

    fn write_country_lookups(&self, probe: &Value) -> Result<()> {
        for (raw_path, file) in COUNTRY_LOOKUPS {
            let path = FieldPath::parse(raw_path)?;
            let target = self.config.layout.csv_dir.join(file);
            match path.extract(probe).and_then(Value::as_array) {
                Some(entries) => {
                    let rows = write_lookup(&target, entries)?;
                    info!(
                        lookup = %path,
                        rows,
                        output = %target.display(),
                        "Wrote lookup table"
                    );
                }
                None => warn!(lookup = %path, "Lookup list absent from probe, skipping"),
            }
        }
        Ok(())
    }
}
