//! Entities collected from the API and how to address them
//!
//! Each [`Entity`] knows its endpoint, its query filters, where its records
//! sit inside a page body, and which local files belong to it.

use crate::config::{ApiConfig, LayoutConfig};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Which rankings endpoint to read
///
/// Both endpoints serve the same men's rugby union rankings; they differ
/// only in URL and are kept side by side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum RankingsSource {
    /// Versioned `v3` endpoint
    #[default]
    V3,
    /// Older unversioned `cmsapi` endpoint
    Legacy,
}

/// A collectable entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    /// All countries with their teams
    Countries,
    /// Matches played within one calendar year
    Matches {
        /// Calendar year
        year: i32,
    },
    /// Current world rankings snapshot
    Rankings(RankingsSource),
}

impl Entity {
    /// Whether the endpoint is paginated; rankings arrive as a single snapshot
    pub fn is_paged(&self) -> bool {
        !matches!(self, Entity::Rankings(_))
    }

    /// Path inside a page body holding the record array
    pub fn content_path(&self) -> &'static str {
        match self {
            Entity::Countries => "content.countries",
            Entity::Matches { .. } => "content",
            Entity::Rankings(_) => "entries",
        }
    }

    /// Stem shared by the probe file and the CSV file
    fn stem(&self) -> String {
        match self {
            Entity::Countries => "countries".to_string(),
            Entity::Matches { year } => format!("matches_{year}"),
            Entity::Rankings(RankingsSource::V3) => "rankings".to_string(),
            Entity::Rankings(RankingsSource::Legacy) => "rankings_legacy".to_string(),
        }
    }

    /// Probe file in the metadata store
    pub fn metadata_path(&self, layout: &LayoutConfig) -> PathBuf {
        let name = match self {
            Entity::Countries => "country_meta.json".to_string(),
            Entity::Matches { year } => format!("match_meta_{year}.json"),
            Entity::Rankings(_) => format!("{}.json", self.stem()),
        };
        layout.json_dir.join(name)
    }

    /// CSV output file
    pub fn output_path(&self, layout: &LayoutConfig) -> PathBuf {
        layout.csv_dir.join(format!("{}.csv", self.stem()))
    }

    /// URL of the single-record probe request
    pub fn probe_url(&self, api: &ApiConfig) -> Result<Url> {
        self.url(api, 1, 0, "desc")
    }

    /// URL of page `page` holding up to `page_size` records
    pub fn page_url(&self, api: &ApiConfig, page_size: u32, page: u64) -> Result<Url> {
        self.url(api, page_size, page, "asc")
    }

    fn url(&self, api: &ApiConfig, page_size: u32, page: u64, sort: &str) -> Result<Url> {
        let mut url = match self {
            Entity::Countries => join(api, "country.json")?,
            Entity::Matches { .. } => join(api, "match.json")?,
            Entity::Rankings(RankingsSource::V3) => parse(&api.rankings_v3_url)?,
            Entity::Rankings(RankingsSource::Legacy) => parse(&api.rankings_legacy_url)?,
        };

        if let Entity::Matches { year } = self {
            let (start, end) = year_bounds(*year)?;
            url.query_pairs_mut()
                .append_pair("startDate", &start.format("%Y-%m-%d").to_string())
                .append_pair("endDate", &end.format("%Y-%m-%d").to_string())
                .append_pair("sort", sort);
        }
        if self.is_paged() {
            url.query_pairs_mut()
                .append_pair("pageSize", &page_size.to_string())
                .append_pair("page", &page.to_string());
        }
        Ok(url)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Countries => write!(f, "countries"),
            Entity::Matches { year } => write!(f, "matches {year}"),
            Entity::Rankings(RankingsSource::V3) => write!(f, "rankings"),
            Entity::Rankings(RankingsSource::Legacy) => write!(f, "rankings (legacy)"),
        }
    }
}

fn join(api: &ApiConfig, endpoint: &str) -> Result<Url> {
    api.base()?
        .join(endpoint)
        .map_err(|e| Error::config("api.base_url", format!("cannot join `{endpoint}`: {e}")))
}

fn parse(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::config("api", format!("invalid URL `{raw}`: {e}")))
}

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(Error::InvalidYearRange {
            first: year,
            last: year,
        }),
    }
}

/// Inclusive range of calendar years, walked in ascending order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearRange {
    first: i32,
    last: i32,
}

impl YearRange {
    /// Range from `first` to `last` (defaults to `first`)
    pub fn new(first: i32, last: Option<i32>) -> Result<Self> {
        let last = last.unwrap_or(first);
        if first > last {
            return Err(Error::InvalidYearRange { first, last });
        }
        year_bounds(first)?;
        year_bounds(last)?;
        Ok(Self { first, last })
    }

    /// First year
    pub fn first(&self) -> i32 {
        self.first
    }

    /// Last year
    pub fn last(&self) -> i32 {
        self.last
    }

    /// Years in ascending order
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.first..=self.last
    }
}
