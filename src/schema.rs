//! Column layouts of the CSV files
//!
//! These follow the shapes the API returns today. If the remote shape
//! changes, the paths here are what needs updating.

use crate::entity::Entity;
use crate::error::Result;
use crate::flatten::{ColumnKind, Schema};

use ColumnKind::{Float, Int, Json, Text};

const COUNTRY_COLUMNS: &[(&str, &str, ColumnKind)] = &[
    ("id", "id", Int),
    ("name", "name", Text),
    ("teams", "teams", Json),
];

const MATCH_COLUMNS: &[(&str, &str, ColumnKind)] = &[
    ("match_id", "matchId", Int),
    ("description", "description", Text),
    ("venue_id", "venue.id", Int),
    ("venue_name", "venue.name", Text),
    ("venue_city", "venue.city", Text),
    ("venue_country", "venue.country", Text),
    ("time_millis", "time.millis", Int),
    ("time_gmtoffset", "time.gmtOffset", Text),
    ("time_label", "time.label", Text),
    ("attendance", "attendance", Int),
    ("team_id", "teams[0].id", Int),
    ("team_name", "teams[0].name", Text),
    ("team_abbr", "teams[0].abbreviation", Text),
    ("opponent_id", "teams[1].id", Int),
    ("opponent_name", "teams[1].name", Text),
    ("opponent_abbr", "teams[1].abbreviation", Text),
    ("team_score", "scores[0]", Int),
    ("opponent_score", "scores[1]", Int),
    ("status", "status", Text),
    ("outcome", "outcome", Text),
    ("event_id", "events[0].id", Int),
    ("event_label", "events[0].label", Text),
    ("event_sport", "events[0].sport", Text),
    ("event_start_millis", "events[0].start.millis", Int),
    ("event_start_label", "events[0].start.label", Text),
    ("event_end_millis", "events[0].end.millis", Int),
    ("event_end_label", "events[0].end.label", Text),
];

const RANKING_COLUMNS: &[(&str, &str, ColumnKind)] = &[
    ("team_id", "team.id", Int),
    ("team_name", "team.name", Text),
    ("team_abbr", "team.abbreviation", Text),
    ("team_country_code", "team.countryCode", Text),
    ("pos", "pos", Int),
    ("pts", "pts", Float),
    ("previous_pos", "previousPos", Int),
    ("previous_pts", "previousPts", Float),
];

/// Schema for countries
pub fn countries() -> Result<Schema> {
    Schema::new(COUNTRY_COLUMNS)
}

/// Schema for matches
pub fn matches() -> Result<Schema> {
    Schema::new(MATCH_COLUMNS)
}

/// Schema for ranking entries
pub fn rankings() -> Result<Schema> {
    Schema::new(RANKING_COLUMNS)
}

/// Schema for `entity`
pub fn for_entity(entity: &Entity) -> Result<Schema> {
    match entity {
        Entity::Countries => countries(),
        Entity::Matches { .. } => matches(),
        Entity::Rankings(_) => rankings(),
    }
}
