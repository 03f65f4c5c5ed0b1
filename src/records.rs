use std::collections::HashMap;

use anyhow::Result;

/// One team's registration row at an event.
#[derive(Debug, Clone)]
pub struct TeamRecord {
    pub team_number: u32,
    pub name_short: String,
    pub rookie_year: u32,
    /// `None` marks a regional-only team; district teams never enter the pool.
    pub district_code: Option<String>,
}

/// One row of an event's qualification ranking table.
#[derive(Debug, Clone)]
pub struct RankingRecord {
    pub team_number: u32,
    pub rank: u32,
    /// The event's own tie-break criteria, opaque to the pool rules.
    pub sort_order: [f64; 6],
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

/// Alliance selection result. Seat fields hold team numbers.
#[derive(Debug, Clone)]
pub struct AllianceRecord {
    pub number: u32,
    pub captain: u32,
    pub round1: u32,
    pub round2: u32,
    pub round3: Option<u32>,
    pub backup: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct StationRecord {
    pub team_number: u32,
    pub dq: bool,
}

/// One played match. Score vectors are `[final, foul, auto, extras...]`
/// and compare lexicographically; stations are red 1-3 then blue 1-3.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub match_number: u32,
    pub red_score: Vec<i64>,
    pub blue_score: Vec<i64>,
    pub stations: Vec<StationRecord>,
    pub is_replay: bool,
    pub match_video_link: Option<String>,
}

/// An award handed out at an event; `person` is set for individual awards.
#[derive(Debug, Clone)]
pub struct AwardRecord {
    pub name: String,
    pub team_number: Option<u32>,
    pub person: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventListing {
    pub code: String,
    pub week_number: u8,
}

/// Everything the engine needs to reconstruct a single event. The engine
/// never fetches; implementations decide where the records come from.
pub trait EventSource {
    fn event_teams(&self, season: u32, event_code: &str) -> Result<Vec<TeamRecord>>;
    fn event_rankings(&self, season: u32, event_code: &str) -> Result<Vec<RankingRecord>>;
    fn event_alliances(&self, season: u32, event_code: &str) -> Result<Vec<AllianceRecord>>;
    fn quals_matches(&self, season: u32, event_code: &str) -> Result<Vec<MatchRecord>>;
    fn playoff_matches(&self, season: u32, event_code: &str) -> Result<Vec<MatchRecord>>;
    fn event_awards(&self, season: u32, event_code: &str) -> Result<Vec<AwardRecord>>;
}

/// Season-level additions: the week-by-week event calendar and any manual
/// point adjustments published during the season.
pub trait SeasonSource: EventSource {
    fn event_listings(&self, season: u32) -> Result<Vec<EventListing>>;
    fn regional_adjustments(&self, season: u32) -> Result<HashMap<u32, i64>>;
}
