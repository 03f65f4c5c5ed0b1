#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use frc_pool::records::{
    AllianceRecord, AwardRecord, EventListing, EventSource, MatchRecord, RankingRecord,
    SeasonSource, StationRecord, TeamRecord,
};

/// All the records of one fixture event.
#[derive(Debug, Default, Clone)]
pub struct EventFixture {
    pub teams: Vec<TeamRecord>,
    pub rankings: Vec<RankingRecord>,
    pub alliances: Vec<AllianceRecord>,
    pub quals: Vec<MatchRecord>,
    pub playoffs: Vec<MatchRecord>,
    pub awards: Vec<AwardRecord>,
}

/// In-memory record source so tests never touch the network.
#[derive(Debug, Default)]
pub struct MemorySource {
    pub events: HashMap<String, EventFixture>,
    pub listings: Vec<EventListing>,
    pub adjustments: HashMap<u32, i64>,
}

impl MemorySource {
    pub fn add_event(&mut self, code: &str, week: u8, fixture: EventFixture) {
        self.listings.push(EventListing {
            code: code.to_string(),
            week_number: week,
        });
        self.events.insert(code.to_string(), fixture);
    }

    fn fixture(&self, code: &str) -> Result<&EventFixture> {
        self.events
            .get(code)
            .ok_or_else(|| anyhow!("no fixture for event {code}"))
    }
}

impl EventSource for MemorySource {
    fn event_teams(&self, _season: u32, event_code: &str) -> Result<Vec<TeamRecord>> {
        Ok(self.fixture(event_code)?.teams.clone())
    }

    fn event_rankings(&self, _season: u32, event_code: &str) -> Result<Vec<RankingRecord>> {
        Ok(self.fixture(event_code)?.rankings.clone())
    }

    fn event_alliances(&self, _season: u32, event_code: &str) -> Result<Vec<AllianceRecord>> {
        Ok(self.fixture(event_code)?.alliances.clone())
    }

    fn quals_matches(&self, _season: u32, event_code: &str) -> Result<Vec<MatchRecord>> {
        Ok(self.fixture(event_code)?.quals.clone())
    }

    fn playoff_matches(&self, _season: u32, event_code: &str) -> Result<Vec<MatchRecord>> {
        Ok(self.fixture(event_code)?.playoffs.clone())
    }

    fn event_awards(&self, _season: u32, event_code: &str) -> Result<Vec<AwardRecord>> {
        Ok(self.fixture(event_code)?.awards.clone())
    }
}

impl SeasonSource for MemorySource {
    fn event_listings(&self, _season: u32) -> Result<Vec<EventListing>> {
        Ok(self.listings.clone())
    }

    fn regional_adjustments(&self, _season: u32) -> Result<HashMap<u32, i64>> {
        Ok(self.adjustments.clone())
    }
}

pub fn team(team_number: u32, rookie_year: u32) -> TeamRecord {
    TeamRecord {
        team_number,
        name_short: format!("Team {team_number}"),
        rookie_year,
        district_code: None,
    }
}

pub fn district_team(team_number: u32, rookie_year: u32, district: &str) -> TeamRecord {
    TeamRecord {
        district_code: Some(district.to_string()),
        ..team(team_number, rookie_year)
    }
}

pub fn ranking(team_number: u32, rank: u32) -> RankingRecord {
    RankingRecord {
        team_number,
        rank,
        sort_order: [0.0; 6],
        wins: 0,
        losses: 0,
        ties: 0,
    }
}

pub fn alliance(number: u32, captain: u32, round1: u32, round2: u32) -> AllianceRecord {
    AllianceRecord {
        number,
        captain,
        round1,
        round2,
        round3: None,
        backup: None,
    }
}

pub fn match_record(
    match_number: u32,
    red: [u32; 3],
    blue: [u32; 3],
    red_final: i64,
    blue_final: i64,
) -> MatchRecord {
    let stations = red
        .iter()
        .chain(blue.iter())
        .map(|&team_number| StationRecord {
            team_number,
            dq: false,
        })
        .collect();
    MatchRecord {
        match_number,
        red_score: vec![red_final, 0, 0],
        blue_score: vec![blue_final, 0, 0],
        stations,
        is_replay: false,
        match_video_link: None,
    }
}

pub fn with_dq(mut record: MatchRecord, team_number: u32) -> MatchRecord {
    for station in &mut record.stations {
        if station.team_number == team_number {
            station.dq = true;
        }
    }
    record
}

pub fn team_award(name: &str, team_number: u32) -> AwardRecord {
    AwardRecord {
        name: name.to_string(),
        team_number: Some(team_number),
        person: None,
    }
}

pub fn person_award(name: &str, person: &str) -> AwardRecord {
    AwardRecord {
        name: name.to_string(),
        team_number: None,
        person: Some(person.to_string()),
    }
}
