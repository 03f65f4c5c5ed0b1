use std::cmp::Ordering;
use std::collections::HashSet;

use crate::records::TeamRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentLevel {
    Qualification,
    Playoff,
}

/// Outcome of one match from a single team's perspective. Disqualification
/// overrides the score comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Lose,
    Tie,
    Disqualified,
}

/// A team as it appeared at one event. Identity is event-scoped: the same
/// team number at another event is a different `Team`.
#[derive(Debug, Clone)]
pub struct Team {
    pub team_number: u32,
    pub name: String,
    pub rookie_year: u32,
    pub district_code: Option<String>,
    /// 0 until the ranking table is ingested (0 = unranked).
    pub ranking: u32,
    pub sort_order: [f64; 6],
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub awards: Vec<String>,
    /// `(alliance number, 1-based draft seat)` once selected.
    pub alliance_seat: Option<(u32, u8)>,
    pub quals_matches: Vec<u32>,
    pub playoff_matches: Vec<u32>,
}

impl Team {
    pub fn new(record: &TeamRecord) -> Self {
        Self {
            team_number: record.team_number,
            name: record.name_short.clone(),
            rookie_year: record.rookie_year,
            district_code: record.district_code.clone(),
            ranking: 0,
            sort_order: [0.0; 6],
            wins: 0,
            losses: 0,
            ties: 0,
            awards: Vec::new(),
            alliance_seat: None,
            quals_matches: Vec::new(),
            playoff_matches: Vec::new(),
        }
    }

    pub fn alliance_number(&self) -> Option<u32> {
        self.alliance_seat.map(|(number, _)| number)
    }

    pub fn alliance_role(&self) -> Option<u8> {
        self.alliance_seat.map(|(_, role)| role)
    }

    /// Draft-order succession under the regional point rules. Captains and
    /// first picks map to their alliance number, second picks count back
    /// from 17, everyone else (backup, unselected) sits at the floor of 17.
    pub fn succession_of_points(&self) -> i64 {
        match self.alliance_seat {
            Some((number, 1 | 2)) => i64::from(number),
            Some((number, 3)) => 17 - i64::from(number),
            _ => 17,
        }
    }
}

/// A numbered playoff alliance. Seats stay in draft order; an unused
/// 4th-pick or backup seat holds `None` so later seats keep their role.
#[derive(Debug, Clone)]
pub struct Alliance {
    pub number: u32,
    pub seats: Vec<Option<u32>>,
    /// Playoff match numbers in registration order.
    pub playoff_matches: Vec<u32>,
}

impl Alliance {
    pub fn captain(&self) -> Option<u32> {
        self.seats.first().copied().flatten()
    }

    pub fn contains(&self, team_number: u32) -> bool {
        self.seats.iter().flatten().any(|&seat| seat == team_number)
    }
}

/// One side of a match. Qualification sides are anonymous per-match
/// groupings; playoff sides link back to a persistent alliance.
#[derive(Debug, Clone)]
pub struct MatchSide {
    pub team_numbers: Vec<u32>,
    pub alliance_number: Option<u32>,
    pub score: Vec<i64>,
}

impl MatchSide {
    pub fn has_team(&self, team_number: u32) -> bool {
        self.team_numbers.contains(&team_number)
    }

    pub fn final_score(&self) -> i64 {
        self.score.first().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Match {
    pub level: TournamentLevel,
    pub match_number: u32,
    pub red: MatchSide,
    pub blue: MatchSide,
    pub dq_teams: HashSet<u32>,
    pub is_replay: bool,
    pub video_link: Option<String>,
}

impl Match {
    /// Result for a team fielded in this match; `None` when the team did
    /// not play here (callers surface that as an unknown-team condition).
    pub fn result_for_team(&self, team_number: u32) -> Option<MatchResult> {
        let on_red = if self.red.has_team(team_number) {
            true
        } else if self.blue.has_team(team_number) {
            false
        } else {
            return None;
        };
        if self.dq_teams.contains(&team_number) {
            return Some(MatchResult::Disqualified);
        }
        Some(match self.red.score.cmp(&self.blue.score) {
            Ordering::Equal => MatchResult::Tie,
            Ordering::Greater if on_red => MatchResult::Win,
            Ordering::Less if !on_red => MatchResult::Win,
            _ => MatchResult::Lose,
        })
    }

    pub fn final_score_for_team(&self, team_number: u32) -> Option<i64> {
        if self.red.has_team(team_number) {
            Some(self.red.final_score())
        } else if self.blue.has_team(team_number) {
            Some(self.blue.final_score())
        } else {
            None
        }
    }

    /// `(winner, loser)` alliance numbers, red keeping ties. Only callable
    /// for playoff matches with alliance linkage on both sides.
    pub fn winner_and_loser(&self) -> Option<(u32, u32)> {
        let red = self.red.alliance_number?;
        let blue = self.blue.alliance_number?;
        if self.red.score >= self.blue.score {
            Some((red, blue))
        } else {
            Some((blue, red))
        }
    }
}
