use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};

use crate::records::{
    AllianceRecord, AwardRecord, EventSource, MatchRecord, RankingRecord, TeamRecord,
};
use crate::scoring::{RegionalPoints, regional_points};
use crate::team::{Alliance, Match, MatchSide, Team, TournamentLevel};

/// Playoff final numbering changed with the 2023 double-elimination
/// bracket: finals are matches 19-21 before that, 14-16 after.
const FINALS_OFFSET_2022: u32 = 18;
const FINALS_OFFSET_CURRENT: u32 = 13;

/// Bracket rounds of the pre-2023 best-of-three playoff format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketRound2022 {
    Quarter,
    Semi,
    Final,
}

#[derive(Debug, Clone)]
pub struct AwardRecipient {
    pub team_number: Option<u32>,
    pub person: Option<String>,
}

/// Everything that happened at one event, built once from source records
/// and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Event {
    pub season: u32,
    pub event_code: String,
    teams: HashMap<u32, Team>,
    rankings: HashMap<u32, u32>,
    alliances: HashMap<u32, Alliance>,
    quals: HashMap<u32, Match>,
    playoffs: HashMap<u32, Match>,
    awards: HashMap<String, Vec<AwardRecipient>>,
}

impl Event {
    pub fn load(season: u32, event_code: &str, source: &impl EventSource) -> Result<Event> {
        let mut event = Event {
            season,
            event_code: event_code.to_string(),
            teams: HashMap::new(),
            rankings: HashMap::new(),
            alliances: HashMap::new(),
            quals: HashMap::new(),
            playoffs: HashMap::new(),
            awards: HashMap::new(),
        };

        for record in source.event_teams(season, event_code)? {
            event.register_team(&record);
        }
        for record in source.event_rankings(season, event_code)? {
            event
                .apply_ranking(&record)
                .with_context(|| format!("malformed ranking data for {season} {event_code}"))?;
        }
        for record in source.event_alliances(season, event_code)? {
            event
                .register_alliance(&record)
                .with_context(|| format!("malformed alliance data for {season} {event_code}"))?;
        }
        for record in source.quals_matches(season, event_code)? {
            event
                .register_match(&record, TournamentLevel::Qualification)
                .with_context(|| format!("malformed match data for {season} {event_code}"))?;
        }
        for record in source.playoff_matches(season, event_code)? {
            event
                .register_match(&record, TournamentLevel::Playoff)
                .with_context(|| format!("malformed match data for {season} {event_code}"))?;
        }
        for record in source.event_awards(season, event_code)? {
            event.register_award(&record);
        }
        Ok(event)
    }

    fn register_team(&mut self, record: &TeamRecord) {
        self.teams.insert(record.team_number, Team::new(record));
    }

    fn apply_ranking(&mut self, record: &RankingRecord) -> Result<()> {
        let team = self
            .teams
            .get_mut(&record.team_number)
            .ok_or_else(|| anyhow!("ranking references unknown team {}", record.team_number))?;
        team.ranking = record.rank;
        team.sort_order = record.sort_order;
        team.wins = record.wins;
        team.losses = record.losses;
        team.ties = record.ties;
        self.rankings.insert(record.rank, record.team_number);
        Ok(())
    }

    fn register_alliance(&mut self, record: &AllianceRecord) -> Result<()> {
        let seats = vec![
            Some(record.captain),
            Some(record.round1),
            Some(record.round2),
            record.round3,
            record.backup,
        ];
        for (index, seat) in seats.iter().enumerate() {
            let Some(team_number) = seat else { continue };
            let team = self.teams.get_mut(team_number).ok_or_else(|| {
                anyhow!("alliance {} references unknown team {team_number}", record.number)
            })?;
            team.alliance_seat = Some((record.number, index as u8 + 1));
        }
        self.alliances.insert(
            record.number,
            Alliance {
                number: record.number,
                seats,
                playoff_matches: Vec::new(),
            },
        );
        Ok(())
    }

    fn register_match(&mut self, record: &MatchRecord, level: TournamentLevel) -> Result<()> {
        if record.stations.len() != 6 {
            bail!(
                "match {} has {} stations, expected 6",
                record.match_number,
                record.stations.len()
            );
        }
        if record.red_score.is_empty() || record.blue_score.is_empty() {
            bail!("match {} has an empty score breakdown", record.match_number);
        }

        let mut red_teams = Vec::with_capacity(3);
        let mut blue_teams = Vec::with_capacity(3);
        let mut dq_teams = std::collections::HashSet::new();
        for (index, station) in record.stations.iter().enumerate() {
            let team = self.teams.get_mut(&station.team_number).ok_or_else(|| {
                anyhow!(
                    "match {} references unknown team {}",
                    record.match_number,
                    station.team_number
                )
            })?;
            match level {
                TournamentLevel::Qualification => team.quals_matches.push(record.match_number),
                TournamentLevel::Playoff => team.playoff_matches.push(record.match_number),
            }
            if station.dq {
                dq_teams.insert(station.team_number);
            }
            if index < 3 {
                red_teams.push(station.team_number);
            } else {
                blue_teams.push(station.team_number);
            }
        }

        let (red_alliance, blue_alliance) = match level {
            TournamentLevel::Qualification => (None, None),
            TournamentLevel::Playoff => {
                let red = self.station_alliance(record, 0)?;
                let blue = self.station_alliance(record, 3)?;
                for number in [red, blue] {
                    let alliance = self
                        .alliances
                        .get_mut(&number)
                        .ok_or_else(|| anyhow!("playoff match {} references unknown alliance {number}", record.match_number))?;
                    alliance.playoff_matches.push(record.match_number);
                }
                (Some(red), Some(blue))
            }
        };

        let m = Match {
            level,
            match_number: record.match_number,
            red: MatchSide {
                team_numbers: red_teams,
                alliance_number: red_alliance,
                score: record.red_score.clone(),
            },
            blue: MatchSide {
                team_numbers: blue_teams,
                alliance_number: blue_alliance,
                score: record.blue_score.clone(),
            },
            dq_teams,
            is_replay: record.is_replay,
            video_link: record.match_video_link.clone(),
        };
        match level {
            TournamentLevel::Qualification => self.quals.insert(record.match_number, m),
            TournamentLevel::Playoff => self.playoffs.insert(record.match_number, m),
        };
        Ok(())
    }

    fn station_alliance(&self, record: &MatchRecord, station: usize) -> Result<u32> {
        let team_number = record.stations[station].team_number;
        self.teams
            .get(&team_number)
            .and_then(Team::alliance_number)
            .ok_or_else(|| {
                anyhow!(
                    "playoff match {} fields team {team_number} with no alliance",
                    record.match_number
                )
            })
    }

    fn register_award(&mut self, record: &AwardRecord) {
        // An award naming a team we never saw is kept for the record book
        // but attributed to nobody; person awards never count for a team.
        let team_number = record
            .team_number
            .filter(|number| self.teams.contains_key(number));
        if let Some(number) = team_number
            && record.person.is_none()
            && let Some(team) = self.teams.get_mut(&number)
        {
            team.awards.push(record.name.clone());
        }
        self.awards
            .entry(record.name.clone())
            .or_default()
            .push(AwardRecipient {
                team_number,
                person: record.person.clone(),
            });
    }

    // Lookups

    pub fn team(&self, team_number: u32) -> Result<&Team> {
        self.teams.get(&team_number).ok_or_else(|| {
            anyhow!(
                "team {team_number} is not at event {} {}",
                self.season,
                self.event_code
            )
        })
    }

    pub fn team_at_rank(&self, rank: u32) -> Result<&Team> {
        let team_number = self.rankings.get(&rank).ok_or_else(|| {
            anyhow!("no rank {rank} at event {} {}", self.season, self.event_code)
        })?;
        self.team(*team_number)
    }

    pub fn alliance(&self, number: u32) -> Result<&Alliance> {
        self.alliances.get(&number).ok_or_else(|| {
            anyhow!(
                "alliance {number} is not at event {} {}",
                self.season,
                self.event_code
            )
        })
    }

    pub fn quals_match(&self, match_number: u32) -> Option<&Match> {
        self.quals.get(&match_number)
    }

    pub fn playoff_match(&self, match_number: u32) -> Option<&Match> {
        self.playoffs.get(&match_number)
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn award_recipients(&self, name: &str) -> Option<&[AwardRecipient]> {
        self.awards.get(name).map(Vec::as_slice)
    }

    // Finals

    pub fn final_match(&self, final_number: u32) -> Option<&Match> {
        let offset = if self.season <= 2022 {
            FINALS_OFFSET_2022
        } else {
            FINALS_OFFSET_CURRENT
        };
        self.playoff_match(final_number + offset)
    }

    pub fn finals(&self) -> [Option<&Match>; 3] {
        [self.final_match(1), self.final_match(2), self.final_match(3)]
    }

    /// Winner and finalist alliance numbers. Finals 1 and 2 agreeing on a
    /// winner settles it; otherwise the tiebreaker match is authoritative.
    pub fn winner_and_finalist(&self) -> Result<(u32, u32)> {
        let final1 = self
            .final_match(1)
            .ok_or_else(|| anyhow!("event {} has no final 1", self.event_code))?;
        let final2 = self
            .final_match(2)
            .ok_or_else(|| anyhow!("event {} has no final 2", self.event_code))?;
        let (winner1, loser1) = final1
            .winner_and_loser()
            .ok_or_else(|| anyhow!("final 1 of {} has no alliance linkage", self.event_code))?;
        let (winner2, _) = final2
            .winner_and_loser()
            .ok_or_else(|| anyhow!("final 2 of {} has no alliance linkage", self.event_code))?;
        if winner1 == winner2 {
            return Ok((winner1, loser1));
        }
        let final3 = self
            .final_match(3)
            .ok_or_else(|| anyhow!("finals of {} split with no tiebreaker", self.event_code))?;
        final3
            .winner_and_loser()
            .ok_or_else(|| anyhow!("final 3 of {} has no alliance linkage", self.event_code))
    }

    /// Address a match in the pre-2023 best-of-three bracket.
    pub fn playoff_in_round_2022(
        &self,
        round: BracketRound2022,
        round_number: u32,
        match_in_series: u32,
    ) -> Option<&Match> {
        if self.season > 2022 || !(1..=3).contains(&match_in_series) {
            return None;
        }
        let match_number = match round {
            BracketRound2022::Quarter => {
                if !(1..=4).contains(&round_number) {
                    return None;
                }
                3 * (round_number - 1) + match_in_series
            }
            BracketRound2022::Semi => {
                if !(1..=2).contains(&round_number) {
                    return None;
                }
                3 * (round_number + 3) + match_in_series
            }
            BracketRound2022::Final => FINALS_OFFSET_2022 + match_in_series,
        };
        self.playoff_match(match_number)
    }

    /// Winner and loser of a pre-2023 best-of-three series; the first two
    /// matches agreeing settles it, otherwise the tiebreaker decides.
    pub fn round_winner_and_loser_2022(
        &self,
        round: BracketRound2022,
        round_number: u32,
    ) -> Result<(u32, u32)> {
        let series: Vec<Option<&Match>> = (1..=3)
            .map(|n| self.playoff_in_round_2022(round, round_number, n))
            .collect();
        let first = series[0]
            .and_then(Match::winner_and_loser)
            .ok_or_else(|| anyhow!("incomplete {round:?} {round_number} series"))?;
        let second = series[1]
            .and_then(Match::winner_and_loser)
            .ok_or_else(|| anyhow!("incomplete {round:?} {round_number} series"))?;
        if first == second {
            return Ok(first);
        }
        series[2]
            .and_then(Match::winner_and_loser)
            .ok_or_else(|| anyhow!("{round:?} {round_number} split with no tiebreaker"))
    }

    /// Every team at the event ranked by its single-event point tuple,
    /// descending. Full ties rank the larger team number first, matching
    /// the season pool's tie-break direction.
    pub fn regional_points_rankings(&self) -> Result<Vec<(u32, RegionalPoints)>> {
        let mut rows: Vec<(RegionalPoints, u32)> = Vec::with_capacity(self.teams.len());
        for team in self.teams.values() {
            let points = regional_points(self, team)
                .with_context(|| format!("scoring team {} at {}", team.team_number, self.event_code))?;
            rows.push((points, team.team_number));
        }
        rows.sort_unstable_by(|a, b| b.cmp(a));
        Ok(rows.into_iter().map(|(points, number)| (number, points)).collect())
    }
}
