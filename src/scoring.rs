use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::erfinv::erfinv;
use crate::event::{BracketRound2022, Event};
use crate::team::{Alliance, MatchResult, Team};

/// Field-shape parameter of the qualification performance curve.
const ALPHA: f64 = 1.07;

/// Regional points a team earns at a single event. Field order is the
/// tie-break order, so the derived `Ord` is exactly the sort key used by
/// the per-event rankings and the season pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RegionalPoints {
    pub total: i64,
    pub playoff: i64,
    pub alliance: i64,
    pub quals: i64,
    pub best1: i64,
    pub best2: i64,
    pub best3: i64,
}

impl RegionalPoints {
    /// An all-zero tuple marks a team that has not competed yet.
    pub fn is_zero(&self) -> bool {
        *self == RegionalPoints::default()
    }

    pub fn best_three(&self) -> [i64; 3] {
        [self.best1, self.best2, self.best3]
    }
}

/// The full per-event scoring pipeline.
pub fn regional_points(event: &Event, team: &Team) -> Result<RegionalPoints> {
    let age = team_age_points(event, team);
    let quals = qualification_points(event, team)
        .with_context(|| format!("qualification points for team {}", team.team_number))?;
    let alliance = alliance_selection_points(team);
    let playoff = playoff_advancement_points(event, team)
        .with_context(|| format!("playoff points for team {}", team.team_number))?;
    let awards = award_points(team);
    let [best1, best2, best3] = best_three_match_scores(event, team);
    Ok(RegionalPoints {
        total: age + quals + alliance + playoff + awards,
        playoff,
        alliance,
        quals,
        best1,
        best2,
        best3,
    })
}

/// 10 for rookies, 5 one season later, nothing after that.
pub fn team_age_points(event: &Event, team: &Team) -> i64 {
    if event.season == team.rookie_year {
        10
    } else if event.season == team.rookie_year + 1 {
        5
    } else {
        0
    }
}

/// Maps rank-within-field onto a roughly normal-CDF-shaped score. Rank 1
/// always lands on 22; the tail flattens toward the bottom of the field.
pub fn qualification_points(event: &Event, team: &Team) -> Result<i64> {
    if team.ranking == 0 {
        return Ok(0);
    }
    let n = event.team_count() as f64;
    let r = f64::from(team.ranking);
    let spread = erfinv((n - 2.0 * r + 2.0) / (ALPHA * n))?;
    let scale = 10.0 / erfinv(1.0 / ALPHA)?;
    Ok((spread * scale + 12.0).ceil() as i64)
}

pub fn alliance_selection_points(team: &Team) -> i64 {
    17 - team.succession_of_points()
}

/// Awards score a flat table; Winners/Finalists banners are recognition
/// only and anything unlisted is worth 5.
pub fn award_points(team: &Team) -> i64 {
    team.awards
        .iter()
        .map(|name| match name.as_str() {
            "Regional Winners" | "Regional Finalists" => 0,
            "Regional Chairman's Award" | "Regional FIRST Impact Award" => 45,
            "Regional Engineering Inspiration Award" => 28,
            "Rookie All Star Award" => 8,
            _ => 5,
        })
        .sum()
}

/// Playoff advancement: a tier bonus for bracket depth, scaled by the
/// team's share of its alliance's non-final playoff wins, plus 5 per won
/// final on the championship alliance.
pub fn playoff_advancement_points(event: &Event, team: &Team) -> Result<i64> {
    let Some(alliance_number) = team.alliance_number() else {
        return Ok(0);
    };
    let alliance = event.alliance(alliance_number)?;
    let beta = advancement_tier(event, alliance);
    if beta == 0 {
        return Ok(0);
    }

    let team_wins = team_win_matches(event, team, false).len();
    let alliance_wins = alliance_win_matches(event, alliance, false).len();
    if alliance_wins == 0 {
        // The source rules divide by this count unconditionally; kept as a
        // fail-fast error pending clarification.
        bail!(
            "alliance {} reached tier {beta} with no counted playoff wins",
            alliance.number
        );
    }
    let de_points = team_wins as f64 / alliance_wins as f64 * beta as f64;

    let final_points = if event.winner_and_finalist()?.0 == alliance.number {
        5 * team_win_finals(event, team).len() as i64
    } else {
        0
    };
    Ok((de_points + final_points as f64).ceil() as i64)
}

/// Bracket-depth tier: 20 for a finals appearance, then the deepest
/// semifinal-equivalent the alliance reached in its bracket era.
fn advancement_tier(event: &Event, alliance: &Alliance) -> i64 {
    let played = |match_number: Option<u32>| {
        match_number.is_some_and(|number| alliance.playoff_matches.contains(&number))
    };
    if played(event.final_match(1).map(|m| m.match_number)) {
        return 20;
    }
    if event.season <= 2022 {
        for round_number in [1, 2] {
            let semi = event
                .playoff_in_round_2022(BracketRound2022::Semi, round_number, 1)
                .map(|m| m.match_number);
            if played(semi) {
                return 10;
            }
        }
        0
    } else if played(event.playoff_match(13).map(|m| m.match_number)) {
        13
    } else if played(event.playoff_match(12).map(|m| m.match_number)) {
        7
    } else {
        0
    }
}

/// Best three final scores across every non-disqualified match the team
/// played, padded with zeros below three matches.
pub fn best_three_match_scores(event: &Event, team: &Team) -> [i64; 3] {
    let mut scores = vec![0i64; 3];
    let matches = team
        .quals_matches
        .iter()
        .filter_map(|number| event.quals_match(*number))
        .chain(
            team.playoff_matches
                .iter()
                .filter_map(|number| event.playoff_match(*number)),
        );
    for m in matches {
        if m.result_for_team(team.team_number) == Some(MatchResult::Disqualified) {
            continue;
        }
        if let Some(score) = m.final_score_for_team(team.team_number) {
            scores.push(score);
        }
    }
    scores.sort_unstable_by(|a, b| b.cmp(a));
    [scores[0], scores[1], scores[2]]
}

fn final_match_numbers(event: &Event) -> Vec<u32> {
    event
        .finals()
        .iter()
        .flatten()
        .map(|m| m.match_number)
        .collect()
}

/// Playoff matches the team was fielded in and won, optionally leaving
/// the finals out of the count.
pub fn team_win_matches(event: &Event, team: &Team, include_finals: bool) -> Vec<u32> {
    let finals = final_match_numbers(event);
    team.playoff_matches
        .iter()
        .copied()
        .filter(|number| include_finals || !finals.contains(number))
        .filter(|number| {
            event
                .playoff_match(*number)
                .and_then(|m| m.result_for_team(team.team_number))
                == Some(MatchResult::Win)
        })
        .collect()
}

/// Finals the team was fielded in and won.
pub fn team_win_finals(event: &Event, team: &Team) -> Vec<u32> {
    let finals = final_match_numbers(event);
    team.playoff_matches
        .iter()
        .copied()
        .filter(|number| finals.contains(number))
        .filter(|number| {
            event
                .playoff_match(*number)
                .and_then(|m| m.result_for_team(team.team_number))
                == Some(MatchResult::Win)
        })
        .collect()
}

/// Playoff matches the alliance won, optionally leaving the finals out.
/// A disqualified captain forfeits the alliance's result.
pub fn alliance_win_matches(event: &Event, alliance: &Alliance, include_finals: bool) -> Vec<u32> {
    let finals = final_match_numbers(event);
    let mut wins = Vec::new();
    for &number in &alliance.playoff_matches {
        if !include_finals && finals.contains(&number) {
            continue;
        }
        let Some(m) = event.playoff_match(number) else {
            continue;
        };
        let on_red = if m.red.alliance_number == Some(alliance.number) {
            true
        } else if m.blue.alliance_number == Some(alliance.number) {
            false
        } else {
            continue;
        };
        if alliance
            .captain()
            .is_some_and(|captain| m.dq_teams.contains(&captain))
        {
            continue;
        }
        let won = match m.red.score.cmp(&m.blue.score) {
            std::cmp::Ordering::Equal => false,
            std::cmp::Ordering::Greater => on_red,
            std::cmp::Ordering::Less => !on_red,
        };
        if won {
            wins.push(number);
        }
    }
    wins
}
