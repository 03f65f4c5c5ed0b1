use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::constants::{SeasonConstants, constants_for};
use crate::scoring::RegionalPoints;
use crate::season::{FINAL_WEEK, FIRST_WEEK, Season, SeasonTeam};

/// The pool allocates from week 2 (weeks 1 and 2 merge) through week 6.
pub const FIRST_POOL_WEEK: u8 = 2;

/// How a rule season hands out slots ahead of the ranked fixed-slot walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdvancementRules {
    /// 2025: culture awards and winning-alliance captain/first pick.
    AwardBased,
    /// 2026: each event's own top-K, optionally backfilling past teams
    /// that already hold a slot.
    EventTopK { backfill: bool },
}

/// Qualification truth for one team, snapshotted at the end of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualificationStatus {
    pub is_qualified: bool,
    pub qualified_for: Option<String>,
    pub qualified_event: Option<String>,
    pub declined: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolEntry {
    pub rank: u32,
    pub team_number: u32,
    pub points: RegionalPoints,
    pub status: QualificationStatus,
}

/// The ranked pool as it stood after one week's allocation.
#[derive(Debug, Clone, Serialize)]
pub struct WeekPool {
    pub week: u8,
    pub entries: Vec<PoolEntry>,
}

#[derive(Debug, Clone)]
struct QualState {
    reason: String,
    event_code: Option<String>,
}

/// Simulate the pool week by week through `through_week`, returning one
/// immutable snapshot per week.
///
/// Qualification state lives in a map local to this run, seeded from the
/// pre-qualified list and only ever added to — a team that qualifies in
/// week N stays qualified in every later snapshot, and re-running the fold
/// always reproduces the same history.
pub fn regional_pool(season: &Season, through_week: u8) -> Result<Vec<WeekPool>> {
    regional_pool_with(season, through_week, constants_for(season.use_season))
}

/// Same fold with explicit policy numbers; `regional_pool` supplies the
/// rule season's table.
pub fn regional_pool_with(
    season: &Season,
    through_week: u8,
    constants: &SeasonConstants,
) -> Result<Vec<WeekPool>> {
    if !(FIRST_POOL_WEEK..=FINAL_WEEK).contains(&through_week) {
        bail!("week {through_week} is outside the pool horizon ({FIRST_POOL_WEEK}-{FINAL_WEEK})");
    }
    // The regional pool only exists from the 2025 rule season onward.
    if season.use_season < 2025 {
        return Ok(Vec::new());
    }
    let rules = match season.use_season {
        2025 => Some(AdvancementRules::AwardBased),
        2026 => Some(AdvancementRules::EventTopK {
            backfill: season.allow_backfill,
        }),
        _ => None,
    };

    let mut state: HashMap<u32, QualState> = HashMap::new();
    for &team_number in constants.pre_qualified {
        state.insert(
            team_number,
            QualState {
                reason: "Pre-qualified".to_string(),
                event_code: None,
            },
        );
    }

    let mut snapshots = Vec::new();
    for week in FIRST_POOL_WEEK..=through_week {
        snapshots.push(run_week(season, week, constants, rules, &mut state)?);
    }
    Ok(snapshots)
}

fn run_week(
    season: &Season,
    week: u8,
    constants: &SeasonConstants,
    rules: Option<AdvancementRules>,
    state: &mut HashMap<u32, QualState>,
) -> Result<WeekPool> {
    // Candidates: regional-only teams that have actually competed, keyed
    // by the 7-tuple plus team number. Sorting the key descending means a
    // complete tie ranks the larger team number first — preserved source
    // behavior, pending product clarification.
    let mut keyed: Vec<(RegionalPoints, u32)> = Vec::new();
    for team in season.season_teams() {
        if team.district_code.is_some() {
            continue;
        }
        let points = season
            .season_points(team, week)
            .with_context(|| format!("pool week {week}"))?;
        if points.is_zero() {
            continue;
        }
        keyed.push((points, team.team_number));
    }
    keyed.sort_unstable_by(|a, b| b.cmp(a));

    let mut slots_used = 0usize;
    match rules {
        Some(AdvancementRules::AwardBased) => {
            award_based_phase(season, week, constants, &keyed, state, &mut slots_used)?;
        }
        Some(AdvancementRules::EventTopK { backfill }) => {
            event_top_k_phase(season, week, constants, backfill, state, &mut slots_used)?;
        }
        None => {}
    }

    let quota = constants.weekly_slots()[usize::from(week - FIRST_POOL_WEEK)].max(0) as usize;
    for &(_, team_number) in &keyed {
        if slots_used >= quota {
            break;
        }
        if state.contains_key(&team_number) || constants.is_declined(team_number) {
            continue;
        }
        state.insert(
            team_number,
            QualState {
                reason: format!("Week {week}"),
                event_code: None,
            },
        );
        slots_used += 1;
    }

    let entries = keyed
        .iter()
        .enumerate()
        .map(|(index, &(points, team_number))| PoolEntry {
            rank: index as u32 + 1,
            team_number,
            points,
            status: QualificationStatus {
                is_qualified: state.contains_key(&team_number),
                qualified_for: state.get(&team_number).map(|s| s.reason.clone()),
                qualified_event: state
                    .get(&team_number)
                    .and_then(|s| s.event_code.clone()),
                declined: constants.is_declined(team_number),
            },
        })
        .collect();
    Ok(WeekPool { week, entries })
}

/// 2025 auto-advancement: walk the ranked pool and qualify any team that
/// earned a top-tier award or won its regional as captain/first pick in
/// the weeks under consideration.
fn award_based_phase(
    season: &Season,
    week: u8,
    constants: &SeasonConstants,
    keyed: &[(RegionalPoints, u32)],
    state: &mut HashMap<u32, QualState>,
    slots_used: &mut usize,
) -> Result<()> {
    for &(_, team_number) in keyed {
        if state.contains_key(&team_number) || constants.is_declined(team_number) {
            continue;
        }
        let Some(team) = season.season_team(team_number) else {
            continue;
        };
        if let Some((reason, event_code)) = auto_advancement(season, team, week)? {
            state.insert(
                team_number,
                QualState {
                    reason,
                    event_code: Some(event_code),
                },
            );
            *slots_used += 1;
        }
    }
    Ok(())
}

/// The per-team auto-advancement test: week 2 looks at weeks 1-2 merged,
/// later weeks only at the week itself.
fn auto_advancement(
    season: &Season,
    team: &SeasonTeam,
    week: u8,
) -> Result<Option<(String, String)>> {
    let appearances: Vec<(u8, usize)> = if week == FIRST_POOL_WEEK {
        team.appearances_through(FIRST_POOL_WEEK).collect()
    } else {
        team.appearances_at(week).collect()
    };
    for (_, event_index) in appearances {
        let event = season.event(event_index);
        let event_team = event.team(team.team_number)?;
        let has = |name: &str| event_team.awards.iter().any(|award| award == name);
        let reason = if has("Regional FIRST Impact Award") || has("Regional Chairman's Award") {
            Some("FIA")
        } else if has("Regional Engineering Inspiration Award") {
            Some("EI")
        } else if has("Regional Winners")
            && event_team.alliance_role().is_some_and(|role| role <= 2)
        {
            Some("Winner")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Ok(Some((reason.to_string(), event.event_code.clone())));
        }
    }
    Ok(None)
}

/// 2026 auto-advancement: every event of the week grants its own top-K
/// slots from the event's points ranking. With backfill, a slot consumed
/// by an already-qualified team moves down the ranking; a declined team
/// consumes its slot without qualifying either way.
fn event_top_k_phase(
    season: &Season,
    week: u8,
    constants: &SeasonConstants,
    backfill: bool,
    state: &mut HashMap<u32, QualState>,
    slots_used: &mut usize,
) -> Result<()> {
    let event_indexes: Vec<usize> = if week == FIRST_POOL_WEEK {
        (FIRST_WEEK..=FIRST_POOL_WEEK)
            .flat_map(|w| season.events_in_week(w).iter().copied())
            .collect()
    } else {
        season.events_in_week(week).to_vec()
    };

    for event_index in event_indexes {
        let event = season.event(event_index);
        let rankings = event
            .regional_points_rankings()
            .with_context(|| format!("event rankings for {}", event.event_code))?;
        if backfill {
            let mut granted = 0usize;
            for &(team_number, _) in &rankings {
                if granted >= constants.event_auto_slots {
                    break;
                }
                if state.contains_key(&team_number) {
                    continue;
                }
                if !constants.is_declined(team_number) {
                    state.insert(
                        team_number,
                        QualState {
                            reason: format!("Slot {}", granted + 1),
                            event_code: Some(event.event_code.clone()),
                        },
                    );
                    *slots_used += 1;
                }
                granted += 1;
            }
        } else {
            for (index, &(team_number, _)) in
                rankings.iter().take(constants.event_auto_slots).enumerate()
            {
                if !state.contains_key(&team_number) && !constants.is_declined(team_number) {
                    state.insert(
                        team_number,
                        QualState {
                            reason: format!("Rank {}", index + 1),
                            event_code: Some(event.event_code.clone()),
                        },
                    );
                    *slots_used += 1;
                }
            }
        }
    }
    Ok(())
}
