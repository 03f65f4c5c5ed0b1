use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::event::Event;
use crate::records::SeasonSource;
use crate::scoring::{RegionalPoints, regional_points};

/// The season calendar is a fixed six-week horizon.
pub const FIRST_WEEK: u8 = 1;
pub const FINAL_WEEK: u8 = 6;

/// A team across the whole season: one entry no matter how many events it
/// attends. This is the unit the pool qualifies.
#[derive(Debug, Clone)]
pub struct SeasonTeam {
    pub team_number: u32,
    pub district_code: Option<String>,
    /// `(week, index into Season::events)` in registration order.
    pub appearances: Vec<(u8, usize)>,
}

impl SeasonTeam {
    pub fn appearances_through(&self, week: u8) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.appearances.iter().copied().filter(move |&(w, _)| w <= week)
    }

    pub fn appearances_at(&self, week: u8) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.appearances.iter().copied().filter(move |&(w, _)| w == week)
    }
}

/// One competition season: every regional event of weeks 1-6 plus the
/// season-team registry built from them.
#[derive(Debug)]
pub struct Season {
    /// The year the events were actually played.
    pub season: u32,
    /// The rule season the pool is simulated under.
    pub use_season: u32,
    /// 2026 rules only: keep granting per-event slots past already
    /// qualified teams.
    pub allow_backfill: bool,
    events: Vec<Event>,
    events_by_week: BTreeMap<u8, Vec<usize>>,
    season_teams: HashMap<u32, SeasonTeam>,
    adjustments: HashMap<u32, i64>,
}

impl Season {
    pub fn load<S>(season: u32, use_season: u32, source: &S) -> Result<Season>
    where
        S: SeasonSource + Sync,
    {
        let mut listings = source
            .event_listings(season)
            .with_context(|| format!("listing events for season {season}"))?;
        listings.sort_by_key(|listing| listing.week_number);

        // Events are independent, so build them in parallel and register
        // sequentially in calendar order.
        let built: Vec<(u8, Event)> = listings
            .par_iter()
            .map(|listing| {
                Event::load(season, &listing.code, source)
                    .map(|event| (listing.week_number, event))
                    .with_context(|| format!("building event {season} {}", listing.code))
            })
            .collect::<Result<_>>()?;

        let mut out = Season {
            season,
            use_season,
            allow_backfill: true,
            events: Vec::new(),
            events_by_week: BTreeMap::new(),
            season_teams: HashMap::new(),
            adjustments: source.regional_adjustments(use_season)?,
        };
        for (week, event) in built {
            out.register_event(week, event);
        }
        Ok(out)
    }

    fn register_event(&mut self, week: u8, event: Event) {
        let event_index = self.events.len();
        for team in event.teams() {
            let season_team = self
                .season_teams
                .entry(team.team_number)
                .or_insert_with(|| SeasonTeam {
                    team_number: team.team_number,
                    district_code: None,
                    appearances: Vec::new(),
                });
            season_team.district_code = team.district_code.clone();
            season_team.appearances.push((week, event_index));
        }
        self.events_by_week.entry(week).or_default().push(event_index);
        self.events.push(event);
    }

    pub fn event(&self, index: usize) -> &Event {
        &self.events[index]
    }

    pub fn events_in_week(&self, week: u8) -> &[usize] {
        self.events_by_week
            .get(&week)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn season_team(&self, team_number: u32) -> Option<&SeasonTeam> {
        self.season_teams.get(&team_number)
    }

    pub fn season_teams(&self) -> impl Iterator<Item = &SeasonTeam> {
        self.season_teams.values()
    }

    /// Season-to-date points through `through_week`.
    ///
    /// Totals sum over the first two counted events only; the component
    /// columns keep the running maximum; best-3 is a rolling merge. A team
    /// with a single counted event gets a projected-second-event bonus so
    /// it stays comparable to two-event teams, and any published manual
    /// adjustment lands once the final week is in view.
    pub fn season_points(&self, team: &SeasonTeam, through_week: u8) -> Result<RegionalPoints> {
        let mut aggregate = RegionalPoints::default();
        let mut counted = 0usize;
        for (_, event_index) in team.appearances_through(through_week) {
            let event = &self.events[event_index];
            let event_team = event.team(team.team_number).with_context(|| {
                format!("season points for team {}", team.team_number)
            })?;
            let points = regional_points(event, event_team)?;
            if counted <= 1 {
                aggregate.total += points.total;
            }
            aggregate.playoff = aggregate.playoff.max(points.playoff);
            aggregate.alliance = aggregate.alliance.max(points.alliance);
            aggregate.quals = aggregate.quals.max(points.quals);
            let merged = merge_best_three(aggregate.best_three(), points.best_three());
            [aggregate.best1, aggregate.best2, aggregate.best3] = merged;
            counted += 1;
        }
        if counted == 1 {
            aggregate.total += (aggregate.total as f64 * 0.6 + 14.0).round() as i64;
        }
        if through_week == FINAL_WEEK
            && let Some(adjustment) = self.adjustments.get(&team.team_number)
        {
            aggregate.total += adjustment;
        }
        Ok(aggregate)
    }
}

/// Merge two best-3 lists, keeping the new top 3. Merging a list with
/// itself is a no-op.
pub fn merge_best_three(current: [i64; 3], incoming: [i64; 3]) -> [i64; 3] {
    let mut all = [
        current[0], current[1], current[2], incoming[0], incoming[1], incoming[2],
    ];
    all.sort_unstable_by(|a, b| b.cmp(a));
    [all[0], all[1], all[2]]
}
