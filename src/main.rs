use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use frc_pool::event::Event;
use frc_pool::frc_events::FrcEventsClient;
use frc_pool::pool::regional_pool;
use frc_pool::pool_export::export_pool;
use frc_pool::scoring::{
    alliance_selection_points, award_points, best_three_match_scores, playoff_advancement_points,
    qualification_points, regional_points, team_age_points,
};
use frc_pool::season::Season;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };
    match command.as_str() {
        "event" => cmd_event(&args[1..]),
        "points" => cmd_points(&args[1..]),
        "pool" => cmd_pool(&args[1..]),
        "export" => cmd_export(&args[1..]),
        other => {
            print_usage();
            bail!("unknown command `{other}`");
        }
    }
}

fn print_usage() {
    println!("usage:");
    println!("  frc_pool event <season> <event-code>");
    println!("  frc_pool points <season> <event-code> <team> [--verbose] [--json]");
    println!("  frc_pool pool <season> <week> [--use-season <year>] [--no-backfill] [--json]");
    println!("  frc_pool export <season> <week> <out.xlsx> [--use-season <year>] [--no-backfill]");
}

fn cmd_event(args: &[String]) -> Result<()> {
    let (season, event_code) = match args {
        [season, code, ..] => (parse_season(season)?, code.as_str()),
        _ => bail!("usage: frc_pool event <season> <event-code>"),
    };
    let client = FrcEventsClient::new();
    let event = Event::load(season, event_code, &client)?;

    println!("Event {season} {event_code} ({} teams)", event.team_count());
    println!("{:>6}  {:>4}  {:>8}  {}", "Team", "Rank", "Alliance", "Name");
    let mut teams: Vec<_> = event.teams().collect();
    teams.sort_by_key(|team| (team.ranking == 0, team.ranking, team.team_number));
    for team in teams {
        let alliance = team
            .alliance_number()
            .map(|number| number.to_string())
            .unwrap_or_else(|| "-".to_string());
        let rank = if team.ranking == 0 {
            "-".to_string()
        } else {
            team.ranking.to_string()
        };
        println!(
            "{:>6}  {:>4}  {:>8}  {}",
            team.team_number, rank, alliance, team.name
        );
    }
    Ok(())
}

fn cmd_points(args: &[String]) -> Result<()> {
    let (season, event_code, team_number) = match args {
        [season, code, team, ..] => (
            parse_season(season)?,
            code.as_str(),
            team.parse::<u32>().context("bad team number")?,
        ),
        _ => bail!("usage: frc_pool points <season> <event-code> <team> [--verbose] [--json]"),
    };
    let verbose = args.iter().any(|arg| arg == "--verbose");

    let client = FrcEventsClient::new();
    let event = Event::load(season, event_code, &client)?;
    let team = event.team(team_number)?;
    let points = regional_points(&event, team)?;

    if args.iter().any(|arg| arg == "--json") {
        let row = serde_json::json!({"team": team_number, "points": points});
        println!("{row}");
        return Ok(());
    }
    if verbose {
        println!("Team {team_number} at {season} {event_code}:");
        println!("  Team age points:            {}", team_age_points(&event, team));
        println!("  Qualification points:       {}", qualification_points(&event, team)?);
        println!("  Alliance selection points:  {}", alliance_selection_points(team));
        println!("  Playoff advancement points: {}", playoff_advancement_points(&event, team)?);
        println!("  Award points:               {} ({})", award_points(team), team.awards.join(", "));
        let best = best_three_match_scores(&event, team);
        println!("  Best 3 match scores:        {} {} {}", best[0], best[1], best[2]);
        println!("  Total:                      {}", points.total);
    } else {
        println!(
            "Team {team_number}: ({}, {}, {}, {}, {}, {}, {})",
            points.total,
            points.playoff,
            points.alliance,
            points.quals,
            points.best1,
            points.best2,
            points.best3
        );
    }
    Ok(())
}

fn cmd_pool(args: &[String]) -> Result<()> {
    let (season, week) = match args {
        [season, week, ..] => (parse_season(season)?, parse_week(week)?),
        _ => bail!("usage: frc_pool pool <season> <week> [--use-season <year>] [--no-backfill]"),
    };
    let season = build_season(season, &args[2..])?;
    let pools = regional_pool(&season, week)?;
    let Some(pool) = pools.last() else {
        println!("No regional pool for rule season {}.", season.use_season);
        return Ok(());
    };

    if args.iter().any(|arg| arg == "--json") {
        println!("{}", serde_json::to_string_pretty(pool)?);
        return Ok(());
    }
    println!(
        "Regional pool, week {} (rules {}): {} teams",
        pool.week,
        season.use_season,
        pool.entries.len()
    );
    println!(
        "{:>4}  {:>6}  {:>5}  {:>17}  {}",
        "Rank", "Team", "Total", "Status", "Reason"
    );
    for entry in &pool.entries {
        let status = if entry.status.declined {
            "declined"
        } else if entry.status.is_qualified {
            "qualified"
        } else {
            ""
        };
        let mut reason = entry.status.qualified_for.clone().unwrap_or_default();
        if let Some(event_code) = &entry.status.qualified_event {
            reason = format!("{reason} @ {event_code}");
        }
        println!(
            "{:>4}  {:>6}  {:>5}  {:>17}  {}",
            entry.rank, entry.team_number, entry.points.total, status, reason
        );
    }
    Ok(())
}

fn cmd_export(args: &[String]) -> Result<()> {
    let (season, week, path) = match args {
        [season, week, path, ..] => (
            parse_season(season)?,
            parse_week(week)?,
            PathBuf::from(path),
        ),
        _ => bail!(
            "usage: frc_pool export <season> <week> <out.xlsx> [--use-season <year>] [--no-backfill]"
        ),
    };
    let season = build_season(season, &args[3..])?;
    let report = export_pool(&path, &season, week)?;
    println!(
        "Wrote {} week sheets ({} rows) to {}",
        report.weeks,
        report.rows,
        path.display()
    );
    Ok(())
}

fn build_season(season: u32, flags: &[String]) -> Result<Season> {
    let mut use_season = season;
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        if flag == "--use-season" {
            let value = iter.next().context("--use-season needs a year")?;
            use_season = parse_season(value)?;
        }
    }
    eprintln!("[INFO] building season {season} (rules {use_season}), this may take a while");
    let client = FrcEventsClient::new();
    let mut loaded = Season::load(season, use_season, &client)?;
    if flags.iter().any(|flag| flag == "--no-backfill") {
        loaded.allow_backfill = false;
    }
    Ok(loaded)
}

fn parse_season(raw: &str) -> Result<u32> {
    raw.parse::<u32>()
        .with_context(|| format!("bad season `{raw}`"))
}

fn parse_week(raw: &str) -> Result<u8> {
    raw.parse::<u8>().with_context(|| format!("bad week `{raw}`"))
}
