use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

use crate::http_client::{api_credentials, http_client};
use crate::records::{
    AllianceRecord, AwardRecord, EventListing, EventSource, MatchRecord, RankingRecord,
    SeasonSource, StationRecord, TeamRecord,
};

const API_BASE: &str = "https://frc-api.firstinspires.org/v3.0";
const DATA_DIR: &str = "data";

const BASE_SCORE_KEYS: [&str; 6] = [
    "scoreRedFinal",
    "scoreRedFoul",
    "scoreRedAuto",
    "scoreBlueFinal",
    "scoreBlueFoul",
    "scoreBlueAuto",
];

/// FRC Events API client with a local JSON cache. Each event caches into
/// one file with a section per endpoint, so a season re-run touches the
/// network only for sections it has never seen.
pub struct FrcEventsClient {
    data_dir: PathBuf,
}

impl Default for FrcEventsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FrcEventsClient {
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR),
        }
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn event_file(&self, season: u32, event_code: &str) -> PathBuf {
        self.data_dir.join(format!("{season}-{event_code}.json"))
    }

    fn listings_file(&self, season: u32) -> PathBuf {
        self.data_dir.join(format!("{season}EventListings.json"))
    }

    fn adjustments_file(&self, season: u32) -> PathBuf {
        self.data_dir.join(format!("{season}RegionalAdjustments.json"))
    }

    /// Returns one cached section of an event file, fetching and caching
    /// it on a miss.
    fn event_section(
        &self,
        season: u32,
        event_code: &str,
        section: &str,
        url: &str,
        response_key: &str,
    ) -> Result<Value> {
        let path = self.event_file(season, event_code);
        let mut data = load_json(&path).unwrap_or_else(|| Value::Object(Map::new()));
        if let Some(cached) = data.get(section)
            && !cached.is_null()
        {
            return Ok(cached.clone());
        }

        let body = fetch_api(url)
            .with_context(|| format!("fetching {section} for {season} {event_code}"))?;
        let parsed: Value = serde_json::from_str(&body)
            .with_context(|| format!("invalid {section} json for {season} {event_code}"))?;
        let payload = parsed
            .get(response_key)
            .cloned()
            .ok_or_else(|| anyhow!("{section} response is missing `{response_key}`"))?;

        data.as_object_mut()
            .ok_or_else(|| anyhow!("event cache for {season} {event_code} is not an object"))?
            .insert(section.to_string(), payload.clone());
        save_json(&path, &data)?;
        Ok(payload)
    }
}

impl EventSource for FrcEventsClient {
    fn event_teams(&self, season: u32, event_code: &str) -> Result<Vec<TeamRecord>> {
        let url = format!("{API_BASE}/{season}/teams?eventCode={event_code}");
        let value = self.event_section(season, event_code, "Teams", &url, "teams")?;
        parse_rows(&value, parse_team_record)
            .with_context(|| format!("malformed team data for {season} {event_code}"))
    }

    fn event_rankings(&self, season: u32, event_code: &str) -> Result<Vec<RankingRecord>> {
        let url = format!("{API_BASE}/{season}/rankings/{event_code}");
        let value = self.event_section(season, event_code, "Rankings", &url, "Rankings")?;
        parse_rows(&value, parse_ranking_record)
            .with_context(|| format!("malformed ranking data for {season} {event_code}"))
    }

    fn event_alliances(&self, season: u32, event_code: &str) -> Result<Vec<AllianceRecord>> {
        let url = format!("{API_BASE}/{season}/alliances/{event_code}");
        let value = self.event_section(season, event_code, "Alliances", &url, "Alliances")?;
        parse_rows(&value, parse_alliance_record)
            .with_context(|| format!("malformed alliance data for {season} {event_code}"))
    }

    fn quals_matches(&self, season: u32, event_code: &str) -> Result<Vec<MatchRecord>> {
        let url =
            format!("{API_BASE}/{season}/matches/{event_code}?tournamentLevel=Qualification");
        let value = self.event_section(season, event_code, "Qualifications", &url, "Matches")?;
        parse_rows(&value, parse_match_record)
            .with_context(|| format!("malformed qualification data for {season} {event_code}"))
    }

    fn playoff_matches(&self, season: u32, event_code: &str) -> Result<Vec<MatchRecord>> {
        let url = format!("{API_BASE}/{season}/matches/{event_code}?tournamentLevel=Playoff");
        let value = self.event_section(season, event_code, "Playoffs", &url, "Matches")?;
        parse_rows(&value, parse_match_record)
            .with_context(|| format!("malformed playoff data for {season} {event_code}"))
    }

    fn event_awards(&self, season: u32, event_code: &str) -> Result<Vec<AwardRecord>> {
        let url = format!("{API_BASE}/{season}/awards/event/{event_code}");
        let value = self.event_section(season, event_code, "Awards", &url, "Awards")?;
        parse_rows(&value, parse_award_record)
            .with_context(|| format!("malformed award data for {season} {event_code}"))
    }
}

impl SeasonSource for FrcEventsClient {
    fn event_listings(&self, season: u32) -> Result<Vec<EventListing>> {
        let path = self.listings_file(season);
        let mut data = load_json(&path).unwrap_or_else(|| Value::Object(Map::new()));
        let mut dirty = false;
        let mut out = Vec::new();

        for week in 1..=6u8 {
            let key = format!("Week {week}");
            if data.get(&key).is_none() {
                let url = format!(
                    "{API_BASE}/{season}/events?excludeDistrict=true&weekNumber={week}"
                );
                let body = fetch_api(&url)
                    .with_context(|| format!("fetching week {week} listings for {season}"))?;
                let parsed: Value = serde_json::from_str(&body)
                    .with_context(|| format!("invalid week {week} listings json"))?;
                data.as_object_mut()
                    .ok_or_else(|| anyhow!("listings cache for {season} is not an object"))?
                    .insert(key.clone(), parsed);
                dirty = true;
            }
            let events = data
                .get(&key)
                .and_then(|week_data| week_data.get("Events"))
                .and_then(Value::as_array)
                .ok_or_else(|| anyhow!("malformed week {week} listings for {season}"))?;
            for event in events {
                let code = event
                    .get("code")
                    .and_then(Value::as_str)
                    .ok_or_else(|| anyhow!("week {week} listing is missing an event code"))?;
                out.push(EventListing {
                    code: code.to_string(),
                    week_number: week,
                });
            }
        }
        if dirty {
            save_json(&path, &data)?;
        }
        Ok(out)
    }

    /// Manual point adjustments are published locally, never fetched; a
    /// missing file simply means no adjustments this season.
    fn regional_adjustments(&self, season: u32) -> Result<HashMap<u32, i64>> {
        let Some(data) = load_json(&self.adjustments_file(season)) else {
            return Ok(HashMap::new());
        };
        let Some(rows) = data.get("Teams").and_then(Value::as_object) else {
            return Ok(HashMap::new());
        };
        let mut out = HashMap::new();
        for (team, value) in rows {
            let team_number: u32 = team
                .parse()
                .with_context(|| format!("bad team number `{team}` in adjustments"))?;
            let points = value
                .as_i64()
                .ok_or_else(|| anyhow!("bad adjustment for team {team}"))?;
            out.insert(team_number, points);
        }
        Ok(out)
    }
}

fn fetch_api(url: &str) -> Result<String> {
    let client = http_client()?;
    let (username, token) = api_credentials()?;
    let resp = client
        .get(url)
        .basic_auth(username, Some(token))
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status}: {body}"));
    }
    Ok(body)
}

fn load_json(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

fn save_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value).context("serialize cache file")?;
    fs::write(&tmp, json).context("write cache file")?;
    fs::rename(&tmp, path).context("swap cache file")?;
    Ok(())
}

// Record parsing. A missing or ill-typed required field fails the event's
// ingestion instead of leaking nulls into the scoring arithmetic.

fn parse_rows<T>(value: &Value, parse: fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    let rows = value.as_array().context("expected an array of records")?;
    rows.iter().map(parse).collect()
}

fn parse_team_record(v: &Value) -> Result<TeamRecord> {
    Ok(TeamRecord {
        team_number: field_u32(v, "teamNumber")?,
        name_short: v
            .get("nameShort")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        rookie_year: field_u32(v, "rookieYear")?,
        district_code: opt_str(v, "districtCode"),
    })
}

fn parse_ranking_record(v: &Value) -> Result<RankingRecord> {
    let mut sort_order = [0.0f64; 6];
    for (index, slot) in sort_order.iter_mut().enumerate() {
        *slot = v
            .get(format!("sortOrder{}", index + 1))
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("missing or invalid field sortOrder{}", index + 1))?;
    }
    Ok(RankingRecord {
        team_number: field_u32(v, "teamNumber")?,
        rank: field_u32(v, "rank")?,
        sort_order,
        wins: field_u32(v, "wins")?,
        losses: field_u32(v, "losses")?,
        ties: field_u32(v, "ties")?,
    })
}

fn parse_alliance_record(v: &Value) -> Result<AllianceRecord> {
    Ok(AllianceRecord {
        number: field_u32(v, "number")?,
        captain: field_u32(v, "captain")?,
        round1: field_u32(v, "round1")?,
        round2: field_u32(v, "round2")?,
        round3: opt_u32(v, "round3"),
        backup: opt_u32(v, "backup"),
    })
}

fn parse_match_record(v: &Value) -> Result<MatchRecord> {
    let match_number = field_u32(v, "matchNumber")?;
    let mut red_score = vec![
        field_i64(v, "scoreRedFinal")?,
        field_i64(v, "scoreRedFoul")?,
        field_i64(v, "scoreRedAuto")?,
    ];
    let mut blue_score = vec![
        field_i64(v, "scoreBlueFinal")?,
        field_i64(v, "scoreBlueFoul")?,
        field_i64(v, "scoreBlueAuto")?,
    ];
    // Any further scoreRed*/scoreBlue* components ride along in key order
    // and extend the lexicographic comparison.
    if let Some(object) = v.as_object() {
        for (key, value) in object {
            if BASE_SCORE_KEYS.contains(&key.as_str()) {
                continue;
            }
            let side = if key.starts_with("scoreRed") {
                &mut red_score
            } else if key.starts_with("scoreBlue") {
                &mut blue_score
            } else {
                continue;
            };
            side.push(
                value
                    .as_i64()
                    .ok_or_else(|| anyhow!("missing or invalid field {key}"))?,
            );
        }
    }

    let stations = v
        .get("teams")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("match {match_number} is missing its stations"))?
        .iter()
        .map(|station| {
            Ok(StationRecord {
                team_number: field_u32(station, "teamNumber")?,
                dq: station.get("dq").and_then(Value::as_bool).unwrap_or(false),
            })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("match {match_number} stations"))?;

    Ok(MatchRecord {
        match_number,
        red_score,
        blue_score,
        stations,
        is_replay: v.get("isReplay").and_then(Value::as_bool).unwrap_or(false),
        match_video_link: opt_str(v, "matchVideoLink"),
    })
}

fn parse_award_record(v: &Value) -> Result<AwardRecord> {
    Ok(AwardRecord {
        name: v
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("award is missing its name"))?
            .to_string(),
        team_number: opt_u32(v, "teamNumber"),
        person: opt_str(v, "person"),
    })
}

fn field_u32(v: &Value, key: &str) -> Result<u32> {
    v.get(key)
        .and_then(Value::as_u64)
        .and_then(|raw| u32::try_from(raw).ok())
        .ok_or_else(|| anyhow!("missing or invalid field {key}"))
}

fn field_i64(v: &Value, key: &str) -> Result<i64> {
    v.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| anyhow!("missing or invalid field {key}"))
}

fn opt_u32(v: &Value, key: &str) -> Option<u32> {
    v.get(key)
        .and_then(Value::as_u64)
        .and_then(|raw| u32::try_from(raw).ok())
}

fn opt_str(v: &Value, key: &str) -> Option<String> {
    v.get(key)
        .and_then(Value::as_str)
        .map(|raw| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn match_record_parses_extras_and_stations() {
        let raw = json!({
            "matchNumber": 7,
            "scoreRedFinal": 52, "scoreRedFoul": 5, "scoreRedAuto": 12,
            "scoreBlueFinal": 52, "scoreBlueFoul": 0, "scoreBlueAuto": 20,
            "scoreRedBargePoints": 8,
            "scoreBlueBargePoints": 4,
            "isReplay": false,
            "matchVideoLink": null,
            "teams": [
                {"teamNumber": 1, "station": "Red1", "dq": false},
                {"teamNumber": 2, "station": "Red2", "dq": false},
                {"teamNumber": 3, "station": "Red3", "dq": true},
                {"teamNumber": 4, "station": "Blue1", "dq": false},
                {"teamNumber": 5, "station": "Blue2", "dq": false},
                {"teamNumber": 6, "station": "Blue3", "dq": false}
            ]
        });
        let record = parse_match_record(&raw).unwrap();
        assert_eq!(record.match_number, 7);
        assert_eq!(record.red_score, vec![52, 5, 12, 8]);
        assert_eq!(record.blue_score, vec![52, 0, 20, 4]);
        assert_eq!(record.stations.len(), 6);
        assert!(record.stations[2].dq);
        assert_eq!(record.match_video_link, None);
    }

    #[test]
    fn match_record_rejects_null_final_score() {
        let raw = json!({
            "matchNumber": 3,
            "scoreRedFinal": null, "scoreRedFoul": 0, "scoreRedAuto": 0,
            "scoreBlueFinal": 10, "scoreBlueFoul": 0, "scoreBlueAuto": 0,
            "teams": []
        });
        let err = parse_match_record(&raw).unwrap_err();
        assert!(err.to_string().contains("scoreRedFinal"));
    }

    #[test]
    fn alliance_record_allows_missing_backup() {
        let raw = json!({
            "number": 2,
            "captain": 254, "round1": 1678, "round2": 971,
            "round3": null, "backup": null
        });
        let record = parse_alliance_record(&raw).unwrap();
        assert_eq!(record.number, 2);
        assert_eq!(record.round3, None);
        assert_eq!(record.backup, None);
    }

    #[test]
    fn ranking_record_requires_all_sort_orders() {
        let raw = json!({
            "teamNumber": 254, "rank": 1,
            "sortOrder1": 3.2, "sortOrder2": 150.0, "sortOrder3": 40.0,
            "sortOrder4": 0.0, "sortOrder5": 0.0,
            "wins": 10, "losses": 2, "ties": 0
        });
        let err = parse_ranking_record(&raw).unwrap_err();
        assert!(err.to_string().contains("sortOrder6"));
    }

    #[test]
    fn team_record_tolerates_missing_name() {
        let raw = json!({"teamNumber": 9999, "rookieYear": 2024, "districtCode": null});
        let record = parse_team_record(&raw).unwrap();
        assert_eq!(record.name_short, "");
        assert_eq!(record.district_code, None);
    }
}
