mod common;

use common::{EventFixture, MemorySource, match_record, ranking, team, team_award};
use frc_pool::season::Season;

/// Team 801 plays one award-heavy event; team 802 plays three events with
/// a published +7 adjustment.
fn aggregation_season() -> Season {
    let mut source = MemorySource::default();

    let mut solo = EventFixture::default();
    for number in 801..=806u32 {
        solo.teams.push(team(number, 2000));
    }
    solo.awards.push(team_award("Regional Chairman's Award", 801));
    solo.awards.push(team_award("Regional FIRST Impact Award", 801));
    solo.awards.push(team_award("Judges' Award", 801));
    solo.awards.push(team_award("Imagery Award", 801));
    source.add_event("SOLO", 1, solo);

    let mut first = EventFixture::default();
    for number in [802, 810, 811, 812, 813, 814] {
        first.teams.push(team(number, 2000));
    }
    first.rankings.push(ranking(802, 1));
    first.quals.push(match_record(1, [802, 810, 811], [812, 813, 814], 30, 7));
    source.add_event("AGG1", 1, first);

    let mut second = EventFixture::default();
    for number in [802, 820, 821, 822, 823, 824] {
        second.teams.push(team(number, 2000));
    }
    second.rankings.push(ranking(820, 1));
    second.rankings.push(ranking(802, 2));
    second.quals.push(match_record(1, [802, 820, 821], [822, 823, 824], 50, 3));
    source.add_event("AGG2", 2, second);

    let mut third = EventFixture::default();
    for number in [802, 830, 831, 832, 833, 834] {
        third.teams.push(team(number, 2000));
    }
    third.rankings.push(ranking(802, 1));
    third.quals.push(match_record(1, [802, 830, 831], [832, 833, 834], 99, 2));
    source.add_event("AGG3", 3, third);

    source.adjustments.insert(802, 7);

    Season::load(2025, 2025, &source).expect("fixture season should load")
}

#[test]
fn single_event_bonus_projects_a_second_event() {
    let season = aggregation_season();
    let solo_team = season.season_team(801).unwrap();
    let points = season.season_points(solo_team, 2).unwrap();
    // 100 award points at the only event, plus round(100 * 0.6 + 14).
    assert_eq!(points.total, 174);
}

#[test]
fn two_event_totals_drop_the_projection() {
    let season = aggregation_season();
    let traveler = season.season_team(802).unwrap();

    // Week 1: one event at 22 points, projected up by round(22*0.6 + 14).
    let week1 = season.season_points(traveler, 1).unwrap();
    assert_eq!(week1.total, 49);
    assert_eq!(week1.best_three(), [30, 0, 0]);

    // Week 2: rank 1 then rank 2 sum without the projection.
    let week2 = season.season_points(traveler, 2).unwrap();
    assert_eq!(week2.total, 39);
    assert_eq!(week2.quals, 22);
    assert_eq!(week2.best_three(), [50, 30, 0]);
}

#[test]
fn third_event_total_is_capped_but_components_still_merge() {
    let season = aggregation_season();
    let traveler = season.season_team(802).unwrap();
    let week5 = season.season_points(traveler, 5).unwrap();
    // The third event adds nothing to the total...
    assert_eq!(week5.total, 39);
    // ...but its best match score still rolls into the running top 3,
    // and the quals component keeps the running maximum.
    assert_eq!(week5.best_three(), [99, 50, 30]);
    assert_eq!(week5.quals, 22);
}

#[test]
fn manual_adjustments_land_on_the_final_week_only() {
    let season = aggregation_season();
    let traveler = season.season_team(802).unwrap();
    assert_eq!(season.season_points(traveler, 5).unwrap().total, 39);
    assert_eq!(season.season_points(traveler, 6).unwrap().total, 46);
}

#[test]
fn season_team_registry_tracks_appearances() {
    let season = aggregation_season();
    let traveler = season.season_team(802).unwrap();
    assert_eq!(traveler.appearances.len(), 3);
    assert_eq!(traveler.appearances_through(2).count(), 2);
    assert_eq!(traveler.appearances_at(3).count(), 1);
    assert!(season.season_team(999).is_none());
}
