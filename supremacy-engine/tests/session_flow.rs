use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use supremacy_engine::{
    CalculatorSession, EventConfig, MemoryStore, ProjectionMode, format_time_remaining,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A mid-sized guild entering one day of results.
fn guild_session(store: MemoryStore) -> CalculatorSession<MemoryStore> {
    let mut session = CalculatorSession::restore(Arc::new(EventConfig::default()), store);
    session.set_guild_size(20);
    session.set_ranking("supreme-arena", 0, 1);
    session.set_ranking("supreme-arena", 2, 2);
    session.set_ranking("dream-realm", 1, 3);
    session.set_ranking("dream-realm", 4, 5);
    session.set_ranking("honor-duel", 0, 1);
    session.set_ranking("arcane-labyrinth", 3, 2);
    session.set_mission("mission-supreme-arena", 12);
    session.set_mission("mission-dream-realm", 15);
    session.set_mission("mission-honor-duel", 3);
    session.set_current_points(42_000);
    session.set_event_end_date(date(2026, 3, 4));
    session
}

#[test]
fn wednesday_projection_through_event_end() {
    let session = guild_session(MemoryStore::new());
    let now = Utc.with_ymd_and_hms(2026, 2, 4, 8, 0, 0).unwrap();

    let summary = session.summary(now);
    // Arena: 1*400 + 2*180; Dream Realm: 3*205 + 5*25.
    assert_eq!(summary.daily_ranking_points, 760 + 740);
    // Honor Duel 500; Labyrinth 2*200.
    assert_eq!(summary.weekly_ranking_points, 900);
    assert_eq!(summary.daily_mission_points, 12 * 80 + 15 * 80 + 3 * 300);

    let projection = session.projection(now);
    assert_eq!(projection.days_remaining, 29);
    assert_eq!(projection.arena_days_remaining, 21);
    assert_eq!(projection.weeks_remaining, 4);
    assert_eq!(projection.event_total, 760 * 21 + 740 * 29 + 3060 * 29 + 900 * 4);
    assert_eq!(format_time_remaining(session.state().event_end, now), "28d 15h 59m");
}

#[test]
fn unlock_report_matches_projection_modes() {
    let session = guild_session(MemoryStore::new());
    let now = Utc.with_ymd_and_hms(2026, 2, 4, 8, 0, 0).unwrap();

    let daily = session.unlock_report(ProjectionMode::Daily, now);
    let weekly = session.unlock_report(ProjectionMode::Weekly, now);
    let event = session.unlock_report(ProjectionMode::Event, now);
    assert!(daily.projected_points < weekly.projected_points);
    assert!(weekly.projected_points < event.projected_points);
    assert!(daily.unlocked_difficulty() <= weekly.unlocked_difficulty());
    assert!(weekly.unlocked_difficulty() <= event.unlocked_difficulty());

    // 42k current points: difficulties 1-5 are reached already.
    for row in event.rows.iter().take(5) {
        assert!(row.unlocked_now);
        assert!(row.unlock_date.is_none());
    }
    let sixth = event.row(6).unwrap();
    assert!(!sixth.unlocked_now);
    // 42k + Wed missions 3060 + Thu reset 1500 + Thu missions 3060 = 49620; Friday's reset crosses 50k.
    assert_eq!(sixth.unlock_date, Some(date(2026, 2, 6)));
    assert!(event.status.progress_pct >= 0.0 && event.status.progress_pct <= 100.0);
}

#[test]
fn state_survives_a_restart() {
    let store = MemoryStore::new();
    let before = guild_session(store.clone()).into_state();
    let after = CalculatorSession::restore(Arc::new(EventConfig::default()), store);
    assert_eq!(after.state(), &before);
}

#[test]
fn legacy_export_imports_into_current_ids() {
    let legacy = r#"{
        "guildSize": 18,
        "rankings": [
            {"modeId": "arena-suprema", "tierIndex": 0, "memberCount": 2},
            {"modeId": "duello-onore", "tierIndex": 1, "memberCount": 1}
        ],
        "missions": [{"missionId": "mission-regno", "completedMembers": 9}],
        "currentPoints": 12000,
        "eventEndDate": "2026-02-28T23:59:59.000Z"
    }"#;
    let mut session = CalculatorSession::new(Arc::new(EventConfig::default()), MemoryStore::new());
    session.import_json(legacy).unwrap();
    let state = session.state();
    assert_eq!(state.guild_size, 18);
    assert_eq!(state.ranking("supreme-arena", 0), 2);
    assert_eq!(state.ranking("honor-duel", 1), 1);
    assert_eq!(state.mission("mission-dream-realm"), 9);
    assert_eq!(state.current_points, 12_000);

    let exported = session.export_json().unwrap();
    assert!(exported.contains("\"supreme-arena\""));
    assert!(!exported.contains("arena-suprema"));
}
