use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use supremacy_engine::{
    Availability, Cadence, CalculatorSession, ConfigError, CycleRates, DailyRate, EventConfig,
    MemoryStore, Mode, RewardTier, compute_mode_points, compute_unlock_date, days_remaining,
    event_end_from_date, max_mode_points, mode_breakdown, weeks_remaining,
};

/// A named engine self-check.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    check: fn() -> Result<()>,
}

impl Scenario {
    const fn new(key: &'static str, name: &'static str, check: fn() -> Result<()>) -> Self {
        Self { key, name, check }
    }

    pub fn run(&self) -> Result<()> {
        (self.check)()
    }
}

pub fn catalog_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "cumulative-stacking",
            "Cumulative Tier Stacking",
            cumulative_stacking_expectation,
        ),
        Scenario::new(
            "tier-overflow",
            "Member Overflow Into Broader Tiers",
            tier_overflow_expectation,
        ),
        Scenario::new("point-caps", "Mode Point Caps", point_cap_expectation),
        Scenario::new(
            "arena-blackout",
            "Arena Blackout Proration",
            arena_blackout_expectation,
        ),
        Scenario::new(
            "event-horizon",
            "Event Window Bounds",
            event_horizon_expectation,
        ),
        Scenario::new(
            "weekly-resets",
            "Weekly Reset Counting",
            weekly_resets_expectation,
        ),
        Scenario::new(
            "same-day-unlock",
            "Same-Day Mission Unlock",
            same_day_unlock_expectation,
        ),
        Scenario::new(
            "unlock-ordering",
            "Unlock Dates Follow The Ladder",
            unlock_ordering_expectation,
        ),
        Scenario::new(
            "snapshot-roundtrip",
            "Snapshot Export And Import",
            snapshot_roundtrip_expectation,
        ),
        Scenario::new(
            "legacy-migration",
            "Legacy Snapshot Migration",
            legacy_migration_expectation,
        ),
        Scenario::new(
            "input-clamping",
            "Input Clamping And Reset",
            input_clamping_expectation,
        ),
        Scenario::new(
            "config-validation",
            "Season Configuration Validation",
            config_validation_expectation,
        ),
    ]
}

pub fn find_scenario(key: &str) -> Option<Scenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .iter()
        .map(|scenario| (scenario.key, scenario.name))
        .collect()
}

fn three_tier_mode(point_cap: Option<u64>) -> Mode {
    Mode {
        id: "check".to_string(),
        name: "Check".to_string(),
        cadence: Cadence::Daily,
        point_cap,
        availability: Availability::always_open(),
        tiers: [
            RewardTier::new("T0", 4, 120),
            RewardTier::new("T1", 10, 100),
            RewardTier::new("T2", 12, 80),
        ]
        .into_iter()
        .collect(),
    }
}

fn utc(y: i32, m: u32, d: u32, h: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .with_context(|| format!("invalid instant {y}-{m}-{d} {h}:00"))
}

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

fn fresh_session() -> CalculatorSession<MemoryStore> {
    CalculatorSession::new(Arc::new(EventConfig::default()), MemoryStore::new())
}

fn cumulative_stacking_expectation() -> Result<()> {
    let breakdown = mode_breakdown(&three_tier_mode(None), &[2_i64, 3, 5]);
    ensure!(
        breakdown.cumulative_points.as_slice() == [300_u64, 180, 80],
        "cumulative points were {:?}",
        breakdown.cumulative_points
    );
    ensure!(
        breakdown.effective_members.as_slice() == [2_u64, 3, 5],
        "effective members were {:?}",
        breakdown.effective_members
    );
    ensure!(
        breakdown.total == 1540,
        "expected 1540 points, got {}",
        breakdown.total
    );
    Ok(())
}

fn tier_overflow_expectation() -> Result<()> {
    let breakdown = mode_breakdown(&three_tier_mode(None), &[6_i64, 2, 7]);
    ensure!(
        breakdown.capped_members.as_slice() == [4_u64, 8, 12],
        "capped members were {:?}",
        breakdown.capped_members
    );
    ensure!(
        breakdown.effective_members.as_slice() == [4_u64, 4, 4],
        "effective members were {:?}",
        breakdown.effective_members
    );
    ensure!(
        breakdown.total == 2240,
        "expected 2240 points, got {}",
        breakdown.total
    );
    Ok(())
}

fn point_cap_expectation() -> Result<()> {
    let capped = three_tier_mode(Some(2000));
    let points = compute_mode_points(&capped, &[6_i64, 2, 7]);
    ensure!(points == 2000, "cap not applied: {points}");
    let below = compute_mode_points(&capped, &[2_i64, 3, 5]);
    ensure!(below == 1540, "totals below the cap must pass through: {below}");

    for mode in &EventConfig::default().modes {
        let cap = mode
            .point_cap
            .with_context(|| format!("{} has no point cap", mode.id))?;
        let saturated = max_mode_points(mode);
        ensure!(
            saturated == cap,
            "{} saturates at {saturated}, expected {cap}",
            mode.id
        );
    }
    Ok(())
}

fn arena_blackout_expectation() -> Result<()> {
    let mut session = fresh_session();
    session.set_ranking("supreme-arena", 0, 1);
    session.set_ranking("dream-realm", 1, 3);
    session.set_event_end_date(date(2026, 2, 8)?);

    // Monday: arena closed today and tomorrow.
    let projection = session.projection(utc(2026, 2, 2, 12)?);
    ensure!(projection.days_remaining == 7, "days {}", projection.days_remaining);
    ensure!(
        projection.arena_days_remaining == 5,
        "arena days {}",
        projection.arena_days_remaining
    );
    ensure!(
        projection.total_daily_points == 400 * 5 + 615 * 7,
        "daily total {}",
        projection.total_daily_points
    );
    ensure!(
        projection.summary.daily_ranking_points == 615,
        "closed arena counted today: {}",
        projection.summary.daily_ranking_points
    );
    Ok(())
}

fn event_horizon_expectation() -> Result<()> {
    let now = utc(2026, 2, 10, 9)?;
    let far = event_end_from_date(date(2026, 6, 1)?);
    ensure!(days_remaining(far, now) == 31, "far end not capped");
    let past = event_end_from_date(date(2026, 2, 1)?);
    ensure!(days_remaining(past, now) == 0, "past end not floored");
    let tonight = event_end_from_date(date(2026, 2, 10)?);
    ensure!(
        days_remaining(tonight, now) == 1,
        "a partial day rounds up to one"
    );
    Ok(())
}

fn weekly_resets_expectation() -> Result<()> {
    let end = event_end_from_date(date(2026, 3, 4)?);
    let wednesday = utc(2026, 2, 4, 8)?;
    let resets = weeks_remaining(end, wednesday, Weekday::Mon);
    ensure!(resets == 4, "expected 4 Monday resets, got {resets}");
    // Today's reset has already paid out.
    let monday = utc(2026, 2, 2, 0)?;
    let resets = weeks_remaining(end, monday, Weekday::Mon);
    ensure!(resets == 4, "expected 4 resets after Monday, got {resets}");
    Ok(())
}

fn same_day_unlock_expectation() -> Result<()> {
    let now = utc(2026, 2, 4, 8)?;
    let end = event_end_from_date(date(2026, 3, 4)?);
    let rates = CycleRates {
        daily: Vec::new(),
        weekly: 0,
        missions: 300,
        weekly_reset: Weekday::Mon,
    };
    let unlock = compute_unlock_date(50_000, 49_999, &rates, end, now);
    ensure!(
        unlock == Some(now.date_naive()),
        "one mission short should unlock today, got {unlock:?}"
    );
    let idle = CycleRates {
        missions: 0,
        ..rates
    };
    ensure!(
        compute_unlock_date(50_000, 49_999, &idle, end, now).is_none(),
        "no income must never unlock"
    );
    Ok(())
}

fn unlock_ordering_expectation() -> Result<()> {
    let config = EventConfig::default();
    let end = event_end_from_date(date(2026, 3, 4)?);
    let now = utc(2026, 2, 4, 8)?;
    let rates = CycleRates {
        daily: vec![
            DailyRate {
                points: 2_400,
                availability: Availability::with_blackout(&[Weekday::Mon, Weekday::Tue]),
            },
            DailyRate {
                points: 1_800,
                availability: Availability::always_open(),
            },
        ],
        weekly: 5_000,
        missions: 2_000,
        weekly_reset: Weekday::Mon,
    };
    let dates: Vec<_> = config
        .unlock_ladder
        .iter()
        .map(|tier| compute_unlock_date(tier.required_points, 20_000, &rates, end, now))
        .collect();
    for (index, pair) in dates.windows(2).enumerate() {
        match (pair[0], pair[1]) {
            (Some(lower), Some(higher)) => ensure!(
                lower <= higher,
                "difficulty {} unlocks after difficulty {}",
                index + 1,
                index + 2
            ),
            (None, Some(_)) => anyhow::bail!(
                "difficulty {} is reachable after an unreachable tier",
                index + 2
            ),
            _ => {}
        }
    }
    Ok(())
}

fn snapshot_roundtrip_expectation() -> Result<()> {
    let mut session = fresh_session();
    session.set_guild_size(24);
    session.set_ranking("arcane-labyrinth", 3, 6);
    session.set_mission("mission-honor-duel", 2);
    session.set_current_points(77_700);
    session.set_event_end_date(date(2026, 2, 27)?);

    let exported = session.export_json()?;
    let mut restored = fresh_session();
    restored.import_json(&exported)?;
    ensure!(
        restored.state() == session.state(),
        "state changed through export/import"
    );
    Ok(())
}

fn legacy_migration_expectation() -> Result<()> {
    let legacy = r#"{
        "guildSize": 18,
        "rankings": [{"modeId": "regno-onirico", "tierIndex": 2, "memberCount": 4}],
        "missions": [{"missionId": "mission-regno", "completedMembers": 7}],
        "currentPoints": 9000
    }"#;
    let mut session = fresh_session();
    session.import_json(legacy)?;
    let state = session.state();
    ensure!(
        state.ranking("dream-realm", 2) == 4,
        "legacy mode id not migrated"
    );
    ensure!(
        state.mission("mission-dream-realm") == 7,
        "legacy mission id not migrated"
    );
    ensure!(
        !session.export_json()?.contains("regno-onirico"),
        "export still carries the legacy id"
    );
    Ok(())
}

fn input_clamping_expectation() -> Result<()> {
    let mut session = fresh_session();
    session.set_guild_size(500);
    ensure!(session.state().guild_size == 100, "guild size above max");
    session.set_guild_size(-4);
    ensure!(session.state().guild_size == 1, "guild size below min");

    session.set_guild_size(10);
    session.set_mission("mission-dream-realm", 40);
    ensure!(
        session.state().mission("mission-dream-realm") == 10,
        "mission completions exceed the guild"
    );
    ensure!(
        !session.set_ranking("no-such-mode", 0, 3),
        "unknown mode accepted"
    );

    let end = session.state().event_end;
    session.set_current_points(12_345);
    session.reset();
    let state = session.state();
    ensure!(
        state.current_points == 0 && state.mission("mission-dream-realm") == 0,
        "reset left counts behind"
    );
    ensure!(
        state.guild_size == 10 && state.event_end == end,
        "reset changed guild size or end date"
    );
    Ok(())
}

fn config_validation_expectation() -> Result<()> {
    let config = EventConfig::default();
    config.validate()?;
    let mut duplicate = config.clone();
    duplicate.modes[1].id = duplicate.modes[0].id.clone();
    ensure!(
        matches!(duplicate.validate(), Err(ConfigError::DuplicateId { .. })),
        "duplicate mode id accepted"
    );
    let mut empty = config;
    empty.modes.clear();
    ensure!(
        empty.validate() == Err(ConfigError::NoModes),
        "season without modes accepted"
    );
    Ok(())
}
