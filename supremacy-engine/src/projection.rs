//! Event-window extrapolation of today's rates.
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{days_remaining, weeks_remaining};
use crate::config::EventConfig;
use crate::summary::{
    DerivedSummary, MissionLookup, RankingLookup, compute_summary, mode_points,
    total_mission_points,
};

/// One daily mode's contribution to the event total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeProjection {
    pub mode_id: String,
    pub points_per_cycle: u64,
    /// Days the mode pays out inside the projection window.
    pub open_days: u32,
    pub projected: u64,
}

/// Today's summary extended across the remaining event window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventProjection {
    pub summary: DerivedSummary,
    pub days_remaining: u32,
    pub weeks_remaining: u32,
    /// Open days of the restricted modes (the shortest window when several differ).
    pub arena_days_remaining: u32,
    /// Per-cycle points of modes that have blackout days.
    pub arena_points: u64,
    /// Per-cycle points of daily modes that are always open.
    pub other_daily_points: u64,
    pub mission_points: u64,
    pub total_daily_points: u64,
    pub total_weekly_points: u64,
    pub event_total: u64,
    pub daily_modes: Vec<ModeProjection>,
}

/// Project the points earned between `now` and `event_end` if today's inputs repeat.
#[must_use]
pub fn compute_event_projection<R, M>(
    config: &EventConfig,
    rankings: &R,
    missions: &M,
    event_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> EventProjection
where
    R: RankingLookup + ?Sized,
    M: MissionLookup + ?Sized,
{
    let today = now.date_naive();
    let summary = compute_summary(config, rankings, missions, today.weekday());
    let days = days_remaining(event_end, now);
    let weeks = weeks_remaining(event_end, now, config.weekly_reset);

    let mut arena_points = 0u64;
    let mut arena_days: Option<u32> = None;
    let mut other_daily_points = 0u64;
    let mut daily_modes = Vec::new();
    for mode in config.daily_modes() {
        let points_per_cycle = mode_points(mode, rankings);
        let open_days = mode.availability.open_days_from(today, days);
        if mode.availability.is_restricted() {
            arena_points = arena_points.saturating_add(points_per_cycle);
            arena_days = Some(arena_days.map_or(open_days, |seen| seen.min(open_days)));
        } else {
            other_daily_points = other_daily_points.saturating_add(points_per_cycle);
        }
        daily_modes.push(ModeProjection {
            mode_id: mode.id.clone(),
            points_per_cycle,
            open_days,
            projected: points_per_cycle.saturating_mul(u64::from(open_days)),
        });
    }

    let mission_points = total_mission_points(&config.missions, missions);
    let total_daily_points = daily_modes
        .iter()
        .map(|mode| mode.projected)
        .fold(0u64, u64::saturating_add)
        .saturating_add(mission_points.saturating_mul(u64::from(days)));
    let total_weekly_points = summary
        .weekly_ranking_points
        .saturating_mul(u64::from(weeks));

    log::debug!(
        "projection: {days} days, {weeks} weekly resets, daily {total_daily_points}, weekly {total_weekly_points}"
    );

    EventProjection {
        summary,
        days_remaining: days,
        weeks_remaining: weeks,
        arena_days_remaining: arena_days.unwrap_or(days),
        arena_points,
        other_daily_points,
        mission_points,
        total_daily_points,
        total_weekly_points,
        event_total: total_daily_points.saturating_add(total_weekly_points),
        daily_modes,
    }
}

/// Which horizon the unlock status projects current points over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Through the end of the event.
    #[default]
    Event,
    /// One more day of rankings and missions.
    Daily,
    /// Seven days plus one weekly payout.
    Weekly,
}

impl ProjectionMode {
    pub const ALL: [Self; 3] = [Self::Event, Self::Daily, Self::Weekly];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Current points plus the gain this horizon predicts.
    #[must_use]
    pub const fn projected_points(self, current_points: u64, projection: &EventProjection) -> u64 {
        let gain = match self {
            Self::Event => projection.event_total,
            Self::Daily => projection.summary.daily_rate(),
            Self::Weekly => projection.summary.weekly_rate(),
        };
        current_points.saturating_add(gain)
    }
}

impl std::fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
