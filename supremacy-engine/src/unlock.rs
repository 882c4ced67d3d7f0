//! Tier-unlock forecasting over the difficulty ladder.
//!
//! Ranking rewards earned on a day are paid at the next 00:00 UTC reset,
//! while mission rewards land the same day. The calendar walk models that
//! lag explicitly so the predicted date matches when the points arrive.
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::availability::Availability;
use crate::config::{EventConfig, TierUnlockRequirement};
use crate::constants::MAX_SIMULATION_DAY_OFFSET;
use crate::numbers::{clamp_pct, u64_to_f64};
use crate::projection::ProjectionMode;
use crate::summary::{MissionLookup, RankingLookup, mode_points, total_mission_points};

/// Per-cycle payout of one daily mode together with its blackout rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRate {
    pub points: u64,
    pub availability: Availability,
}

/// Repeating point sources fed to the calendar walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRates {
    pub daily: Vec<DailyRate>,
    /// Sum of weekly ranking modes, paid once per weekly reset.
    pub weekly: u64,
    /// Sum of mission rewards, paid on the day they are completed.
    pub missions: u64,
    pub weekly_reset: Weekday,
}

impl CycleRates {
    /// Rates implied by today's inputs.
    #[must_use]
    pub fn from_config<R, M>(config: &EventConfig, rankings: &R, missions: &M) -> Self
    where
        R: RankingLookup + ?Sized,
        M: MissionLookup + ?Sized,
    {
        let daily = config
            .daily_modes()
            .map(|mode| DailyRate {
                points: mode_points(mode, rankings),
                availability: mode.availability.clone(),
            })
            .collect();
        let weekly = config
            .weekly_modes()
            .map(|mode| mode_points(mode, rankings))
            .fold(0u64, u64::saturating_add);
        Self {
            daily,
            weekly,
            missions: total_mission_points(&config.missions, missions),
            weekly_reset: config.weekly_reset,
        }
    }

    /// Ranking payout landing at the reset that ends `previous`.
    fn daily_payout_after(&self, previous: NaiveDate) -> u64 {
        self.daily
            .iter()
            .filter(|rate| rate.availability.is_open_on_date(previous))
            .map(|rate| rate.points)
            .fold(0u64, u64::saturating_add)
    }
}

/// Date on which `current + accumulated` first reaches `required`, or `None`
/// when that cannot happen on or before the event's final day.
#[must_use]
pub fn compute_unlock_date(
    required: u64,
    current: u64,
    rates: &CycleRates,
    event_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<NaiveDate> {
    let today = now.date_naive();
    if current >= required {
        return Some(today);
    }
    let last_day = event_end.date_naive();
    let mut total = current;

    for offset in 0..=MAX_SIMULATION_DAY_OFFSET {
        let date = today.checked_add_days(Days::new(u64::from(offset)))?;
        if date > last_day {
            log::debug!("{required} points not reached by {last_day}");
            return None;
        }

        // Today's reset already happened and is part of `current`.
        if offset > 0 {
            let previous = date.pred_opt()?;
            total = total.saturating_add(rates.daily_payout_after(previous));
            if total >= required {
                log::trace!("{required} reached at the {date} reset");
                return Some(date);
            }
            if date.weekday() == rates.weekly_reset {
                total = total.saturating_add(rates.weekly);
                if total >= required {
                    log::trace!("{required} reached at the {date} weekly reset");
                    return Some(date);
                }
            }
        }

        total = total.saturating_add(rates.missions);
        if total >= required {
            log::trace!("{required} reached by missions on {date}");
            return Some(date);
        }
    }

    log::debug!("{required} points not reached within the simulation horizon");
    None
}

/// Highest difficulty whose threshold is within `projected` and is either
/// already reached or confirmed reachable by `unlock_date_fn`.
///
/// Walks the ladder in order and stops at the first tier that fails, so a
/// tier above an unreachable one is never reported as unlocked.
#[must_use]
pub fn compute_unlocked_difficulty<F>(
    ladder: &[TierUnlockRequirement],
    current: u64,
    projected: u64,
    mut unlock_date_fn: F,
) -> u32
where
    F: FnMut(u64) -> Option<NaiveDate>,
{
    let mut unlocked = ladder.first().map_or(0, |tier| tier.difficulty);
    for tier in ladder {
        if projected < tier.required_points {
            break;
        }
        let reachable =
            current >= tier.required_points || unlock_date_fn(tier.required_points).is_some();
        if !reachable {
            break;
        }
        unlocked = tier.difficulty;
    }
    unlocked
}

/// The tier following `unlocked_difficulty` and how far `projected` is from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextUnlock {
    pub difficulty: u32,
    pub required_points: u64,
    pub points_needed: u64,
}

#[must_use]
pub fn next_unlock(
    ladder: &[TierUnlockRequirement],
    unlocked_difficulty: u32,
    projected: u64,
) -> Option<NextUnlock> {
    let position = ladder
        .iter()
        .position(|tier| tier.difficulty == unlocked_difficulty)?;
    let next = ladder.get(position + 1)?;
    Some(NextUnlock {
        difficulty: next.difficulty,
        required_points: next.required_points,
        points_needed: next.required_points.saturating_sub(projected),
    })
}

/// Linear progress from the unlocked tier's threshold to the next one, in `[0, 100]`.
///
/// 100 when the ladder is exhausted, 0 when `unlocked_difficulty` is not on it.
#[must_use]
pub fn unlock_progress(
    ladder: &[TierUnlockRequirement],
    unlocked_difficulty: u32,
    projected: u64,
) -> f64 {
    let Some(position) = ladder
        .iter()
        .position(|tier| tier.difficulty == unlocked_difficulty)
    else {
        return 0.0;
    };
    let Some(next) = ladder.get(position + 1) else {
        return 100.0;
    };
    let start = u64_to_f64(ladder[position].required_points);
    let end = u64_to_f64(next.required_points);
    if end <= start {
        return 100.0;
    }
    clamp_pct((u64_to_f64(projected) - start) / (end - start) * 100.0)
}

/// Unlocked difficulty, next target and progress bundled for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnlockStatus {
    pub unlocked_difficulty: u32,
    pub next: Option<NextUnlock>,
    pub progress_pct: f64,
}

#[must_use]
pub fn unlock_status<F>(
    ladder: &[TierUnlockRequirement],
    current: u64,
    projected: u64,
    unlock_date_fn: F,
) -> UnlockStatus
where
    F: FnMut(u64) -> Option<NaiveDate>,
{
    let unlocked_difficulty = compute_unlocked_difficulty(ladder, current, projected, unlock_date_fn);
    UnlockStatus {
        unlocked_difficulty,
        next: next_unlock(ladder, unlocked_difficulty, projected),
        progress_pct: unlock_progress(ladder, unlocked_difficulty, projected),
    }
}

/// One ladder entry as shown in the difficulty grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderRow {
    pub difficulty: u32,
    pub required_points: u64,
    /// Unlocked under the selected projection.
    pub unlocked: bool,
    /// Already reached with current points alone.
    pub unlocked_now: bool,
    /// Simulated arrival date; only for tiers not reached yet.
    pub unlock_date: Option<NaiveDate>,
}

/// Full ladder forecast for one projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockReport {
    pub mode: ProjectionMode,
    pub current_points: u64,
    pub projected_points: u64,
    pub status: UnlockStatus,
    pub rows: Vec<LadderRow>,
}

impl UnlockReport {
    #[must_use]
    pub const fn unlocked_difficulty(&self) -> u32 {
        self.status.unlocked_difficulty
    }

    #[must_use]
    pub fn row(&self, difficulty: u32) -> Option<&LadderRow> {
        self.rows.iter().find(|row| row.difficulty == difficulty)
    }
}

/// Simulate every ladder tier once and derive the status from those dates.
#[must_use]
pub fn unlock_report(
    ladder: &[TierUnlockRequirement],
    mode: ProjectionMode,
    current: u64,
    projected: u64,
    rates: &CycleRates,
    event_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> UnlockReport {
    let mut rows: Vec<LadderRow> = ladder
        .iter()
        .map(|tier| {
            let unlocked_now = current >= tier.required_points;
            LadderRow {
                difficulty: tier.difficulty,
                required_points: tier.required_points,
                unlocked: false,
                unlocked_now,
                unlock_date: if unlocked_now {
                    None
                } else {
                    compute_unlock_date(tier.required_points, current, rates, event_end, now)
                },
            }
        })
        .collect();

    let status = unlock_status(ladder, current, projected, |required| {
        rows.iter()
            .find(|row| row.required_points == required)
            .and_then(|row| row.unlock_date)
    });
    for row in &mut rows {
        row.unlocked = row.difficulty <= status.unlocked_difficulty;
    }

    UnlockReport {
        mode,
        current_points: current,
        projected_points: projected,
        status,
        rows,
    }
}
