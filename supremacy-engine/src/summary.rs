//! Same-cycle aggregate of ranking and mission points.
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::config::{EventConfig, Mission, Mode};
use crate::mode_points::{TierLookup, compute_mode_points};
use crate::numbers::non_negative;

/// Read-only accessor for ranking counts across every mode.
pub trait RankingLookup {
    fn member_count(&self, mode_id: &str, tier_index: usize) -> Option<i64>;
}

/// Read-only accessor for mission completions.
pub trait MissionLookup {
    fn completed_members(&self, mission_id: &str) -> Option<i64>;
}

/// Binds a [`RankingLookup`] to a single mode so it can feed the mode calculator.
pub struct ModeTiers<'a, R: ?Sized> {
    rankings: &'a R,
    mode_id: &'a str,
}

impl<'a, R: RankingLookup + ?Sized> ModeTiers<'a, R> {
    #[must_use]
    pub const fn new(rankings: &'a R, mode_id: &'a str) -> Self {
        Self { rankings, mode_id }
    }
}

impl<R: RankingLookup + ?Sized> TierLookup for ModeTiers<'_, R> {
    fn raw_count(&self, tier_index: usize) -> Option<i64> {
        self.rankings.member_count(self.mode_id, tier_index)
    }
}

/// Points earned in the current 24-hour cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedSummary {
    pub daily_ranking_points: u64,
    pub weekly_ranking_points: u64,
    pub daily_mission_points: u64,
    pub total: u64,
}

impl DerivedSummary {
    /// Daily rankings plus missions: what one ordinary day yields.
    #[must_use]
    pub const fn daily_rate(&self) -> u64 {
        self.daily_ranking_points
            .saturating_add(self.daily_mission_points)
    }

    /// Seven daily rates plus one weekly payout.
    #[must_use]
    pub const fn weekly_rate(&self) -> u64 {
        self.daily_rate()
            .saturating_mul(7)
            .saturating_add(self.weekly_ranking_points)
    }
}

/// Points a mode awards per cycle under the given lookups.
#[must_use]
pub fn mode_points<R>(mode: &Mode, rankings: &R) -> u64
where
    R: RankingLookup + ?Sized,
{
    compute_mode_points(mode, &ModeTiers::new(rankings, &mode.id))
}

/// Points a mission awards for today's completions.
#[must_use]
pub fn mission_points<M>(mission: &Mission, missions: &M) -> u64
where
    M: MissionLookup + ?Sized,
{
    non_negative(missions.completed_members(&mission.id))
        .saturating_mul(mission.points_per_completion)
}

/// Sum of every mission's points for today.
#[must_use]
pub fn total_mission_points<M>(missions: &[Mission], lookup: &M) -> u64
where
    M: MissionLookup + ?Sized,
{
    missions
        .iter()
        .map(|mission| mission_points(mission, lookup))
        .fold(0u64, u64::saturating_add)
}

/// Aggregate today's points. Daily modes closed on `today` contribute nothing.
#[must_use]
pub fn compute_summary<R, M>(
    config: &EventConfig,
    rankings: &R,
    missions: &M,
    today: Weekday,
) -> DerivedSummary
where
    R: RankingLookup + ?Sized,
    M: MissionLookup + ?Sized,
{
    let daily_ranking_points = config
        .daily_modes()
        .filter(|mode| {
            let open = mode.availability.is_open_on(today);
            if !open {
                log::trace!("{} closed on {today}, skipped from today's total", mode.id);
            }
            open
        })
        .map(|mode| mode_points(mode, rankings))
        .fold(0u64, u64::saturating_add);
    let weekly_ranking_points = config
        .weekly_modes()
        .map(|mode| mode_points(mode, rankings))
        .fold(0u64, u64::saturating_add);
    let daily_mission_points = total_mission_points(&config.missions, missions);

    DerivedSummary {
        daily_ranking_points,
        weekly_ranking_points,
        daily_mission_points,
        total: daily_ranking_points
            .saturating_add(weekly_ranking_points)
            .saturating_add(daily_mission_points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Counts {
        rankings: HashMap<(String, usize), i64>,
        missions: HashMap<String, i64>,
    }

    impl RankingLookup for Counts {
        fn member_count(&self, mode_id: &str, tier_index: usize) -> Option<i64> {
            self.rankings
                .get(&(mode_id.to_string(), tier_index))
                .copied()
        }
    }

    impl MissionLookup for Counts {
        fn completed_members(&self, mission_id: &str) -> Option<i64> {
            self.missions.get(mission_id).copied()
        }
    }

    fn sample_counts() -> Counts {
        let mut counts = Counts::default();
        counts.rankings.insert(("supreme-arena".to_string(), 0), 2);
        counts.rankings.insert(("dream-realm".to_string(), 1), 3);
        counts.rankings.insert(("honor-duel".to_string(), 0), 1);
        counts.missions.insert("mission-dream-realm".to_string(), 10);
        counts.missions.insert("mission-honor-duel".to_string(), 2);
        counts
    }

    #[test]
    fn summary_adds_all_sources_on_open_day() {
        let config = EventConfig::default();
        let counts = sample_counts();
        let summary = compute_summary(&config, &counts, &counts, Weekday::Thu);
        // Arena 2*400, Dream Realm 3*205
        assert_eq!(summary.daily_ranking_points, 800 + 615);
        // Honor Duel 1*500
        assert_eq!(summary.weekly_ranking_points, 500);
        assert_eq!(summary.daily_mission_points, 10 * 80 + 2 * 300);
        assert_eq!(summary.total, 1415 + 500 + 1400);
    }

    #[test]
    fn arena_is_skipped_on_blackout_days() {
        let config = EventConfig::default();
        let counts = sample_counts();
        for day in [Weekday::Mon, Weekday::Tue] {
            let summary = compute_summary(&config, &counts, &counts, day);
            assert_eq!(summary.daily_ranking_points, 615);
        }
    }

    #[test]
    fn rates_combine_summary_fields() {
        let summary = DerivedSummary {
            daily_ranking_points: 100,
            weekly_ranking_points: 1000,
            daily_mission_points: 50,
            total: 1150,
        };
        assert_eq!(summary.daily_rate(), 150);
        assert_eq!(summary.weekly_rate(), 2050);
    }

    #[test]
    fn negative_mission_counts_are_ignored() {
        let config = EventConfig::default();
        let mut counts = Counts::default();
        counts.missions.insert("mission-supreme-arena".to_string(), -4);
        let summary = compute_summary(&config, &counts, &counts, Weekday::Wed);
        assert_eq!(summary, DerivedSummary::default());
    }
}
