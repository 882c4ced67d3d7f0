//! Mutable calculator inputs.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use smallvec::SmallVec;

use crate::calendar::event_end_from_date;
use crate::config::EventConfig;
use crate::constants::MIN_GUILD_SIZE;
use crate::numbers::clamp_to_u32;
use crate::summary::{MissionLookup, RankingLookup};

/// Counts entered for the current cycle plus the event's running total.
///
/// Every configured tier and mission always has an entry, so two states built
/// from the same configuration compare field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub guild_size: u32,
    /// `mode id -> members placed`, indexed by tier.
    pub rankings: BTreeMap<String, SmallVec<[u32; 5]>>,
    /// `mission id -> members who completed it today`.
    pub missions: BTreeMap<String, u32>,
    pub current_points: u64,
    pub event_end: DateTime<Utc>,
}

impl InputState {
    /// Zeroed counts with the season's default guild size and end date.
    #[must_use]
    pub fn new(config: &EventConfig) -> Self {
        let rankings = config
            .modes
            .iter()
            .map(|mode| (mode.id.clone(), SmallVec::from_elem(0, mode.tiers.len())))
            .collect();
        let missions = config
            .missions
            .iter()
            .map(|mission| (mission.id.clone(), 0))
            .collect();
        Self {
            guild_size: config.default_guild_size,
            rankings,
            missions,
            current_points: 0,
            event_end: event_end_from_date(config.default_end_date),
        }
    }

    /// Zero every count and the current points; guild size and end date stay.
    pub fn reset(&mut self) {
        self.rankings
            .values_mut()
            .flat_map(|counts| counts.iter_mut())
            .for_each(|count| *count = 0);
        self.missions.values_mut().for_each(|count| *count = 0);
        self.current_points = 0;
    }

    /// Set the guild size within `1..=max_guild_size`, re-clamping mission counts.
    pub fn set_guild_size(&mut self, config: &EventConfig, value: i64) {
        self.guild_size = clamp_to_u32(value, config.max_guild_size).max(MIN_GUILD_SIZE);
        for mission in &config.missions {
            if let Some(count) = self.missions.get_mut(&mission.id) {
                *count = (*count).min(mission.member_cap.min(self.guild_size));
            }
        }
    }

    /// Set a tier's member count within `0..=member_cap`. Unknown ids are ignored.
    ///
    /// Returns whether anything was stored.
    pub fn set_ranking(
        &mut self,
        config: &EventConfig,
        mode_id: &str,
        tier_index: usize,
        value: i64,
    ) -> bool {
        let mode_id = config.canonical_id(mode_id);
        let Some(tier) = config.mode(mode_id).and_then(|mode| mode.tier(tier_index)) else {
            log::debug!("ignoring ranking for unknown tier {mode_id}[{tier_index}]");
            return false;
        };
        let count = clamp_to_u32(value, tier.member_cap);
        match self
            .rankings
            .get_mut(mode_id)
            .and_then(|counts| counts.get_mut(tier_index))
        {
            Some(slot) => *slot = count,
            None => {
                let counts = self.rankings.entry(mode_id.to_string()).or_default();
                if counts.len() <= tier_index {
                    counts.resize(tier_index + 1, 0);
                }
                counts[tier_index] = count;
            }
        }
        true
    }

    /// Set a mission's completions within `0..=min(member_cap, guild_size)`.
    ///
    /// Returns whether anything was stored.
    pub fn set_mission(&mut self, config: &EventConfig, mission_id: &str, value: i64) -> bool {
        let mission_id = config.canonical_id(mission_id);
        let Some(mission) = config.mission(mission_id) else {
            log::debug!("ignoring completions for unknown mission {mission_id}");
            return false;
        };
        let cap = mission.member_cap.min(self.guild_size);
        self.missions
            .insert(mission.id.clone(), clamp_to_u32(value, cap));
        true
    }

    pub fn set_current_points(&mut self, value: i64) {
        self.current_points = u64::try_from(value).unwrap_or(0);
    }

    /// Store the end, moved to 23:59:59 UTC on the instant's UTC date.
    pub fn set_event_end(&mut self, event_end: DateTime<Utc>) {
        self.event_end = event_end_from_date(event_end.date_naive());
    }

    #[must_use]
    pub fn ranking(&self, mode_id: &str, tier_index: usize) -> u32 {
        self.member_count(mode_id, tier_index)
            .map_or(0, |count| clamp_to_u32(count, u32::MAX))
    }

    #[must_use]
    pub fn mission(&self, mission_id: &str) -> u32 {
        self.missions.get(mission_id).copied().unwrap_or(0)
    }
}

impl RankingLookup for InputState {
    fn member_count(&self, mode_id: &str, tier_index: usize) -> Option<i64> {
        self.rankings
            .get(mode_id)
            .and_then(|counts| counts.get(tier_index))
            .map(|count| i64::from(*count))
    }
}

impl MissionLookup for InputState {
    fn completed_members(&self, mission_id: &str) -> Option<i64> {
        self.missions.get(mission_id).map(|count| i64::from(*count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_state_covers_every_tier_and_mission() {
        let config = EventConfig::default();
        let state = InputState::new(&config);
        assert_eq!(state.rankings.len(), 4);
        assert!(state.rankings.values().all(|counts| counts.len() == 5));
        assert_eq!(state.missions.len(), 4);
        assert_eq!(state.guild_size, 20);
        assert_eq!(state.current_points, 0);
        assert_eq!(
            state.event_end,
            Utc.with_ymd_and_hms(2026, 3, 4, 23, 59, 59).unwrap()
        );
    }

    #[test]
    fn setters_clamp_to_caps() {
        let config = EventConfig::default();
        let mut state = InputState::new(&config);

        assert!(state.set_ranking(&config, "supreme-arena", 0, 9));
        assert_eq!(state.ranking("supreme-arena", 0), 4);
        assert!(state.set_ranking(&config, "supreme-arena", 1, -3));
        assert_eq!(state.ranking("supreme-arena", 1), 0);

        assert!(state.set_mission(&config, "mission-honor-duel", 50));
        assert_eq!(state.mission("mission-honor-duel"), 3);
        state.set_guild_size(&config, 10);
        assert!(state.set_mission(&config, "mission-dream-realm", 50));
        assert_eq!(state.mission("mission-dream-realm"), 10);

        state.set_current_points(-10);
        assert_eq!(state.current_points, 0);
        state.set_current_points(12_345);
        assert_eq!(state.current_points, 12_345);
    }

    #[test]
    fn guild_size_bounds_and_mission_reclamp() {
        let config = EventConfig::default();
        let mut state = InputState::new(&config);
        state.set_guild_size(&config, 0);
        assert_eq!(state.guild_size, 1);
        state.set_guild_size(&config, 500);
        assert_eq!(state.guild_size, 100);

        state.set_guild_size(&config, 20);
        state.set_mission(&config, "mission-supreme-arena", 20);
        state.set_guild_size(&config, 5);
        assert_eq!(state.mission("mission-supreme-arena"), 5);
    }

    #[test]
    fn unknown_ids_are_ignored_and_legacy_ids_resolve() {
        let config = EventConfig::default();
        let mut state = InputState::new(&config);
        let before = state.clone();
        assert!(!state.set_ranking(&config, "nope", 0, 3));
        assert!(!state.set_ranking(&config, "dream-realm", 5, 3));
        assert!(!state.set_mission(&config, "nope", 3));
        assert_eq!(state, before);

        assert!(state.set_ranking(&config, "regno-onirico", 2, 3));
        assert_eq!(state.ranking("dream-realm", 2), 3);
    }

    #[test]
    fn reset_keeps_guild_size_and_end_date() {
        let config = EventConfig::default();
        let mut state = InputState::new(&config);
        let end = Utc.with_ymd_and_hms(2026, 2, 20, 23, 59, 59).unwrap();
        state.set_guild_size(&config, 30);
        state.set_event_end(end);
        state.set_ranking(&config, "honor-duel", 0, 2);
        state.set_mission(&config, "mission-dream-realm", 7);
        state.set_current_points(900);

        state.reset();
        assert_eq!(state.guild_size, 30);
        assert_eq!(state.event_end, end);
        assert_eq!(state.current_points, 0);
        assert!(state.rankings.values().flatten().all(|count| *count == 0));
        assert!(state.missions.values().all(|count| *count == 0));
        assert_eq!(state.rankings.values().map(|counts| counts.len()).sum::<usize>(), 20);
    }

    #[test]
    fn event_end_is_pinned_to_end_of_day() {
        let config = EventConfig::default();
        let mut state = InputState::new(&config);
        let pinned = Utc.with_ymd_and_hms(2026, 2, 25, 23, 59, 59).unwrap();

        state.set_event_end(Utc.with_ymd_and_hms(2026, 2, 25, 8, 30, 0).unwrap());
        assert_eq!(state.event_end, pinned);

        let fractional = pinned + chrono::Duration::nanoseconds(123_456_789);
        state.set_event_end(fractional);
        assert_eq!(state.event_end, pinned);
    }

    #[test]
    fn ranking_lookups_borrow_mode_ids() {
        let config = EventConfig::default();
        let mut state = InputState::new(&config);
        assert!(state.set_ranking(&config, "dream-realm", 4, 11));
        assert_eq!(state.member_count("dream-realm", 4), Some(11));
        assert_eq!(state.member_count("dream-realm", 5), None);
        assert_eq!(state.member_count("nope", 0), None);
        assert_eq!(state.rankings["dream-realm"].as_slice(), &[0_u32, 0, 0, 0, 11]);
    }
}
