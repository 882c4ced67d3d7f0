//! Static event configuration: ranking modes, missions and the unlock ladder.
//!
//! The bundled Supremacy season is built by [`EventConfig::default`]; other
//! seasons can be swapped in through [`EventConfig::from_json`] without
//! touching the engine.
use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::availability::Availability;
use crate::constants::{DEFAULT_GUILD_SIZE, MAX_GUILD_SIZE, MIN_GUILD_SIZE};

/// How often a mode's ranking rewards are paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
}

/// A ranking bracket within a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTier {
    pub label: String,
    /// Total guild members that can be counted at this bracket or better.
    pub member_cap: u32,
    /// Points for this bracket alone (lower brackets stack on top).
    pub points: u64,
}

impl RewardTier {
    #[must_use]
    pub fn new(label: &str, member_cap: u32, points: u64) -> Self {
        Self {
            label: label.to_string(),
            member_cap,
            points,
        }
    }
}

/// A ranked game mode with its reward brackets, most exclusive first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: String,
    pub name: String,
    pub cadence: Cadence,
    #[serde(default)]
    pub point_cap: Option<u64>,
    #[serde(default)]
    pub availability: Availability,
    pub tiers: SmallVec<[RewardTier; 5]>,
}

impl Mode {
    #[must_use]
    pub const fn is_daily(&self) -> bool {
        matches!(self.cadence, Cadence::Daily)
    }

    #[must_use]
    pub const fn is_weekly(&self) -> bool {
        matches!(self.cadence, Cadence::Weekly)
    }

    #[must_use]
    pub fn tier(&self, tier_index: usize) -> Option<&RewardTier> {
        self.tiers.get(tier_index)
    }
}

/// A flat daily mission paying a fixed amount per completing member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub name: String,
    pub points_per_completion: u64,
    pub member_cap: u32,
}

/// One rung of the difficulty unlock ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierUnlockRequirement {
    pub difficulty: u32,
    pub required_points: u64,
}

/// Complete configuration for one event season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,
    /// Weekday whose 00:00 UTC reset pays weekly rankings.
    #[serde(default = "EventConfig::default_weekly_reset")]
    pub weekly_reset: Weekday,
    /// End date used when a snapshot carries none; pinned to 23:59:59 UTC.
    pub default_end_date: NaiveDate,
    #[serde(default = "EventConfig::default_guild_size")]
    pub default_guild_size: u32,
    #[serde(default = "EventConfig::default_max_guild_size")]
    pub max_guild_size: u32,
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub missions: Vec<Mission>,
    #[serde(default)]
    pub unlock_ladder: Vec<TierUnlockRequirement>,
    /// Renamed ids accepted when decoding older snapshots (old id -> current id).
    #[serde(default)]
    pub legacy_ids: BTreeMap<String, String>,
}

/// Errors raised when event configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("event configuration defines no modes")]
    NoModes,
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("mode '{mode}' has no reward tiers")]
    EmptyTiers { mode: String },
    #[error("mode '{mode}' tier {tier_index} is out of order ({reason})")]
    TierOrder {
        mode: String,
        tier_index: usize,
        reason: &'static str,
    },
    #[error("unlock ladder must start at 0 points (got {first})")]
    LadderStart { first: u64 },
    #[error("unlock ladder step {index} is not strictly increasing")]
    LadderOrder { index: usize },
    #[error("guild size {value} must be between {min} and {max}")]
    GuildSize { value: u32, min: u32, max: u32 },
    #[error("invalid event configuration JSON: {0}")]
    Parse(String),
}

impl EventConfig {
    const fn default_weekly_reset() -> Weekday {
        Weekday::Mon
    }

    const fn default_guild_size() -> u32 {
        DEFAULT_GUILD_SIZE
    }

    const fn default_max_guild_size() -> u32 {
        MAX_GUILD_SIZE
    }

    /// Load and validate a season from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or violates a configuration invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.modes.is_empty() {
            return Err(ConfigError::NoModes);
        }
        let mut seen = HashSet::new();
        for mode in &self.modes {
            if !seen.insert(mode.id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    kind: "mode",
                    id: mode.id.clone(),
                });
            }
            validate_tiers(mode)?;
        }
        let mut seen = HashSet::new();
        for mission in &self.missions {
            if !seen.insert(mission.id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    kind: "mission",
                    id: mission.id.clone(),
                });
            }
        }
        validate_ladder(&self.unlock_ladder)?;
        if !(MIN_GUILD_SIZE..=self.max_guild_size).contains(&self.default_guild_size) {
            return Err(ConfigError::GuildSize {
                value: self.default_guild_size,
                min: MIN_GUILD_SIZE,
                max: self.max_guild_size,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn mode(&self, mode_id: &str) -> Option<&Mode> {
        self.modes.iter().find(|mode| mode.id == mode_id)
    }

    #[must_use]
    pub fn mission(&self, mission_id: &str) -> Option<&Mission> {
        self.missions.iter().find(|mission| mission.id == mission_id)
    }

    pub fn daily_modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter().filter(|mode| mode.is_daily())
    }

    pub fn weekly_modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter().filter(|mode| mode.is_weekly())
    }

    /// Map a possibly renamed id onto the current one.
    #[must_use]
    pub fn canonical_id<'a>(&'a self, id: &'a str) -> &'a str {
        self.legacy_ids.get(id).map_or(id, String::as_str)
    }
}

fn validate_tiers(mode: &Mode) -> Result<(), ConfigError> {
    if mode.tiers.is_empty() {
        return Err(ConfigError::EmptyTiers {
            mode: mode.id.clone(),
        });
    }
    for (index, pair) in mode.tiers.windows(2).enumerate() {
        let (better, broader) = (&pair[0], &pair[1]);
        if broader.member_cap < better.member_cap {
            return Err(ConfigError::TierOrder {
                mode: mode.id.clone(),
                tier_index: index + 1,
                reason: "member cap shrinks",
            });
        }
        if broader.points > better.points {
            return Err(ConfigError::TierOrder {
                mode: mode.id.clone(),
                tier_index: index + 1,
                reason: "points grow",
            });
        }
    }
    Ok(())
}

fn validate_ladder(ladder: &[TierUnlockRequirement]) -> Result<(), ConfigError> {
    let Some(first) = ladder.first() else {
        return Ok(());
    };
    if first.required_points != 0 {
        return Err(ConfigError::LadderStart {
            first: first.required_points,
        });
    }
    for (index, pair) in ladder.windows(2).enumerate() {
        if pair[1].difficulty <= pair[0].difficulty
            || pair[1].required_points <= pair[0].required_points
        {
            return Err(ConfigError::LadderOrder { index: index + 1 });
        }
    }
    Ok(())
}

fn bracket_tiers(caps: [u32; 5], points: [u64; 5]) -> SmallVec<[RewardTier; 5]> {
    const LABELS: [&str; 5] = ["Top 20", "Top 50", "Top 100", "Top 200", "Top 500"];
    LABELS
        .iter()
        .zip(caps)
        .zip(points)
        .map(|((label, cap), pts)| RewardTier::new(label, cap, pts))
        .collect()
}

fn mission(id: &str, name: &str, points_per_completion: u64, member_cap: u32) -> Mission {
    Mission {
        id: id.to_string(),
        name: name.to_string(),
        points_per_completion,
        member_cap,
    }
}

fn glyphshade_ladder() -> Vec<TierUnlockRequirement> {
    const THRESHOLDS: [u64; 25] = [
        0, 10_000, 20_000, 30_000, 40_000, 50_000, 60_000, 70_000, 80_000, 90_000, 105_000,
        120_000, 135_000, 150_000, 165_000, 180_000, 200_000, 220_000, 240_000, 260_000, 285_000,
        310_000, 335_000, 360_000, 385_000,
    ];
    (1..)
        .zip(THRESHOLDS)
        .map(|(difficulty, required_points)| TierUnlockRequirement {
            difficulty,
            required_points,
        })
        .collect()
}

fn legacy_ids() -> BTreeMap<String, String> {
    [
        ("arena-suprema", "supreme-arena"),
        ("regno-onirico", "dream-realm"),
        ("duello-onore", "honor-duel"),
        ("labirinto-arcano", "arcane-labyrinth"),
        ("mission-arena", "mission-supreme-arena"),
        ("mission-regno", "mission-dream-realm"),
        ("mission-duello", "mission-honor-duel"),
        ("mission-labirinto", "mission-arcane-labyrinth"),
    ]
    .into_iter()
    .map(|(old, new)| (old.to_string(), new.to_string()))
    .collect()
}

impl Default for EventConfig {
    /// The bundled Supremacy season.
    fn default() -> Self {
        Self {
            name: "Supremacy".to_string(),
            weekly_reset: Weekday::Mon,
            default_end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap_or_default(),
            default_guild_size: DEFAULT_GUILD_SIZE,
            max_guild_size: MAX_GUILD_SIZE,
            modes: vec![
                Mode {
                    id: "supreme-arena".to_string(),
                    name: "Supreme Arena".to_string(),
                    cadence: Cadence::Daily,
                    point_cap: Some(4_140),
                    availability: Availability::with_blackout(&[Weekday::Mon, Weekday::Tue]),
                    tiers: bracket_tiers([4, 10, 12, 15, 20], [120, 100, 80, 60, 40]),
                },
                Mode {
                    id: "dream-realm".to_string(),
                    name: "Dream Realm".to_string(),
                    cadence: Cadence::Daily,
                    point_cap: Some(3_020),
                    availability: Availability::always_open(),
                    tiers: bracket_tiers([4, 10, 12, 15, 20], [100, 80, 60, 40, 25]),
                },
                Mode {
                    id: "honor-duel".to_string(),
                    name: "Honor Duel".to_string(),
                    cadence: Cadence::Weekly,
                    point_cap: Some(3_600),
                    availability: Availability::always_open(),
                    tiers: bracket_tiers([3, 5, 7, 9, 12], [100; 5]),
                },
                Mode {
                    id: "arcane-labyrinth".to_string(),
                    name: "Arcane Labyrinth".to_string(),
                    cadence: Cadence::Weekly,
                    point_cap: Some(3_600),
                    availability: Availability::always_open(),
                    tiers: bracket_tiers([3, 5, 7, 9, 12], [100; 5]),
                },
            ],
            missions: vec![
                mission("mission-supreme-arena", "Arena / Supreme Arena", 80, 20),
                mission("mission-dream-realm", "Dream Realm", 80, 20),
                mission("mission-honor-duel", "Honor Duel", 300, 3),
                mission("mission-arcane-labyrinth", "Arcane Labyrinth", 300, 3),
            ],
            unlock_ladder: glyphshade_ladder(),
            legacy_ids: legacy_ids(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_season_is_valid() {
        let config = EventConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.daily_modes().count(), 2);
        assert_eq!(config.weekly_modes().count(), 2);
        assert_eq!(config.unlock_ladder.len(), 25);
        assert_eq!(config.unlock_ladder[24].required_points, 385_000);
        assert_eq!(
            config.default_end_date,
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
        );
    }

    #[test]
    fn canonical_id_maps_legacy_names() {
        let config = EventConfig::default();
        assert_eq!(config.canonical_id("arena-suprema"), "supreme-arena");
        assert_eq!(config.canonical_id("mission-regno"), "mission-dream-realm");
        assert_eq!(config.canonical_id("dream-realm"), "dream-realm");
    }

    #[test]
    fn validate_rejects_broken_tables() {
        let mut config = EventConfig::default();
        config.modes[1].tiers.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyTiers { .. })
        ));

        let mut config = EventConfig::default();
        config.modes[0].tiers.swap(0, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TierOrder { tier_index: 1, .. })
        ));

        let mut config = EventConfig::default();
        config.unlock_ladder[3].required_points = 5;
        assert_eq!(config.validate(), Err(ConfigError::LadderOrder { index: 3 }));

        let mut config = EventConfig::default();
        config.unlock_ladder[0].required_points = 1;
        assert_eq!(config.validate(), Err(ConfigError::LadderStart { first: 1 }));

        let mut config = EventConfig::default();
        config.missions.push(config.missions[0].clone());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateId { kind: "mission", .. })
        ));

        let mut config = EventConfig::default();
        config.default_guild_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::GuildSize { .. })));

        let mut config = EventConfig::default();
        config.modes.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoModes));
    }

    #[test]
    fn json_round_trip_preserves_season() {
        let config = EventConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = EventConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn from_json_applies_defaults_and_validates() {
        let json = r#"{
            "name": "Mini",
            "default_end_date": "2026-05-01",
            "modes": [
                {
                    "id": "solo",
                    "name": "Solo",
                    "cadence": "daily",
                    "tiers": [{ "label": "Top 1", "member_cap": 1, "points": 10 }]
                }
            ]
        }"#;
        let config = EventConfig::from_json(json).unwrap();
        assert_eq!(config.weekly_reset, Weekday::Mon);
        assert_eq!(config.default_guild_size, DEFAULT_GUILD_SIZE);
        assert!(config.missions.is_empty());
        assert!(config.modes[0].point_cap.is_none());
        assert!(!config.modes[0].availability.is_restricted());

        assert!(matches!(
            EventConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
