//! Persisted snapshot format and lenient decoding.
//!
//! The wire shape is camelCase JSON:
//! `{guildSize, rankings:[{modeId,tierIndex,memberCount}],
//! missions:[{missionId,completedMembers}], currentPoints, eventEndDate}`.
//! Decoding never fails once the text is valid JSON: each field falls back to
//! its default on its own, malformed list entries are dropped and legacy ids
//! are rewritten to the current ones.
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::calendar::event_end_from_date;
use crate::config::EventConfig;
use crate::numbers::{clamp_to_u32, round_f64_to_i64};
use crate::state::InputState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub mode_id: String,
    pub tier_index: usize,
    pub member_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionEntry {
    pub mission_id: String,
    pub completed_members: u32,
}

/// Serializable image of an [`InputState`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Zero means "not recorded" and decodes to the default guild size.
    #[serde(default)]
    pub guild_size: u32,
    #[serde(default)]
    pub rankings: Vec<RankingEntry>,
    #[serde(default)]
    pub missions: Vec<MissionEntry>,
    #[serde(default)]
    pub current_points: u64,
    /// ISO-8601 instant; a bare `YYYY-MM-DD` is also accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_end_date: Option<String>,
}

impl Snapshot {
    /// Parse snapshot text. Only text that is not JSON at all is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] when `json` cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Recover whatever fields are usable from an arbitrary JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            log::warn!("snapshot is not a JSON object; using defaults");
            return Self::default();
        };
        Self {
            guild_size: object
                .get("guildSize")
                .and_then(integer)
                .map_or(0, |size| clamp_to_u32(size, u32::MAX)),
            rankings: entries(object.get("rankings"), "rankings", ranking_entry),
            missions: entries(object.get("missions"), "missions", mission_entry),
            current_points: object
                .get("currentPoints")
                .and_then(integer)
                .map_or(0, |points| u64::try_from(points).unwrap_or(0)),
            event_end_date: object
                .get("eventEndDate")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Pretty-printed JSON, as written by file export.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Compact JSON, as written by the best-effort cache.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_compact_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|big| i64::try_from(big).unwrap_or(i64::MAX)))
        .or_else(|| value.as_f64().map(round_f64_to_i64))
}

fn entries<T>(
    value: Option<&Value>,
    field: &str,
    decode: fn(&Map<String, Value>) -> Option<T>,
) -> Vec<T> {
    let Some(value) = value else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        log::warn!("snapshot field {field} is not a list; ignoring it");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let decoded = item.as_object().and_then(decode);
            if decoded.is_none() {
                log::warn!("dropping malformed {field} entry {item}");
            }
            decoded
        })
        .collect()
}

fn ranking_entry(object: &Map<String, Value>) -> Option<RankingEntry> {
    let mode_id = object.get("modeId")?.as_str()?.to_string();
    let tier_index = usize::try_from(object.get("tierIndex").and_then(integer)?).ok()?;
    let member_count = object
        .get("memberCount")
        .and_then(integer)
        .map_or(0, |count| clamp_to_u32(count, u32::MAX));
    Some(RankingEntry {
        mode_id,
        tier_index,
        member_count,
    })
}

fn mission_entry(object: &Map<String, Value>) -> Option<MissionEntry> {
    let mission_id = object.get("missionId")?.as_str()?.to_string();
    let completed_members = object
        .get("completedMembers")
        .and_then(integer)
        .map_or(0, |count| clamp_to_u32(count, u32::MAX));
    Some(MissionEntry {
        mission_id,
        completed_members,
    })
}

/// Parse a stored end date and pin it to 23:59:59 UTC on its UTC date.
#[must_use]
pub fn parse_event_end(text: &str) -> Option<DateTime<Utc>> {
    let date = match DateTime::parse_from_rfc3339(text) {
        Ok(instant) => instant.with_timezone(&Utc).date_naive(),
        Err(_) => NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?,
    };
    Some(event_end_from_date(date))
}

impl InputState {
    /// Rebuild inputs from a snapshot, clamping every value through the setters.
    #[must_use]
    pub fn from_snapshot(config: &EventConfig, snapshot: &Snapshot) -> Self {
        let mut state = Self::new(config);
        if snapshot.guild_size > 0 {
            state.set_guild_size(config, i64::from(snapshot.guild_size));
        }
        for entry in &snapshot.rankings {
            state.set_ranking(
                config,
                &entry.mode_id,
                entry.tier_index,
                i64::from(entry.member_count),
            );
        }
        for entry in &snapshot.missions {
            state.set_mission(
                config,
                &entry.mission_id,
                i64::from(entry.completed_members),
            );
        }
        state.set_current_points(i64::try_from(snapshot.current_points).unwrap_or(i64::MAX));
        if let Some(text) = snapshot.event_end_date.as_deref() {
            match parse_event_end(text) {
                Some(event_end) => state.set_event_end(event_end),
                None => log::warn!("unreadable event end date {text:?}; keeping the default"),
            }
        }
        state
    }

    /// Every configured tier and mission in configuration order.
    #[must_use]
    pub fn to_snapshot(&self, config: &EventConfig) -> Snapshot {
        let rankings = config
            .modes
            .iter()
            .flat_map(|mode| {
                (0..mode.tiers.len()).map(|tier_index| RankingEntry {
                    mode_id: mode.id.clone(),
                    tier_index,
                    member_count: self.ranking(&mode.id, tier_index),
                })
            })
            .collect();
        let missions = config
            .missions
            .iter()
            .map(|mission| MissionEntry {
                mission_id: mission.id.clone(),
                completed_members: self.mission(&mission.id),
            })
            .collect();
        Snapshot {
            guild_size: self.guild_size,
            rankings,
            missions,
            current_points: self.current_points,
            event_end_date: Some(self.event_end.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}
