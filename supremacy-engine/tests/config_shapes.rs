use std::hash::Hasher;

use serde_json::{Map, Value, json};
use supremacy_engine::{Cadence, ConfigError, EventConfig, max_mode_points};
use twox_hash::XxHash64;

#[test]
fn bundled_config_snapshot_is_stable_through_json() {
    let config = EventConfig::default();
    let canonical = canonical_json(&config);
    let reparsed = EventConfig::from_json(&canonical).unwrap();
    assert_eq!(
        snapshot_hash(canonical.as_bytes()),
        snapshot_hash(canonical_json(&reparsed).as_bytes()),
        "event config changed shape through JSON\n{canonical}"
    );
    assert_eq!(reparsed, config);
}

#[test]
fn bundled_config_shape() {
    let value = serde_json::to_value(EventConfig::default()).unwrap();
    assert_eq!(value["weekly_reset"], "Mon");
    assert_eq!(value["default_end_date"], "2026-03-04");
    assert_eq!(value["modes"][0]["availability"]["closed_on"], json!(["Mon", "Tue"]));
    assert_eq!(value["modes"][2]["cadence"], "weekly");
    assert_eq!(value["missions"].as_array().unwrap().len(), 4);
    assert_eq!(value["unlock_ladder"][0]["required_points"], 0);
    assert_eq!(value["legacy_ids"]["regno-onirico"], "dream-realm");
}

#[test]
fn every_bundled_mode_is_capped_at_saturation() {
    let config = EventConfig::default();
    for mode in &config.modes {
        let cap = mode.point_cap.expect("bundled modes carry a point cap");
        assert_eq!(max_mode_points(mode), cap, "{}", mode.id);
        let expected = match mode.id.as_str() {
            "supreme-arena" | "dream-realm" => Cadence::Daily,
            _ => Cadence::Weekly,
        };
        assert_eq!(mode.cadence, expected);
    }
}

#[test]
fn alternate_season_loads_from_json() {
    let season = json!({
        "name": "Spring Clash",
        "weekly_reset": "Thursday",
        "default_end_date": "2026-06-30",
        "default_guild_size": 15,
        "max_guild_size": 30,
        "modes": [
            {
                "id": "skirmish",
                "name": "Skirmish",
                "cadence": "daily",
                "point_cap": 500,
                "availability": { "closed_on": ["Sun"] },
                "tiers": [
                    { "label": "Top 10", "member_cap": 2, "points": 50 },
                    { "label": "Top 100", "member_cap": 6, "points": 20 }
                ]
            }
        ],
        "missions": [
            { "id": "daily-skirmish", "name": "Skirmish", "points_per_completion": 10, "member_cap": 30 }
        ],
        "unlock_ladder": [
            { "difficulty": 1, "required_points": 0 },
            { "difficulty": 2, "required_points": 2500 }
        ]
    });
    let config = EventConfig::from_json(&season.to_string()).unwrap();
    assert_eq!(config.weekly_reset, chrono::Weekday::Thu);
    assert_eq!(config.modes[0].tiers.len(), 2);
    assert!(config.modes[0].availability.is_restricted());
    assert!(config.legacy_ids.is_empty());
}

#[test]
fn invalid_seasons_are_rejected() {
    let base = serde_json::to_value(EventConfig::default()).unwrap();

    let mut duplicate = base.clone();
    duplicate["modes"][1]["id"] = json!("supreme-arena");
    assert_eq!(
        EventConfig::from_json(&duplicate.to_string()),
        Err(ConfigError::DuplicateId {
            kind: "mode",
            id: "supreme-arena".to_string(),
        })
    );

    let mut shrinking = base.clone();
    shrinking["modes"][3]["tiers"][4]["member_cap"] = json!(1);
    assert!(matches!(
        EventConfig::from_json(&shrinking.to_string()),
        Err(ConfigError::TierOrder { tier_index: 4, .. })
    ));

    let mut stalled = base.clone();
    stalled["unlock_ladder"][10]["required_points"] = json!(90_000);
    assert_eq!(
        EventConfig::from_json(&stalled.to_string()),
        Err(ConfigError::LadderOrder { index: 10 })
    );

    let mut oversized = base;
    oversized["default_guild_size"] = json!(250);
    assert!(matches!(
        EventConfig::from_json(&oversized.to_string()),
        Err(ConfigError::GuildSize { value: 250, .. })
    ));
}

fn canonical_json(config: &EventConfig) -> String {
    let value = canonicalize_value(serde_json::to_value(config).unwrap());
    serde_json::to_string_pretty(&value).unwrap()
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_value).collect()),
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut result = Map::with_capacity(entries.len());
            for (key, value) in entries {
                result.insert(key, canonicalize_value(value));
            }
            Value::Object(result)
        }
        other => other,
    }
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}
