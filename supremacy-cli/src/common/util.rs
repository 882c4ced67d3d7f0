use anyhow::{Context, Result, bail};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// A `--rank mode:tier=count` edit. Tiers are zero-based, most exclusive first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEdit {
    pub mode_id: String,
    pub tier_index: usize,
    pub count: i64,
}

/// A `--mission id=count` edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionEdit {
    pub mission_id: String,
    pub count: i64,
}

pub fn parse_rank_edit(text: &str) -> Result<RankEdit> {
    let (target, count) = text
        .split_once('=')
        .with_context(|| format!("rank edit '{text}' is missing '=count'"))?;
    let (mode_id, tier) = target
        .split_once(':')
        .with_context(|| format!("rank edit '{text}' is missing ':tier'"))?;
    let mode_id = mode_id.trim();
    if mode_id.is_empty() {
        bail!("rank edit '{text}' has an empty mode id");
    }
    let tier_index = tier
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid tier index in rank edit '{text}'"))?;
    let count = count
        .trim()
        .parse::<i64>()
        .with_context(|| format!("invalid member count in rank edit '{text}'"))?;
    Ok(RankEdit {
        mode_id: mode_id.to_string(),
        tier_index,
        count,
    })
}

pub fn parse_mission_edit(text: &str) -> Result<MissionEdit> {
    let (mission_id, count) = text
        .split_once('=')
        .with_context(|| format!("mission edit '{text}' is missing '=count'"))?;
    let mission_id = mission_id.trim();
    if mission_id.is_empty() {
        bail!("mission edit '{text}' has an empty mission id");
    }
    let count = count
        .trim()
        .parse::<i64>()
        .with_context(|| format!("invalid completion count in mission edit '{text}'"))?;
    Ok(MissionEdit {
        mission_id: mission_id.to_string(),
        count,
    })
}
