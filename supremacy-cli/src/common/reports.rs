use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use colored::Colorize;
use serde::Serialize;
use supremacy_engine::summary::{mission_points, mode_points};
use supremacy_engine::{
    CalculatorSession, Cadence, EventProjection, ProjectionMode, SnapshotStore, UnlockReport,
    event_progress_pct, format_time_remaining, format_until_next_reset,
};

/// One mode's contribution for the current cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ModeLine {
    pub id: String,
    pub name: String,
    pub cadence: Cadence,
    pub points: u64,
    pub point_cap: Option<u64>,
    pub open_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionLine {
    pub id: String,
    pub name: String,
    pub completed: u32,
    pub points: u64,
}

/// Everything the calculator shows for one instant.
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorReport {
    pub season: String,
    pub generated_at: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
    pub time_remaining: String,
    pub until_next_reset: String,
    pub event_progress_pct: f64,
    pub guild_size: u32,
    pub current_points: u64,
    pub modes: Vec<ModeLine>,
    pub missions: Vec<MissionLine>,
    pub projection: EventProjection,
    pub unlock: UnlockReport,
}

pub fn build_report<S: SnapshotStore>(
    session: &CalculatorSession<S>,
    projection_mode: ProjectionMode,
    now: DateTime<Utc>,
) -> CalculatorReport {
    let config = session.config();
    let state = session.state();
    let weekday = now.date_naive().weekday();
    let projection = session.projection(now);

    let modes = config
        .modes
        .iter()
        .map(|mode| ModeLine {
            id: mode.id.clone(),
            name: mode.name.clone(),
            cadence: mode.cadence,
            points: mode_points(mode, state),
            point_cap: mode.point_cap,
            open_today: mode.availability.is_open_on(weekday),
        })
        .collect();
    let missions = config
        .missions
        .iter()
        .map(|mission| MissionLine {
            id: mission.id.clone(),
            name: mission.name.clone(),
            completed: state.mission(&mission.id),
            points: mission_points(mission, state),
        })
        .collect();

    CalculatorReport {
        season: config.name.clone(),
        generated_at: now,
        event_end: state.event_end,
        time_remaining: format_time_remaining(state.event_end, now),
        until_next_reset: format_until_next_reset(now),
        event_progress_pct: event_progress_pct(projection.days_remaining),
        guild_size: state.guild_size,
        current_points: state.current_points,
        modes,
        missions,
        unlock: session.unlock_report(projection_mode, now),
        projection,
    }
}

pub fn generate_json_report(out: &mut dyn Write, report: &CalculatorReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_console_report(out: &mut dyn Write, report: &CalculatorReport) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("📅 {} ends {}", report.season, report.event_end.format("%Y-%m-%d %H:%M UTC"))
            .bright_cyan()
            .bold()
    )?;
    writeln!(
        out,
        "   Time remaining: {} (next reset in {})",
        report.time_remaining, report.until_next_reset
    )?;
    writeln!(out, "   Event progress: {:.1}%", report.event_progress_pct)?;
    writeln!(
        out,
        "👥 Guild size: {}   Current points: {}",
        report.guild_size,
        report.current_points.to_string().green()
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "🏆 Rankings".bright_yellow().bold())?;
    for mode in &report.modes {
        let cap = mode
            .point_cap
            .map_or_else(String::new, |cap| format!(" / {cap}"));
        let closed = if mode.open_today {
            String::new()
        } else {
            " (closed today)".dimmed().to_string()
        };
        writeln!(
            out,
            "   {:22} {:7} {:>6}{cap}{closed}",
            mode.name,
            cadence_label(mode.cadence),
            mode.points
        )?;
    }
    writeln!(out, "{}", "🎯 Missions".bright_yellow().bold())?;
    for mission in &report.missions {
        writeln!(
            out,
            "   {:22} {:>3} done {:>6}",
            mission.name, mission.completed, mission.points
        )?;
    }
    writeln!(out)?;

    let summary = &report.projection.summary;
    writeln!(out, "{}", "📊 Today".bright_cyan().bold())?;
    writeln!(out, "   Daily rankings:  {}", summary.daily_ranking_points)?;
    writeln!(out, "   Weekly rankings: {}", summary.weekly_ranking_points)?;
    writeln!(out, "   Missions:        {}", summary.daily_mission_points)?;
    writeln!(out, "   Total:           {}", summary.total.to_string().bold())?;
    writeln!(out)?;

    let projection = &report.projection;
    writeln!(out, "{}", "🔮 Event Projection".bright_cyan().bold())?;
    writeln!(
        out,
        "   Days remaining: {} (restricted modes open {}), weekly resets: {}",
        projection.days_remaining, projection.arena_days_remaining, projection.weeks_remaining
    )?;
    writeln!(out, "   Daily points:   {}", projection.total_daily_points)?;
    writeln!(out, "   Weekly points:  {}", projection.total_weekly_points)?;
    writeln!(
        out,
        "   Event total:    {}",
        projection.event_total.to_string().green().bold()
    )?;
    writeln!(out)?;

    let unlock = &report.unlock;
    writeln!(
        out,
        "{}",
        format!("🔓 Difficulty Unlocks ({} projection)", unlock.mode)
            .bright_cyan()
            .bold()
    )?;
    writeln!(
        out,
        "   Projected points: {}   Unlocked difficulty: {}",
        unlock.projected_points,
        unlock.unlocked_difficulty().to_string().green()
    )?;
    match unlock.status.next {
        Some(next) => writeln!(
            out,
            "   Next: difficulty {} at {} ({} to go, {:.1}%)",
            next.difficulty, next.required_points, next.points_needed, unlock.status.progress_pct
        )?,
        None => writeln!(out, "   {}", "Every difficulty is unlocked".green())?,
    }
    for row in &unlock.rows {
        let marker = if row.unlocked_now {
            "✅ now".green().to_string()
        } else if let Some(date) = row.unlock_date {
            format!("📅 {date}").yellow().to_string()
        } else {
            "⛔ not this event".red().to_string()
        };
        let projected = if row.unlocked && !row.unlocked_now {
            " (projected)"
        } else {
            ""
        };
        writeln!(
            out,
            "   D{:<3} {:>8}  {marker}{projected}",
            row.difficulty, row.required_points
        )?;
    }
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &CalculatorReport) -> Result<()> {
    writeln!(out, "# {} Points Report\n", report.season)?;
    writeln!(
        out,
        "- **Event end**: {}",
        report.event_end.format("%Y-%m-%d %H:%M UTC")
    )?;
    writeln!(out, "- **Time remaining**: {}", report.time_remaining)?;
    writeln!(out, "- **Guild size**: {}", report.guild_size)?;
    writeln!(out, "- **Current points**: {}\n", report.current_points)?;

    writeln!(out, "## Rankings\n")?;
    writeln!(out, "| Mode | Cadence | Points | Cap | Open today |")?;
    writeln!(out, "|------|---------|--------|-----|------------|")?;
    for mode in &report.modes {
        let cap = mode.point_cap.map_or_else(|| "-".to_string(), |cap| cap.to_string());
        let open = if mode.open_today { "yes" } else { "no" };
        writeln!(
            out,
            "| {} | {} | {} | {cap} | {open} |",
            mode.name,
            cadence_label(mode.cadence),
            mode.points
        )?;
    }

    writeln!(out, "\n## Missions\n")?;
    writeln!(out, "| Mission | Completed | Points |")?;
    writeln!(out, "|---------|-----------|--------|")?;
    for mission in &report.missions {
        writeln!(
            out,
            "| {} | {} | {} |",
            mission.name, mission.completed, mission.points
        )?;
    }

    let projection = &report.projection;
    writeln!(out, "\n## Projection\n")?;
    writeln!(out, "- **Today**: {}", projection.summary.total)?;
    writeln!(
        out,
        "- **Days remaining**: {} (restricted modes open {})",
        projection.days_remaining, projection.arena_days_remaining
    )?;
    writeln!(out, "- **Weekly resets**: {}", projection.weeks_remaining)?;
    writeln!(out, "- **Event total**: {}", projection.event_total)?;

    let unlock = &report.unlock;
    writeln!(out, "\n## Unlocks ({} projection)\n", unlock.mode)?;
    writeln!(
        out,
        "- **Projected points**: {}\n- **Unlocked difficulty**: {}\n",
        unlock.projected_points,
        unlock.unlocked_difficulty()
    )?;
    writeln!(out, "| Difficulty | Required | Status |")?;
    writeln!(out, "|------------|----------|--------|")?;
    for row in &unlock.rows {
        let status = match (row.unlocked_now, row.unlock_date) {
            (true, _) => "unlocked".to_string(),
            (false, Some(date)) => date.to_string(),
            (false, None) => "out of reach".to_string(),
        };
        writeln!(
            out,
            "| {} | {} | {status} |",
            row.difficulty, row.required_points
        )?;
    }
    Ok(())
}

const fn cadence_label(cadence: Cadence) -> &'static str {
    match cadence {
        Cadence::Daily => "daily",
        Cadence::Weekly => "weekly",
    }
}
