mod common;
mod logic;

use anyhow::{Context, Result, ensure};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use common::reports::CalculatorReport;
use common::{FileStore, build_report, parse_mission_edit, parse_rank_edit, split_csv};
use logic::{ScenarioResult, ScenarioRunner, list_scenarios};
use supremacy_engine::{CalculatorSession, EventConfig, MemoryStore, ProjectionMode, SnapshotStore};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunMode {
    /// Points summary, event projection and unlock forecast
    Report,
    /// Engine self-check scenarios
    Scenarios,
    /// Report followed by the self-checks
    Both,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProjectionArg {
    /// Current points plus everything left in the event
    Event,
    /// Current points plus one more day
    Daily,
    /// Current points plus one more week
    Weekly,
}

impl ProjectionArg {
    const fn mode(self) -> ProjectionMode {
        match self {
            Self::Event => ProjectionMode::Event,
            Self::Daily => ProjectionMode::Daily,
            Self::Weekly => ProjectionMode::Weekly,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "supremacy-cli", version)]
#[command(
    about = "Supremacy guild event calculator - points, projections, unlock forecasts and engine checks"
)]
struct Args {
    /// What to run: report, scenarios, or both
    #[arg(long, value_enum, default_value_t = RunMode::Report)]
    mode: RunMode,

    /// Snapshot file with the saved calculator inputs
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Season configuration JSON (defaults to the bundled season)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluate at this RFC 3339 instant instead of the current time
    #[arg(long)]
    now: Option<String>,

    /// Projection horizon used for the unlock forecast
    #[arg(long, value_enum, default_value_t = ProjectionArg::Event)]
    projection: ProjectionArg,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Event points already earned
    #[arg(long, allow_negative_numbers = true)]
    current_points: Option<i64>,

    /// Guild members (clamped to the season's range)
    #[arg(long, allow_negative_numbers = true)]
    guild_size: Option<i64>,

    /// Event end date (YYYY-MM-DD, ends at 23:59:59 UTC)
    #[arg(long)]
    end_date: Option<String>,

    /// Ranking edit `mode:tier=count`, tier 0 being the most exclusive (repeatable)
    #[arg(long = "rank", value_name = "MODE:TIER=COUNT")]
    ranks: Vec<String>,

    /// Mission edit `id=count` (repeatable)
    #[arg(long = "mission", value_name = "ID=COUNT")]
    missions: Vec<String>,

    /// Write the resulting inputs back to the snapshot file
    #[arg(long, requires = "snapshot")]
    save: bool,

    /// Zero every count and the current points before applying edits
    #[arg(long)]
    reset: bool,

    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// Runs per scenario
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let config = Arc::new(load_config(args.config.as_deref())?);
    let now = resolve_now(args.now.as_deref())?;

    let report = if matches!(args.mode, RunMode::Report | RunMode::Both) {
        Some(run_calculator(&args, config, now)?)
    } else {
        None
    };
    let results = run_scenarios(&args);

    write_reports(&args, report.as_ref(), &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏆 Supremacy Points Calculator".bright_cyan().bold());
    println!("{}", "==============================".cyan());
}

fn load_config(path: Option<&Path>) -> Result<EventConfig> {
    let Some(path) = path else {
        return Ok(EventConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read season config {}", path.display()))?;
    EventConfig::from_json(&text)
        .with_context(|| format!("invalid season config {}", path.display()))
}

fn resolve_now(text: Option<&str>) -> Result<DateTime<Utc>> {
    let Some(text) = text else {
        return Ok(Utc::now());
    };
    DateTime::parse_from_rfc3339(text.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .with_context(|| format!("invalid --now '{text}' (expected RFC 3339)"))
}

fn parse_end_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid --end-date '{text}' (expected YYYY-MM-DD)"))
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        let remaining: Vec<String> = list_scenarios()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .filter(|key| !scenarios.contains(key))
            .collect();
        scenarios.extend(remaining);
    }
    scenarios
}

/// Load the inputs, apply command-line edits and build the report. Without
/// `--save` the snapshot file is only read.
fn run_calculator(
    args: &Args,
    config: Arc<EventConfig>,
    now: DateTime<Utc>,
) -> Result<CalculatorReport> {
    let projection = args.projection.mode();
    if args.save {
        let path = args
            .snapshot
            .clone()
            .context("--save needs --snapshot <path>")?;
        let mut session = CalculatorSession::restore(config, FileStore::new(path));
        apply_edits(&mut session, args)?;
        ensure!(
            session.persist(),
            "could not save snapshot to {}",
            session.store().path().display()
        );
        return Ok(build_report(&session, projection, now));
    }

    let saved = match &args.snapshot {
        Some(path) => FileStore::new(path)
            .load()
            .with_context(|| format!("failed to load snapshot {}", path.display()))?,
        None => None,
    };
    let store = saved.map_or_else(MemoryStore::new, |text| MemoryStore::with_snapshot(text));
    let mut session = CalculatorSession::restore(config, store);
    apply_edits(&mut session, args)?;
    Ok(build_report(&session, projection, now))
}

fn apply_edits<S: SnapshotStore>(session: &mut CalculatorSession<S>, args: &Args) -> Result<()> {
    let ranks = args
        .ranks
        .iter()
        .map(|text| parse_rank_edit(text))
        .collect::<Result<Vec<_>>>()?;
    let missions = args
        .missions
        .iter()
        .map(|text| parse_mission_edit(text))
        .collect::<Result<Vec<_>>>()?;
    let end_date = args.end_date.as_deref().map(parse_end_date).transpose()?;

    if args.reset {
        session.reset();
    }
    if let Some(size) = args.guild_size {
        session.set_guild_size(size);
    }
    if let Some(date) = end_date {
        session.set_event_end_date(date);
    }
    if let Some(points) = args.current_points {
        session.set_current_points(points);
    }
    for edit in ranks {
        if !session.set_ranking(&edit.mode_id, edit.tier_index, edit.count) {
            eprintln!(
                "⚠️  Unknown ranking slot: {}",
                format!("{}:{}", edit.mode_id, edit.tier_index).yellow()
            );
        }
    }
    for edit in missions {
        if !session.set_mission(&edit.mission_id, edit.count) {
            eprintln!("⚠️  Unknown mission: {}", edit.mission_id.yellow());
        }
    }
    Ok(())
}

fn run_scenarios(args: &Args) -> Vec<ScenarioResult> {
    if !matches!(args.mode, RunMode::Scenarios | RunMode::Both) {
        return Vec::new();
    }
    if args.report == "console" {
        println!("{}", "🧠 Running Engine Checks".bright_yellow().bold());
        println!("{}", "-".repeat(30).yellow());
    }
    let runner = ScenarioRunner::new(args.verbose);
    runner.run_all(&expand_scenarios(&args.scenarios), args.iterations)
}

fn write_reports(
    args: &Args,
    report: Option<&CalculatorReport>,
    results: &[ScenarioResult],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let scenarios_ran = matches!(args.mode, RunMode::Scenarios | RunMode::Both);

    match args.report.as_str() {
        "json" => match report {
            Some(report) if scenarios_ran => {
                let mut combined = serde_json::Map::new();
                combined.insert("report".to_string(), serde_json::to_value(report)?);
                combined.insert("scenarios".to_string(), serde_json::to_value(results)?);
                writeln!(
                    &mut output_target,
                    "{}",
                    serde_json::to_string_pretty(&combined)?
                )?;
            }
            Some(report) => common::reports::generate_json_report(&mut output_target, report)?,
            None => logic::reports::generate_json_report(&mut output_target, results)?,
        },
        "markdown" => {
            if let Some(report) = report {
                common::reports::generate_markdown_report(&mut output_target, report)?;
            }
            if scenarios_ran {
                if report.is_some() {
                    writeln!(&mut output_target)?;
                }
                if results.is_empty() {
                    writeln!(
                        &mut output_target,
                        "# Supremacy Engine Check Results\n\n_No scenarios executed._"
                    )?;
                } else {
                    logic::reports::generate_markdown_report(&mut output_target, results)?;
                }
            }
        }
        _ => {
            if let Some(report) = report {
                common::reports::generate_console_report(&mut output_target, report)?;
            }
            if scenarios_ran {
                if results.is_empty() {
                    writeln!(&mut output_target, "No engine checks executed.")?;
                } else {
                    logic::reports::generate_console_report(
                        &mut output_target,
                        results,
                        start_time.elapsed(),
                    )?;
                }
            }
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
