// ==========================================
// AIT CMMS - command-line entry point
// ==========================================
// Generates the weekly PM work list for a given database and week,
// printing the assignments as JSON for downstream tooling.
// ==========================================

use ait_cmms::domain::equipment::week_start_monday;
use ait_cmms::engine::PmSchedulingService;
use ait_cmms::importer::PriorityListLoader;
use ait_cmms::{db, logging, SchedulerConfig, APP_NAME, VERSION};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

struct CliArgs {
    db_path: String,
    week_start: NaiveDate,
    max_pms: Option<usize>,
    priority_dir: PathBuf,
}

fn parse_args() -> Result<CliArgs> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        bail!(
            "usage: ait-cmms <db_path> <week_start YYYY-MM-DD> [max_pms] [priority_list_dir]"
        );
    }

    let week_start = NaiveDate::parse_from_str(&args[1], "%Y-%m-%d")
        .with_context(|| format!("invalid week start date: {}", args[1]))?;

    let max_pms = match args.get(2) {
        Some(raw) => Some(
            raw.parse::<usize>()
                .with_context(|| format!("invalid max_pms: {}", raw))?,
        ),
        None => None,
    };

    let priority_dir = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(CliArgs {
        db_path: args[0].clone(),
        week_start,
        max_pms,
        priority_dir,
    })
}

fn main() -> Result<()> {
    logging::init();
    info!("{} v{} starting", APP_NAME, VERSION);

    let args = parse_args()?;

    let conn = db::open_connection(&args.db_path)
        .with_context(|| format!("failed to open database: {}", args.db_path))?;
    db::ensure_schema(&conn).context("failed to ensure database schema")?;

    let priority_lists = PriorityListLoader::load_default(&args.priority_dir);
    for warning in &priority_lists.warnings {
        warn!("{}", warning);
    }

    let service = PmSchedulingService::new(
        Arc::new(Mutex::new(conn)),
        priority_lists.priority_map,
        SchedulerConfig::default(),
    );

    let week = week_start_monday(args.week_start);
    let assignments = service
        .generate_weekly_schedule(week, args.max_pms)
        .context("schedule generation failed")?;

    println!("{}", serde_json::to_string_pretty(&assignments)?);
    info!(count = assignments.len(), week_start = %week, "done");
    Ok(())
}
