//! Command-line front end
//!
//! Subcommands:
//!   - `evaluate` — Evaluate a JSON snapshot against the rule table
//!   - `compare`  — Compare an `Asset Class,Amount` CSV against allocation targets
//!   - `rules`    — Print the active rule table

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{debug, info};

use macrowatch::allocation::{parse_allocation_csv, AllocationComparator};
use macrowatch::config::Config;
use macrowatch::logging;
use macrowatch::models::plan::Plan;
use macrowatch::reports::{
    render_allocation_table, render_plan_badges, render_risk, render_signal_table,
};
use macrowatch::services::{SnapshotProvider, StaticSnapshotProvider};
use macrowatch::signals::{PlanView, SignalEngine};

#[derive(Parser)]
#[command(
    name = "macrowatch",
    version,
    about = "Map macro indicator snapshots onto strategic portfolio plans"
)]
struct Cli {
    /// TOML file overriding thresholds and allocation targets
    #[arg(long, global = true, env = "MACROWATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a snapshot file
    Evaluate {
        /// JSON object of indicator values; null means unknown
        snapshot: PathBuf,
        /// Show a single plan's view
        #[arg(long)]
        plan: Option<Plan>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Compare an allocation CSV against targets
    Compare {
        allocation: PathBuf,
        /// Allowed deviation in percentage points
        #[arg(long)]
        tolerance: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Print the active rule table
    Rules,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    debug!(config = ?cli.config, "Configuration loaded");
    let engine = SignalEngine::from_config(&config);

    match cli.command {
        Commands::Evaluate {
            snapshot,
            plan,
            json,
        } => evaluate(&engine, &snapshot, plan, json).await?,
        Commands::Compare {
            allocation,
            tolerance,
            json,
        } => compare(&config, &allocation, tolerance, json)?,
        Commands::Rules => {
            for rule in engine.rules().rules() {
                println!(
                    "{:<24} {:<22} {:<34} {}",
                    rule.id,
                    rule.label,
                    rule.plan.title(),
                    rule.action
                );
            }
        }
    }

    Ok(())
}

async fn evaluate(
    engine: &SignalEngine,
    path: &Path,
    plan: Option<Plan>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = StaticSnapshotProvider::from_json_file(path)?
        .fetch_snapshot()
        .await?;
    info!(
        known = snapshot.len(),
        unknown = snapshot.unknown().len(),
        "Snapshot loaded"
    );

    if let Some(plan) = plan {
        let view = engine.plan_view(plan, &snapshot);
        if json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }
        println!("{}\n", plan.title());
        match view {
            PlanView::Signals(summary) => {
                print!("{}", render_signal_table(&summary.results));
                println!("\n{}", summary.verdict.message());
            }
            PlanView::Allocation {
                targets, tolerance, ..
            } => {
                for (asset_class, target) in targets {
                    println!("{asset_class:<12} {target:>6.2}%");
                }
                println!("Tolerance: ±{tolerance}%");
            }
        }
        return Ok(());
    }

    let report = engine.evaluate(&snapshot);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_signal_table(&report.results));
        println!();
        print!("{}", render_plan_badges(&report.plans));
        println!("\n{}", render_risk(&report.risk));
    }
    Ok(())
}

fn compare(
    config: &Config,
    path: &Path,
    tolerance: Option<f64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let rows = parse_allocation_csv(&contents)?;

    let mut comparator = AllocationComparator::from_config(&config.allocation);
    if let Some(tolerance) = tolerance {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(format!("tolerance must be a non-negative number, got {tolerance}").into());
        }
        comparator = comparator.with_tolerance(tolerance);
    }
    let report = comparator.compare(&rows)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_allocation_table(&report));
    }
    Ok(())
}
