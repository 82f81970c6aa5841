//! Batch ward analysis: score every ward, raise alerts, rank the list, and
//! roll it up into dashboard KPIs.
//!
//! Reads a JSON array of ward observations (each optionally carrying a
//! `prior` reading and a `wardArea`) or simulates wards from a seed. Writes
//! the full report as JSON to stdout and ranking and KPI tables to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use canopy_core::batch::{run_batch, simulate_batch, BatchReport, WardInput};
use canopy_core::{PolicyConfig, WardAnalyzer};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ward_batch", about = "Analyse and rank a batch of city wards")]
struct Args {
    /// JSON array of ward observations.
    #[arg(short, long, conflicts_with = "simulate")]
    input: Option<PathBuf>,

    /// Simulate N wards instead of reading an input file.
    #[arg(long, value_name = "N")]
    simulate: Option<usize>,

    /// Seed for simulated wards.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// TOML policy override; defaults to the Delhi policy.
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

// ── IO ────────────────────────────────────────────────────────────────────────

fn load_policy(path: Option<&Path>) -> Result<PolicyConfig> {
    match path {
        Some(p) => PolicyConfig::load(p).with_context(|| format!("loading policy {}", p.display())),
        None => Ok(PolicyConfig::default()),
    }
}

fn read_wards(path: &Path) -> Result<Vec<WardInput>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_ranking(report: &BatchReport) {
    eprintln!(
        "\n{:>4}  {:<24} {:>7} {:>9} {:>7}",
        "Rank", "Ward", "Score", "Priority", "Alerts"
    );
    eprintln!("{}", "-".repeat(56));
    for row in &report.ranking {
        let alerts = report
            .analyses
            .get(row.input_index)
            .map_or(0, |a| a.alerts.len());
        eprintln!(
            "{:>4}  {:<24} {:>7} {:>9} {:>7}",
            row.rank, row.ward_name, row.ranking_score, row.priority.as_ref(), alerts
        );
    }
}

fn print_kpis(report: &BatchReport) {
    eprintln!("\n{:<22} {:>10} {:<8} {:>9}", "KPI", "Value", "Unit", "Status");
    eprintln!("{}", "-".repeat(52));
    for kpi in report.kpis.iter() {
        eprintln!(
            "{:<22} {:>10} {:<8} {:>9}",
            kpi.label,
            kpi.value,
            kpi.unit,
            kpi.status.as_ref()
        );
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let analyzer = WardAnalyzer::new(load_policy(args.policy.as_deref())?);

    let report = match (&args.input, args.simulate) {
        (Some(path), _) => {
            let wards = read_wards(path)?;
            eprintln!("Analysing {} wards from {} ...", wards.len(), path.display());
            run_batch(&analyzer, &wards)?
        }
        (None, Some(n)) => {
            eprintln!("Simulating {n} wards (seed {}) ...", args.seed);
            simulate_batch(&analyzer, n, args.seed)?
        }
        (None, None) => bail!("nothing to do: pass --input FILE or --simulate N"),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    print_ranking(&report);
    print_kpis(&report);
    let alert_count: usize = report.analyses.iter().map(|a| a.alerts.len()).sum();
    eprintln!("\nDone. {} wards, {alert_count} alerts.", report.analyses.len());
    Ok(())
}
