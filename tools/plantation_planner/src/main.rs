//! Plantation planner.
//!
//! Single-ward mode runs the vision, correlation, and strategy stages and
//! prints the combined outcome as JSON, with a short summary on stderr.
//! `--batch` plans every ward in a JSON file and prints the batch, listing
//! the summaries that pass `--filter` on stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use canopy_core::plantation::{filter_plans, PlanSummary};
use canopy_core::{plan_batch, plan_chain, PlanRequest, PlanTarget, PolicyConfig, WardAnalyzer};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "plantation_planner", about = "Plan tree plantation for city wards")]
struct Args {
    /// Ward name carried into the plan summary.
    #[arg(short, long, default_value = "Ward")]
    ward_name: String,

    /// Ward area in km².
    #[arg(short, long, default_value_t = 10.0)]
    area: f64,

    /// residential, commercial, industrial, mixed_urban, green_zone, or
    /// water_body; anything else plans with the policy's fallback row.
    #[arg(short, long, default_value = "mixed_urban")]
    land_type: String,

    /// Built-up share, 0–100.
    #[arg(long, default_value_t = 70.0)]
    urban_density: f64,

    #[arg(long, default_value_t = 0.15)]
    ndvi: f64,

    /// Current green cover, percent.
    #[arg(long, default_value_t = 15.0)]
    green_cover: f64,

    /// Heat index, 0–100.
    #[arg(long, default_value_t = 75.0)]
    heat_index: f64,

    /// Land surface temperature, °C.
    #[arg(long, default_value_t = 38.0)]
    lst: f64,

    /// JSON array of wards to plan in one pass; overrides the single-ward flags.
    #[arg(short, long)]
    batch: Option<PathBuf>,

    /// Summary filter for --batch: "high" (urgency ≥ 70) or "medium" (≥ 40).
    #[arg(short, long, requires = "batch")]
    filter: Option<String>,

    /// Seed for the correlation jitter; omitted means OS entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML policy override.
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Print the policy's planting rows and exit.
    #[arg(long)]
    list_land_types: bool,
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_land_types(policy: &PolicyConfig) -> Result<()> {
    eprintln!("{:<14} {:>10} {:>10}  {}", "Land type", "Trees/km²", "₹/tree", "Species");
    eprintln!("{}", "-".repeat(64));
    for land in policy.configured_land_types() {
        let (_, profile) = policy.profile(land)?;
        eprintln!(
            "{:<14} {:>10.0} {:>10.0}  {}",
            land.as_ref(),
            profile.trees_per_sq_km,
            profile.cost_per_tree,
            profile.species.join(", ")
        );
    }
    Ok(())
}

fn print_summary_table(summaries: &[&PlanSummary]) {
    eprintln!(
        "\n{:<28} {:>9} {:>7} {:>7} {:>9}  {}",
        "Ward", "Priority", "Urgency", "Trees", "Cost", "Timeline"
    );
    eprintln!("{}", "-".repeat(80));
    for s in summaries {
        eprintln!(
            "{:<28} {:>9} {:>7} {:>7} {:>9}  {}",
            s.ward,
            s.priority.as_ref(),
            s.urgency_index,
            s.required_trees,
            s.estimated_cost,
            s.timeline
        );
    }
}

// ── Modes ─────────────────────────────────────────────────────────────────────

fn run_batch(path: &Path, filter: Option<&str>, policy: PolicyConfig, rng: &mut StdRng) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let targets: Vec<PlanTarget> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    eprintln!("Planning {} wards from {} ...", targets.len(), path.display());

    let batch = plan_batch(&WardAnalyzer::new(policy), &targets, rng);
    println!("{}", serde_json::to_string_pretty(&batch)?);

    let summaries = batch.summaries();
    print_summary_table(&filter_plans(&summaries, filter));
    eprintln!("\nDone. {} planned, {} skipped.", batch.count, batch.skipped.len());
    Ok(())
}

fn run_single(args: &Args, policy: &PolicyConfig, rng: &mut StdRng) -> Result<()> {
    let request = PlanRequest {
        ward_name: args.ward_name.clone(),
        ward_area: args.area,
        land_type: args.land_type.clone(),
        urban_density: args.urban_density,
        ndvi: args.ndvi,
        green_cover_percent: args.green_cover,
        heat_index: args.heat_index,
        land_surface_temp: args.lst,
    };

    let outcome = plan_chain(&request, policy, rng)
        .with_context(|| format!("planning ward {}", args.ward_name))?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    let s = &outcome.summary;
    eprintln!("\n{:<16} {}", "Ward", s.ward);
    eprintln!("{:<16} {}", "Priority", s.priority);
    eprintln!("{:<16} {}", "Trees", s.required_trees);
    eprintln!("{:<16} {:.1} °C", "Cooling", s.heat_reduction);
    eprintln!("{:<16} {:.1} t/yr", "CO2 offset", s.carbon_offset);
    eprintln!("{:<16} {}", "Cost", s.estimated_cost);
    eprintln!("{:<16} {}", "Timeline", s.timeline);
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let policy = match &args.policy {
        Some(p) => {
            PolicyConfig::load(p).with_context(|| format!("loading policy {}", p.display()))?
        }
        None => PolicyConfig::default(),
    };

    if args.list_land_types {
        return print_land_types(&policy);
    }

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    match &args.batch {
        Some(path) => run_batch(path, args.filter.as_deref(), policy, &mut rng),
        None => run_single(&args, &policy, &mut rng),
    }
}
