use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

mod overrides;
mod run_result;
mod runner;
mod scenario;
mod summary;

#[derive(Parser)]
#[command(
    name = "battle_bench",
    about = "Runs one engagement across many seeds and aggregates the outcomes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file across multiple seeds.
    Run {
        /// Path to the scenario JSON file.
        #[arg(long)]
        scenario: String,
        /// Output directory (default: runs/).
        #[arg(long, default_value = "runs")]
        output_dir: String,
    },
}

fn write_json_atomic(path: &Path, value: &serde_json::Value) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value).context("serializing json")?;
    let mut file =
        std::fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", tmp.display()))?;
    file.sync_all()?;
    std::fs::rename(&tmp, path).with_context(|| format!("renaming to {}", path.display()))?;
    Ok(())
}

fn run(scenario_path: &str, output_dir: &str) -> Result<()> {
    let scenario = scenario::load_scenario(Path::new(scenario_path))?;
    let seeds = scenario.seeds.expand();

    println!(
        "Loading scenario '{}': {} seeds, {} vs {}, t={}",
        scenario.name,
        seeds.len(),
        scenario.engagement.attacker,
        scenario.engagement.defender,
        scenario.time,
    );

    let content = battle_world::load_content(&scenario.content_dir)?;
    let mut constants = content.constants;
    overrides::apply_overrides(&mut constants, &scenario.overrides)?;
    // Fail before spawning workers if either force is missing.
    battle_world::build_engagement(
        &content,
        &scenario.engagement.attacker,
        &scenario.engagement.defender,
    )?;

    let scenario_params = serde_json::json!({
        "time": scenario.time,
        "content_dir": scenario.content_dir,
        "engagement": scenario.engagement,
        "overrides": scenario.overrides,
        "constants": constants,
    });

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_dir = PathBuf::from(output_dir).join(format!("{}_{}", scenario.name, timestamp));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating output directory: {}", run_dir.display()))?;
    std::fs::copy(scenario_path, run_dir.join("scenario.json")).context("copying scenario file")?;

    println!("Output: {}", run_dir.display());
    println!("Running {} seeds in parallel...", seeds.len());

    let job = runner::SeedJob {
        content: &content,
        constants,
        matchup: &scenario.engagement,
        time: scenario.time,
        scenario_name: &scenario.name,
        scenario_params: &scenario_params,
    };
    let results: Vec<Result<runner::SeedResult>> = seeds
        .par_iter()
        .map(|&seed| runner::run_seed(&job, seed, &run_dir.join(format!("seed_{seed}"))))
        .collect();

    let mut seed_results = Vec::new();
    for result in results {
        match result {
            Ok(seed_result) => seed_results.push(seed_result),
            Err(err) => eprintln!("Seed failed: {err:#}"),
        }
    }
    if seed_results.is_empty() {
        anyhow::bail!("all seeds failed");
    }

    let reports: Vec<(u64, &battle_core::BattleReport)> =
        seed_results.iter().map(|r| (r.seed, &r.report)).collect();
    let names = [
        scenario.engagement.attacker.as_str(),
        scenario.engagement.defender.as_str(),
    ];
    let stats = summary::compute_summary(&reports, names);
    summary::print_summary(&scenario.name, scenario.time, &stats);

    let run_ids: Vec<&str> = seed_results.iter().map(|r| r.run_id.as_str()).collect();
    let summary_json = serde_json::json!({
        "batch_schema_version": 1,
        "batch_id": Uuid::new_v4().to_string(),
        "scenario_name": scenario.name,
        "scenario_params": scenario_params,
        "run_ids": run_ids,
        "stats": stats,
    });
    let summary_path = run_dir.join("summary.json");
    write_json_atomic(&summary_path, &summary_json)?;

    println!("Summary written to {}", summary_path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            scenario,
            output_dir,
        } => run(&scenario, &output_dir)?,
    }
    Ok(())
}
