use crate::run_result::{self, BattleSummary, RunResult};
use crate::scenario::Matchup;
use anyhow::{Context, Result};
use battle_core::{write_history_csv, BattleReport, BattleSimulation, MoraleConstants};
use battle_world::BattleContent;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

pub struct SeedResult {
    pub seed: u64,
    pub report: BattleReport,
    pub run_id: String,
}

/// Everything a seed needs besides the seed itself; shared across workers.
pub struct SeedJob<'a> {
    pub content: &'a BattleContent,
    pub constants: MoraleConstants,
    pub matchup: &'a Matchup,
    pub time: f64,
    pub scenario_name: &'a str,
    pub scenario_params: &'a serde_json::Value,
}

pub fn run_seed(job: &SeedJob<'_>, seed: u64, seed_dir: &Path) -> Result<SeedResult> {
    let run_id = Uuid::new_v4().to_string();
    let start = Instant::now();

    std::fs::create_dir_all(seed_dir)
        .with_context(|| format!("creating seed directory: {}", seed_dir.display()))?;

    battle_world::write_run_info(
        seed_dir,
        &format!("seed_{seed}"),
        seed,
        &job.content.content_version,
        serde_json::json!({
            "runner": "battle_bench",
            "attacker": job.matchup.attacker,
            "defender": job.matchup.defender,
            "time": job.time,
        }),
    )?;

    let (mut attacker, mut defender) = battle_world::build_engagement(
        job.content,
        &job.matchup.attacker,
        &job.matchup.defender,
    )?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut sim = BattleSimulation::with_constants(&mut attacker, &mut defender, job.constants);
    sim.run(job.time, &mut rng);
    let report = sim.report();

    let history_path = seed_dir.join("history.csv");
    write_history_csv(&history_path, sim.history())
        .with_context(|| format!("writing {}", history_path.display()))?;

    #[allow(clippy::cast_possible_truncation)]
    let wall_time_ms = start.elapsed().as_millis() as u64;
    let events_per_second = if wall_time_ms > 0 {
        report.steps as f64 / (wall_time_ms as f64 / 1000.0)
    } else {
        0.0
    };

    let run_result = RunResult {
        run_schema_version: 1,
        run_status: "completed".to_string(),
        run_id: run_id.clone(),
        git_sha: run_result::git_sha(),
        git_dirty: run_result::git_dirty(),
        seed,
        scenario_name: job.scenario_name.to_string(),
        scenario_params: job.scenario_params.clone(),
        target_time: job.time,
        wall_time_ms,
        events_per_second,
        battle: Some(BattleSummary::from_report(
            &report,
            [job.matchup.attacker.as_str(), job.matchup.defender.as_str()],
        )),
        history_path: "history.csv".to_string(),
        error_message: None,
    };

    run_result
        .write_atomic(&seed_dir.join("run_result.json"))
        .context("writing run_result.json")?;

    Ok(SeedResult {
        seed,
        report,
        run_id,
    })
}
