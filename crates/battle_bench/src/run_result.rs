use battle_core::{BattleReport, Side, Termination};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RunResult {
    pub run_schema_version: u32,
    pub run_status: String,
    pub run_id: String,
    pub git_sha: String,
    pub git_dirty: bool,
    pub seed: u64,
    pub scenario_name: String,
    pub scenario_params: serde_json::Value,
    pub target_time: f64,
    pub wall_time_ms: u64,
    pub events_per_second: f64,
    pub battle: Option<BattleSummary>,
    pub history_path: String,
    pub error_message: Option<String>,
}

/// Flattened per-side view of a `BattleReport`, with forces named.
#[derive(Debug, Serialize)]
pub struct BattleSummary {
    pub outcome: Option<Termination>,
    pub winner: Option<String>,
    pub duration: f64,
    pub steps: u64,
    pub attacker: SideSummary,
    pub defender: SideSummary,
}

#[derive(Debug, Serialize)]
pub struct SideSummary {
    pub force: String,
    pub initial_size: u32,
    pub final_size: u32,
    pub losses: u32,
    pub final_morale: f64,
}

impl BattleSummary {
    pub fn from_report(report: &BattleReport, names: [&str; 2]) -> Self {
        let side = |side: Side| {
            let i = side.index();
            SideSummary {
                force: names[i].to_string(),
                initial_size: report.initial_size[i],
                final_size: report.final_size[i],
                losses: report.losses[i],
                final_morale: report.final_morale[i],
            }
        };
        Self {
            outcome: report.outcome,
            winner: report.winner().map(|side| names[side.index()].to_string()),
            duration: report.duration,
            steps: report.steps,
            attacker: side(Side::First),
            defender: side(Side::Second),
        }
    }
}

impl RunResult {
    /// Write JSON atomically: write to `.tmp` then rename.
    pub fn write_atomic(&self, path: &Path) -> anyhow::Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

pub fn git_sha() -> String {
    env!("GIT_SHA").to_string()
}

pub fn git_dirty() -> bool {
    env!("GIT_DIRTY") == "true"
}
