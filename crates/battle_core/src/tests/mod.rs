use super::*;
use crate::test_fixtures::{line_infantry, make_rng, rifle_regiment, stats, unit};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod determinism;
mod termination;

// --- Shared test helpers ------------------------------------------------

/// Records every callback so tests can inspect the step stream.
#[derive(Default)]
struct RecordingObserver {
    built: Vec<[String; 2]>,
    steps: Vec<StepReport>,
    terminated: Vec<(Termination, HistoryRecord)>,
}

impl BattleObserver for RecordingObserver {
    fn on_rates_built(&mut self, laws: [&str; 2]) {
        self.built.push(laws.map(str::to_string));
    }

    fn on_step(&mut self, report: &StepReport) {
        self.steps.push(report.clone());
    }

    fn on_terminated(&mut self, reason: Termination, last: &HistoryRecord) {
        self.terminated.push((reason, *last));
    }
}

/// Runs a fresh pair to `target_time` with `seed`, returning history and report.
fn run_pair(
    mut first: CombatUnit,
    mut second: CombatUnit,
    target_time: f64,
    seed: u64,
) -> (Vec<HistoryRecord>, BattleReport) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut sim = BattleSimulation::new(&mut first, &mut second);
    let history = sim.run(target_time, &mut rng).to_vec();
    (history, sim.report())
}

fn assert_history_well_formed(history: &[HistoryRecord]) {
    assert!(!history.is_empty(), "history must hold the initial row");
    assert!(history[0].time.abs() < f64::EPSILON, "first row is t = 0");
    for pair in history.windows(2) {
        assert!(
            pair[1].time >= pair[0].time,
            "time went backwards: {} -> {}",
            pair[0].time,
            pair[1].time
        );
    }
    for row in history {
        for side in Side::BOTH {
            let morale = row.morale(side);
            assert!(
                (MORALE_FLOOR..=MORALE_CEILING).contains(&morale),
                "morale {morale} out of bounds at t={}",
                row.time
            );
        }
    }
}
