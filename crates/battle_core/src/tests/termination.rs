use super::*;

#[test]
fn non_positive_target_time_yields_single_row() {
    for target in [0.0, -1.0, f64::NAN] {
        let (history, report) = run_pair(line_infantry(), rifle_regiment(), target, 1);
        assert_eq!(history.len(), 1, "target {target}");
        assert_eq!(report.outcome, Some(Termination::TimeReached));
        assert_eq!(report.steps, 0);
    }
}

#[test]
fn empty_side_yields_single_row() {
    let (history, report) = run_pair(unit(0, "4/4/0/0", "sq"), rifle_regiment(), 5.0, 1);
    assert_eq!(history.len(), 1);
    assert_eq!(report.outcome, Some(Termination::Wipeout { side: Side::First }));
    assert_eq!(report.final_size, [0, 3500]);

    let (history, report) = run_pair(line_infantry(), unit(0, "4/4/0/0", "ln"), 5.0, 1);
    assert_eq!(history.len(), 1);
    assert_eq!(report.outcome, Some(Termination::Wipeout { side: Side::Second }));
}

#[test]
fn morale_at_floor_still_fights_first_event() {
    for seed in 0..10 {
        let (history, report) =
            run_pair(unit(300, "4/4/0/0", "sq"), unit(300, "4/1/0/0", "sq"), 5.0, seed);
        assert!(history.len() >= 2, "seed {seed}: {} rows", history.len());
        assert!(report.steps >= 1, "seed {seed}");
        assert_history_well_formed(&history);

        let first = history[1];
        if first.size_1 < 300 {
            // Inflicting a casualty lifts the side off the floor.
            assert!(first.morale_2 > MORALE_FLOOR, "seed {seed}");
        } else {
            assert_eq!(report.outcome, Some(Termination::Rout { side: Side::Second }));
            assert_eq!(report.steps, 1, "seed {seed}");
        }
    }
}

#[test]
fn single_troop_linear_duel_ends_in_wipeout() {
    for seed in 0..25 {
        let (history, report) =
            run_pair(unit(1, "4/4/0/0", "ln"), unit(1, "4/4/0/0", "ln"), 1.0, seed);
        let last = history.last().unwrap();
        assert!(
            last.size_1 == 0 || last.size_2 == 0,
            "seed {seed}: no wipeout in {last:?}"
        );
        assert_eq!(history.len(), 2);
        assert!(matches!(report.outcome, Some(Termination::Wipeout { .. })));
    }
}

#[test]
fn stops_once_target_time_passed() {
    let (history, report) = run_pair(line_infantry(), rifle_regiment(), 0.01, 3);
    assert_eq!(report.outcome, Some(Termination::TimeReached));
    let last = history.last().unwrap();
    assert!(last.time >= 0.01);
    // Every row but the last was strictly before the target.
    for row in &history[..history.len() - 1] {
        assert!(row.time < 0.01);
    }
}

#[test]
fn terminated_run_does_not_resume() {
    let mut first = line_infantry();
    let mut second = rifle_regiment();
    let mut rng = make_rng();
    let mut sim = BattleSimulation::new(&mut first, &mut second);
    let rows = sim.run(0.005, &mut rng).len();
    let again = sim.run(1.0, &mut rng).len();
    assert_eq!(rows, again);
    assert_eq!(
        sim.step(1.0, &mut rng, &mut NullObserver),
        Some(Termination::TimeReached)
    );
}

#[test]
fn observer_sees_build_steps_and_single_termination() {
    let mut first = unit(30, "4/4/0/0", "ln");
    let mut second = unit(25, "4/4/1/0", "sq");
    let mut rng = make_rng();
    let mut observer = RecordingObserver::default();
    let mut sim = BattleSimulation::new(&mut first, &mut second);
    sim.run_observed(1000.0, &mut rng, &mut observer);
    sim.run_observed(1000.0, &mut rng, &mut observer);

    assert_eq!(observer.built, vec![["ln".to_string(), "sq".to_string()]]);
    assert_eq!(observer.steps.len() + 1, sim.history().len());
    assert_eq!(observer.terminated.len(), 1);
    let (reason, last) = observer.terminated[0];
    assert_eq!(Some(reason), sim.outcome());
    assert_eq!(&last, sim.history().last().unwrap());
    for (i, report) in observer.steps.iter().enumerate() {
        assert_eq!(report.step, i as u64 + 1);
        assert_eq!(report.record, sim.history()[i + 1]);
    }
}
