use super::*;

#[test]
fn same_seed_same_history() {
    let (a, report_a) = run_pair(line_infantry(), rifle_regiment(), 0.05, 1234);
    let (b, report_b) = run_pair(line_infantry(), rifle_regiment(), 0.05, 1234);
    assert_eq!(a, b);
    assert_eq!(report_a, report_b);
}

#[test]
fn different_seeds_diverge() {
    let (a, _) = run_pair(line_infantry(), rifle_regiment(), 0.05, 1);
    let (b, _) = run_pair(line_infantry(), rifle_regiment(), 0.05, 2);
    assert_ne!(a, b);
}

#[test]
fn stepping_matches_running() {
    let (ran, _) = run_pair(unit(60, "4/4/0/0", "ln"), unit(50, "6/5/1/0", "ln"), 50.0, 77);

    let mut first = unit(60, "4/4/0/0", "ln");
    let mut second = unit(50, "6/5/1/0", "ln");
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut sim = BattleSimulation::new(&mut first, &mut second);
    let mut steps = 0;
    while sim.step(50.0, &mut rng, &mut NullObserver).is_none() {
        steps += 1;
    }
    assert_eq!(sim.history(), ran.as_slice());
    assert_eq!(steps + 1, ran.len() - 1);
}
