//! Event-clock battle resolution between two units.
//!
//! Each step:
//! 1. Evaluate both sides' Lanchester rates from live sizes and coefficients.
//! 2. Draw an exponential clock per side with the rate's magnitude.
//! 3. Advance time by the earliest clock; that side gains or loses one troop.
//! 4. Count the loss, update morale from remaining time, push a history row.
//! 5. Stop on wipeout, rout, or target time.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::lanchester::{build_rate_fns, RateFn};
use crate::morale::{CasualtyState, MoraleConstants};
use crate::observer::{BattleObserver, NullObserver, StepReport};
use crate::{CombatUnit, HistoryRecord, Side, Termination, MORALE_FLOOR};

/// Time until the next event for a Poisson process with the given rate.
///
/// A rate that is zero, negative or NaN can never fire and yields infinity.
pub fn exponential_clock(rate: f64, rng: &mut impl Rng) -> f64 {
    if rate.is_nan() || rate <= 0.0 {
        return f64::INFINITY;
    }
    let u: f64 = rng.gen();
    // u is in [0, 1), so 1 - u is in (0, 1] and ln never sees zero.
    -(1.0 - u).ln() / rate
}

/// Side with the smaller clock; `First` on ties.
fn earliest(clocks: [f64; 2]) -> Side {
    if clocks[1] < clocks[0] {
        Side::Second
    } else {
        Side::First
    }
}

/// Summary of a finished (or in-progress) run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    pub outcome: Option<Termination>,
    pub duration: f64,
    pub steps: u64,
    pub initial_size: [u32; 2],
    pub final_size: [u32; 2],
    pub losses: [u32; 2],
    pub final_morale: [f64; 2],
}

impl BattleReport {
    /// The side left standing after a wipeout or rout. Time-outs have no winner.
    pub fn winner(&self) -> Option<Side> {
        self.outcome
            .and_then(Termination::loser)
            .map(Side::opponent)
    }
}

/// Two-unit battle. Borrows both units mutably for its whole lifetime and
/// writes sizes and morale back to them every step.
pub struct BattleSimulation<'a> {
    forces: [&'a mut CombatUnit; 2],
    casualties: CasualtyState,
    history: Vec<HistoryRecord>,
    rate_fns: Option<[RateFn; 2]>,
    constants: MoraleConstants,
    time: f64,
    steps: u64,
    outcome: Option<Termination>,
}

impl<'a> BattleSimulation<'a> {
    pub fn new(first: &'a mut CombatUnit, second: &'a mut CombatUnit) -> Self {
        Self::with_constants(first, second, MoraleConstants::default())
    }

    pub fn with_constants(
        first: &'a mut CombatUnit,
        second: &'a mut CombatUnit,
        constants: MoraleConstants,
    ) -> Self {
        let sizes = [first.size(), second.size()];
        let morale = [first.raw_morale(), second.raw_morale()];
        Self {
            forces: [first, second],
            casualties: CasualtyState::new(sizes, morale),
            history: vec![HistoryRecord::new(0.0, sizes, morale)],
            rate_fns: None,
            constants,
            time: 0.0,
            steps: 0,
            outcome: None,
        }
    }

    pub fn unit(&self, side: Side) -> &CombatUnit {
        self.forces[side.index()]
    }

    pub fn casualties(&self) -> &CasualtyState {
        &self.casualties
    }

    pub fn constants(&self) -> &MoraleConstants {
        &self.constants
    }

    /// Append-only; the first row is the t = 0 snapshot.
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn outcome(&self) -> Option<Termination> {
        self.outcome
    }

    pub fn rates_built(&self) -> bool {
        self.rate_fns.is_some()
    }

    /// Builds the per-side rate functions once; later calls return the cached pair.
    pub fn build_rate_fns(&mut self, observer: &mut impl BattleObserver) -> [RateFn; 2] {
        if let Some(rate_fns) = self.rate_fns {
            return rate_fns;
        }
        let rate_fns = build_rate_fns([&*self.forces[0], &*self.forces[1]]);
        observer.on_rates_built([self.forces[0].law().tag(), self.forces[1].law().tag()]);
        self.rate_fns = Some(rate_fns);
        rate_fns
    }

    /// Runs to termination and returns the full history.
    pub fn run(&mut self, target_time: f64, rng: &mut impl Rng) -> &[HistoryRecord] {
        self.run_observed(target_time, rng, &mut NullObserver)
    }

    pub fn run_observed(
        &mut self,
        target_time: f64,
        rng: &mut impl Rng,
        observer: &mut impl BattleObserver,
    ) -> &[HistoryRecord] {
        while self.step(target_time, rng, observer).is_none() {}
        &self.history
    }

    /// Advances by one casualty event.
    ///
    /// Returns `Some(reason)` once the run has terminated; every later call
    /// returns the same reason without touching state. A run that is already
    /// terminal before the first event (non-positive target or an empty side)
    /// stops with only the initial history row. Morale is only checked after
    /// an event, so a side that starts at the floor still gets to fight.
    pub fn step(
        &mut self,
        target_time: f64,
        rng: &mut impl Rng,
        observer: &mut impl BattleObserver,
    ) -> Option<Termination> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        if let Some(reason) = self.wiped_out().or_else(|| self.time_reached(target_time)) {
            return Some(self.finish(reason, observer));
        }

        let rate_fns = self.build_rate_fns(observer);
        let sizes = self.forces.each_ref().map(|unit| f64::from(unit.size()));
        let coefficients = self.forces.each_ref().map(|unit| unit.coefficient());
        let rates = Side::BOTH.map(|side| rate_fns[side.index()](&sizes, &coefficients, side));
        let clocks = rates.map(|rate| exponential_clock(rate.abs(), rng));

        let side = earliest(clocks);
        // Both clocks infinite: no event ever fires, so the time bound is what ends the run.
        if clocks[side.index()].is_infinite() {
            return Some(self.finish(Termination::TimeReached, observer));
        }
        self.time += clocks[side.index()];

        // A non-negative rate would be reinforcement; it grows the side instead.
        let unit = &mut *self.forces[side.index()];
        let size = if rates[side.index()] >= 0.0 {
            unit.size().saturating_add(1)
        } else {
            unit.size().saturating_sub(1)
        };
        unit.set_size(size);

        if rates.iter().all(|rate| *rate < 0.0) {
            self.casualties.losses[side.index()] += 1;
        }

        let morale = self
            .casualties
            .update_morale(target_time - self.time, &self.constants);
        for (unit, value) in self.forces.iter_mut().zip(morale) {
            unit.sync_morale(value);
        }

        let record = HistoryRecord::new(
            self.time,
            self.forces.each_ref().map(|unit| unit.size()),
            morale,
        );
        self.history.push(record);
        self.steps += 1;

        observer.on_step(&StepReport {
            step: self.steps,
            side,
            rates,
            clocks,
            coefficients,
            losses: self.casualties.losses,
            record,
        });

        self.wiped_out()
            .or_else(|| self.routed())
            .or_else(|| self.time_reached(target_time))
            .map(|reason| self.finish(reason, observer))
    }

    /// `First` wins ties. Wipeout and rout take precedence over the time bound.
    fn wiped_out(&self) -> Option<Termination> {
        Side::BOTH
            .into_iter()
            .find(|side| self.forces[side.index()].size() == 0)
            .map(|side| Termination::Wipeout { side })
    }

    fn routed(&self) -> Option<Termination> {
        Side::BOTH
            .into_iter()
            .find(|side| self.casualties.morale[side.index()] <= MORALE_FLOOR)
            .map(|side| Termination::Rout { side })
    }

    fn time_reached(&self, target_time: f64) -> Option<Termination> {
        // Negated so a NaN target also stops.
        (!(self.time < target_time)).then_some(Termination::TimeReached)
    }

    fn finish(&mut self, reason: Termination, observer: &mut impl BattleObserver) -> Termination {
        self.outcome = Some(reason);
        if let Some(last) = self.history.last() {
            observer.on_terminated(reason, last);
        }
        reason
    }

    pub fn report(&self) -> BattleReport {
        BattleReport {
            outcome: self.outcome,
            duration: self.time,
            steps: self.steps,
            initial_size: self.casualties.initial_size,
            final_size: self.forces.each_ref().map(|unit| unit.size()),
            losses: self.casualties.losses,
            final_morale: self.casualties.morale,
        }
    }
}

impl fmt::Display for BattleSimulation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Simulation(forces=[{}, {}], rate_funcs={}, losses={:?})",
            self.forces[0],
            self.forces[1],
            if self.rates_built() { "set" } else { "unset" },
            self.casualties.losses,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_rate_never_fires() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(exponential_clock(0.0, &mut rng).is_infinite());
        assert!(exponential_clock(-3.0, &mut rng).is_infinite());
        assert!(exponential_clock(f64::NAN, &mut rng).is_infinite());
    }

    #[test]
    fn exponential_clock_mean_tracks_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let n = 20_000;
        let mean = (0..n).map(|_| exponential_clock(4.0, &mut rng)).sum::<f64>() / f64::from(n);
        assert!((mean - 0.25).abs() < 0.01, "mean {mean}");
    }

    #[test]
    fn earliest_prefers_lower_index_on_ties() {
        assert_eq!(earliest([0.5, 0.5]), Side::First);
        assert_eq!(earliest([0.5, 0.4]), Side::Second);
        assert_eq!(earliest([f64::INFINITY, 2.0]), Side::Second);
        assert_eq!(earliest([f64::INFINITY, f64::INFINITY]), Side::First);
    }

    #[test]
    fn display_reports_rate_state() {
        let mut a = CombatUnit::parse(100, "4/4/0/0", "sq").unwrap();
        let mut b = CombatUnit::parse(100, "4/4/0/0", "sq").unwrap();
        let mut sim = BattleSimulation::new(&mut a, &mut b);
        assert!(sim.to_string().contains("rate_funcs=unset"));
        sim.build_rate_fns(&mut NullObserver);
        let s = sim.to_string();
        assert!(s.contains("rate_funcs=set"));
        assert!(s.contains("losses=[0, 0]"));
    }

    #[test]
    fn report_winner_follows_loser() {
        let report = BattleReport {
            outcome: Some(Termination::Wipeout { side: Side::Second }),
            duration: 1.0,
            steps: 3,
            initial_size: [3, 3],
            final_size: [2, 0],
            losses: [1, 3],
            final_morale: [40.0, 40.0],
        };
        assert_eq!(report.winner(), Some(Side::First));
        let draw = BattleReport {
            outcome: Some(Termination::TimeReached),
            ..report
        };
        assert_eq!(draw.winner(), None);
    }
}
