use crate::{HistoryRecord, Side, Termination};

/// Step-level diagnostics for one event of the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Index of the step within the run, starting at 1.
    pub step: u64,
    /// The side that suffered this step's event.
    pub side: Side,
    /// Signed casualty rates computed at the start of the step.
    pub rates: [f64; 2],
    /// Exponential draws; infinite where the rate was zero.
    pub clocks: [f64; 2],
    /// Coefficients the rates were computed with.
    pub coefficients: [f64; 2],
    pub losses: [u32; 2],
    /// State after the event, as appended to history.
    pub record: HistoryRecord,
}

/// Sink for simulation diagnostics. All methods default to no-ops.
pub trait BattleObserver {
    fn on_rates_built(&mut self, _laws: [&str; 2]) {}

    fn on_step(&mut self, _report: &StepReport) {}

    fn on_terminated(&mut self, _reason: Termination, _last: &HistoryRecord) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BattleObserver for NullObserver {}
