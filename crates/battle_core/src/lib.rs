//! Two-unit Lanchester battle resolution on a stochastic event clock.
//!
//! No IO beyond the history CSV writer. All randomness via the passed-in Rng.

mod army;
mod efficiency;
mod error;
pub mod history;
pub mod lanchester;
pub mod morale;
mod observer;
mod simulation;
mod types;
mod unit;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use army::Army;
pub use efficiency::{combat_efficiency, quantize_morale};
pub use error::{BattleError, Result};
pub use history::{write_history_csv, HistoryFileWriter};
pub use morale::{CasualtyState, MoraleConstants};
pub use observer::{BattleObserver, NullObserver, StepReport};
pub use simulation::{exponential_clock, BattleReport, BattleSimulation};
pub use types::{HistoryRecord, Side, Termination};
pub use unit::{CombatLaw, CombatUnit, Stats, UnitType, MORALE_CEILING, MORALE_FLOOR};

#[cfg(test)]
mod tests;
