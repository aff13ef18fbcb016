//! Morale feedback: casualties move morale, morale moves the coefficient.
//!
//! Four additive rules per side:
//! - casualties sustained lower morale, relative to the side's initial size;
//! - casualties inflicted raise it, relative to the opponent's initial size;
//! - sustained casualties weigh more the less time is left to the target;
//! - so do inflicted ones.

use serde::{Deserialize, Serialize};

use crate::{Side, MORALE_CEILING, MORALE_FLOOR};

/// Weights of the four morale rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoraleConstants {
    pub loss_sustained: f64,
    pub gain_inflicted: f64,
    pub loss_sustained_speed: f64,
    pub gain_inflicted_speed: f64,
}

impl Default for MoraleConstants {
    fn default() -> Self {
        Self {
            loss_sustained: 0.000_07,
            gain_inflicted: 0.000_05,
            loss_sustained_speed: 0.000_004,
            gain_inflicted_speed: 0.000_004,
        }
    }
}

/// Per-side casualty bookkeeping for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasualtyState {
    /// Sizes at construction; never changes afterwards.
    pub initial_size: [u32; 2],
    /// Cumulative losses.
    pub losses: [u32; 2],
    /// Mirror of each unit's raw morale.
    pub morale: [f64; 2],
}

impl CasualtyState {
    pub fn new(initial_size: [u32; 2], morale: [f64; 2]) -> Self {
        Self {
            initial_size,
            losses: [0, 0],
            morale,
        }
    }

    /// Morale change for each side given `delta_t` of remaining time.
    ///
    /// Denominators are guarded: initial sizes by `max(_, 1)`, time by `1 + delta_t`
    /// with `delta_t` floored at zero.
    pub fn morale_deltas(&self, delta_t: f64, constants: &MoraleConstants) -> [f64; 2] {
        let time_divisor = 1.0 + delta_t.max(0.0);
        Side::BOTH.map(|side| {
            let own = side.index();
            let opp = side.opponent().index();
            let taken = f64::from(self.losses[own]);
            let inflicted = f64::from(self.losses[opp]);
            let own_initial = f64::from(self.initial_size[own].max(1));
            let opp_initial = f64::from(self.initial_size[opp].max(1));

            let mut delta = 0.0;
            delta -= taken / own_initial * constants.loss_sustained;
            delta += inflicted / opp_initial * constants.gain_inflicted;
            delta -= taken / time_divisor * constants.loss_sustained_speed;
            delta += inflicted / time_divisor * constants.gain_inflicted_speed;
            delta
        })
    }

    /// Applies [`Self::morale_deltas`] and clamps into [10, 100]. Returns the new morale.
    pub fn update_morale(&mut self, delta_t: f64, constants: &MoraleConstants) -> [f64; 2] {
        let deltas = self.morale_deltas(delta_t, constants);
        for (morale, delta) in self.morale.iter_mut().zip(deltas) {
            *morale = (*morale + delta).clamp(MORALE_FLOOR, MORALE_CEILING);
        }
        self.morale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(losses: [u32; 2]) -> CasualtyState {
        let mut state = CasualtyState::new([1000, 500], [50.0, 50.0]);
        state.losses = losses;
        state
    }

    #[test]
    fn no_losses_no_change() {
        let deltas = state([0, 0]).morale_deltas(1.0, &MoraleConstants::default());
        assert!(deltas[0].abs() < f64::EPSILON);
        assert!(deltas[1].abs() < f64::EPSILON);
    }

    #[test]
    fn rules_combine_additively() {
        let c = MoraleConstants::default();
        let deltas = state([10, 0]).morale_deltas(4.0, &c);
        let expected_first =
            -(10.0 / 1000.0) * c.loss_sustained - (10.0 / 5.0) * c.loss_sustained_speed;
        let expected_second =
            (10.0 / 1000.0) * c.gain_inflicted + (10.0 / 5.0) * c.gain_inflicted_speed;
        assert!((deltas[0] - expected_first).abs() < 1e-15);
        assert!((deltas[1] - expected_second).abs() < 1e-15);
    }

    #[test]
    fn less_remaining_time_amplifies_speed_terms() {
        let c = MoraleConstants::default();
        let early = state([20, 0]).morale_deltas(10.0, &c);
        let late = state([20, 0]).morale_deltas(0.0, &c);
        assert!(late[0] < early[0]);
        assert!(late[1] > early[1]);
    }

    #[test]
    fn zero_initial_size_is_guarded() {
        let mut state = CasualtyState::new([0, 0], [50.0, 50.0]);
        state.losses = [1, 1];
        let deltas = state.morale_deltas(0.0, &MoraleConstants::default());
        assert!(deltas.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn negative_remaining_time_is_guarded() {
        let deltas = state([3, 2]).morale_deltas(-1.0, &MoraleConstants::default());
        assert!(deltas.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn update_clamps_into_bounds() {
        let constants = MoraleConstants {
            loss_sustained: 1000.0,
            gain_inflicted: 1000.0,
            ..MoraleConstants::default()
        };
        let mut state = state([900, 0]);
        let morale = state.update_morale(1.0, &constants);
        assert!((morale[0] - MORALE_FLOOR).abs() < f64::EPSILON);
        assert!((morale[1] - MORALE_CEILING).abs() < f64::EPSILON);
        assert_eq!(state.morale, morale);
    }
}
