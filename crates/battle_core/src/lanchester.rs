//! Lanchester rate functions.
//!
//! Each side gets a rate function chosen by its own law; the function returns
//! that side's signed casualty rate given both sizes and both coefficients.
//! Negative means attrition.

use crate::{CombatLaw, CombatUnit, Result, Side};

/// `rate(sizes, coefficients, side)`.
pub type RateFn = fn(&[f64; 2], &[f64; 2], Side) -> f64;

fn square_rate(sizes: &[f64; 2], coef: &[f64; 2], side: Side) -> f64 {
    let opponent = side.opponent().index();
    -coef[opponent] * sizes[opponent]
}

// Known simplification: a true linear law scales by the engaged front, not
// the full opponent size. Kept as-is until front size exists on the unit.
fn linear_rate(sizes: &[f64; 2], coef: &[f64; 2], side: Side) -> f64 {
    let opponent = side.opponent().index();
    -coef[opponent] * sizes[side.index()] * sizes[opponent]
}

impl CombatLaw {
    pub fn rate_fn(self) -> RateFn {
        match self {
            CombatLaw::Linear => linear_rate,
            CombatLaw::Square => square_rate,
        }
    }
}

/// Resolves a law tag and returns its rate function.
pub fn rate_fn_for_tag(tag: &str) -> Result<RateFn> {
    Ok(tag.parse::<CombatLaw>()?.rate_fn())
}

/// Rate functions for a force pair, each keyed on that side's own law.
pub fn build_rate_fns(forces: [&CombatUnit; 2]) -> [RateFn; 2] {
    [forces[0].law().rate_fn(), forces[1].law().rate_fn()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BattleError;

    const SIZES: [f64; 2] = [4000.0, 3500.0];
    const COEF: [f64; 2] = [0.5, 0.25];

    #[test]
    fn square_law_ignores_own_size() {
        let rate = CombatLaw::Square.rate_fn();
        assert!((rate(&SIZES, &COEF, Side::First) - (-0.25 * 3500.0)).abs() < 1e-9);
        assert!((rate(&SIZES, &COEF, Side::Second) - (-0.5 * 4000.0)).abs() < 1e-9);
        let bigger = [8000.0, 3500.0];
        let own_doubled = rate(&bigger, &COEF, Side::First);
        assert!((own_doubled - rate(&SIZES, &COEF, Side::First)).abs() < 1e-9);
    }

    #[test]
    fn linear_law_scales_with_both_sizes() {
        let rate = CombatLaw::Linear.rate_fn();
        let expected = -0.25 * 4000.0 * 3500.0;
        assert!((rate(&SIZES, &COEF, Side::First) - expected).abs() < 1e-6);
        let expected = -0.5 * 3500.0 * 4000.0;
        assert!((rate(&SIZES, &COEF, Side::Second) - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_opponent_gives_zero_rate() {
        let sizes = [10.0, 0.0];
        for law in [CombatLaw::Linear, CombatLaw::Square] {
            assert!(law.rate_fn()(&sizes, &COEF, Side::First).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn tag_lookup() {
        assert!(rate_fn_for_tag("sq").is_ok());
        assert!(rate_fn_for_tag("linear").is_ok());
        assert!(matches!(
            rate_fn_for_tag("cube"),
            Err(BattleError::UnknownLaw(tag)) if tag == "cube"
        ));
    }

    #[test]
    fn pair_is_keyed_on_each_sides_law() {
        let a = CombatUnit::parse(10, "4/4/0/0", "ln").unwrap();
        let b = CombatUnit::parse(10, "4/4/0/0", "sq").unwrap();
        let [first, second] = build_rate_fns([&a, &b]);
        let sizes = [10.0, 10.0];
        let coef = [1.0, 1.0];
        assert!((first(&sizes, &coef, Side::First) + 100.0).abs() < 1e-9);
        assert!((second(&sizes, &coef, Side::Second) + 10.0).abs() < 1e-9);
    }
}
