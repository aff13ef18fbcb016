//! Combat-efficiency math. Pure functions, no mutation.
//!
//! The coefficient condenses experience, morale, weapon class and melee status
//! into a scalar in (0, 1]. Morale quantization maps the fine 0–100 morale
//! value onto the coarse 1–10 stat the coefficient consumes.

use crate::{BattleError, Result};

/// Effectiveness gained per experience level above 1.
const XP_BOOST_PER_LEVEL: f64 = 0.04;
/// Effectiveness gained per morale level above 1.
const MORALE_BOOST_PER_LEVEL: f64 = 0.02;
/// Melee is less effective than aimed fire.
const MELEE_PENALTY_FACTOR: f64 = 0.70;
const MAX_WEAPON_BASE: f64 = 2.5;

pub const STAT_MIN: i32 = 1;
pub const STAT_MAX: i32 = 10;
pub const WEAPON_MIN: i32 = -2;
pub const WEAPON_MAX: i32 = 2;

/// Base multiplier of a weapon class. Callers clamp into `WEAPON_MIN..=WEAPON_MAX` first.
fn weapon_base(weapon: i32) -> f64 {
    match weapon {
        i32::MIN..=-2 => 0.2, // unarmed / pikemen
        -1 => 0.5,            // smoothbore matchlocks
        0 => 1.0,             // smoothbore muskets
        1 => 1.5,             // rifled muskets
        2..=i32::MAX => MAX_WEAPON_BASE,
    }
}

/// Highest raw value the formula can produce: best weapon, max xp and morale, no melee.
fn max_raw_coefficient() -> f64 {
    MAX_WEAPON_BASE
        * (1.0
            + f64::from(STAT_MAX - 1) * XP_BOOST_PER_LEVEL
            + f64::from(STAT_MAX - 1) * MORALE_BOOST_PER_LEVEL)
}

/// Compress a morale input onto the 1–10 scale the formula uses.
///
/// Values above 10 are treated as fine-grained 0–100 morale and divided by
/// ten, rounding half to even.
fn morale_to_stat_scale(morale: i32) -> i32 {
    if morale > STAT_MAX {
        #[allow(clippy::cast_possible_truncation)] // bounded by i32 / 10
        let scaled = (f64::from(morale) / 10.0).round_ties_even() as i32;
        scaled
    } else {
        morale
    }
}

/// Combat-efficiency coefficient for the given stats, normalized into (0, 1].
///
/// Every input is clamped to its domain before use, so any integer tuple
/// yields a valid coefficient. `1.0` is reached only with xp 10, morale 10
/// (or 100), weapon 2 and no melee penalty.
pub fn combat_efficiency(xp: i32, morale: i32, weapon: i32, melee: i32) -> f64 {
    let morale = morale_to_stat_scale(morale).clamp(STAT_MIN, STAT_MAX);
    let xp = xp.clamp(STAT_MIN, STAT_MAX);
    let weapon = weapon.clamp(WEAPON_MIN, WEAPON_MAX);
    let melee = melee.clamp(0, 1);

    let adjustment = 1.0
        + f64::from(xp - 1) * XP_BOOST_PER_LEVEL
        + f64::from(morale - 1) * MORALE_BOOST_PER_LEVEL;
    let raw = weapon_base(weapon) * adjustment;
    let coefficient = if melee == 1 {
        raw * MELEE_PENALTY_FACTOR
    } else {
        raw
    };
    coefficient / max_raw_coefficient()
}

/// Nearest morale stat (1–10) for a fine morale value in [0, 100].
///
/// Candidates are the multiples of ten from 10 to 100; on an exact tie the
/// lower candidate wins, so `quantize_morale(95.0) == Ok(9)`.
pub fn quantize_morale(morale: f64) -> Result<i32> {
    if !(0.0..=100.0).contains(&morale) {
        return Err(BattleError::OutOfRange(morale));
    }
    Ok(nearest_morale_stat(morale))
}

/// Infallible core of [`quantize_morale`]; out-of-range input snaps to the nearest end.
pub(crate) fn nearest_morale_stat(morale: f64) -> i32 {
    let mut best = STAT_MIN;
    let mut best_diff = f64::INFINITY;
    for stat in STAT_MIN..=STAT_MAX {
        let diff = (f64::from(stat * 10) - morale).abs();
        if diff < best_diff {
            best = stat;
            best_diff = diff;
        }
    }
    best
}
