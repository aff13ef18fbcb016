//! Shared test fixtures for battle_core and downstream crates.
//!
//! `line_infantry()` / `rifle_regiment()` are the standard musket-era pair used
//! across scenario tests; `make_rng()` is the fixed-seed generator.

use crate::{CombatUnit, Stats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// 4000 smoothbore infantry, xp 4, morale 4, square law.
pub fn line_infantry() -> CombatUnit {
    unit(4000, "4/4/0/0", "sq")
}

/// 3500 rifled infantry, xp 4, morale 6, square law.
pub fn rifle_regiment() -> CombatUnit {
    unit(3500, "4/6/1/0", "sq")
}

pub fn unit(size: u32, stats: &str, law: &str) -> CombatUnit {
    CombatUnit::parse(size, stats, law).expect("fixture unit must be valid")
}

pub fn stats(experience: i32, morale: i32, weapon: i32, melee: i32) -> Stats {
    Stats::new(experience, morale, weapon, melee)
}

pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
