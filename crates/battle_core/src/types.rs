//! Shared value types: sides, history rows, termination reasons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two opposing forces. `First` is index 0 and wins index ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => f.write_str("side_1"),
            Side::Second => f.write_str("side_2"),
        }
    }
}

/// One row of battle history. Column names match the persisted CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub time: f64,
    pub size_1: u32,
    pub size_2: u32,
    pub morale_1: f64,
    pub morale_2: f64,
}

impl HistoryRecord {
    pub fn new(time: f64, sizes: [u32; 2], morale: [f64; 2]) -> Self {
        Self {
            time,
            size_1: sizes[0],
            size_2: sizes[1],
            morale_1: morale[0],
            morale_2: morale[1],
        }
    }

    pub fn size(&self, side: Side) -> u32 {
        match side {
            Side::First => self.size_1,
            Side::Second => self.size_2,
        }
    }

    pub fn morale(&self, side: Side) -> f64 {
        match side {
            Side::First => self.morale_1,
            Side::Second => self.morale_2,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// Simulated time reached the target.
    TimeReached,
    /// `side` has no troops left.
    Wipeout { side: Side },
    /// `side`'s morale hit the floor.
    Rout { side: Side },
}

impl Termination {
    /// The side that broke, if the run ended decisively.
    pub fn loser(self) -> Option<Side> {
        match self {
            Termination::Wipeout { side } | Termination::Rout { side } => Some(side),
            Termination::TimeReached => None,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::TimeReached => f.write_str("target time reached"),
            Termination::Wipeout { side } => write!(f, "{side} wiped out"),
            Termination::Rout { side } => write!(f, "{side} routed"),
        }
    }
}
