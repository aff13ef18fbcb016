//! Combat unit: troop count, stats, and the derived morale/coefficient pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::efficiency::{
    combat_efficiency, nearest_morale_stat, quantize_morale, STAT_MAX, STAT_MIN, WEAPON_MAX,
    WEAPON_MIN,
};
use crate::{BattleError, Result};

pub const MORALE_FLOOR: f64 = 10.0;
pub const MORALE_CEILING: f64 = 100.0;

// ---------------------------------------------------------------------------
// Combat law
// ---------------------------------------------------------------------------

/// Lanchester law selecting how a unit's opponent is attrited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatLaw {
    /// Losses scale with the product of both sides' strengths.
    #[serde(rename = "ln", alias = "linear")]
    Linear,
    /// Losses scale with the opponent's strength alone.
    #[serde(rename = "sq", alias = "square")]
    Square,
}

impl CombatLaw {
    pub fn tag(self) -> &'static str {
        match self {
            CombatLaw::Linear => "ln",
            CombatLaw::Square => "sq",
        }
    }
}

impl FromStr for CombatLaw {
    type Err = BattleError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "ln" | "linear" => Ok(CombatLaw::Linear),
            "sq" | "square" => Ok(CombatLaw::Square),
            other => Err(BattleError::UnknownLaw(other.to_string())),
        }
    }
}

impl fmt::Display for CombatLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Unit type
// ---------------------------------------------------------------------------

/// Branch label carried for display and rosters. Does not affect combat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    #[default]
    #[serde(rename = "inf", alias = "infantry")]
    Infantry,
    #[serde(rename = "cav", alias = "cavalry")]
    Cavalry,
    #[serde(rename = "art", alias = "artillery")]
    Artillery,
}

impl UnitType {
    pub fn tag(self) -> &'static str {
        match self {
            UnitType::Infantry => "inf",
            UnitType::Cavalry => "cav",
            UnitType::Artillery => "art",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// `experience/morale/weapon/melee`, serialized as the slash form `"4/4/0/0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Stats {
    pub experience: i32,
    pub morale: i32,
    pub weapon: i32,
    pub melee: i32,
}

impl Stats {
    pub fn new(experience: i32, morale: i32, weapon: i32, melee: i32) -> Self {
        Self {
            experience,
            morale,
            weapon,
            melee,
        }
    }

    /// Checks every component against its documented domain.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("experience", self.experience, STAT_MIN, STAT_MAX),
            ("morale", self.morale, STAT_MIN, STAT_MAX),
            ("weapon", self.weapon, WEAPON_MIN, WEAPON_MAX),
            ("melee", self.melee, 0, 1),
        ];
        for (name, value, lo, hi) in checks {
            if !(lo..=hi).contains(&value) {
                return Err(BattleError::InvalidArgument(format!(
                    "{name} must be in {lo}..={hi}, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn coefficient(&self) -> f64 {
        combat_efficiency(self.experience, self.morale, self.weapon, self.melee)
    }
}

impl FromStr for Stats {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            BattleError::InvalidArgument(format!(
                "stats must be a slash-separated string of four integers (e.g. '4/4/0/0'), got '{s}'"
            ))
        };
        let parts = s
            .split('/')
            .map(|part| part.trim().parse::<i32>().map_err(|_| invalid()))
            .collect::<Result<Vec<i32>>>()?;
        match parts.as_slice() {
            [experience, morale, weapon, melee] => {
                Ok(Stats::new(*experience, *morale, *weapon, *melee))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Stats {
    type Error = BattleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Stats> for String {
    fn from(stats: Stats) -> Self {
        stats.to_string()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.experience, self.morale, self.weapon, self.melee
        )
    }
}

// ---------------------------------------------------------------------------
// Combat unit
// ---------------------------------------------------------------------------

/// A regiment on the field.
///
/// `stats.morale` always equals the quantized `raw_morale`, and
/// `coefficient` always equals `stats.coefficient()`. Both are kept in sync by
/// the mutators; neither can be set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatUnit {
    size: u32,
    stats: Stats,
    raw_morale: f64,
    coefficient: f64,
    law: CombatLaw,
    unit_type: UnitType,
}

impl CombatUnit {
    pub fn new(size: u32, stats: Stats, law: CombatLaw) -> Result<Self> {
        stats.validate()?;
        Ok(Self {
            size,
            stats,
            raw_morale: f64::from(stats.morale * 10),
            coefficient: stats.coefficient(),
            law,
            unit_type: UnitType::default(),
        })
    }

    /// Relabels the unit; infantry unless set.
    #[must_use]
    pub fn with_unit_type(mut self, unit_type: UnitType) -> Self {
        self.unit_type = unit_type;
        self
    }

    /// Builds a unit from the textual forms, e.g. `(4000, "4/4/0/0", "sq")`.
    pub fn parse(size: u32, stats: &str, law: &str) -> Result<Self> {
        let law = law.parse::<CombatLaw>().map_err(|_| {
            BattleError::InvalidArgument(format!(
                "law must be either 'ln' (linear) or 'sq' (square), got '{law}'"
            ))
        })?;
        Self::new(size, stats.parse()?, law)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn raw_morale(&self) -> f64 {
        self.raw_morale
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn law(&self) -> CombatLaw {
        self.law
    }

    pub fn unit_type(&self) -> UnitType {
        self.unit_type
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    /// Sets the fine morale value, re-quantizing the morale stat and
    /// recomputing the coefficient.
    ///
    /// Accepts [0, 100]; values below the floor of 10 are stored as 10.
    pub fn set_raw_morale(&mut self, morale: f64) -> Result<()> {
        quantize_morale(morale)?;
        self.sync_morale(morale.max(MORALE_FLOOR));
        Ok(())
    }

    /// Infallible morale write used by the simulation, which clamps first.
    pub(crate) fn sync_morale(&mut self, morale: f64) {
        self.raw_morale = morale;
        self.stats.morale = nearest_morale_stat(morale);
        self.coefficient = self.stats.coefficient();
    }

    /// Replaces the stats and recomputes the coefficient. A changed morale
    /// stat resets the fine morale to the stat's base value.
    pub fn update_stats(&mut self, stats: Stats) -> Result<()> {
        stats.validate()?;
        if stats.morale != self.stats.morale {
            self.raw_morale = f64::from(stats.morale * 10);
        }
        self.stats = stats;
        self.coefficient = stats.coefficient();
        Ok(())
    }
}

impl fmt::Display for CombatUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Regiment: {} men | Stats: xp={}, morale={}, weapon={}, melee={} | \
             Raw Morale={:.1} | Coef={:.4} | Law={} | Type={}",
            self.size,
            self.stats.experience,
            self.stats.morale,
            self.stats.weapon,
            self.stats.melee,
            self.raw_morale,
            self.coefficient,
            self.law,
            self.unit_type,
        )
    }
}
