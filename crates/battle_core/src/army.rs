use std::collections::BTreeMap;
use std::fmt;

use crate::CombatUnit;

/// A faction's named regiments. A roster only: battles are always fought
/// between exactly two units taken from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Army {
    pub faction: String,
    regiments: BTreeMap<String, CombatUnit>,
}

impl Army {
    pub fn new(faction: impl Into<String>) -> Self {
        Self {
            faction: faction.into(),
            regiments: BTreeMap::new(),
        }
    }

    /// Adds a regiment, returning any regiment previously filed under `name`.
    pub fn add_regiment(&mut self, name: impl Into<String>, regiment: CombatUnit) -> Option<CombatUnit> {
        self.regiments.insert(name.into(), regiment)
    }

    pub fn regiment(&self, name: &str) -> Option<&CombatUnit> {
        self.regiments.get(name)
    }

    pub fn regiment_mut(&mut self, name: &str) -> Option<&mut CombatUnit> {
        self.regiments.get_mut(name)
    }

    /// Removes a regiment, e.g. once it is spent in battle.
    pub fn remove_regiment(&mut self, name: &str) -> Option<CombatUnit> {
        self.regiments.remove(name)
    }

    pub fn len(&self) -> usize {
        self.regiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regiments.is_empty()
    }

    pub fn regiments(&self) -> impl Iterator<Item = (&str, &CombatUnit)> {
        self.regiments.iter().map(|(name, unit)| (name.as_str(), unit))
    }

    pub fn total_strength(&self) -> u64 {
        self.regiments.values().map(|unit| u64::from(unit.size())).sum()
    }
}

impl fmt::Display for Army {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Army of faction: {}", self.faction)?;
        write!(f, "Forces:")?;
        for (name, unit) in &self.regiments {
            write!(f, "\n{name}: {unit}")?;
        }
        Ok(())
    }
}
