//! Content loading and engagement setup shared between battle_cli and battle_bench.

use anyhow::{bail, Context, Result};
use battle_core::{Army, CombatLaw, CombatUnit, MoraleConstants, Stats, UnitType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A named regiment as authored in `forces.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceDef {
    pub name: String,
    pub faction: String,
    pub size: u32,
    pub stats: Stats,
    pub law: CombatLaw,
    #[serde(default)]
    pub unit_type: UnitType,
}

impl ForceDef {
    /// A fresh unit at full strength and base morale.
    pub fn build(&self) -> Result<CombatUnit> {
        CombatUnit::new(self.size, self.stats, self.law)
            .map(|unit| unit.with_unit_type(self.unit_type))
            .with_context(|| format!("building force '{}'", self.name))
    }
}

/// A preset pairing of two forces with a default time bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementDef {
    pub name: String,
    pub attacker: String,
    pub defender: String,
    pub time: f64,
}

#[derive(Debug, Clone)]
pub struct BattleContent {
    pub content_version: String,
    pub forces: Vec<ForceDef>,
    pub engagements: Vec<EngagementDef>,
    pub constants: MoraleConstants,
}

impl BattleContent {
    pub fn force(&self, name: &str) -> Option<&ForceDef> {
        self.forces.iter().find(|force| force.name == name)
    }

    pub fn engagement(&self, name: &str) -> Option<&EngagementDef> {
        self.engagements.iter().find(|engagement| engagement.name == name)
    }
}

#[derive(Deserialize)]
struct ForcesFile {
    content_version: String,
    forces: Vec<ForceDef>,
    #[serde(default)]
    engagements: Vec<EngagementDef>,
}

/// Validates cross-references in loaded content, panicking on any authoring error.
///
/// Catches mistakes like: two forces sharing a name, stats outside their
/// domain, or an engagement naming an unknown force or pitting a force
/// against itself.
pub fn validate_content(content: &BattleContent) {
    let mut names = HashSet::new();
    for force in &content.forces {
        assert!(!force.name.is_empty(), "force has empty name");
        assert!(
            names.insert(force.name.as_str()),
            "force name '{}' is defined more than once",
            force.name,
        );
        if let Err(err) = force.stats.validate() {
            panic!("force '{}' has invalid stats: {err}", force.name);
        }
    }

    for engagement in &content.engagements {
        for side in [&engagement.attacker, &engagement.defender] {
            assert!(
                names.contains(side.as_str()),
                "engagement '{}' references unknown force '{side}'",
                engagement.name,
            );
        }
        assert!(
            engagement.attacker != engagement.defender,
            "engagement '{}' pits force '{}' against itself",
            engagement.name,
            engagement.attacker,
        );
        assert!(
            engagement.time > 0.0,
            "engagement '{}' has non-positive time {}",
            engagement.name,
            engagement.time,
        );
    }
}

pub fn load_content(content_dir: &str) -> Result<BattleContent> {
    let dir = Path::new(content_dir);
    let forces_file: ForcesFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("forces.json")).context("reading forces.json")?,
    )
    .context("parsing forces.json")?;
    let constants_path = dir.join("constants.json");
    let constants: MoraleConstants = if constants_path.exists() {
        serde_json::from_str(
            &std::fs::read_to_string(&constants_path).context("reading constants.json")?,
        )
        .context("parsing constants.json")?
    } else {
        MoraleConstants::default()
    };
    let content = BattleContent {
        content_version: forces_file.content_version,
        forces: forces_file.forces,
        engagements: forces_file.engagements,
        constants,
    };
    validate_content(&content);
    Ok(content)
}

/// Fresh units for `attacker` vs `defender`. Each call builds new instances,
/// so repeated runs never share spent units.
pub fn build_engagement(
    content: &BattleContent,
    attacker: &str,
    defender: &str,
) -> Result<(CombatUnit, CombatUnit)> {
    if attacker == defender {
        bail!("a force cannot engage itself: '{attacker}'");
    }
    let lookup = |name: &str| {
        content
            .force(name)
            .with_context(|| format!("unknown force '{name}'"))
    };
    Ok((lookup(attacker)?.build()?, lookup(defender)?.build()?))
}

/// Groups the roster into one army per faction, keyed by faction name.
pub fn build_armies(content: &BattleContent) -> Result<BTreeMap<String, Army>> {
    let mut armies: BTreeMap<String, Army> = BTreeMap::new();
    for force in &content.forces {
        armies
            .entry(force.faction.clone())
            .or_insert_with(|| Army::new(force.faction.clone()))
            .add_regiment(force.name.clone(), force.build()?);
    }
    Ok(armies)
}

/// Writes `run_info.json` describing a run into `dir`.
pub fn write_run_info(
    dir: &Path,
    run_id: &str,
    seed: u64,
    content_version: &str,
    args: serde_json::Value,
) -> Result<()> {
    let info = serde_json::json!({
        "run_id": run_id,
        "seed": seed,
        "start_time": chrono::Utc::now().to_rfc3339(),
        "content_version": content_version,
        "args": args,
    });
    let path = dir.join("run_info.json");
    let file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, &info)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
