//! Validation tests for the shipped `content/*.json` files.
//!
//! Loads the real content directory and checks schema validity, stat
//! domains, engagement references, and that every preset actually fights.

use battle_core::test_fixtures::make_rng;
use battle_core::{BattleSimulation, CombatLaw, MoraleConstants};
use battle_world::{build_armies, build_engagement, load_content, BattleContent};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Integration tests run from the crate directory, so go up two levels.
fn content_dir() -> String {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    format!("{manifest}/../../content")
}

fn load_test_content() -> &'static BattleContent {
    static CONTENT: OnceLock<BattleContent> = OnceLock::new();
    CONTENT.get_or_init(|| {
        load_content(&content_dir()).expect("load_content should succeed for shipped content")
    })
}

// =========================================================================
// Schema
// =========================================================================

#[test]
fn content_loads_successfully() {
    let content = load_test_content();
    assert!(!content.content_version.is_empty());
    assert!(!content.forces.is_empty());
}

#[test]
fn shipped_constants_match_defaults() {
    assert_eq!(load_test_content().constants, MoraleConstants::default());
}

#[test]
fn missing_constants_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(
        format!("{}/forces.json", content_dir()),
        dir.path().join("forces.json"),
    )
    .unwrap();
    let content = load_content(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(content.constants, MoraleConstants::default());
}

#[test]
fn missing_forces_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_content(dir.path().to_str().unwrap()).unwrap_err();
    assert!(format!("{err:#}").contains("forces.json"));
}

// =========================================================================
// Ranges and references
// =========================================================================

#[test]
fn forces_have_troops_and_unique_names() {
    let content = load_test_content();
    let mut names = HashSet::new();
    for force in &content.forces {
        assert!(force.size > 0, "force '{}' has no troops", force.name);
        assert!(names.insert(force.name.as_str()));
    }
}

#[test]
fn both_laws_are_represented() {
    let laws: HashSet<CombatLaw> = load_test_content().forces.iter().map(|f| f.law).collect();
    assert!(laws.contains(&CombatLaw::Square));
    assert!(laws.contains(&CombatLaw::Linear));
}

#[test]
fn every_faction_fields_an_army() {
    let content = load_test_content();
    let armies = build_armies(content).unwrap();
    let factions: HashSet<&str> = content.forces.iter().map(|f| f.faction.as_str()).collect();
    assert_eq!(armies.len(), factions.len());
    for army in armies.values() {
        assert!(army.total_strength() > 0);
    }
}

// =========================================================================
// Playability
// =========================================================================

#[test]
fn every_engagement_produces_events() {
    let content = load_test_content();
    assert!(!content.engagements.is_empty());
    for engagement in &content.engagements {
        let (mut attacker, mut defender) =
            build_engagement(content, &engagement.attacker, &engagement.defender).unwrap();
        let mut rng = make_rng();
        let mut sim =
            BattleSimulation::with_constants(&mut attacker, &mut defender, content.constants);
        let history = sim.run(engagement.time, &mut rng);
        assert!(
            history.len() > 1,
            "engagement '{}' never fired an event",
            engagement.name
        );
    }
}
