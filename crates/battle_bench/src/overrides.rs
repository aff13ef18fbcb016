use anyhow::{bail, Result};
use battle_core::MoraleConstants;
use std::collections::HashMap;

const VALID_KEYS: &[&str] = &[
    "loss_sustained",
    "gain_inflicted",
    "loss_sustained_speed",
    "gain_inflicted_speed",
];

pub fn apply_overrides(
    constants: &mut MoraleConstants,
    overrides: &HashMap<String, serde_json::Value>,
) -> Result<()> {
    for (key, value) in overrides {
        let slot = match key.as_str() {
            "loss_sustained" => &mut constants.loss_sustained,
            "gain_inflicted" => &mut constants.gain_inflicted,
            "loss_sustained_speed" => &mut constants.loss_sustained_speed,
            "gain_inflicted_speed" => &mut constants.gain_inflicted_speed,
            _ => bail!(
                "unknown override key '{key}'. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        };
        *slot = as_weight(key, value)?;
    }
    Ok(())
}

/// Morale weights are finite and non-negative; the rules fix their sign.
fn as_weight(key: &str, value: &serde_json::Value) -> Result<f64> {
    let weight = value
        .as_f64()
        .ok_or_else(|| anyhow::anyhow!("override '{key}': expected a number, got {value}"))?;
    if !(weight.is_finite() && weight >= 0.0) {
        bail!("override '{key}': weight must be non-negative, got {weight}");
    }
    Ok(weight)
}
