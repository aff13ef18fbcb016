use battle_core::{BattleReport, Side, Termination};
use serde::Serialize;
use std::collections::BTreeMap;

type Extractor = (&'static str, Box<dyn Fn(&BattleReport) -> f64>);

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub seed_count: usize,
    /// Victories per force name; runs without a victor count under `"none"`.
    pub wins: BTreeMap<String, usize>,
    /// Runs per termination reason.
    pub outcomes: BTreeMap<String, usize>,
    pub metrics: Vec<MetricSummary>,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

pub fn outcome_key(outcome: Option<Termination>) -> &'static str {
    match outcome {
        None => "unfinished",
        Some(Termination::TimeReached) => "time_reached",
        Some(Termination::Wipeout { .. }) => "wipeout",
        Some(Termination::Rout { .. }) => "rout",
    }
}

fn per_side(name: &'static str, side: Side, field: fn(&BattleReport, usize) -> f64) -> Extractor {
    (name, Box::new(move |r: &BattleReport| field(r, side.index())))
}

pub fn compute_summary(reports: &[(u64, &BattleReport)], names: [&str; 2]) -> SummaryStats {
    let mut wins = BTreeMap::new();
    let mut outcomes = BTreeMap::new();
    for (_, report) in reports {
        let winner = report.winner().map_or("none", |side| names[side.index()]);
        *wins.entry(winner.to_string()).or_insert(0) += 1;
        *outcomes
            .entry(outcome_key(report.outcome).to_string())
            .or_insert(0) += 1;
    }

    let extractors: Vec<Extractor> = vec![
        ("duration", Box::new(|r| r.duration)),
        ("steps", Box::new(|r| r.steps as f64)),
        per_side("losses_1", Side::First, |r, i| f64::from(r.losses[i])),
        per_side("losses_2", Side::Second, |r, i| f64::from(r.losses[i])),
        per_side("final_size_1", Side::First, |r, i| f64::from(r.final_size[i])),
        per_side("final_size_2", Side::Second, |r, i| {
            f64::from(r.final_size[i])
        }),
        per_side("final_morale_1", Side::First, |r, i| r.final_morale[i]),
        per_side("final_morale_2", Side::Second, |r, i| r.final_morale[i]),
    ];

    let metrics = extractors
        .iter()
        .map(|(name, extract)| {
            let values: Vec<f64> = reports.iter().map(|(_, r)| extract(r)).collect();
            compute_metric_summary(name, &values)
        })
        .collect();

    SummaryStats {
        seed_count: reports.len(),
        wins,
        outcomes,
        metrics,
    }
}

fn compute_metric_summary(name: &str, values: &[f64]) -> MetricSummary {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

    MetricSummary {
        name: name.to_string(),
        mean,
        min,
        max,
        stddev: variance.sqrt(),
    }
}

pub fn print_summary(scenario_name: &str, time: f64, stats: &SummaryStats) {
    println!(
        "\n=== {} ({} seeds, t={}) ===\n",
        scenario_name, stats.seed_count, time
    );
    println!(
        "{:<20} {:>10} {:>10} {:>10} {:>10}",
        "Metric", "Mean", "Min", "Max", "StdDev"
    );
    println!("{}", "-".repeat(64));
    for metric in &stats.metrics {
        println!(
            "{:<20} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            metric.name, metric.mean, metric.min, metric.max, metric.stddev
        );
    }
    println!();
    for (force, count) in &stats.wins {
        println!("{:<20} {count}/{}", format!("wins[{force}]"), stats.seed_count);
    }
    for (reason, count) in &stats.outcomes {
        println!("{:<20} {count}/{}", reason, stats.seed_count);
    }
}
