mod observer;

use anyhow::{bail, Context, Result};
use battle_core::{write_history_csv, BattleReport, BattleSimulation, Side};
use battle_world::{build_armies, build_engagement, load_content, write_run_info, BattleContent};
use clap::{Args, Parser, Subcommand};
use observer::TracingObserver;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Target time used when neither `--time` nor a preset engagement supplies one.
const DEFAULT_TIME: f64 = 1.0;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "battle_cli", about = "Lanchester battle simulator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fight one engagement until a side breaks or time runs out.
    Run(RunArgs),
    /// Print every faction's regiments.
    Roster {
        #[arg(long, default_value = "./content")]
        content_dir: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Preset engagement from forces.json. Mutually exclusive with --attacker/--defender.
    #[arg(
        long,
        conflicts_with_all = ["attacker", "defender"],
        required_unless_present_all = ["attacker", "defender"]
    )]
    engagement: Option<String>,
    #[arg(long, requires = "defender")]
    attacker: Option<String>,
    #[arg(long, requires = "attacker")]
    defender: Option<String>,
    /// Overrides the engagement's target time.
    #[arg(long)]
    time: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long, default_value_t = 100)]
    print_every: u64,
    /// Skip writing history and run info to the runs/ directory.
    #[arg(long)]
    no_history: bool,
}

#[derive(Debug, PartialEq)]
struct Matchup {
    attacker: String,
    defender: String,
    time: f64,
}

fn resolve_matchup(content: &BattleContent, args: &RunArgs) -> Result<Matchup> {
    let matchup = match (&args.engagement, &args.attacker, &args.defender) {
        (Some(name), _, _) => {
            let engagement = content
                .engagement(name)
                .with_context(|| format!("unknown engagement '{name}'"))?;
            Matchup {
                attacker: engagement.attacker.clone(),
                defender: engagement.defender.clone(),
                time: args.time.unwrap_or(engagement.time),
            }
        }
        (None, Some(attacker), Some(defender)) => Matchup {
            attacker: attacker.clone(),
            defender: defender.clone(),
            time: args.time.unwrap_or(DEFAULT_TIME),
        },
        _ => bail!("either --engagement or both --attacker and --defender are required"),
    };
    if !(matchup.time.is_finite() && matchup.time > 0.0) {
        bail!("time must be a positive number, got {}", matchup.time);
    }
    Ok(matchup)
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

fn generate_run_id(seed: u64) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{timestamp}_seed{seed}")
}

fn create_run_dir(run_id: &str) -> Result<std::path::PathBuf> {
    let dir = std::path::PathBuf::from("runs").join(run_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating run directory: {}", dir.display()))?;
    Ok(dir)
}

fn run(args: &RunArgs) -> Result<()> {
    let content = load_content(&args.content_dir)?;
    let matchup = resolve_matchup(&content, args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let (mut attacker, mut defender) =
        build_engagement(&content, &matchup.attacker, &matchup.defender)?;

    println!(
        "Starting battle: {} vs {} time={} seed={seed} content_version={}",
        matchup.attacker, matchup.defender, matchup.time, content.content_version,
    );
    println!("  side_1 {attacker}");
    println!("  side_2 {defender}");
    println!("{}", "-".repeat(80));

    let mut observer = TracingObserver::new(args.print_every);
    let mut sim =
        BattleSimulation::with_constants(&mut attacker, &mut defender, content.constants);
    sim.run_observed(matchup.time, &mut rng, &mut observer);
    let report = sim.report();

    println!("{}", "-".repeat(80));
    print_report(&report, &matchup);

    if !args.no_history {
        let run_id = generate_run_id(seed);
        let run_dir = create_run_dir(&run_id)?;
        write_run_info(
            &run_dir,
            &run_id,
            seed,
            &content.content_version,
            serde_json::json!({
                "runner": "battle_cli",
                "attacker": matchup.attacker,
                "defender": matchup.defender,
                "time": matchup.time,
            }),
        )?;
        let history_path = run_dir.join("history.csv");
        write_history_csv(&history_path, sim.history())
            .with_context(|| format!("writing {}", history_path.display()))?;
        let report_path = run_dir.join("report.json");
        let file = std::fs::File::create(&report_path)
            .with_context(|| format!("creating {}", report_path.display()))?;
        serde_json::to_writer_pretty(file, &report)
            .with_context(|| format!("writing {}", report_path.display()))?;
        println!("Run directory: {}", run_dir.display());
    }

    Ok(())
}

fn side_name(matchup: &Matchup, side: Side) -> &str {
    match side {
        Side::First => &matchup.attacker,
        Side::Second => &matchup.defender,
    }
}

fn print_report(report: &BattleReport, matchup: &Matchup) {
    let outcome = report
        .outcome
        .map_or_else(|| "unfinished".to_string(), |reason| reason.to_string());
    println!(
        "Done after {} events at t={:.5}: {outcome}",
        report.steps, report.duration
    );
    for side in Side::BOTH {
        let i = side.index();
        println!(
            "  {side} {name}: {initial} -> {remaining} men (losses {losses}), morale {morale:.1}",
            name = side_name(matchup, side),
            initial = report.initial_size[i],
            remaining = report.final_size[i],
            losses = report.losses[i],
            morale = report.final_morale[i],
        );
    }
    match report.winner() {
        Some(side) => println!("Victor: {}", side_name(matchup, side)),
        None => println!("No victor."),
    }
}

fn roster(content_dir: &str) -> Result<()> {
    let content = load_content(content_dir)?;
    for army in build_armies(&content)?.values() {
        println!("{army}");
        println!("Total strength: {}", army.total_strength());
        println!();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(&args)?,
        Commands::Roster { content_dir } => roster(&content_dir)?,
    }
    Ok(())
}
