mod report;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{LevelFilter, debug, info};
use std::path::PathBuf;
use std::time::Instant;

use lorebound_game::{Archetype, Catalog, SimulationConfig, run_simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArchetypeArg {
    /// Picks uniformly among all defined actions
    Balanced,
    /// Grinds the hardest fights available
    PowerGamer,
    /// Mostly social quests, the occasional goblin
    Roleplayer,
}

impl From<ArchetypeArg> for Archetype {
    fn from(value: ArchetypeArg) -> Self {
        match value {
            ArchetypeArg::Balanced => Self::Balanced,
            ArchetypeArg::PowerGamer => Self::PowerGamer,
            ArchetypeArg::Roleplayer => Self::Roleplayer,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lorebound-sim", version)]
#[command(about = "Monte Carlo progression simulator for Lorebound balance tuning")]
struct Args {
    /// Number of independent trials
    #[arg(long, default_value_t = 100)]
    runs: i64,

    /// Simulated playtime budget per trial, in hours
    #[arg(long, default_value_t = 200)]
    hours: i64,

    /// Play style driving action selection
    #[arg(long, value_enum, default_value_t = ArchetypeArg::Balanced)]
    archetype: ArchetypeArg,

    /// Output CSV path
    #[arg(long, default_value = "simulation_results.csv")]
    output: PathBuf,

    /// Base seed; each run derives its own stream from it
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = validate_args(&args)?;

    announce_banner(&args);

    let catalog = Catalog::builtin();
    debug!(
        "catalog loaded: {} actions, {} mobs, {} items",
        catalog.actions().len(),
        catalog.mobs().len(),
        catalog.items().len()
    );

    let start_time = Instant::now();
    let rows = run_simulation(&catalog, &config)?;
    info!(
        "simulated {} runs ({} rows) in {:?}",
        config.runs,
        rows.len(),
        start_time.elapsed()
    );

    report::write_csv(&args.output, &rows)?;
    println!(
        "💾 Wrote {} rows to {}",
        rows.len().to_string().green(),
        args.output.display()
    );

    report::print_summary(&rows, Archetype::from(args.archetype).label(), config.total_hours);
    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

/// Reject bad input before any simulation work starts.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn validate_args(args: &Args) -> Result<SimulationConfig> {
    if args.runs < 1 {
        bail!("--runs must be at least 1 (got {})", args.runs);
    }
    if args.hours < 1 {
        bail!("--hours must be at least 1 (got {})", args.hours);
    }
    Ok(SimulationConfig {
        runs: args.runs as u32,
        total_hours: args.hours as f64,
        archetype: args.archetype.into(),
        seed: args.seed,
    })
}

fn announce_banner(args: &Args) {
    println!("{}", "🎲 Lorebound Progression Simulator".bright_cyan().bold());
    println!("{}", "==================================".cyan());
    println!(
        "{} runs · {} hours · {:?} · seed {}",
        args.runs, args.hours, args.archetype, args.seed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            runs: 2,
            hours: 1,
            archetype: ArchetypeArg::Balanced,
            output: PathBuf::from("simulation_results.csv"),
            seed: 42,
            verbose: false,
        }
    }

    #[test]
    fn validate_accepts_defaults() {
        let config = validate_args(&base_args()).unwrap();
        assert_eq!(config.runs, 2);
        assert!((config.total_hours - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.archetype, Archetype::Balanced);
    }

    #[test]
    fn validate_rejects_non_positive_runs() {
        let mut args = base_args();
        args.runs = 0;
        assert!(validate_args(&args).is_err());
        args.runs = -5;
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn validate_rejects_non_positive_hours() {
        let mut args = base_args();
        args.hours = -1;
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn archetype_arg_maps_onto_core_enum() {
        assert_eq!(
            Archetype::from(ArchetypeArg::PowerGamer),
            Archetype::PowerGamer
        );
        assert_eq!(
            Archetype::from(ArchetypeArg::Roleplayer),
            Archetype::Roleplayer
        );
    }

    #[test]
    fn cli_parses_known_archetypes() {
        let args = Args::try_parse_from([
            "lorebound-sim",
            "--runs",
            "5",
            "--archetype",
            "power-gamer",
        ])
        .unwrap();
        assert_eq!(args.runs, 5);
        assert_eq!(args.archetype, ArchetypeArg::PowerGamer);
    }

    #[test]
    fn cli_rejects_unknown_archetype() {
        assert!(Args::try_parse_from(["lorebound-sim", "--archetype", "speedrunner"]).is_err());
    }

    #[test]
    fn end_to_end_writes_the_contracted_csv() {
        let catalog = Catalog::builtin();
        let config = SimulationConfig {
            runs: 1,
            total_hours: 1.0,
            archetype: Archetype::Balanced,
            seed: 42,
        };
        let rows = run_simulation(&catalog, &config).unwrap();
        let path = std::env::temp_dir().join("lorebound-sim-e2e.csv");
        report::write_csv(&path, &rows).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(report::CSV_HEADER));
        assert_eq!(content.lines().count(), rows.len() + 1);
    }
}
