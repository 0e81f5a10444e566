use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rep_tracker::config::AppConfig;
use rep_tracker::exercise::ExerciseRegistry;
use rep_tracker::fixtures::{
    ExpectationDiff, FixtureCatalog, FixtureData, FixtureProcessor, FixtureReport,
    SyntheticMotion,
};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "rep_cli",
    about = "Deterministic pose replay harness for the rep tracker"
)]
struct Cli {
    /// Override directory containing fixture assets (defaults to the crate fixtures/)
    #[arg(long, global = true)]
    fixtures_dir: Option<PathBuf>,
    /// JSON configuration file (defaults to assets/rep_config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a fixture and optionally compare against expectations
    Replay {
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        expect: Option<PathBuf>,
    },
    /// Stream session events for a fixture to stdout, one JSON object per line
    Stream {
        #[arg(long)]
        fixture: String,
    },
    /// Replay generated motion instead of a recorded fixture
    Synthetic {
        #[arg(long, default_value_t = 3)]
        reps: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Probability of a frame without a detected pose
        #[arg(long, default_value_t = 0.0)]
        dropout: f64,
        /// Angle noise amplitude in degrees
        #[arg(long, default_value_t = 2.0)]
        jitter: f64,
    },
    /// List available fixtures on disk
    DumpFixtures,
    /// List registered exercises and their thresholds
    Exercises,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = cli
        .fixtures_dir
        .map(FixtureCatalog::new)
        .unwrap_or_else(FixtureCatalog::default);
    let config = cli
        .config
        .map(AppConfig::load_from_file)
        .unwrap_or_else(AppConfig::load);
    let registry = ExerciseRegistry::builtin();

    match cli.command {
        Commands::Replay { fixture, expect } => {
            run_replay(&catalog, config, registry, &fixture, expect)
        }
        Commands::Stream { fixture } => run_stream(&catalog, config, registry, &fixture),
        Commands::Synthetic {
            reps,
            seed,
            dropout,
            jitter,
        } => {
            let motion = SyntheticMotion::new(reps)
                .with_seed(seed)
                .with_dropout(dropout)
                .with_jitter(jitter);
            run_synthetic(config, registry, motion)
        }
        Commands::DumpFixtures => run_dump(&catalog),
        Commands::Exercises => run_exercises(&registry),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // stdout carries JSON output only
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_replay(
    catalog: &FixtureCatalog,
    config: AppConfig,
    registry: ExerciseRegistry,
    fixture: &str,
    override_expect: Option<PathBuf>,
) -> Result<ExitCode> {
    let processor = FixtureProcessor::new(config, registry);
    let data = catalog.load(fixture, override_expect)?;
    let report = processor
        .run(&data)
        .with_context(|| format!("processing fixture {}", fixture))?;

    emit_report(&report)?;

    if let Some(expectations) = data.expectations {
        match expectations.verify(&report) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_stream(
    catalog: &FixtureCatalog,
    config: AppConfig,
    registry: ExerciseRegistry,
    fixture: &str,
) -> Result<ExitCode> {
    let processor = FixtureProcessor::new(config, registry);
    let data = catalog.load(fixture, None)?;
    let (_, events) = processor
        .run_with_events(&data)
        .with_context(|| format!("processing fixture {}", fixture))?;

    for event in events {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(ExitCode::from(0))
}

fn run_synthetic(
    config: AppConfig,
    registry: ExerciseRegistry,
    motion: SyntheticMotion,
) -> Result<ExitCode> {
    let exercise = config.exercise_config(&registry)?;
    let recording = motion.recording(&exercise);
    let data = FixtureData::from_recording(format!("synthetic-{}reps", motion.reps), recording);

    let processor = FixtureProcessor::new(config, registry);
    let report = processor.run(&data).context("processing synthetic motion")?;
    emit_report(&report)?;
    Ok(ExitCode::from(0))
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn run_exercises(registry: &ExerciseRegistry) -> Result<ExitCode> {
    for (exercise, config) in registry.entries() {
        let [proximal, vertex, distal] = config.joints;
        println!(
            "{} ({}): {:?}-{:?}-{:?} on {:?}, extended > {}, flexed < {}",
            exercise,
            config.name,
            proximal,
            vertex,
            distal,
            config.side,
            config.extended_threshold,
            config.flexed_threshold
        );
    }
    Ok(ExitCode::from(0))
}

fn emit_report(report: &FixtureReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}
