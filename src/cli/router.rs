//! Command routing and execution

use crate::cli::args::{BuilderArgs, Commands, RunArgs, SplitterArgs};
use crate::cli::init_tracing;
use crate::config::ConfigLoader;
use crate::orchestrator::{format_summary, Orchestrator};
use crate::worker::{self, WorkerClock};
use anyhow::{Context, Result};
use tracing::debug;

/// Execute a parsed command
pub fn execute_command(command: Commands, verbose: u8) -> Result<()> {
    match command {
        Commands::Run(args) => run_pipeline(args, verbose),
        Commands::Splitter(args) => run_splitter(args, verbose),
        Commands::Builder(args) => run_builder(args, verbose),
    }
}

fn run_pipeline(args: RunArgs, verbose: u8) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut config = ConfigLoader::new(cwd)
        .with_explicit_path(args.config.as_deref())
        .load()?;
    args.apply_to(&mut config);

    init_tracing(verbose, config.log_level.as_deref());
    debug!("lexan started with verbosity level: {}", verbose);
    debug!("Effective configuration: {:?}", config);

    let report = Orchestrator::new(config, verbose)?.run()?;
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", format_summary(&report));
    }
    Ok(())
}

fn env_log_level() -> Option<String> {
    std::env::var("LEXAN_LOG").ok()
}

fn run_splitter(args: SplitterArgs, verbose: u8) -> Result<()> {
    let clock = WorkerClock::start();
    init_tracing(verbose, env_log_level().as_deref());

    let config = worker::SplitterConfig::from(args);
    let id = config.id;
    worker::splitter::run(&config, &clock, &mut std::io::stdout().lock())
        .with_context(|| format!("splitter {id} failed"))?;
    Ok(())
}

fn run_builder(args: BuilderArgs, verbose: u8) -> Result<()> {
    let clock = WorkerClock::start();
    init_tracing(verbose, env_log_level().as_deref());

    let config = worker::BuilderConfig::from(args);
    let id = config.id;
    worker::builder::run(&config, &clock, &mut std::io::stdout().lock())
        .with_context(|| format!("builder {id} failed"))?;
    Ok(())
}
