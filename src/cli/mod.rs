//! Command-line interface
//!
//! Argument structures, logging setup and routing of each subcommand to its
//! role.

pub mod args;
pub mod router;

pub use args::{BuilderArgs, Cli, Commands, RunArgs, SplitterArgs};
pub use router::execute_command;

/// Filter directive for the given verbosity
///
/// `-v` flags win; without them the configured level (or `LEXAN_LOG`) is
/// used, falling back to `info`.
pub fn log_filter(verbose: u8, configured: Option<&str>) -> String {
    match verbose {
        0 => configured.unwrap_or("info").to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the stderr subscriber; stdout of workers is their completion pipe
pub fn init_tracing(verbose: u8, configured: Option<&str>) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_filter(verbose, configured))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init();
}
