use clap::Parser;
use lexan::cli::{execute_command, Cli};
use lexan::error::LexanError;
use tracing::error;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not usage errors
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = execute_command(cli.command, cli.verbose) {
        let code = e
            .downcast_ref::<LexanError>()
            .map(LexanError::exit_code)
            .unwrap_or(1);
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(code);
    }
}
