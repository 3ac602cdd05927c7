use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        None => commands::handle_report(None, None, None, false),
        Some(Commands::Report {
            path,
            format,
            output,
            no_remote,
        }) => commands::handle_report(path, format, output, no_remote),
        Some(Commands::Init { path }) => commands::handle_init(path, cli.quiet),
        Some(Commands::Config {
            path,
            show,
            validate,
        }) => commands::handle_config(path, show, validate, cli.quiet),
    }
}

/// Logs go to stderr so the report on stdout stays clean.
/// `RUST_LOG` applies unless `--verbose` or `--quiet` is given.
fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("gomod_license_report=debug,warn")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
