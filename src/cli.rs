use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gomod-license-report")]
#[command(about = "Report the licenses of Go module dependencies")]
#[command(
    long_about = "Report the licenses of Go module dependencies.\n\n\
    Every command reads its configuration from <PATH>/.gomod-license-report.toml, \
    where PATH is the directory holding the projects (default: current directory)."
)]
#[command(version)]
pub struct Cli {
    /// Defaults to `report` on the current directory
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress log output and status messages (the report is still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve dependency licenses and print the report
    Report {
        /// Directory containing the projects and the configuration file
        /// (default: current directory)
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only inspect the local module cache
        #[arg(long)]
        no_remote: bool,
    },
    /// Write a default configuration file into PATH
    Init {
        /// Directory containing the projects (default: current directory)
        path: Option<PathBuf>,
    },
    /// Show or validate the configuration read from PATH
    Config {
        /// Directory containing the projects (default: current directory)
        path: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Table,
    Json,
}
