use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use crate::cli::OutputFormat;
use gomod_license_report::config::load_config_from;
use gomod_license_report::graph::CommandGraphSource;
use gomod_license_report::license::{GithubClient, LicenseResolver, RemoteLicenseLookup};
use gomod_license_report::output::{format_markdown_output, format_table_output};
use gomod_license_report::report::build_report;

use super::projects_root;

pub fn handle_report(
    path: Option<PathBuf>,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    no_remote: bool,
) -> Result<()> {
    let root = projects_root(path)?;

    // Configuration lives next to the projects
    let config = load_config_from(&root)?;

    let source = CommandGraphSource::from_config(&config);
    let github = if config.remote.enabled() && !no_remote {
        Some(GithubClient::from_config(&config.remote).context("Failed to create HTTP client")?)
    } else {
        tracing::info!("remote license lookup disabled");
        None
    };
    let resolver = LicenseResolver::new(github.as_ref().map(|c| c as &dyn RemoteLicenseLookup));

    let report = build_report(&root, config.manifest_glob(), &source, &resolver)?;

    if report.summary.not_found > 0 {
        tracing::warn!(
            not_found = report.summary.not_found,
            total = report.summary.total_modules,
            "some module licenses could not be resolved"
        );
    }

    // Determine output format
    let format = format.unwrap_or_else(|| {
        match config.format.as_deref() {
            Some("json") => OutputFormat::Json,
            Some("table") => OutputFormat::Table,
            _ => OutputFormat::Markdown,
        }
    });

    let output_content = match format {
        OutputFormat::Markdown => format_markdown_output(&report, config.show_not_found()),
        OutputFormat::Table => format_table_output(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };

    match output {
        Some(path) => fs::write(&path, output_content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            print!("{}", output_content);
            if !output_content.ends_with('\n') {
                println!();
            }
        }
    }

    Ok(())
}
