use crate::report::{LicenseEntry, LicenseReport};

pub const DIRECT_HEADING: &str = "# Direct gomod dependencies";
pub const CONSOLIDATED_HEADING: &str = "# Consolidated go mod graph dependencies";
pub const NOT_FOUND_HEADING: &str = "# Licenses not found";

/// Markdown report: one section per project (direct dependencies only), then
/// the consolidated listing of the whole graph.
pub fn format_markdown_output(report: &LicenseReport, show_not_found: bool) -> String {
    let mut output = String::new();

    output.push_str(DIRECT_HEADING);
    output.push('\n');
    for project in &report.projects {
        output.push('\n');
        output.push_str(&format!("## {}\n", project.name));
        for entry in &project.dependencies {
            output.push_str(&format_link(entry));
        }
    }

    output.push('\n');
    output.push_str(CONSOLIDATED_HEADING);
    output.push('\n');
    for entry in &report.consolidated {
        output.push_str(&format_link(entry));
    }

    if show_not_found && !report.not_found.is_empty() {
        output.push('\n');
        output.push_str(NOT_FOUND_HEADING);
        output.push('\n');
        for (module, reason) in &report.not_found {
            output.push_str(&format!("- {}: {}\n", module, reason));
        }
    }

    output
}

fn format_link(entry: &LicenseEntry) -> String {
    format!("- [{0}](https://{0}) ({1})\n", entry.module, entry.license)
}

/// Plain two-column listing of the consolidated entries
pub fn format_table_output(report: &LicenseReport) -> String {
    if report.consolidated.is_empty() {
        return "No modules found.\n".to_string();
    }

    let width = report
        .consolidated
        .iter()
        .map(|e| e.module.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for entry in &report.consolidated {
        output.push_str(&format!("{:<width$} {}\n", entry.module, entry.license, width = width));
    }
    output
}
