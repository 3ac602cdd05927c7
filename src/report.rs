use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::graph::{module_path, GraphSource, ModuleGraph};
use crate::license::{LicenseRecords, LicenseResolver, ResolvedLicense};
use crate::manifest::{GoModParser, Project};

/// One listing line: a module path (no version) and its license.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LicenseEntry {
    pub module: String,
    pub license: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectSection {
    pub name: String,
    pub manifest: PathBuf,
    /// Entries whose module the project requires directly
    pub dependencies: Vec<LicenseEntry>,
}

#[derive(Debug, Serialize, Default)]
pub struct ReportSummary {
    pub total_modules: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub remote: usize,
    /// License -> number of listing entries, most common first
    pub licenses: IndexMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct LicenseReport {
    pub generated_at: DateTime<Utc>,
    pub projects: Vec<ProjectSection>,
    pub consolidated: Vec<LicenseEntry>,
    pub not_found: BTreeMap<String, String>,
    pub summary: ReportSummary,
}

/// Merge the module graphs of all projects.
///
/// Any graph command failure aborts the whole run.
pub fn collect_module_graph(projects: &[Project], source: &dyn GraphSource) -> Result<ModuleGraph> {
    let mut graph = ModuleGraph::new();
    for project in projects {
        let modules = source
            .module_graph(&project.dir)
            .with_context(|| format!("Failed to read module graph of {}", project.name))?;
        tracing::info!(project = %project.name, modules = modules.len(), "module graph read");
        graph.extend(modules);
    }
    Ok(graph)
}

/// Deduplicated `(module path, license)` listing, sorted by module path.
///
/// Several versions of one module with the same license collapse into one
/// entry; differing licenses stay separate.
pub fn consolidated_listing(licenses: &BTreeMap<String, ResolvedLicense>) -> Vec<LicenseEntry> {
    licenses
        .iter()
        .map(|(module, resolved)| LicenseEntry {
            module: module_path(module).to_string(),
            license: resolved.license.clone(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Entries of `listing` whose module path is in `direct`, regardless of version.
pub fn direct_listing(listing: &[LicenseEntry], direct: &BTreeSet<String>) -> Vec<LicenseEntry> {
    listing
        .iter()
        .filter(|entry| direct.contains(&entry.module))
        .cloned()
        .collect()
}

pub fn create_report(
    projects: Vec<(Project, BTreeSet<String>)>,
    records: LicenseRecords,
) -> LicenseReport {
    let consolidated = consolidated_listing(&records.licenses);

    let sections = projects
        .into_iter()
        .map(|(project, direct)| ProjectSection {
            dependencies: direct_listing(&consolidated, &direct),
            name: project.name,
            manifest: project.manifest,
        })
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in &consolidated {
        *counts.entry(entry.license.clone()).or_insert(0) += 1;
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let summary = ReportSummary {
        total_modules: records.len(),
        resolved: records.licenses.len(),
        not_found: records.not_found.len(),
        remote: records.remote_count(),
        licenses: counts.into_iter().collect(),
    };

    LicenseReport {
        generated_at: Utc::now(),
        projects: sections,
        consolidated,
        not_found: records.not_found,
        summary,
    }
}

/// Discover projects under `root`, resolve every module license and build the report.
pub fn build_report(
    root: &Path,
    manifest_glob: &str,
    source: &dyn GraphSource,
    resolver: &LicenseResolver<'_>,
) -> Result<LicenseReport> {
    let projects = GoModParser::find_projects(root, manifest_glob)?;
    let graph = collect_module_graph(&projects, source)?;
    let records = resolver.resolve_all(&graph);

    let mut with_direct = Vec::with_capacity(projects.len());
    for project in projects {
        let direct = GoModParser::read_direct_dependencies(&project.manifest)?;
        with_direct.push((project, direct));
    }

    Ok(create_report(with_direct, records))
}
