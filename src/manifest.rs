use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

const REQUIRE_OPEN: &str = "require (";
const REQUIRE_CLOSE: &str = ")";

/// A project discovered by its `go.mod` manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Basename of the project directory
    pub name: String,
    pub dir: PathBuf,
    pub manifest: PathBuf,
}

pub struct GoModParser;

impl GoModParser {
    /// Find manifests matching `pattern` under `root`, in path order.
    ///
    /// Only `pattern` is a glob; `root` is matched literally.
    pub fn find_projects(root: &Path, pattern: &str) -> Result<Vec<Project>> {
        let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
        let full_pattern = Path::new(&escaped_root).join(pattern);
        let full_pattern = full_pattern.to_string_lossy();

        let mut projects = Vec::new();
        for entry in glob::glob(&full_pattern)
            .with_context(|| format!("Invalid manifest pattern: {}", pattern))?
        {
            let manifest = entry.context("Failed to read manifest path")?;
            let dir = manifest
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.display().to_string());

            tracing::info!(project = %name, manifest = %manifest.display(), "found project");
            projects.push(Project { name, dir, manifest });
        }

        if projects.is_empty() {
            tracing::warn!(pattern = %full_pattern, "no project manifests matched");
        }

        Ok(projects)
    }

    /// Read a manifest and return the module paths it requires directly
    pub fn read_direct_dependencies(path: &Path) -> Result<BTreeSet<String>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Ok(Self::parse_direct_dependencies(&content))
    }

    /// Module paths listed as `<path> <version>` inside `require ( ... )` blocks.
    ///
    /// Entries carrying anything after the version (such as `// indirect`)
    /// are not direct requirements and are ignored.
    pub fn parse_direct_dependencies(content: &str) -> BTreeSet<String> {
        let mut modules = BTreeSet::new();
        let mut in_require = false;

        for line in content.lines() {
            let line = line.trim();
            if line == REQUIRE_OPEN {
                in_require = true;
                continue;
            }
            if line == REQUIRE_CLOSE {
                in_require = false;
                continue;
            }
            if in_require {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if let [module, _version] = tokens.as_slice() {
                    modules.insert(module.to_string());
                }
            }
        }

        modules
    }
}
