//! Module graph discovery.
//!
//! A [`GraphSource`] produces the set of modules reachable from a project,
//! keyed by module reference (`path@version`) and mapped to the directory the
//! module occupies in the local module cache.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;
use crate::error::GraphError;

/// Module reference -> module cache directory.
pub type ModuleGraph = BTreeMap<String, PathBuf>;

pub trait GraphSource {
    fn module_graph(&self, project_dir: &Path) -> Result<ModuleGraph, GraphError>;
}

/// Runs an external command (`go mod graph` by default) inside the project
/// directory and parses its edge list.
pub struct CommandGraphSource {
    command: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cache_dir: PathBuf,
}

impl CommandGraphSource {
    pub fn new(command: impl Into<String>, args: Vec<String>, cache_dir: PathBuf) -> Self {
        Self {
            command: command.into(),
            args,
            env: BTreeMap::new(),
            cache_dir,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut source = Self::new(config.graph.command(), config.graph.args(), config.cache_dir());
        source.env = config.graph.env();
        source
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    fn display_command(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl GraphSource for CommandGraphSource {
    fn module_graph(&self, project_dir: &Path) -> Result<ModuleGraph, GraphError> {
        tracing::debug!(dir = %project_dir.display(), command = %self.display_command(), "reading module graph");

        let output = Command::new(&self.command)
            .args(&self.args)
            .envs(&self.env)
            .current_dir(project_dir)
            .output()
            .map_err(|source| GraphError::Spawn {
                command: self.display_command(),
                dir: project_dir.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(GraphError::Failed {
                command: self.display_command(),
                dir: project_dir.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(parse_graph_output(&text, &self.cache_dir))
    }
}

/// Parse `<parent> <child>` lines, recording every child module.
///
/// Blank lines are skipped. Lines that do not hold exactly two tokens are
/// logged and skipped.
pub fn parse_graph_output(text: &str, cache_dir: &Path) -> ModuleGraph {
    let mut graph = ModuleGraph::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [_parent, child] => {
                graph.insert(child.to_string(), module_cache_path(cache_dir, child));
            }
            _ => {
                tracing::warn!(tokens = tokens.len(), line = %line, "skipping malformed module graph line");
            }
        }
    }

    graph
}

/// Directory of `module` inside the module cache.
pub fn module_cache_path(cache_dir: &Path, module: &str) -> PathBuf {
    cache_dir.join(escape_module_path(module))
}

/// Apply the module cache case-encoding: `A` becomes `!a`.
pub fn escape_module_path(module: &str) -> String {
    let mut escaped = String::with_capacity(module.len());
    for c in module.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Module path without its `@version` suffix.
pub fn module_path(module: &str) -> &str {
    module.split('@').next().unwrap_or(module)
}
