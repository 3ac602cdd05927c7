use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

pub const CONFIG_FILE_NAME: &str = ".gomod-license-report.toml";

pub const DEFAULT_MANIFEST_GLOB: &str = "*/go.mod";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_HOST_PREFIX: &str = "github.com/";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Glob (relative to the projects directory) matching project manifests
    pub manifest_glob: Option<String>,

    /// Module cache base directory (default: $HOME/go/pkg/mod)
    pub cache_dir: Option<PathBuf>,

    /// Output format (markdown, table, json)
    pub format: Option<String>,

    /// Render modules whose license could not be resolved
    pub show_not_found: Option<bool>,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub remote: RemoteConfig,
}

/// External command that prints `<parent> <child>` module graph edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub env: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub enabled: Option<bool>,
    pub api_base_url: Option<String>,
    pub host_prefix: Option<String>,
    /// Name of the environment variable holding the API access token
    pub token_env: Option<String>,
    /// Request timeout; unset means requests never time out
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_glob: Some(DEFAULT_MANIFEST_GLOB.to_string()),
            cache_dir: None,
            format: Some("markdown".to_string()),
            show_not_found: Some(true),
            graph: GraphConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            command: Some("go".to_string()),
            args: Some(vec!["mod".to_string(), "graph".to_string()]),
            env: Some(BTreeMap::from([("GO111MODULE".to_string(), "on".to_string())])),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            host_prefix: Some(DEFAULT_HOST_PREFIX.to_string()),
            token_env: Some(DEFAULT_TOKEN_ENV.to_string()),
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn manifest_glob(&self) -> &str {
        self.manifest_glob.as_deref().unwrap_or(DEFAULT_MANIFEST_GLOB)
    }

    /// Configured cache directory, or `$HOME/go/pkg/mod`.
    pub fn cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join("go").join("pkg").join("mod"),
            None => {
                tracing::warn!("HOME is not set, using a relative module cache path");
                PathBuf::from("go").join("pkg").join("mod")
            }
        }
    }

    pub fn show_not_found(&self) -> bool {
        self.show_not_found.unwrap_or(true)
    }
}

impl GraphConfig {
    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or("go")
    }

    pub fn args(&self) -> Vec<String> {
        self.args
            .clone()
            .unwrap_or_else(|| vec!["mod".to_string(), "graph".to_string()])
    }

    pub fn env(&self) -> BTreeMap<String, String> {
        self.env
            .clone()
            .unwrap_or_else(|| BTreeMap::from([("GO111MODULE".to_string(), "on".to_string())]))
    }
}

impl RemoteConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn host_prefix(&self) -> &str {
        self.host_prefix.as_deref().unwrap_or(DEFAULT_HOST_PREFIX)
    }

    pub fn token_env(&self) -> &str {
        self.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV)
    }
}

/// Load `.gomod-license-report.toml` from `dir`, falling back to defaults
pub fn load_config_from(dir: &Path) -> Result<Config> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded configuration");
    Ok(config)
}
