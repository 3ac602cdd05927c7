use anyhow::{bail, Result};
use std::path::PathBuf;
use gomod_license_report::config::{load_config_from, CONFIG_FILE_NAME};

use super::projects_root;

pub fn handle_config(path: Option<PathBuf>, show: bool, validate: bool, quiet: bool) -> Result<()> {
    if !show && !validate {
        bail!("Use --show or --validate");
    }

    let root = projects_root(path)?;
    let config_path = root.join(CONFIG_FILE_NAME);

    match load_config_from(&root) {
        Ok(config) => {
            if show {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            if validate && !quiet {
                if config_path.exists() {
                    println!("✅ Configuration is valid: {}", config_path.display());
                } else {
                    println!("✅ Configuration is valid (no {}, using defaults)", CONFIG_FILE_NAME);
                }
            }
            Ok(())
        }
        Err(e) => {
            if !quiet {
                eprintln!("❌ Configuration validation failed: {:#}", e);
            }
            std::process::exit(1);
        }
    }
}
