use anyhow::Result;
use std::path::PathBuf;
use gomod_license_report::init;

use super::projects_root;

pub fn handle_init(path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let root = projects_root(path)?;
    let written = init::generate_config_in(&root)?;

    if !quiet {
        println!("✅ Wrote {}", written.display());
    }

    Ok(())
}
