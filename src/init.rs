use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{value, Array, DocumentMut, InlineTable, Item, Table};

use crate::config::{
    CONFIG_FILE_NAME, DEFAULT_API_BASE_URL, DEFAULT_HOST_PREFIX, DEFAULT_MANIFEST_GLOB, DEFAULT_TOKEN_ENV,
};

const CONFIG_HEADER: &str = "# gomod-license-report configuration\n\n";

/// Write or complete `.gomod-license-report.toml` in `dir`, returning its path
pub fn generate_config_in(dir: &Path) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    generate_config_at_path(&config_path)?;
    Ok(config_path)
}

/// Write the default configuration to `path`.
///
/// An existing file keeps its values and comments; only missing keys are added.
pub fn generate_config_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let config_path = path.as_ref();

    let (mut doc, header) = if config_path.exists() {
        let existing = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let doc = existing
            .parse::<DocumentMut>()
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        (doc, "")
    } else {
        (DocumentMut::new(), CONFIG_HEADER)
    };

    merge_defaults(&mut doc, &default_document());

    fs::write(config_path, format!("{}{}", header, doc))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(())
}

fn default_document() -> DocumentMut {
    let mut doc = DocumentMut::new();
    doc["manifest_glob"] = value(DEFAULT_MANIFEST_GLOB);
    doc["format"] = value("markdown");
    doc["show_not_found"] = value(true);

    let mut graph = Table::new();
    graph["command"] = value("go");
    graph["args"] = value(Array::from_iter(["mod", "graph"]));
    let mut env = InlineTable::new();
    env.insert("GO111MODULE", "on".into());
    graph["env"] = value(env);
    graph
        .decor_mut()
        .set_prefix("\n# Command printing `<parent> <child>` module edges\n");
    doc["graph"] = Item::Table(graph);

    let mut remote = Table::new();
    remote["enabled"] = value(true);
    remote["api_base_url"] = value(DEFAULT_API_BASE_URL);
    remote["host_prefix"] = value(DEFAULT_HOST_PREFIX);
    remote["token_env"] = value(DEFAULT_TOKEN_ENV);
    remote
        .decor_mut()
        .set_prefix("\n# License lookup for modules missing from the module cache\n");
    doc["remote"] = Item::Table(remote);

    doc
}

fn merge_defaults(doc: &mut DocumentMut, defaults: &DocumentMut) {
    merge_table(doc.as_table_mut(), defaults.as_table());
}

fn merge_table(target: &mut Table, defaults: &Table) {
    for (key, item) in defaults.iter() {
        if !target.contains_key(key) {
            target.insert(key, item.clone());
            continue;
        }
        if let (Some(Item::Table(existing)), Item::Table(default_table)) = (target.get_mut(key), item) {
            merge_table(existing, default_table);
        }
    }
}
