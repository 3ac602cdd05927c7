use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::graph::ModuleGraph;

pub mod detector;
pub mod github;

pub use detector::{classify_license_text, detect_license};
pub use github::{GithubClient, RemoteLicense, RemoteLicenseLookup};

/// Diagnostic recorded when the module directory is absent and the remote
/// lookup failed too.
pub const NOT_FOUND: &str = "NOT FOUND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseSource {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLicense {
    pub license: String,
    pub source: LicenseSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(ResolvedLicense),
    NotFound(String),
}

/// License outcome of every module in a graph. A module reference is a key in
/// exactly one of the two maps.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LicenseRecords {
    pub licenses: BTreeMap<String, ResolvedLicense>,
    pub not_found: BTreeMap<String, String>,
}

impl LicenseRecords {
    pub fn len(&self) -> usize {
        self.licenses.len() + self.not_found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remote_count(&self) -> usize {
        self.licenses
            .values()
            .filter(|l| l.source == LicenseSource::Remote)
            .count()
    }
}

/// Resolves module licenses from the module cache, falling back to a remote
/// lookup when the cache has no usable license file.
pub struct LicenseResolver<'a> {
    remote: Option<&'a dyn RemoteLicenseLookup>,
}

impl<'a> LicenseResolver<'a> {
    pub fn new(remote: Option<&'a dyn RemoteLicenseLookup>) -> Self {
        Self { remote }
    }

    /// Local only; every module the cache cannot classify is not found
    pub fn local_only() -> Self {
        Self { remote: None }
    }

    pub fn resolve(&self, module: &str, dir: &Path) -> Resolution {
        let local_err = match detect_license(dir) {
            Ok(license) => {
                tracing::debug!(module, license = %license, "license found in module cache");
                return Resolution::Found(ResolvedLicense {
                    license,
                    source: LicenseSource::Local,
                });
            }
            Err(e) => e,
        };
        tracing::debug!(module, error = %local_err, "local license detection failed");

        let remote_err = match self.remote {
            Some(remote) => match remote.lookup(module) {
                Ok(license) => {
                    tracing::debug!(module, license = %license, "license found remotely");
                    return Resolution::Found(ResolvedLicense {
                        license,
                        source: LicenseSource::Remote,
                    });
                }
                Err(e) => Some(e),
            },
            None => None,
        };
        if let Some(remote_err) = &remote_err {
            tracing::debug!(module, error = %remote_err, "remote license lookup failed");
        }

        // The remote reason is not kept; the local error decides the diagnostic.
        if local_err.is_missing_directory() {
            Resolution::NotFound(NOT_FOUND.to_string())
        } else {
            Resolution::NotFound(local_err.to_string())
        }
    }

    /// Resolve every module of the graph in key order, one at a time.
    pub fn resolve_all(&self, graph: &ModuleGraph) -> LicenseRecords {
        let mut records = LicenseRecords::default();

        for (module, dir) in graph {
            match self.resolve(module, dir) {
                Resolution::Found(license) => {
                    records.licenses.insert(module.clone(), license);
                }
                Resolution::NotFound(reason) => {
                    tracing::warn!(module = %module, reason = %reason, "license not found");
                    records.not_found.insert(module.clone(), reason);
                }
            }
        }

        records
    }
}
