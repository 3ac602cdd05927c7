//! License lookup through the GitHub repository API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::RemoteConfig;
use crate::error::RemoteLicenseError;

/// A remote source of license identifiers keyed by module reference.
pub trait RemoteLicenseLookup {
    fn lookup(&self, module: &str) -> Result<String, RemoteLicenseError>;
}

/// Outcome of decoding a repository metadata response.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteLicense {
    Resolved(String),
    ErrorMessage(String),
    Unrecognized,
}

#[derive(Debug, Default, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    license: Option<RepoLicense>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RepoLicense {
    #[serde(default)]
    spdx_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl From<RepoResponse> for RemoteLicense {
    fn from(response: RepoResponse) -> Self {
        let license = response.license.unwrap_or_default();
        // "NOASSERTION" is what the API reports for licenses it cannot map to SPDX
        let spdx_id = license
            .spdx_id
            .filter(|id| !id.is_empty() && id != "NOASSERTION");
        let name = license.name.filter(|n| !n.is_empty());

        if let Some(id) = spdx_id {
            RemoteLicense::Resolved(id)
        } else if let Some(name) = name {
            RemoteLicense::Resolved(name)
        } else if let Some(message) = response.message.filter(|m| !m.is_empty()) {
            RemoteLicense::ErrorMessage(message)
        } else {
            RemoteLicense::Unrecognized
        }
    }
}

/// Decode a repository metadata body.
pub fn parse_repo_response(body: &str) -> Result<RemoteLicense, serde_json::Error> {
    let response: RepoResponse = serde_json::from_str(body)?;
    Ok(response.into())
}

/// `owner/repo` for a module hosted under `host_prefix`.
///
/// Subdirectories and major version suffixes of the module path are dropped.
pub fn repo_slug(module: &str, host_prefix: &str) -> Option<String> {
    let path = module.strip_prefix(host_prefix)?;
    let path = path.split('@').next().unwrap_or(path);
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    Some(format!("{}/{}", owner, repo))
}

pub struct GithubClient {
    client: Client,
    api_base_url: String,
    host_prefix: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(
        api_base_url: &str,
        host_prefix: &str,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            host_prefix: host_prefix.to_string(),
            token,
        })
    }

    /// Build a client from config, reading the token from the configured variable
    pub fn from_config(remote: &RemoteConfig) -> Result<Self, reqwest::Error> {
        let token = std::env::var(remote.token_env())
            .ok()
            .filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::debug!(var = remote.token_env(), "no API token set, requests are unauthenticated");
        }

        Self::new(
            remote.api_base_url(),
            remote.host_prefix(),
            token,
            remote.timeout_secs.map(Duration::from_secs),
        )
    }
}

impl RemoteLicenseLookup for GithubClient {
    fn lookup(&self, module: &str) -> Result<String, RemoteLicenseError> {
        let slug = repo_slug(module, &self.host_prefix).ok_or_else(|| RemoteLicenseError::NotHosted {
            module: module.to_string(),
            prefix: self.host_prefix.clone(),
        })?;
        let url = format!("{}/repos/{}", self.api_base_url, slug);
        tracing::debug!(module, url = %url, "querying repository license");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.query(&[("access_token", token)]);
        }

        let response = request.send().map_err(|source| RemoteLicenseError::Http {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|source| RemoteLicenseError::Http { url, source })?;

        if status != StatusCode::OK {
            let message = match parse_repo_response(&body) {
                Ok(RemoteLicense::ErrorMessage(message)) => Some(message),
                _ => None,
            };
            return Err(RemoteLicenseError::Status {
                status: status.as_u16(),
                message,
            });
        }

        match parse_repo_response(&body)? {
            RemoteLicense::Resolved(license) => Ok(license),
            RemoteLicense::ErrorMessage(message) => Err(RemoteLicenseError::Api(message)),
            RemoteLicense::Unrecognized => Err(RemoteLicenseError::Unknown),
        }
    }
}
