//! Copr v3 API client.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    BuildId, BuildService, BuildStatus, CoprCredentials, CoprError, CoprResult, DEFAULT_COPR_URL,
};

/// Default timeout for API queries.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Timeout for uploading a source package.
const UPLOAD_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Deserialize)]
struct BuildResponse {
    id: u64,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Blocking client for the Copr build service.
pub struct CoprClient {
    base_url: String,
    credentials: CoprCredentials,
    timeout: Duration,
    client: Client,
}

fn build_client(timeout: Duration) -> CoprResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(CoprError::Client)
}

/// Ensures the base URL ends with a slash.
#[must_use]
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Picks the instance URL: explicit configuration first, then the one stored
/// with the credentials, then the public Fedora instance.
#[must_use]
pub fn select_base_url(configured: Option<&str>, credentials: &CoprCredentials) -> String {
    let url = configured
        .or(credentials.copr_url.as_deref())
        .unwrap_or(DEFAULT_COPR_URL);
    normalize_base_url(url)
}

impl CoprClient {
    /// Creates a client for the instance at `base_url` with the default
    /// 30 second request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CoprError::Client`] if the HTTP client cannot be created.
    pub fn new(base_url: &str, credentials: CoprCredentials) -> CoprResult<Self> {
        Self::with_timeout(
            base_url,
            credentials,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Creates a client whose status queries give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CoprError::Client`] if the HTTP client cannot be created.
    pub fn with_timeout(
        base_url: &str,
        credentials: CoprCredentials,
        timeout: Duration,
    ) -> CoprResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url),
            credentials,
            timeout,
            client: build_client(timeout)?,
        })
    }

    /// Returns the instance URL, always ending with `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Splits a target into owner and project name.
    ///
    /// A bare project name belongs to the credentials' user.
    ///
    /// # Errors
    ///
    /// Returns [`CoprError::InvalidTarget`] for empty parts or extra slashes.
    pub fn split_target<'a>(&'a self, target: &'a str) -> CoprResult<(&'a str, &'a str)> {
        let parts: Vec<&str> = target.trim().split('/').collect();
        match parts.as_slice() {
            [project] if !project.is_empty() => Ok((self.credentials.username.as_str(), *project)),
            [owner, project] if !owner.is_empty() && !project.is_empty() => {
                Ok((*owner, *project))
            }
            _ => Err(CoprError::InvalidTarget(target.to_string())),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}api_3/{path}", self.base_url)
    }

    fn parse_build(response: Response, url: &str) -> CoprResult<BuildResponse> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(CoprError::Api {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        response.json().map_err(|source| CoprError::Http {
            url: url.to_string(),
            source,
        })
    }
}

impl BuildService for CoprClient {
    fn submit(&self, target: &str, srpm: &Path) -> CoprResult<BuildId> {
        let (owner, project) = self.split_target(target)?;
        let url = self.endpoint("build/create/upload");
        debug!(%url, owner, project, srpm = %srpm.display(), "uploading source package");

        let payload = serde_json::json!({
            "ownername": owner,
            "projectname": project,
        });
        let json = Part::text(payload.to_string())
            .mime_str("application/json")
            .map_err(|source| CoprError::Http {
                url: url.clone(),
                source,
            })?;
        let form = Form::new().part("json", json).file("pkgs", srpm)?;

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.login, Some(&self.credentials.token))
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS).max(self.timeout))
            .multipart(form)
            .send()
            .map_err(|source| CoprError::Http {
                url: url.clone(),
                source,
            })?;

        let build = Self::parse_build(response, &url)?;
        info!(build = build.id, owner, project, "build submitted");
        Ok(BuildId(build.id))
    }

    fn status(&self, build: BuildId) -> CoprResult<BuildStatus> {
        let url = self.endpoint(&format!("build/{build}"));
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| CoprError::Http {
                url: url.clone(),
                source,
            })?;

        let build = Self::parse_build(response, &url)?;
        Ok(build
            .state
            .as_deref()
            .map_or(BuildStatus::Submitted, BuildStatus::from_state))
    }
}
