// SPDX-License-Identifier: Apache-2.0

use crate::{GithubError, GithubErrorCode};
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("failsift/", env!("CARGO_PKG_VERSION"));

/// Client for the GitHub Actions REST API of one repository.
///
/// Holds two blocking HTTP clients: `api` never follows redirects (artifact
/// download URLs must be captured from the `Location` header, not followed
/// with the authorization header attached), `download` follows them.
pub struct ActionsClient {
    api_base: String,
    repo: String,
    token: Option<String>,
    api: Client,
    download: Client,
}

impl ActionsClient {
    pub fn new(repo: impl Into<String>) -> Result<Self, GithubError> {
        let api = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| GithubError::new(GithubErrorCode::Internal, e.to_string()))?;
        let download = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GithubError::new(GithubErrorCode::Internal, e.to_string()))?;
        Ok(Self {
            api_base: DEFAULT_API_BASE.to_string(),
            repo: repo.into(),
            token: None,
            api,
            download,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub(crate) fn run_url(&self, run_id: &str, resource: &str) -> String {
        format!(
            "{}/repos/{}/actions/runs/{}/{}?per_page=100",
            self.api_base.trim_end_matches('/'),
            self.repo,
            run_id,
            resource
        )
    }

    pub(crate) fn repo_url(&self, resource: &str) -> String {
        format!(
            "{}/repos/{}/{}?per_page=100",
            self.api_base.trim_end_matches('/'),
            self.repo,
            resource
        )
    }

    pub(crate) fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(crate) fn api_get(&self, url: &str) -> Result<reqwest::blocking::Response, GithubError> {
        self.authed(self.api.get(url))
            .send()
            .map_err(|e| GithubError::new(GithubErrorCode::Network, e.to_string()))
    }

    pub(crate) fn download_get(
        &self,
        url: &str,
    ) -> Result<reqwest::blocking::Response, GithubError> {
        self.download
            .get(url)
            .send()
            .map_err(|e| GithubError::new(GithubErrorCode::Network, e.to_string()))
    }

    pub(crate) fn get_json(&self, url: &str) -> Result<Value, GithubError> {
        let resp = self.api_get(url)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GithubError::new(
                GithubErrorCode::Status,
                format!("GET {url} returned {status}"),
            ));
        }
        resp.json::<Value>()
            .map_err(|e| GithubError::new(GithubErrorCode::Decode, e.to_string()))
    }
}
