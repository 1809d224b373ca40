// SPDX-License-Identifier: Apache-2.0

use crate::client::ActionsClient;
use crate::{GithubError, GithubErrorCode};
use reqwest::header::LOCATION;
use std::fs;
use std::path::{Path, PathBuf};

impl ActionsClient {
    /// Download one artifact archive to `output_dir/<name>.zip`.
    ///
    /// The artifact endpoint answers an authenticated request with a
    /// redirect to a signed, time-limited URL. The redirect target must be
    /// fetched without the authorization header, so the first GET does not
    /// follow and the `Location` header is requested separately.
    pub fn download_artifact(
        &self,
        name: &str,
        url: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, GithubError> {
        let resp = self.api_get(url)?;
        let status = resp.status();
        if !status.is_redirection() {
            return Err(GithubError::new(
                GithubErrorCode::Status,
                format!("artifact `{name}`: expected redirect, got {status}"),
            ));
        }
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .ok_or_else(|| {
                GithubError::new(
                    GithubErrorCode::MissingRedirect,
                    format!("artifact `{name}`: redirect without Location header"),
                )
            })?;

        let resp = self.download_get(&location)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GithubError::new(
                GithubErrorCode::Status,
                format!("artifact `{name}`: download returned {status}"),
            ));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| GithubError::new(GithubErrorCode::Network, e.to_string()))?;

        let path = output_dir.join(format!("{name}.zip"));
        fs::write(&path, &bytes)
            .map_err(|e| GithubError::new(GithubErrorCode::Io, e.to_string()))?;
        Ok(path)
    }
}
