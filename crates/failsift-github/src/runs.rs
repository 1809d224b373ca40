// SPDX-License-Identifier: Apache-2.0

use crate::client::ActionsClient;
use crate::GithubError;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Separator GitHub inserts when a `workflow_call` job name is the
/// composition of the caller and callee names, e.g.
/// `Nightly CI / Model tests (subset, single-gpu)`.
const COMPOSED_NAME_SEPARATOR: &str = " / ";

impl ActionsClient {
    /// Map of job name to job detail page URL for one workflow run.
    ///
    /// Fail-soft: job URLs only annotate error records, so any transport or
    /// decoding failure degrades to an empty map instead of aborting the
    /// caller's pipeline.
    #[must_use]
    pub fn job_links(&self, run_id: &str) -> BTreeMap<String, String> {
        match self.job_links_strict(run_id) {
            Ok(links) => links,
            Err(err) => {
                warn!(%err, run_id, "could not fetch job links; continuing without them");
                BTreeMap::new()
            }
        }
    }

    fn job_links_strict(&self, run_id: &str) -> Result<BTreeMap<String, String>, GithubError> {
        // Single page only; runs with more than 100 jobs are truncated.
        let value = self.get_json(&self.run_url(run_id, "jobs"))?;
        Ok(job_links_from_value(&value))
    }

    /// Map of artifact name to archive download URL for one workflow run.
    ///
    /// Fail-soft like [`ActionsClient::job_links`]; the caller escalates a
    /// fully empty result if nothing is left to analyze.
    #[must_use]
    pub fn artifact_links(&self, run_id: &str) -> BTreeMap<String, String> {
        match self.artifact_links_strict(run_id) {
            Ok(links) => links,
            Err(err) => {
                warn!(%err, run_id, "could not fetch artifact links");
                BTreeMap::new()
            }
        }
    }

    fn artifact_links_strict(&self, run_id: &str) -> Result<BTreeMap<String, String>, GithubError> {
        let value = self.get_json(&self.run_url(run_id, "artifacts"))?;
        Ok(artifact_links_from_value(&value))
    }
}

/// Keep only the callee part of a composed `caller / callee` job name so
/// lookups by plain job name succeed regardless of composition depth.
#[must_use]
pub fn normalize_job_name(name: &str) -> &str {
    match name.rsplit_once(COMPOSED_NAME_SEPARATOR) {
        Some((_, callee)) => callee,
        None => name,
    }
}

#[must_use]
pub fn job_links_from_value(value: &Value) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    for job in value["jobs"].as_array().into_iter().flatten() {
        let (Some(name), Some(url)) = (job["name"].as_str(), job["html_url"].as_str()) else {
            continue;
        };
        links.insert(normalize_job_name(name).to_string(), url.to_string());
    }
    links
}

#[must_use]
pub fn artifact_links_from_value(value: &Value) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    for artifact in value["artifacts"].as_array().into_iter().flatten() {
        let (Some(name), Some(url)) = (
            artifact["name"].as_str(),
            artifact["archive_download_url"].as_str(),
        ) else {
            continue;
        };
        links.insert(name.to_string(), url.to_string());
    }
    links
}
