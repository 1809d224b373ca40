// SPDX-License-Identifier: Apache-2.0

use crate::client::ActionsClient;
use crate::GithubError;
use serde_json::Value;

const ONLINE_STATUS: &str = "online";

impl ActionsClient {
    /// Names of target self-hosted runners that are not online.
    ///
    /// A target runner missing from the listing counts as offline: it is
    /// just as unavailable to the CI run as one reporting a bad status.
    pub fn offline_runners(&self, targets: &[String]) -> Result<Vec<String>, GithubError> {
        let value = self.get_json(&self.repo_url("actions/runners"))?;
        Ok(offline_runners_from_value(&value, targets))
    }
}

#[must_use]
pub fn offline_runners_from_value(value: &Value, targets: &[String]) -> Vec<String> {
    let runners = value["runners"].as_array();
    targets
        .iter()
        .filter(|target| {
            let status = runners.into_iter().flatten().find_map(|runner| {
                (runner["name"].as_str() == Some(target.as_str()))
                    .then(|| runner["status"].as_str().unwrap_or_default())
            });
            status != Some(ONLINE_STATUS)
        })
        .cloned()
        .collect()
}
