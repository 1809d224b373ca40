// SPDX-License-Identifier: Apache-2.0

use crate::client::ActionsClient;
use crate::GithubError;
use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;

/// Wall-clock duration of one completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JobTime {
    pub name: String,
    pub duration_secs: i64,
}

impl ActionsClient {
    /// Durations of all completed jobs in a run, longest first.
    pub fn job_times(&self, run_id: &str) -> Result<Vec<JobTime>, GithubError> {
        let value = self.get_json(&self.run_url(run_id, "jobs"))?;
        Ok(job_times_from_value(&value))
    }
}

/// Extract per-job durations from a jobs listing.
///
/// Jobs that are still in progress or carry unparseable timestamps are
/// skipped. Output is sorted by duration descending, ties in listing order.
#[must_use]
pub fn job_times_from_value(value: &Value) -> Vec<JobTime> {
    let mut times = Vec::new();
    for job in value["jobs"].as_array().into_iter().flatten() {
        let Some(name) = job["name"].as_str() else {
            continue;
        };
        let Some(duration_secs) = job_duration_secs(job) else {
            continue;
        };
        times.push(JobTime {
            name: name.to_string(),
            duration_secs,
        });
    }
    times.sort_by(|a, b| b.duration_secs.cmp(&a.duration_secs));
    times
}

fn job_duration_secs(job: &Value) -> Option<i64> {
    let started = DateTime::parse_from_rfc3339(job["started_at"].as_str()?).ok()?;
    let completed = DateTime::parse_from_rfc3339(job["completed_at"].as_str()?).ok()?;
    Some((completed - started).num_seconds())
}
