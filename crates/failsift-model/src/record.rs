// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Prefix carried by every failed-test line in a short test summary.
pub const FAILED_PREFIX: &str = "FAILED ";

const TESTS_UNDER_MODELS: &str = "tests/models/";

/// One failing test extracted from one CI artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct ErrorRecord {
    pub error_line_key: String,
    pub error_message: String,
    pub test_id: String,
    pub job_url: Option<String>,
}

impl ErrorRecord {
    #[must_use]
    pub fn new(
        error_line_key: String,
        error_message: String,
        test_id: String,
        job_url: Option<String>,
    ) -> Self {
        Self {
            error_line_key,
            error_message,
            test_id,
            job_url,
        }
    }
}

/// Split a failure-summary line into its key and message.
///
/// The line format is `<key>: <message>`; the split happens on the first
/// `": "`. Lines that do not carry both a non-empty key and a non-empty
/// message produce no record.
#[must_use]
pub fn parse_failure_line(line: &str) -> Option<(String, String)> {
    let (key, message) = line.split_once(": ")?;
    if key.is_empty() || message.is_empty() {
        return None;
    }
    Some((key.to_string(), message.to_string()))
}

/// Extract the test id from a `FAILED <test_id>` summary line.
#[must_use]
pub fn failed_test_id(line: &str) -> Option<String> {
    let test_id = line.strip_prefix(FAILED_PREFIX)?.trim_end();
    if test_id.is_empty() {
        return None;
    }
    Some(test_id.to_string())
}

/// Derive the model grouping key from a fully qualified test id.
///
/// The test path must live under `tests/models/`; the key is the final
/// path segment with a trailing `.py` extension stripped. Test ids outside
/// that convention have no model key.
#[must_use]
pub fn model_key(test_id: &str) -> Option<String> {
    let path = test_id.split("::").next().unwrap_or(test_id);
    let under_models = path.strip_prefix(TESTS_UNDER_MODELS)?;
    let file = under_models.rsplit('/').next().unwrap_or(under_models);
    let stem = file.strip_suffix(".py").unwrap_or(file);
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}
