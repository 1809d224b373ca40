// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod artifacts;
mod client;
mod jobs;
mod runners;
mod runs;

use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "failsift-github";

pub use client::ActionsClient;
pub use jobs::{job_times_from_value, JobTime};
pub use runners::offline_runners_from_value;
pub use runs::{artifact_links_from_value, job_links_from_value, normalize_job_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GithubErrorCode {
    Network,
    Status,
    Decode,
    MissingRedirect,
    Io,
    Internal,
}

impl GithubErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::Status => "status_error",
            Self::Decode => "decode_error",
            Self::MissingRedirect => "missing_redirect",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubError {
    pub code: GithubErrorCode,
    pub message: String,
}

impl GithubError {
    #[must_use]
    pub fn new(code: GithubErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for GithubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for GithubError {}
