// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod aggregate;
mod artifact;
mod logging;
mod table;
mod warnings;

use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "failsift-report";

pub use aggregate::{reduce_by_error, reduce_by_model, ErrorCount, ErrorGroup, FailedTest, ModelGroup};
pub use artifact::{
    collect_errors, errors_from_artifact, FAILURE_LINES_MEMBER, JOB_NAME_MEMBER, SUMMARY_MEMBER,
};
pub use logging::{PipelineEvent, PipelineLog, PipelineStage};
pub use table::{render_by_error, render_by_model};
pub use warnings::{extract_warnings, warnings_from_artifact};

#[derive(Debug)]
pub struct ReportError(pub String);

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ReportError {}
