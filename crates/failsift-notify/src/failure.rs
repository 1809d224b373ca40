// SPDX-License-Identifier: Apache-2.0

use crate::blocks::{Accessory, Block, Text};
use tracing::warn;

const OFFLINE_RUNNERS_ENV: &str = "OFFLINE_RUNNERS";

/// Why the CI run produced no test results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FailureKind {
    RunnerNotAvailable,
    RunnerFailed,
    SetupFailed,
    Other,
}

impl FailureKind {
    #[must_use]
    pub const fn notice_text(self) -> &'static str {
        match self {
            Self::RunnerNotAvailable => "💔 CI runners are not available! Tests are not run. 😭",
            Self::RunnerFailed => "💔 CI runners have problems! Tests are not run. 😭",
            Self::SetupFailed => "💔 Setup job failed. Tests are not run. 😭",
            Self::Other => "💔 There was an issue running the tests. 😭",
        }
    }
}

/// Block payload announcing a run that failed before producing results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub title: String,
    pub ci_title: String,
    pub kind: FailureKind,
    pub offline_runners: Vec<String>,
    pub run_url: String,
}

impl FailureNotice {
    #[must_use]
    pub fn new(title: impl Into<String>, kind: FailureKind, run_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ci_title: String::new(),
            kind,
            offline_runners: Vec::new(),
            run_url: run_url.into(),
        }
    }

    #[must_use]
    pub fn with_ci_title(mut self, ci_title: impl Into<String>) -> Self {
        self.ci_title = ci_title.into();
        self
    }

    #[must_use]
    pub fn with_offline_runners(mut self, offline_runners: Vec<String>) -> Self {
        self.offline_runners = offline_runners;
        self
    }

    /// Body text, also used as the notification fallback text.
    #[must_use]
    pub fn body_text(&self) -> String {
        let mut text = String::new();
        if !self.offline_runners.is_empty() {
            let listing = self
                .offline_runners
                .iter()
                .map(|runner| format!("\n  • {runner}"))
                .collect::<String>();
            text.push_str(&format!("The following runners are offline:{listing}\n\n"));
        }
        text.push_str("🙏 Let's fix it ASAP! 🙏");
        text
    }

    #[must_use]
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = vec![Block::header(self.title.clone())];
        if !self.ci_title.is_empty() {
            blocks.push(Block::section(Text::mrkdwn(self.ci_title.clone())));
        }
        blocks.push(Block::header(self.kind.notice_text()));
        blocks.push(Block::section_with_accessory(
            Text::plain(self.body_text()),
            Accessory::link_button("Check Action results", self.run_url.clone()),
        ));
        blocks
    }
}

/// Detail page URL of a workflow run.
#[must_use]
pub fn run_url(repo: &str, run_id: &str) -> String {
    format!("https://github.com/{repo}/actions/runs/{run_id}")
}

/// One-line fallback summary for a completed report.
#[must_use]
pub fn summary_text(n_failures: usize, n_tests: usize) -> String {
    if n_failures > 0 {
        format!("{n_failures} failures out of {n_tests} tests,")
    } else {
        "All tests passed.".to_string()
    }
}

/// Offline runner names from a JSON listing, tolerating absent or broken
/// input: a notification about a failing run must never itself fail on a
/// malformed environment.
#[must_use]
pub fn offline_runners_from_json(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(runners) => runners,
        Err(err) => {
            warn!(%err, "ignoring unparseable offline-runner listing");
            Vec::new()
        }
    }
}

/// Offline runner names from the `OFFLINE_RUNNERS` environment variable.
#[must_use]
pub fn offline_runners_from_env() -> Vec<String> {
    offline_runners_from_json(std::env::var(OFFLINE_RUNNERS_ENV).ok().as_deref())
}
