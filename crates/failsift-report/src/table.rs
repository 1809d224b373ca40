// SPDX-License-Identifier: Apache-2.0

use crate::aggregate::{ErrorGroup, ModelGroup};

// Oversized cells break chat and Markdown rendering, so messages are
// clipped harder in the wider per-model table.
const ERROR_MESSAGE_MAX_CHARS: usize = 100;
const MAJOR_ERROR_MAX_CHARS: usize = 60;

/// Render the by-error aggregate as a Markdown table.
#[must_use]
pub fn render_by_error(groups: &[ErrorGroup]) -> String {
    let mut lines = vec!["| no. | error | status |".to_string(), "|-:|:-|:-|".to_string()];
    for group in groups {
        lines.push(format!(
            "| {} | {} |  |",
            group.count,
            clip(&group.message, ERROR_MESSAGE_MAX_CHARS)
        ));
    }
    lines.join("\n")
}

/// Render the by-model aggregate as a Markdown table.
#[must_use]
pub fn render_by_model(groups: &[ModelGroup]) -> String {
    let mut lines = vec![
        "| model | no. of errors | major error | count |".to_string(),
        "|-:|-:|-:|-:|".to_string(),
    ];
    for group in groups {
        let Some(major) = group.errors.first() else {
            continue;
        };
        lines.push(format!(
            "| {} | {} | {} | {} |",
            group.model,
            group.count,
            clip(&major.message, MAJOR_ERROR_MAX_CHARS),
            major.count
        ));
    }
    lines.join("\n")
}

fn clip(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}
