// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Slack Block Kit text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    PlainText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
    Mrkdwn {
        text: String,
    },
}

impl Text {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText {
            text: text.into(),
            emoji: None,
        }
    }

    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

/// Section accessory; only buttons are used here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Button { text: Text, url: String },
}

impl Accessory {
    #[must_use]
    pub fn link_button(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Button {
            text: Text::PlainText {
                text: label.into(),
                emoji: Some(true),
            },
            url: url.into(),
        }
    }
}

/// Slack Block Kit layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: Text,
    },
    Section {
        text: Text,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
}

impl Block {
    #[must_use]
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header {
            text: Text::plain(text),
        }
    }

    #[must_use]
    pub fn section(text: Text) -> Self {
        Self::Section {
            text,
            accessory: None,
        }
    }

    #[must_use]
    pub fn section_with_accessory(text: Text, accessory: Accessory) -> Self {
        Self::Section {
            text,
            accessory: Some(accessory),
        }
    }
}
