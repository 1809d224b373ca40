// SPDX-License-Identifier: Apache-2.0

use crate::blocks::Block;
use crate::NotifyError;
use reqwest::blocking::Client;
use serde_json::{json, Value};

const DEFAULT_API_BASE: &str = "https://slack.com/api";

/// Posting seam for notifications; lets tests substitute a fake.
pub trait Notifier {
    fn post(&self, channel: &str, text: &str, blocks: &[Block]) -> Result<(), NotifyError>;
}

/// Blocking Slack Web API client.
pub struct SlackClient {
    api_base: String,
    token: String,
    client: Client,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            client: Client::new(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl Notifier for SlackClient {
    fn post(&self, channel: &str, text: &str, blocks: &[Block]) -> Result<(), NotifyError> {
        let url = format!("{}/chat.postMessage", self.api_base.trim_end_matches('/'));
        let payload = json!({
            "channel": channel,
            "text": text,
            "blocks": blocks,
        });
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .map_err(|e| NotifyError(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError(format!("chat.postMessage returned {status}")));
        }
        let body: Value = resp
            .json()
            .map_err(|e| NotifyError(format!("chat.postMessage response: {e}")))?;
        if body["ok"].as_bool() != Some(true) {
            let reason = body["error"].as_str().unwrap_or("unknown error");
            return Err(NotifyError(format!("chat.postMessage rejected: {reason}")));
        }
        Ok(())
    }
}
