// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod blocks;
mod client;
mod failure;

use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "failsift-notify";

pub use blocks::{Accessory, Block, Text};
pub use client::{Notifier, SlackClient};
pub use failure::{
    offline_runners_from_env, offline_runners_from_json, run_url, summary_text, FailureKind,
    FailureNotice,
};

#[derive(Debug)]
pub struct NotifyError(pub String);

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotifyError {}
