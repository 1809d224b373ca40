// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod record;

pub const CRATE_NAME: &str = "failsift-model";

pub use record::{
    failed_test_id, model_key, parse_failure_line, ErrorRecord, FAILED_PREFIX,
};
