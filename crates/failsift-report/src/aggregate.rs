// SPDX-License-Identifier: Apache-2.0

use failsift_model::{model_key, ErrorRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One failing test inside an error-signature group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FailedTest {
    pub test_id: String,
    pub job_url: Option<String>,
}

/// All failures sharing one error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorGroup {
    pub message: String,
    pub count: usize,
    pub failed_tests: Vec<FailedTest>,
}

/// Occurrence count of one error message within a model group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorCount {
    pub message: String,
    pub count: usize,
}

/// All failures sharing one model grouping key.
///
/// `errors` is sorted by count descending; element 0 is the group's major
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelGroup {
    pub model: String,
    pub count: usize,
    pub errors: Vec<ErrorCount>,
}

/// Group records by error message, most frequent first.
///
/// Ties keep first-seen order. Messages in `exclude` are dropped before
/// grouping, so a fully excluded message has no group at all.
#[must_use]
pub fn reduce_by_error(records: &[ErrorRecord], exclude: &BTreeSet<String>) -> Vec<ErrorGroup> {
    let mut groups: Vec<ErrorGroup> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if exclude.contains(&record.error_message) {
            continue;
        }
        let idx = match index.get(&record.error_message) {
            Some(idx) => *idx,
            None => {
                index.insert(record.error_message.clone(), groups.len());
                groups.push(ErrorGroup {
                    message: record.error_message.clone(),
                    count: 0,
                    failed_tests: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[idx].count += 1;
        groups[idx].failed_tests.push(FailedTest {
            test_id: record.test_id.clone(),
            job_url: record.job_url.clone(),
        });
    }
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Group records by model key, most failures first.
///
/// Records without a model key are excluded from this view. Within each
/// group, error messages are counted and sorted descending; ties keep
/// first-seen order, and group ordering ties keep discovery order.
#[must_use]
pub fn reduce_by_model(records: &[ErrorRecord], exclude: &BTreeSet<String>) -> Vec<ModelGroup> {
    let mut groups: Vec<ModelGroup> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let Some(model) = model_key(&record.test_id) else {
            continue;
        };
        if exclude.contains(&record.error_message) {
            continue;
        }
        let idx = match index.get(&model) {
            Some(idx) => *idx,
            None => {
                index.insert(model.clone(), groups.len());
                groups.push(ModelGroup {
                    model,
                    count: 0,
                    errors: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        group.count += 1;
        match group
            .errors
            .iter_mut()
            .find(|e| e.message == record.error_message)
        {
            Some(entry) => entry.count += 1,
            None => group.errors.push(ErrorCount {
                message: record.error_message.clone(),
                count: 1,
            }),
        }
    }
    for group in &mut groups {
        group.errors.sort_by(|a, b| b.count.cmp(&a.count));
    }
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}
