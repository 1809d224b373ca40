// SPDX-License-Identifier: Apache-2.0

use failsift_model::ErrorRecord;
use failsift_report::{reduce_by_error, reduce_by_model};
use std::collections::BTreeSet;

fn record(key: &str, message: &str, test_id: &str, job_url: &str) -> ErrorRecord {
    ErrorRecord::new(
        key.to_string(),
        message.to_string(),
        test_id.to_string(),
        (!job_url.is_empty()).then(|| job_url.to_string()),
    )
}

fn none() -> BTreeSet<String> {
    BTreeSet::new()
}

#[test]
fn reduce_by_error_groups_and_orders_by_count() {
    let records = vec![
        record("E1", "m1", "t1", "u1"),
        record("E2", "m2", "t2", "u2"),
        record("E1", "m1", "t3", "u3"),
    ];

    let groups = reduce_by_error(&records, &none());
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0].message, "m1");
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[0].failed_tests.len(), 2);
    assert_eq!(groups[0].failed_tests[0].test_id, "t1");
    assert_eq!(groups[0].failed_tests[0].job_url.as_deref(), Some("u1"));
    assert_eq!(groups[0].failed_tests[1].test_id, "t3");
    assert_eq!(groups[0].failed_tests[1].job_url.as_deref(), Some("u3"));

    assert_eq!(groups[1].message, "m2");
    assert_eq!(groups[1].count, 1);
    assert_eq!(groups[1].failed_tests[0].test_id, "t2");
}

#[test]
fn group_counts_sum_to_record_count() {
    let records = vec![
        record("E", "a", "t1", ""),
        record("E", "b", "t2", ""),
        record("E", "a", "t3", ""),
        record("E", "c", "t4", ""),
        record("E", "a", "t5", ""),
    ];
    let groups = reduce_by_error(&records, &none());
    let total: usize = groups.iter().map(|g| g.count).sum();
    assert_eq!(total, records.len());
    for group in &groups {
        assert_eq!(group.count, group.failed_tests.len());
    }
}

#[test]
fn ties_keep_first_seen_order() {
    let records = vec![
        record("E", "first", "t1", ""),
        record("E", "second", "t2", ""),
        record("E", "third", "t3", ""),
    ];
    let groups = reduce_by_error(&records, &none());
    let messages: Vec<_> = groups.iter().map(|g| g.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
}

#[test]
fn excluded_message_has_no_group_at_all() {
    let records = vec![
        record("E", "keep", "t1", ""),
        record("E", "drop", "t2", ""),
        record("E", "drop", "t3", ""),
    ];
    let exclude = BTreeSet::from(["drop".to_string()]);
    let groups = reduce_by_error(&records, &exclude);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].message, "keep");
}

#[test]
fn reduce_by_model_groups_by_file_stem() {
    let records = vec![
        record("E", "m1", "tests/models/a/test_modeling_a.py::t1", ""),
        record("E", "m2", "tests/models/a/test_modeling_a.py::t2", ""),
        record("E", "m1", "tests/models/b/test_modeling_b.py::t1", ""),
    ];
    let groups = reduce_by_model(&records, &none());
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0].model, "test_modeling_a");
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[0].errors.len(), 2);

    assert_eq!(groups[1].model, "test_modeling_b");
    assert_eq!(groups[1].count, 1);
    assert_eq!(groups[1].errors[0].message, "m1");
    assert_eq!(groups[1].errors[0].count, 1);
}

#[test]
fn records_without_a_model_key_are_excluded_from_the_model_view() {
    let records = vec![
        record("E", "m1", "tests/models/a/test_modeling_a.py::t1", ""),
        record("E", "m1", "tests/utils/test_cli.py::test_x", ""),
    ];
    let groups = reduce_by_model(&records, &none());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].model, "test_modeling_a");
    assert_eq!(groups[0].count, 1);
}

#[test]
fn major_error_is_the_most_frequent_message_in_the_group() {
    let records = vec![
        record("E", "rare", "tests/models/a/test_a.py::t1", ""),
        record("E", "common", "tests/models/a/test_a.py::t2", ""),
        record("E", "common", "tests/models/a/test_a.py::t3", ""),
    ];
    let groups = reduce_by_model(&records, &none());
    assert_eq!(groups[0].errors[0].message, "common");
    assert_eq!(groups[0].errors[0].count, 2);
    assert_eq!(groups[0].errors[1].message, "rare");
}

#[test]
fn fully_excluded_model_group_is_absent() {
    let records = vec![
        record("E", "drop", "tests/models/a/test_a.py::t1", ""),
        record("E", "drop", "tests/models/a/test_a.py::t2", ""),
        record("E", "keep", "tests/models/b/test_b.py::t1", ""),
    ];
    let exclude = BTreeSet::from(["drop".to_string()]);
    let groups = reduce_by_model(&records, &exclude);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].model, "test_b");
}

#[test]
fn empty_input_yields_empty_aggregates() {
    assert!(reduce_by_error(&[], &none()).is_empty());
    assert!(reduce_by_model(&[], &none()).is_empty());
}
