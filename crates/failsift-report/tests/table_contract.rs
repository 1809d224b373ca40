// SPDX-License-Identifier: Apache-2.0

use failsift_model::ErrorRecord;
use failsift_report::{reduce_by_error, reduce_by_model, render_by_error, render_by_model};
use std::collections::BTreeSet;

fn record(message: &str, test_id: &str) -> ErrorRecord {
    ErrorRecord::new(
        "E".to_string(),
        message.to_string(),
        test_id.to_string(),
        None,
    )
}

#[test]
fn by_error_table_has_fixed_header_and_one_row_per_group() {
    let records = vec![
        record("m1", "t1"),
        record("m1", "t2"),
        record("m2", "t3"),
    ];
    let table = render_by_error(&reduce_by_error(&records, &BTreeSet::new()));
    assert_eq!(
        table,
        "| no. | error | status |\n|-:|:-|:-|\n| 2 | m1 |  |\n| 1 | m2 |  |"
    );
}

#[test]
fn empty_by_error_aggregate_renders_header_and_separator_only() {
    assert_eq!(render_by_error(&[]), "| no. | error | status |\n|-:|:-|:-|");
}

#[test]
fn empty_by_model_aggregate_renders_header_and_separator_only() {
    assert_eq!(
        render_by_model(&[]),
        "| model | no. of errors | major error | count |\n|-:|-:|-:|-:|"
    );
}

#[test]
fn by_model_table_shows_the_major_error_and_its_count() {
    let records = vec![
        record("common", "tests/models/a/test_modeling_a.py::t1"),
        record("common", "tests/models/a/test_modeling_a.py::t2"),
        record("rare", "tests/models/a/test_modeling_a.py::t3"),
    ];
    let table = render_by_model(&reduce_by_model(&records, &BTreeSet::new()));
    assert_eq!(
        table,
        "| model | no. of errors | major error | count |\n|-:|-:|-:|-:|\n| test_modeling_a | 3 | common | 2 |"
    );
}

#[test]
fn long_error_messages_are_clipped_to_one_hundred_chars() {
    let long = "x".repeat(150);
    let records = vec![record(&long, "t1")];
    let table = render_by_error(&reduce_by_error(&records, &BTreeSet::new()));
    let row = table.lines().nth(2).expect("data row");
    assert_eq!(row, format!("| 1 | {} |  |", "x".repeat(100)));
}

#[test]
fn major_error_column_is_clipped_to_sixty_chars() {
    let long = "y".repeat(80);
    let records = vec![record(&long, "tests/models/a/test_a.py::t1")];
    let table = render_by_model(&reduce_by_model(&records, &BTreeSet::new()));
    let row = table.lines().nth(2).expect("data row");
    assert_eq!(row, format!("| test_a | 1 | {} | 1 |", "y".repeat(60)));
}

#[test]
fn clipping_is_character_safe_for_multibyte_messages() {
    let message = "é".repeat(120);
    let records = vec![record(&message, "t1")];
    let table = render_by_error(&reduce_by_error(&records, &BTreeSet::new()));
    let row = table.lines().nth(2).expect("data row");
    assert_eq!(row, format!("| 1 | {} |  |", "é".repeat(100)));
}
