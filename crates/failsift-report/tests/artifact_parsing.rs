// SPDX-License-Identifier: Apache-2.0

use failsift_report::{
    collect_errors, errors_from_artifact, FAILURE_LINES_MEMBER, JOB_NAME_MEMBER, SUMMARY_MEMBER,
};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

fn write_artifact(path: &Path, members: &[(&str, &str)]) {
    let file = File::create(path).expect("create zip");
    let mut writer = zip::ZipWriter::new(file);
    for (name, body) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start member");
        writer.write_all(body.as_bytes()).expect("write member");
    }
    writer.finish().expect("finish zip");
}

fn job_links() -> BTreeMap<String, String> {
    BTreeMap::from([("job1".to_string(), "https://example.com/job1".to_string())])
}

#[test]
fn aligned_members_yield_one_record_per_failing_test() {
    let dir = tempdir().expect("tmp");
    let path = dir.path().join("artifact.zip");
    write_artifact(
        &path,
        &[
            (
                FAILURE_LINES_MEMBER,
                "ValueError: bad shape\nKeyError: missing weight\n",
            ),
            (
                SUMMARY_MEMBER,
                "FAILED tests/models/a/test_a.py::test_x\nFAILED tests/models/b/test_b.py::test_y\n",
            ),
            (JOB_NAME_MEMBER, "job1\n"),
        ],
    );

    let records = errors_from_artifact(&path, &job_links()).expect("parse");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].error_line_key, "ValueError");
    assert_eq!(records[0].error_message, "bad shape");
    assert_eq!(records[0].test_id, "tests/models/a/test_a.py::test_x");
    assert_eq!(
        records[0].job_url.as_deref(),
        Some("https://example.com/job1")
    );
    assert_eq!(records[1].error_line_key, "KeyError");
    assert_eq!(records[1].test_id, "tests/models/b/test_b.py::test_y");
}

#[test]
fn mismatched_member_lengths_truncate_to_the_shorter_side() {
    let dir = tempdir().expect("tmp");
    let path = dir.path().join("artifact.zip");
    write_artifact(
        &path,
        &[
            (FAILURE_LINES_MEMBER, "ValueError: bad shape\n"),
            (
                SUMMARY_MEMBER,
                "FAILED tests/a.py::t1\nFAILED tests/a.py::t2\nFAILED tests/a.py::t3\n",
            ),
            (JOB_NAME_MEMBER, "job1\n"),
        ],
    );

    let records = errors_from_artifact(&path, &job_links()).expect("parse");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].test_id, "tests/a.py::t1");
}

#[test]
fn absent_members_behave_as_empty() {
    let dir = tempdir().expect("tmp");
    let path = dir.path().join("artifact.zip");
    write_artifact(&path, &[(JOB_NAME_MEMBER, "job1\n")]);

    let records = errors_from_artifact(&path, &job_links()).expect("parse");
    assert!(records.is_empty());
}

#[test]
fn unknown_job_name_leaves_job_url_absent() {
    let dir = tempdir().expect("tmp");
    let path = dir.path().join("artifact.zip");
    write_artifact(
        &path,
        &[
            (FAILURE_LINES_MEMBER, "ValueError: bad shape\n"),
            (SUMMARY_MEMBER, "FAILED tests/a.py::t1\n"),
            (JOB_NAME_MEMBER, "job-not-in-links\n"),
        ],
    );

    let records = errors_from_artifact(&path, &job_links()).expect("parse");
    assert_eq!(records.len(), 1);
    assert!(records[0].job_url.is_none());
}

#[test]
fn non_failed_summary_lines_are_ignored_before_pairing() {
    let dir = tempdir().expect("tmp");
    let path = dir.path().join("artifact.zip");
    write_artifact(
        &path,
        &[
            (FAILURE_LINES_MEMBER, "ValueError: bad shape\n"),
            (
                SUMMARY_MEMBER,
                "PASSED tests/a.py::t0\nFAILED tests/a.py::t1\nERROR tests/a.py::t2\n",
            ),
            (JOB_NAME_MEMBER, "job1\n"),
        ],
    );

    let records = errors_from_artifact(&path, &job_links()).expect("parse");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].test_id, "tests/a.py::t1");
}

#[test]
fn unparseable_failure_line_skips_only_its_pair() {
    let dir = tempdir().expect("tmp");
    let path = dir.path().join("artifact.zip");
    write_artifact(
        &path,
        &[
            (
                FAILURE_LINES_MEMBER,
                "no separator on this line\nKeyError: missing weight\n",
            ),
            (SUMMARY_MEMBER, "FAILED tests/a.py::t1\nFAILED tests/a.py::t2\n"),
            (JOB_NAME_MEMBER, "job1\n"),
        ],
    );

    let records = errors_from_artifact(&path, &job_links()).expect("parse");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].error_line_key, "KeyError");
    assert_eq!(records[0].test_id, "tests/a.py::t2");
}

#[test]
fn corrupt_archive_is_an_error_for_a_single_artifact() {
    let dir = tempdir().expect("tmp");
    let path = dir.path().join("broken.zip");
    std::fs::write(&path, b"this is not a zip archive").expect("write junk");

    let err = errors_from_artifact(&path, &job_links()).expect_err("must fail");
    assert!(
        err.0.contains("not a readable zip archive"),
        "unexpected error: {}",
        err.0
    );
}

#[test]
fn batch_loop_skips_corrupt_archives_and_keeps_going() {
    let dir = tempdir().expect("tmp");
    write_artifact(
        &dir.path().join("good.zip"),
        &[
            (FAILURE_LINES_MEMBER, "ValueError: bad shape\n"),
            (SUMMARY_MEMBER, "FAILED tests/a.py::t1\n"),
            (JOB_NAME_MEMBER, "job1\n"),
        ],
    );
    std::fs::write(dir.path().join("broken.zip"), b"junk").expect("write junk");
    std::fs::write(dir.path().join("ignored.txt"), b"not an artifact").expect("write txt");

    let records = collect_errors(dir.path(), &job_links()).expect("batch");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].error_line_key, "ValueError");
}

#[test]
fn batch_concatenates_artifacts_in_filename_order() {
    let dir = tempdir().expect("tmp");
    write_artifact(
        &dir.path().join("b_second.zip"),
        &[
            (FAILURE_LINES_MEMBER, "KeyError: second\n"),
            (SUMMARY_MEMBER, "FAILED tests/b.py::t\n"),
            (JOB_NAME_MEMBER, "job1\n"),
        ],
    );
    write_artifact(
        &dir.path().join("a_first.zip"),
        &[
            (FAILURE_LINES_MEMBER, "ValueError: first\n"),
            (SUMMARY_MEMBER, "FAILED tests/a.py::t\n"),
            (JOB_NAME_MEMBER, "job1\n"),
        ],
    );

    let records = collect_errors(dir.path(), &job_links()).expect("batch");
    let messages: Vec<_> = records.iter().map(|r| r.error_message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[test]
fn missing_directory_is_an_error() {
    let missing = PathBuf::from("/nonexistent/failsift-test-dir");
    assert!(collect_errors(&missing, &BTreeMap::new()).is_err());
}
