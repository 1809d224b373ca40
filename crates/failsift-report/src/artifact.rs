// SPDX-License-Identifier: Apache-2.0

use crate::ReportError;
use failsift_model::{failed_test_id, parse_failure_line, ErrorRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;
use zip::result::ZipError;
use zip::ZipArchive;

/// One failure-summary line (`<key>: <message>`) per failing test.
pub const FAILURE_LINES_MEMBER: &str = "failures_line.txt";
/// Short test summary; failing tests appear as `FAILED <test_id>` lines.
pub const SUMMARY_MEMBER: &str = "summary_short.txt";
/// Single line naming the job that produced the artifact.
pub const JOB_NAME_MEMBER: &str = "job_name.txt";

/// Parse one downloaded artifact archive into error records.
///
/// The failure-summary member and the FAILED-test lines of the summary
/// member are walked in lock-step; each aligned pair yields one record.
/// Absent members behave as empty, and a count mismatch truncates to the
/// shorter side, so a malformed artifact degrades to fewer records instead
/// of failing. Only an unreadable archive is an error, which the batch
/// loop in [`collect_errors`] downgrades to a warning.
pub fn errors_from_artifact(
    artifact_path: &Path,
    job_links: &BTreeMap<String, String>,
) -> Result<Vec<ErrorRecord>, ReportError> {
    let file = File::open(artifact_path)
        .map_err(|e| ReportError(format!("{}: {e}", artifact_path.display())))?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        ReportError(format!(
            "{}: not a readable zip archive: {e}",
            artifact_path.display()
        ))
    })?;

    let job_url = member_lines(&mut archive, JOB_NAME_MEMBER)?
        .and_then(|lines| lines.into_iter().next())
        .and_then(|name| job_links.get(name.trim()).cloned());

    let failure_lines = member_lines(&mut archive, FAILURE_LINES_MEMBER)?.unwrap_or_default();
    let failed_tests: Vec<String> = member_lines(&mut archive, SUMMARY_MEMBER)?
        .unwrap_or_default()
        .iter()
        .filter_map(|line| failed_test_id(line))
        .collect();

    let mut records = Vec::new();
    for (failure_line, test_id) in failure_lines.into_iter().zip(failed_tests) {
        let Some((key, message)) = parse_failure_line(&failure_line) else {
            warn!(
                artifact = %artifact_path.display(),
                line = failure_line.as_str(),
                "unparseable failure line"
            );
            continue;
        };
        records.push(ErrorRecord::new(key, message, test_id, job_url.clone()));
    }
    Ok(records)
}

/// Parse every `*.zip` artifact in a directory, in filename order.
///
/// Unreadable archives are warned about and skipped; a bad artifact must
/// never abort the batch.
pub fn collect_errors(
    artifact_dir: &Path,
    job_links: &BTreeMap<String, String>,
) -> Result<Vec<ErrorRecord>, ReportError> {
    let mut paths = Vec::new();
    let entries = std::fs::read_dir(artifact_dir)
        .map_err(|e| ReportError(format!("{}: {e}", artifact_dir.display())))?;
    for entry in entries {
        let entry = entry.map_err(|e| ReportError(format!("{}: {e}", artifact_dir.display())))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "zip") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut records = Vec::new();
    for path in paths {
        match errors_from_artifact(&path, job_links) {
            Ok(found) => records.extend(found),
            Err(err) => warn!(%err, "skipping artifact"),
        }
    }
    Ok(records)
}

fn member_lines<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    member: &str,
) -> Result<Option<Vec<String>>, ReportError> {
    let mut file = match archive.by_name(member) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ReportError(format!("member `{member}`: {e}"))),
    };
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| ReportError(format!("member `{member}`: {e}")))?;
    Ok(Some(
        text.lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect(),
    ))
}
