// SPDX-License-Identifier: Apache-2.0

use crate::ReportError;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;
use zip::ZipArchive;

const WARNINGS_MEMBER_SUFFIX: &str = "warnings.txt";
const FINAL_SUMMARY_MARKER: &str = "warnings summary (final)";

/// Collect warning bodies matching any target from one artifact archive.
///
/// A warning body is a run of indented lines; the next non-indented line
/// flushes it. Only bodies containing `": <target>: "` for at least one
/// target are kept.
pub fn warnings_from_artifact(
    artifact_path: &Path,
    targets: &[String],
) -> Result<BTreeSet<String>, ReportError> {
    let file = File::open(artifact_path)
        .map_err(|e| ReportError(format!("{}: {e}", artifact_path.display())))?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        ReportError(format!(
            "{}: not a readable zip archive: {e}",
            artifact_path.display()
        ))
    })?;

    let mut selected = BTreeSet::new();
    for i in 0..archive.len() {
        let mut member = archive
            .by_index(i)
            .map_err(|e| ReportError(format!("{}: {e}", artifact_path.display())))?;
        if !member.name().ends_with(WARNINGS_MEMBER_SUFFIX) {
            continue;
        }
        let mut text = String::new();
        member
            .read_to_string(&mut text)
            .map_err(|e| ReportError(format!("{}: {e}", artifact_path.display())))?;
        scan_warning_text(&text, targets, &mut selected);
    }
    Ok(selected)
}

/// Union of matching warnings across every `*.zip` artifact in a directory.
///
/// Unreadable archives are warned about and skipped, like the error batch
/// loop.
pub fn extract_warnings(
    artifact_dir: &Path,
    targets: &[String],
) -> Result<BTreeSet<String>, ReportError> {
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

    let mut selected = BTreeSet::new();
    for path in paths {
        match warnings_from_artifact(&path, targets) {
            Ok(found) => selected.extend(found),
            Err(err) => warn!(%err, "skipping artifact"),
        }
    }
    Ok(selected)
}

fn scan_warning_text(text: &str, targets: &[String], selected: &mut BTreeSet<String>) {
    let mut buffer: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.contains(FINAL_SUMMARY_MARKER) {
            continue;
        }
        if line.starts_with(' ') {
            buffer.push(line.trim());
        } else {
            flush_warning(&mut buffer, targets, selected);
        }
    }
    flush_warning(&mut buffer, targets, selected);
}

fn flush_warning(buffer: &mut Vec<&str>, targets: &[String], selected: &mut BTreeSet<String>) {
    if buffer.is_empty() {
        return;
    }
    let warning = buffer.join("\n");
    buffer.clear();
    if targets
        .iter()
        .any(|target| warning.contains(&format!(": {target}: ")))
    {
        selected.insert(warning);
    }
}
