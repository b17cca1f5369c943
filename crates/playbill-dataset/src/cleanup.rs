//! Post-split rewriting of scene files.
//!
//! Records are handled as raw JSON objects here so that fields unknown to
//! [`DialogueRecord`](playbill_core::DialogueRecord) survive a rewrite.

use std::path::Path;

use playbill_core::constants::AUXILIARY_FIELDS;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::Result;
use crate::files::collect_files;
use crate::jsonl::{read_json_lines, write_json_lines};

/// Files and records touched by a rewrite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Scene files read.
    pub files: usize,
    /// Records read.
    pub records: usize,
    /// Records that were changed.
    pub modified: usize,
}

/// Remove bookkeeping fields from one record. Returns whether anything was
/// removed.
pub fn strip_auxiliary_fields(record: &mut Map<String, Value>) -> bool {
    let mut removed = false;
    for field in AUXILIARY_FIELDS {
        removed |= record.remove(field).is_some();
    }
    removed
}

/// Strip bookkeeping fields from every record under `dir`.
///
/// Non-object lines are written back unchanged. Running this twice is a
/// no-op the second time.
pub fn clean_up_context_lengths(dir: &Path, extension: &str) -> Result<CleanupReport> {
    let report = rewrite_records(dir, extension, strip_auxiliary_fields)?;
    info!(
        dir = %dir.display(),
        files = report.files,
        records = report.records,
        modified = report.modified,
        "stripped auxiliary fields"
    );
    Ok(report)
}

/// Overwrite the `taskname` of every record under `dir`.
pub fn set_taskname(dir: &Path, taskname: &str, extension: &str) -> Result<CleanupReport> {
    let report = rewrite_records(dir, extension, |record| {
        let replacement = Value::String(taskname.to_string());
        if record.get("taskname") == Some(&replacement) {
            return false;
        }
        let _ = record.insert("taskname".to_string(), replacement);
        true
    })?;
    info!(
        dir = %dir.display(),
        taskname,
        files = report.files,
        modified = report.modified,
        "set taskname"
    );
    Ok(report)
}

/// Apply `edit` to every JSON object under `dir`, rewriting only files in
/// which at least one record changed.
fn rewrite_records<F>(dir: &Path, extension: &str, mut edit: F) -> Result<CleanupReport>
where
    F: FnMut(&mut Map<String, Value>) -> bool,
{
    let mut report = CleanupReport::default();
    for path in collect_files(dir, extension)? {
        let mut records: Vec<Value> = read_json_lines(&path)?;
        let mut changed = 0;
        for record in &mut records {
            if let Value::Object(map) = record {
                if edit(map) {
                    changed += 1;
                }
            }
        }

        report.files += 1;
        report.records += records.len();
        report.modified += changed;
        if changed > 0 {
            write_json_lines(&path, &records)?;
            debug!(path = %path.display(), changed, "rewrote scene file");
        }
    }
    Ok(report)
}
