//! Transcript export file side effect.
//!
//! A pure pass-through: JSON exports are written as the 2-space-indented
//! serialization of whatever the server returned, CSV exports verbatim.
//! File names derive deterministically from the session id.

use crate::api::TranscriptExport;
use crate::error::TranscriptError;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `export` into `dir` as `{stem}.json` or `{stem}.csv` and return
/// the full path.
pub fn save_export(
    dir: &Path,
    stem: &str,
    export: &TranscriptExport,
) -> Result<PathBuf, TranscriptError> {
    let (extension, contents) = match export {
        TranscriptExport::Json(value) => ("json", serde_json::to_string_pretty(value)?),
        TranscriptExport::Csv(text) => ("csv", text.clone()),
    };

    let path = dir.join(format!("{stem}.{extension}"));
    fs::write(&path, contents).map_err(|source| TranscriptError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}
