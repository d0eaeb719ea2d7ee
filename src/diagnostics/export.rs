// SPDX-License-Identifier: MPL-2.0
//! Diagnostic report structure and file export helpers.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::DiagnosticEventKind;

/// Errors that can occur while exporting a report.
#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Serialization(serde_json::Error),
    /// The user closed the save dialog.
    Cancelled,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
            ExportError::Serialization(e) => write!(f, "Serialization error: {e}"),
            ExportError::Cancelled => write!(f, "Export cancelled"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err)
    }
}

/// An event with its offset from the start of collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    pub offset_ms: u64,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    /// Converts an event timestamp into an offset from `started_at`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Offsets in ms fit comfortably in u64
    pub fn new(timestamp: Instant, started_at: Instant, kind: DiagnosticEventKind) -> Self {
        Self {
            offset_ms: timestamp.saturating_duration_since(started_at).as_millis() as u64,
            kind,
        }
    }
}

/// Header of an exported report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    pub app_version: String,
    pub generated_at: DateTime<Utc>,
    pub collection_started_at: DateTime<Utc>,
    pub collection_duration_ms: u64,
    pub event_count: usize,
    /// Events overwritten before export because the log was full.
    pub evicted_count: u64,
    pub os: String,
}

impl ReportMetadata {
    /// Fills in the version, generation time and OS of this build.
    #[must_use]
    pub fn new(
        collection_started_at: DateTime<Utc>,
        collection_duration_ms: u64,
        event_count: usize,
        evicted_count: u64,
    ) -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            collection_started_at,
            collection_duration_ms,
            event_count,
            evicted_count,
            os: std::env::consts::OS.to_string(),
        }
    }
}

/// The JSON document written by an export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub metadata: ReportMetadata,
    pub events: Vec<SerializableEvent>,
}

/// Default report file name, stamped with the local time.
#[must_use]
pub fn generate_default_filename() -> String {
    let now = Local::now();
    format!("iced_dehaze_diagnostics_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Writes `content` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");

    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

/// Returns the default directory for saving diagnostic reports.
#[must_use]
pub fn default_export_directory() -> PathBuf {
    crate::app::paths::default_export_dir()
}
