// SPDX-License-Identifier: MPL-2.0
//! Declared MIME types for local files.
//!
//! Browsers derive `File.type` from the file extension; this module does the
//! same so that validation sees the declared type, not a sniffed one.

use crate::domain::media::{Blob, SelectedFile};
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Extension to MIME table. Entries outside the upload allow-list are kept
/// so that such files are reported with a proper type and then rejected.
const MIME_TABLE: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
];

/// Extensions offered by the file dialog.
pub mod extensions {
    /// Image extensions accepted by both workflows.
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

    /// Video extensions accepted by the combined workflow.
    pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];
}

/// Returns the declared MIME type for a path, or `""` when unknown.
#[must_use]
pub fn mime_from_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return "";
    };
    MIME_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or("", |(_, mime)| mime)
}

/// Maps a MIME type back to a file extension, used when naming temp files
/// and suggesting save names.
#[must_use]
pub fn extension_for_mime(mime: &str) -> &'static str {
    let essence = mime.split(';').next().unwrap_or("").trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/webm" => "webm",
        _ => "bin",
    }
}

/// Reads a file from disk into a [`SelectedFile`] with its declared MIME type.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn read_selected_file(path: &Path) -> Result<SelectedFile> {
    let bytes = fs::read(path)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(SelectedFile::new(name, Blob::new(mime_from_path(path), bytes)))
}
