// SPDX-License-Identifier: MPL-2.0
//! Registry of locally addressable blobs.
//!
//! Every preview and every processed result is registered here and addressed
//! by an [`ObjectUrl`]. Entries live until they are explicitly revoked, so
//! callers must revoke a URL once nothing displays it anymore. Video
//! players and the ffmpeg decoder need a real path, so an entry can be
//! materialized into a temp file that is removed again on revoke.

use crate::domain::media::{Blob, ObjectUrl};
use crate::error::Result;
use crate::media::mime::extension_for_mime;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[derive(Debug)]
struct Entry {
    blob: Blob,
    file: Option<NamedTempFile>,
}

#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    entries: HashMap<ObjectUrl, Entry>,
    next_id: u64,
}

impl ObjectUrlRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a blob and returns a fresh URL. URLs are never reused.
    pub fn create(&mut self, blob: Blob) -> ObjectUrl {
        self.next_id += 1;
        let url = ObjectUrl::from_id(self.next_id);
        self.entries
            .insert(url.clone(), Entry { blob, file: None });
        url
    }

    /// Looks up the blob behind a URL. Revoked and empty URLs resolve to `None`.
    #[must_use]
    pub fn resolve(&self, url: &ObjectUrl) -> Option<&Blob> {
        self.entries.get(url).map(|entry| &entry.blob)
    }

    /// Returns a filesystem path holding the blob's bytes, writing it on
    /// first use.
    ///
    /// Returns `Ok(None)` when the URL is not registered.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temp file cannot be written.
    pub fn materialize(&mut self, url: &ObjectUrl) -> Result<Option<PathBuf>> {
        let Some(entry) = self.entries.get_mut(url) else {
            return Ok(None);
        };

        if let Some(file) = &entry.file {
            return Ok(Some(file.path().to_path_buf()));
        }

        let suffix = format!(".{}", extension_for_mime(entry.blob.mime()));
        let mut file = tempfile::Builder::new()
            .prefix("iced-dehaze-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(entry.blob.bytes())?;
        file.flush()?;

        let path = file.path().to_path_buf();
        entry.file = Some(file);
        Ok(Some(path))
    }

    /// Releases a URL. Returns `true` when something was released.
    ///
    /// Revoking the empty URL or an unknown URL is a no-op.
    pub fn revoke(&mut self, url: &ObjectUrl) -> bool {
        // Dropping the NamedTempFile deletes the file.
        self.entries.remove(url).is_some()
    }

    /// Releases every URL, used on reset and shutdown.
    pub fn revoke_all(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}
