// SPDX-License-Identifier: MPL-2.0
//! Upload round-trip types.

use super::media::{MediaKind, ObjectUrl, ProcessingModel, SelectedFile};

/// User choices that accompany the file in the combined workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: MediaKind,
    pub model: ProcessingModel,
}

/// A validated request, ready to be turned into a multipart payload.
///
/// `selection` is `None` in the image-only workflow, which sends the file
/// alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: SelectedFile,
    pub selection: Option<Selection>,
}

impl UploadRequest {
    #[must_use]
    pub fn image_only(file: SelectedFile) -> Self {
        Self {
            file,
            selection: None,
        }
    }

    #[must_use]
    pub fn combined(file: SelectedFile, kind: MediaKind, model: ProcessingModel) -> Self {
        Self {
            file,
            selection: Some(Selection { kind, model }),
        }
    }

    /// Declared media kind; the image-only workflow only ever sends images.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.selection.map_or(MediaKind::Image, |s| s.kind)
    }

    #[must_use]
    pub fn model(&self) -> Option<ProcessingModel> {
        self.selection.map(|s| s.model)
    }
}

/// A processed result as held by the result store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadResult {
    pub url: ObjectUrl,
    pub kind: MediaKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::Blob;

    fn png() -> SelectedFile {
        SelectedFile::new("haze.png", Blob::new("image/png", vec![0u8; 4]))
    }

    #[test]
    fn image_only_request_reports_image_kind() {
        let request = UploadRequest::image_only(png());
        assert_eq!(request.kind(), MediaKind::Image);
        assert_eq!(request.model(), None);
    }

    #[test]
    fn combined_request_carries_selection() {
        let request = UploadRequest::combined(png(), MediaKind::Video, ProcessingModel::Ffa);
        assert_eq!(request.kind(), MediaKind::Video);
        assert_eq!(request.model(), Some(ProcessingModel::Ffa));
    }

    #[test]
    fn default_result_is_empty_image() {
        let result = UploadResult::default();
        assert!(result.url.is_empty());
        assert_eq!(result.kind, MediaKind::Image);
    }
}
