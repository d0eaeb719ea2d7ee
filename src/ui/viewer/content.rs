// SPDX-License-Identifier: MPL-2.0
//! What the viewer shows for a given store snapshot.

use crate::domain::media::{MediaKind, ObjectUrl, Variant};
use crate::domain::upload::UploadResult;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    /// Nothing is rendered.
    #[default]
    Empty,
    Image {
        url: ObjectUrl,
    },
    Video {
        url: ObjectUrl,
        controls: bool,
    },
}

impl Content {
    /// Picks the element for the stored result.
    ///
    /// An empty URL yields [`Content::Empty`]. The image-only workflow always
    /// renders an image, whatever kind was stored.
    #[must_use]
    pub fn from_store(snapshot: &UploadResult, variant: Variant) -> Self {
        if snapshot.url.is_empty() {
            return Content::Empty;
        }
        let url = snapshot.url.clone();
        match (variant, snapshot.kind) {
            (Variant::ImageOnly, _) | (Variant::Combined, MediaKind::Image) => {
                Content::Image { url }
            }
            (Variant::Combined, MediaKind::Video) => Content::Video {
                url,
                controls: true,
            },
        }
    }

    #[must_use]
    pub fn url(&self) -> Option<&ObjectUrl> {
        match self {
            Content::Empty => None,
            Content::Image { url } | Content::Video { url, .. } => Some(url),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: u64, kind: MediaKind) -> UploadResult {
        UploadResult {
            url: ObjectUrl::from_id(id),
            kind,
        }
    }

    #[test]
    fn empty_url_renders_nothing() {
        let snapshot = UploadResult::default();
        assert_eq!(Content::from_store(&snapshot, Variant::Combined), Content::Empty);
        assert_eq!(Content::from_store(&snapshot, Variant::ImageOnly), Content::Empty);
    }

    #[test]
    fn combined_video_renders_video_with_controls() {
        let snapshot = result(1, MediaKind::Video);
        assert_eq!(
            Content::from_store(&snapshot, Variant::Combined),
            Content::Video {
                url: snapshot.url.clone(),
                controls: true
            }
        );
    }

    #[test]
    fn combined_image_renders_image() {
        let snapshot = result(2, MediaKind::Image);
        assert_eq!(
            Content::from_store(&snapshot, Variant::Combined),
            Content::Image {
                url: snapshot.url.clone()
            }
        );
    }

    #[test]
    fn image_only_always_renders_image() {
        let snapshot = result(1, MediaKind::Video);
        let content = Content::from_store(&snapshot, Variant::ImageOnly);
        assert!(matches!(content, Content::Image { .. }));
        assert_eq!(content.url(), Some(&snapshot.url));
    }
}
