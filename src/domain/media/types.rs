// SPDX-License-Identifier: MPL-2.0
//! Core media types for the domain layer.
//!
//! These types represent pure data without any presentation dependencies.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Category of media handled by the dehazing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaKind {
    /// Still image (JPEG, PNG, WebP).
    #[default]
    Image,
    /// Video clip (MP4).
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Image, MediaKind::Video];

    /// Wire representation used in multipart payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Classifies a MIME type by its top-level category.
    ///
    /// Returns `None` for anything that is neither `image/*` nor `video/*`.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            other => Err(format!("unknown media kind: {other}")),
        }
    }
}

/// Processing model identifier forwarded to the dehazing service.
///
/// The service owns the model internals; the client only passes the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessingModel {
    /// Dark channel prior.
    #[default]
    Dcp,
    /// Feature fusion attention network.
    Ffa,
}

impl ProcessingModel {
    pub const ALL: [ProcessingModel; 2] = [ProcessingModel::Dcp, ProcessingModel::Ffa];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingModel::Dcp => "dcp",
            ProcessingModel::Ffa => "ffa",
        }
    }
}

impl fmt::Display for ProcessingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dcp" => Ok(ProcessingModel::Dcp),
            "ffa" => Ok(ProcessingModel::Ffa),
            other => Err(format!("unknown processing model: {other}")),
        }
    }
}

/// Which flavour of the upload workflow is active.
///
/// `ImageOnly` sends a single `image` field and always shows an image.
/// `Combined` accepts MP4 too, sends `type`/`model`/`file` and classifies
/// the result from the response content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    ImageOnly,
    #[default]
    Combined,
}

impl Variant {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::ImageOnly => "image-only",
            Variant::Combined => "combined",
        }
    }

    /// Whether the form exposes the type and model selectors.
    #[must_use]
    pub fn has_selection(self) -> bool {
        matches!(self, Variant::Combined)
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image-only" | "image_only" | "image" => Ok(Variant::ImageOnly),
            "combined" => Ok(Variant::Combined),
            other => Err(format!("invalid variant: {other}")),
        }
    }
}

/// Binary payload tagged with a declared MIME type.
///
/// Bytes are shared so that cloning a blob (for retries, previews and the
/// registry) never copies the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    mime: String,
    bytes: Arc<Vec<u8>>,
}

impl Blob {
    #[must_use]
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Declared MIME type; empty when unknown.
    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A file chosen by the user, with the name it was picked under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub blob: Blob,
}

impl SelectedFile {
    #[must_use]
    pub fn new(name: impl Into<String>, blob: Blob) -> Self {
        Self {
            name: name.into(),
            blob,
        }
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        self.blob.mime()
    }

    /// Category derived from the declared MIME type.
    #[must_use]
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(self.blob.mime())
    }
}

/// Locally addressable reference to a blob held by the object URL registry.
///
/// The empty URL stands for "nothing stored".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// Scheme prefix shared by every issued URL.
    pub const SCHEME: &'static str = "blob:iced-dehaze/";

    #[must_use]
    pub fn from_id(id: u64) -> Self {
        Self(format!("{}{id}", Self::SCHEME))
    }

    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_from_mime_uses_prefix() {
        assert_eq!(MediaKind::from_mime("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("video/mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("Video/MP4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("application/json"), None);
        assert_eq!(MediaKind::from_mime(""), None);
    }

    #[test]
    fn media_kind_parse_is_exact() {
        assert_eq!("image".parse::<MediaKind>(), Ok(MediaKind::Image));
        assert!("Image".parse::<MediaKind>().is_err());
        assert!("audio".parse::<MediaKind>().is_err());
    }

    #[test]
    fn processing_model_round_trips_through_str() {
        for model in ProcessingModel::ALL {
            assert_eq!(model.as_str().parse::<ProcessingModel>(), Ok(model));
        }
        assert!("DCP".parse::<ProcessingModel>().is_err());
    }

    #[test]
    fn variant_accepts_aliases() {
        assert_eq!("image-only".parse::<Variant>(), Ok(Variant::ImageOnly));
        assert_eq!("IMAGE_ONLY".parse::<Variant>(), Ok(Variant::ImageOnly));
        assert_eq!("combined".parse::<Variant>(), Ok(Variant::Combined));
        assert!("both".parse::<Variant>().is_err());
    }

    #[test]
    fn blob_clone_shares_bytes() {
        let blob = Blob::new("image/png", vec![1, 2, 3]);
        let clone = blob.clone();
        assert_eq!(blob.bytes().as_ptr(), clone.bytes().as_ptr());
        assert_eq!(clone.len(), 3);
    }

    #[test]
    fn object_url_formats_with_scheme() {
        let url = ObjectUrl::from_id(7);
        assert_eq!(url.as_str(), "blob:iced-dehaze/7");
        assert!(!url.is_empty());
        assert!(ObjectUrl::empty().is_empty());
    }
}
