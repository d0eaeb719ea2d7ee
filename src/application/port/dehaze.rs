// SPDX-License-Identifier: MPL-2.0
//! Dehazing service port definition.
//!
//! The dehazing computation happens in a remote service. This port hides the
//! transport so the uploader can be driven by the HTTP adapter or by a test
//! double.

use crate::domain::media::{MediaKind, Variant};
use crate::domain::upload::UploadRequest;
use futures_util::future::BoxFuture;
use std::fmt;

// =============================================================================
// ServiceError
// =============================================================================

/// Errors that can occur during a dehazing round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request did not complete within the configured timeout.
    Timeout,

    /// The service could not be reached.
    Connection(String),

    /// The service answered with a non-success status code.
    Status(u16),

    /// The service answered successfully but reported a processing error.
    Rejected(String),

    /// The service answered with an empty body.
    EmptyBody,

    /// Any other transport failure.
    Other(String),
}

impl ServiceError {
    /// Returns the i18n message key for this error.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ServiceError::Timeout => "error-service-timeout",
            ServiceError::Connection(_) => "error-service-connection",
            ServiceError::Status(_) => "error-service-status",
            ServiceError::Rejected(_) => "error-service-rejected",
            ServiceError::EmptyBody => "error-service-empty",
            ServiceError::Other(_) => "error-service-general",
        }
    }

    /// Whether trying again could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Timeout | ServiceError::Connection(_) => true,
            ServiceError::Status(code) => *code >= 500 || *code == 429,
            ServiceError::Rejected(_) | ServiceError::EmptyBody | ServiceError::Other(_) => false,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Timeout => write!(f, "Request timed out"),
            ServiceError::Connection(msg) => write!(f, "Connection failed: {msg}"),
            ServiceError::Status(code) => write!(f, "Service returned HTTP {code}"),
            ServiceError::Rejected(msg) => write!(f, "Service rejected the file: {msg}"),
            ServiceError::EmptyBody => write!(f, "Service returned an empty response"),
            ServiceError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

// =============================================================================
// ServiceResponse
// =============================================================================

/// Binary body returned by the service, with its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ServiceResponse {
    /// Classifies the result for display.
    ///
    /// The image-only workflow always shows images. The combined workflow
    /// trusts the `Content-Type` header and falls back to image.
    #[must_use]
    pub fn media_kind(&self, variant: Variant) -> MediaKind {
        if !variant.has_selection() {
            return MediaKind::Image;
        }
        self.content_type
            .as_deref()
            .and_then(MediaKind::from_mime)
            .unwrap_or(MediaKind::Image)
    }

    /// MIME type to register the result under.
    #[must_use]
    pub fn mime(&self, variant: Variant) -> String {
        match self.content_type.as_deref() {
            Some(ct) if !ct.is_empty() => ct.to_string(),
            _ => match self.media_kind(variant) {
                MediaKind::Image => "image/png".to_string(),
                MediaKind::Video => "video/mp4".to_string(),
            },
        }
    }
}

// =============================================================================
// DehazeService
// =============================================================================

/// Sends a validated upload to the dehazing service.
///
/// Implementations must be cheap to share: the application holds them in an
/// `Arc` and clones the future's inputs into each task.
pub trait DehazeService: Send + Sync + fmt::Debug {
    /// Issues exactly one request for `request`.
    fn dehaze(&self, request: UploadRequest)
        -> BoxFuture<'static, Result<ServiceResponse, ServiceError>>;

    /// Endpoint the requests are sent to, for display and diagnostics.
    fn endpoint(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content_type: Option<&str>) -> ServiceResponse {
        ServiceResponse {
            bytes: vec![1],
            content_type: content_type.map(str::to_string),
        }
    }

    #[test]
    fn combined_classifies_by_content_type() {
        assert_eq!(
            response(Some("video/mp4")).media_kind(Variant::Combined),
            MediaKind::Video
        );
        assert_eq!(
            response(Some("image/png")).media_kind(Variant::Combined),
            MediaKind::Image
        );
        assert_eq!(
            response(Some("application/octet-stream")).media_kind(Variant::Combined),
            MediaKind::Image
        );
        assert_eq!(response(None).media_kind(Variant::Combined), MediaKind::Image);
    }

    #[test]
    fn image_only_is_always_image() {
        assert_eq!(
            response(Some("video/mp4")).media_kind(Variant::ImageOnly),
            MediaKind::Image
        );
    }

    #[test]
    fn mime_falls_back_per_kind() {
        assert_eq!(response(Some("image/jpg")).mime(Variant::Combined), "image/jpg");
        assert_eq!(response(None).mime(Variant::Combined), "image/png");
    }

    #[test]
    fn transient_errors() {
        assert!(ServiceError::Timeout.is_transient());
        assert!(ServiceError::Status(503).is_transient());
        assert!(!ServiceError::Status(400).is_transient());
        assert!(!ServiceError::Rejected("bad".into()).is_transient());
    }

    #[test]
    fn error_keys() {
        assert_eq!(ServiceError::Timeout.i18n_key(), "error-service-timeout");
        assert_eq!(ServiceError::Status(500).i18n_key(), "error-service-status");
    }
}
