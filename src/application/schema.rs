// SPDX-License-Identifier: MPL-2.0
//! Upload form validation.
//!
//! [`UploadSchema::validate`] is a pure function of its input. It either
//! returns a ready [`UploadRequest`] or every failing field with the first
//! problem found for it.

use crate::domain::media::{MediaKind, ProcessingModel, SelectedFile, Variant};
use crate::domain::upload::UploadRequest;
use std::fmt;

/// MIME types accepted by both workflows.
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// MIME types only accepted by the combined workflow.
pub const VIDEO_MIME_TYPES: &[&str] = &["video/mp4"];

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    File,
    Type,
    Model,
}

/// A validation problem, rendered through its i18n key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Issue {
    /// No file was selected.
    MissingFile,
    /// The declared MIME type is not on the allow-list.
    UnsupportedFormat,
    /// `type` is missing or not one of `image`/`video`.
    InvalidType,
    /// `model` is missing or not one of `dcp`/`ffa`.
    InvalidModel,
    /// The declared type disagrees with the file's MIME category.
    KindMismatch { expected: MediaKind },
}

impl Issue {
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            Issue::MissingFile => "validation-missing-file",
            Issue::UnsupportedFormat => "validation-unsupported-format",
            Issue::InvalidType => "validation-invalid-type",
            Issue::InvalidModel => "validation-invalid-model",
            Issue::KindMismatch { .. } => "validation-kind-mismatch",
        }
    }

    /// English message, identical to the en-US translation.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Issue::MissingFile => "Upload an image first!".to_string(),
            Issue::UnsupportedFormat => {
                "Only .jpg, .jpeg, .png, .mp4 and .webp formats are supported.".to_string()
            }
            Issue::InvalidType => "Select a media type (image or video).".to_string(),
            Issue::InvalidModel => "Select a processing model (dcp or ffa).".to_string(),
            Issue::KindMismatch { expected } => {
                format!("The selected type does not match the file (expected {expected}).")
            }
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Failed fields in form order, one issue per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(Field, Issue)>,
}

impl ValidationErrors {
    /// Records an issue unless the field already has one.
    fn push(&mut self, field: Field, issue: Issue) {
        if self.get(field).is_none() {
            self.errors.push((field, issue));
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<Issue> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, issue)| *issue)
    }

    /// Drops the issue for `field`, e.g. once the user edits it.
    pub fn clear(&mut self, field: Field) {
        self.errors.retain(|(f, _)| *f != field);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Issue)> + '_ {
        self.errors.iter().copied()
    }
}

/// Raw form values as entered by the user.
///
/// `kind` and `model` are the wire strings, so values that the form would
/// never produce are still rejected here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Candidate<'a> {
    pub file: Option<&'a SelectedFile>,
    pub kind: Option<&'a str>,
    pub model: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSchema {
    variant: Variant,
    strict_kind_check: bool,
}

impl UploadSchema {
    #[must_use]
    pub fn new(variant: Variant, strict_kind_check: bool) -> Self {
        Self {
            variant,
            strict_kind_check,
        }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether a declared MIME type is accepted by this workflow.
    #[must_use]
    pub fn accepts_mime(&self, mime: &str) -> bool {
        IMAGE_MIME_TYPES.contains(&mime)
            || (self.variant.has_selection() && VIDEO_MIME_TYPES.contains(&mime))
    }

    /// Validates a candidate.
    ///
    /// # Errors
    ///
    /// Returns every failing field when the candidate is not acceptable.
    pub fn validate(&self, candidate: &Candidate<'_>) -> Result<UploadRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let file = match candidate.file {
            None => {
                errors.push(Field::File, Issue::MissingFile);
                None
            }
            Some(file) if !self.accepts_mime(file.mime()) => {
                errors.push(Field::File, Issue::UnsupportedFormat);
                None
            }
            Some(file) => Some(file),
        };

        if !self.variant.has_selection() {
            return match file {
                Some(file) if errors.is_empty() => Ok(UploadRequest::image_only(file.clone())),
                _ => Err(errors),
            };
        }

        let kind = candidate.kind.and_then(|s| s.parse::<MediaKind>().ok());
        if kind.is_none() {
            errors.push(Field::Type, Issue::InvalidType);
        }

        let model = candidate.model.and_then(|s| s.parse::<ProcessingModel>().ok());
        if model.is_none() {
            errors.push(Field::Model, Issue::InvalidModel);
        }

        if self.strict_kind_check {
            if let (Some(file), Some(kind)) = (file, kind) {
                if let Some(actual) = file.kind() {
                    if actual != kind {
                        errors.push(Field::Type, Issue::KindMismatch { expected: actual });
                    }
                }
            }
        }

        match (file, kind, model) {
            (Some(file), Some(kind), Some(model)) if errors.is_empty() => {
                Ok(UploadRequest::combined(file.clone(), kind, model))
            }
            _ => Err(errors),
        }
    }
}
