// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for activity tracking.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// User-initiated actions that can be captured for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// A file was picked or dropped.
    SelectFile {
        /// Where the file came from (`file_dialog`, `drag_drop`, `cli`).
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },

    /// The declared media type changed.
    SelectType { kind: String },

    /// The processing model changed.
    SelectModel { model: String },

    /// The form was submitted.
    Submit,

    /// A failed upload was retried.
    Retry,

    /// Form and result were cleared.
    Reset,

    /// The processed result was saved to disk.
    SaveResult,

    /// A diagnostics report was exported.
    ExportDiagnostics,
}

/// Application state changes worth correlating with user actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AppStateEvent {
    /// The application finished booting. `endpoint` is `None` when no
    /// dehazing client could be built.
    Started {
        variant: String,
        locale: String,
        endpoint: Option<String>,
    },

    /// The uploader entered a new phase.
    PhaseChanged { phase: String },

    /// A result was written to the result store.
    ResultCommitted { kind: String },

    /// The result store was emptied.
    StoreReset,
}

/// Timed operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum AppOperation {
    /// One round trip to the dehazing service.
    Upload {
        request_id: u64,
        duration_ms: u64,
        kind: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        success: bool,
    },

    /// A response arrived for a superseded request and was dropped.
    StaleResultDiscarded { request_id: u64 },

    /// A local preview was decoded.
    PreviewDecoded { duration_ms: u64, kind: String },
}

/// Categories of warnings that can occur in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    /// A file the workflow cannot accept.
    UnsupportedFormat,
    /// The form failed validation on submit.
    ValidationFailed,
    /// The settings file was unreadable and defaults were used.
    ConfigurationIssue,
    NetworkError,
    Other,
}

/// Categories of errors that can occur in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Reading or writing a local file failed.
    IoError,
    /// A preview or result could not be decoded.
    DecodeError,
    /// The dehazing service failed or rejected the upload.
    ServiceError,
    /// A diagnostics report could not be written.
    ExportError,
    Other,
}

/// A categorized warning with a short message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WarningEvent {
    pub warning_type: WarningType,
    pub message: String,
}

impl WarningEvent {
    /// Creates a warning event.
    #[must_use]
    pub fn new(warning_type: WarningType, message: impl Into<String>) -> Self {
        Self {
            warning_type,
            message: message.into(),
        }
    }
}

/// A categorized error with a short message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEvent {
    pub error_type: ErrorType,
    pub message: String,
}

impl ErrorEvent {
    /// Creates an error event.
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}

/// A diagnostic event with timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred (monotonic clock for duration calculations)
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Stamps `kind` with the current instant.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }
}

/// Payload of a diagnostic event, serialized with a `type` tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    AppState {
        state: AppStateEvent,
    },
    Operation {
        operation: AppOperation,
    },
    Warning {
        event: WarningEvent,
    },
    Error {
        event: ErrorEvent,
    },
}
