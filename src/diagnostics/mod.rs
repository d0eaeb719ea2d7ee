// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting activity reports.
//!
//! Events are captured during usage, kept in a memory-bounded circular
//! buffer and exported as JSON on request.
//!
//! # Architecture
//!
//! - [`EventLog`]: bounded log that counts overwritten events
//! - [`DiagnosticEvent`]: Timestamped user actions, state changes,
//!   operations, warnings and errors
//! - [`DiagnosticsCollector`] / [`DiagnosticsHandle`]: channel-based intake

mod buffer;
mod collector;
mod events;
mod export;

pub use buffer::{BufferCapacity, EventLog};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{
    AppOperation, AppStateEvent, DiagnosticEvent, DiagnosticEventKind, ErrorEvent, ErrorType,
    UserAction, WarningEvent, WarningType,
};
pub use export::{
    default_export_directory, generate_default_filename, DiagnosticReport, ExportError,
    ReportMetadata, SerializableEvent,
};
