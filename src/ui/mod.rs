// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! owns its state and `Message` type, and reports side effects to the
//! application as an `Event`.
//!
//! - [`uploader`] - Upload form with preview, validation and retry
//! - [`viewer`] - Processed result display
//! - [`video_controls`] - Playback surface shared by the preview and the viewer
//! - [`navbar`] - Title bar with reset and diagnostics export
//! - [`notifications`] - Toast notifications
//! - [`styles`], [`design_tokens`], [`theming`] - Look and feel

pub mod design_tokens;
pub mod navbar;
pub mod notifications;
pub mod styles;
pub mod theming;
pub mod uploader;
pub mod video_controls;
pub mod viewer;
