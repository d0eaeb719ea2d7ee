// SPDX-License-Identifier: MPL-2.0
//! `iced_dehaze` is a desktop front end for a remote dehazing service, built
//! with the Iced GUI framework.
//!
//! A user picks or drops a hazy image (or, in the combined workflow, a
//! video), chooses a processing model, and uploads it. The processed result
//! is kept in an application-owned store and shown next to the form.

pub mod app;
pub mod application;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod media;
pub mod ui;
pub mod video_player;
