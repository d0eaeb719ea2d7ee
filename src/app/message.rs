// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::domain::media::{ObjectUrl, SelectedFile, Variant};
use crate::error::Error;
use crate::ui::navbar;
use crate::ui::notifications;
use crate::ui::uploader::{self, FileSource};
use crate::ui::viewer;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. Component messages are
/// forwarded; the rest carry results of dialogs and background tasks.
#[derive(Debug, Clone)]
pub enum Message {
    Uploader(uploader::Message),
    Viewer(viewer::Message),
    Navbar(navbar::Message),
    Notification(notifications::NotificationMessage),
    OpenFileDialogResult(Option<PathBuf>),
    /// One path of a drop gesture; paths are batched until `DropSettled`.
    FileDropped(PathBuf),
    DropSettled,
    FileRead {
        source: FileSource,
        result: Result<SelectedFile, Error>,
    },
    SaveResultDialogResult {
        url: ObjectUrl,
        path: Option<PathBuf>,
    },
    ResultSaved(Result<PathBuf, String>),
    DiagnosticsExportDialogResult(Option<PathBuf>),
    /// Periodic tick for toast auto-dismiss.
    Tick(Instant),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional file to preselect on startup.
    pub file_path: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_DEHAZE_CONFIG_DIR`.
    pub config_dir: Option<String>,
    /// Overrides the configured service endpoint.
    pub endpoint: Option<String>,
    /// Overrides the configured workflow.
    pub variant: Option<Variant>,
}
