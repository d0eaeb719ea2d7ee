// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Components return events; the handlers here turn those events into
//! tasks (dialogs, decoding, network round trips) and keep the result
//! store, the object URL registry and the viewer consistent.

use super::Message;
use crate::application::port::{DehazeService, ServiceError};
use crate::application::{RequestId, RequestSequencer, ResultStore};
use crate::diagnostics::{
    AppOperation, AppStateEvent, DiagnosticsHandle, ErrorType, UserAction, WarningEvent,
    WarningType,
};
use crate::domain::media::{Blob, MediaKind, ObjectUrl, ProcessingModel, Variant};
use crate::domain::upload::UploadResult;
use crate::error::Error;
use crate::i18n::I18n;
use crate::media::mime::extensions::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::media::mime::extension_for_mime;
use crate::media::{decode_image, extract_poster, read_selected_file, ObjectUrlRegistry};
use crate::ui::navbar;
use crate::ui::notifications::{self, Notification};
use crate::ui::uploader::{self, Event as UploaderEvent, FileSource};
use crate::ui::viewer::{self, Content, Event as ViewerEvent};
use iced::Task;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// How long to wait for the rest of a multi-file drop.
pub const DROP_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Bookkeeping for a request that has been sent but not answered.
#[derive(Debug, Clone, Copy)]
pub struct InFlight {
    pub started_at: Instant,
    pub kind: MediaKind,
    pub model: Option<ProcessingModel>,
}

/// Context for update operations containing mutable references to app state.
pub struct UpdateContext<'a> {
    pub i18n: &'a I18n,
    pub store: &'a ResultStore,
    pub store_rx: &'a mut watch::Receiver<UploadResult>,
    pub registry: &'a mut ObjectUrlRegistry,
    pub sequencer: &'a mut RequestSequencer,
    pub service: Option<&'a Arc<dyn DehazeService>>,
    pub uploader: &'a mut uploader::State,
    pub viewer: &'a mut viewer::State,
    pub notifications: &'a mut notifications::Manager,
    pub diagnostics: &'a DiagnosticsHandle,
    pub in_flight: &'a mut HashMap<RequestId, InFlight>,
}

impl UpdateContext<'_> {
    fn variant(&self) -> Variant {
        self.uploader.variant()
    }
}

// =============================================================================
// Uploader
// =============================================================================

/// Routes a message to the upload form and runs the resulting side effect.
pub fn handle_uploader_message(
    ctx: &mut UpdateContext<'_>,
    message: uploader::Message,
) -> Task<Message> {
    log_uploader_action(ctx, &message);

    if let uploader::Message::UploadFinished { request_id, result } = &message {
        if let Some(flight) = ctx.in_flight.remove(request_id) {
            ctx.diagnostics.log_operation(AppOperation::Upload {
                request_id: request_id.value(),
                duration_ms: elapsed_ms(flight.started_at),
                kind: flight.kind.as_str().to_string(),
                model: flight.model.map(|m| m.as_str().to_string()),
                success: result.is_ok(),
            });
        }
    }

    let previous_phase = ctx.uploader.phase().as_str();
    let event = {
        let mut form_ctx = uploader::UpdateContext {
            registry: ctx.registry,
            sequencer: ctx.sequencer,
        };
        ctx.uploader.update(message, &mut form_ctx)
    };
    let phase = ctx.uploader.phase().as_str();
    if phase != previous_phase {
        ctx.diagnostics.log_state(AppStateEvent::PhaseChanged {
            phase: phase.to_string(),
        });
    }

    handle_uploader_event(ctx, event)
}

fn log_uploader_action(ctx: &UpdateContext<'_>, message: &uploader::Message) {
    let action = match message {
        uploader::Message::FileSelected { source, .. } => UserAction::SelectFile {
            source: Some(source.as_str().to_string()),
        },
        uploader::Message::TypeSelected(kind) => UserAction::SelectType {
            kind: kind.as_str().to_string(),
        },
        uploader::Message::ModelSelected(model) => UserAction::SelectModel {
            model: model.as_str().to_string(),
        },
        uploader::Message::Submit => UserAction::Submit,
        uploader::Message::Retry => UserAction::Retry,
        uploader::Message::Reset => UserAction::Reset,
        _ => return,
    };
    ctx.diagnostics.log_action(action);
}

fn handle_uploader_event(ctx: &mut UpdateContext<'_>, event: UploaderEvent) -> Task<Message> {
    match event {
        UploaderEvent::None => Task::none(),
        UploaderEvent::OpenFileDialog => open_file_dialog(ctx),
        UploaderEvent::ReadFile { path, source } => read_file(path, source),
        UploaderEvent::MultipleFilesRejected(count) => {
            ctx.diagnostics.log_warning(WarningEvent::new(
                WarningType::ValidationFailed,
                format!("{count} files dropped at once"),
            ));
            Task::none()
        }
        UploaderEvent::DecodePreview { generation, file } => {
            let diagnostics = ctx.diagnostics.clone();
            let blob = file.blob;
            Task::perform(
                async move {
                    let started_at = Instant::now();
                    let result = run_blocking(move || {
                        decode_image(blob.bytes()).map_err(|e| e.to_string())
                    })
                    .await;
                    diagnostics.log_operation(AppOperation::PreviewDecoded {
                        duration_ms: elapsed_ms(started_at),
                        kind: MediaKind::Image.as_str().to_string(),
                    });
                    result
                },
                move |result| {
                    Message::Uploader(uploader::Message::PreviewDecoded { generation, result })
                },
            )
        }
        UploaderEvent::ExtractPoster { url, path } => {
            let diagnostics = ctx.diagnostics.clone();
            Task::perform(
                async move {
                    let started_at = Instant::now();
                    let result =
                        run_blocking(move || extract_poster(&path).map_err(|e| e.to_string()))
                            .await;
                    diagnostics.log_operation(AppOperation::PreviewDecoded {
                        duration_ms: elapsed_ms(started_at),
                        kind: MediaKind::Video.as_str().to_string(),
                    });
                    result
                },
                move |result| {
                    Message::Uploader(uploader::Message::PosterExtracted { url, result })
                },
            )
        }
        UploaderEvent::ValidationFailed(errors) => {
            let fields: Vec<String> = errors
                .iter()
                .map(|(field, issue)| format!("{field:?}: {}", issue.i18n_key()))
                .collect();
            ctx.diagnostics.log_warning(WarningEvent::new(
                WarningType::ValidationFailed,
                fields.join(", "),
            ));
            Task::none()
        }
        UploaderEvent::Send {
            request_id,
            request,
        } => {
            ctx.in_flight.insert(
                request_id,
                InFlight {
                    started_at: Instant::now(),
                    kind: request.kind(),
                    model: request.model(),
                },
            );
            let on_finished = move |result| {
                Message::Uploader(uploader::Message::UploadFinished { request_id, result })
            };
            match ctx.service {
                Some(service) => Task::perform(service.dehaze(request), on_finished),
                None => Task::done(on_finished(Err(ServiceError::Other(
                    "no dehazing service configured".to_string(),
                )))),
            }
        }
        UploaderEvent::Completed { response, .. } => {
            let variant = ctx.variant();
            let kind = response.media_kind(variant);
            let mime = response.mime(variant);
            let url = ctx.registry.create(Blob::new(mime, response.bytes));
            if let Some(previous) = ctx.store.commit(UploadResult { url, kind }) {
                ctx.registry.revoke(&previous);
            }
            ctx.diagnostics.log_state(AppStateEvent::ResultCommitted {
                kind: kind.as_str().to_string(),
            });
            ctx.notifications.clear_service_errors();
            ctx.notifications
                .push(Notification::success("notification-upload-success"));
            sync_viewer(ctx)
        }
        UploaderEvent::Failed { reason, .. } => {
            ctx.notifications.clear_service_errors();
            ctx.notifications.push(service_error_notification(&reason));
            Task::none()
        }
        UploaderEvent::StaleDiscarded(request_id) => {
            ctx.diagnostics
                .log_operation(AppOperation::StaleResultDiscarded {
                    request_id: request_id.value(),
                });
            Task::none()
        }
        UploaderEvent::Reset => {
            if let Some(previous) = ctx.store.reset() {
                ctx.registry.revoke(&previous);
            }
            ctx.in_flight.clear();
            ctx.notifications.clear_service_errors();
            ctx.diagnostics.log_state(AppStateEvent::StoreReset);
            sync_viewer(ctx)
        }
    }
}

fn service_error_notification(reason: &ServiceError) -> Notification {
    let notification =
        Notification::error(reason.i18n_key()).with_error_type(ErrorType::ServiceError);
    match reason {
        ServiceError::Status(code) => notification.with_arg("status", code.to_string()),
        ServiceError::Rejected(detail)
        | ServiceError::Connection(detail)
        | ServiceError::Other(detail) => notification.with_arg("detail", detail.clone()),
        ServiceError::Timeout | ServiceError::EmptyBody => notification,
    }
}

fn open_file_dialog(ctx: &UpdateContext<'_>) -> Task<Message> {
    let mut extensions: Vec<&'static str> = IMAGE_EXTENSIONS.to_vec();
    if ctx.variant().has_selection() {
        extensions.extend_from_slice(VIDEO_EXTENSIONS);
    }
    let title = ctx.i18n.tr("uploader-browse-button");
    let filter = ctx.i18n.tr("uploader-file-filter");

    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .set_title(&title)
                .add_filter(&filter, &extensions)
                .pick_file()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::OpenFileDialogResult,
    )
}

/// Reads a file from disk on a blocking worker thread.
pub fn read_file(path: PathBuf, source: FileSource) -> Task<Message> {
    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || read_selected_file(&path))
                .await
                .map_err(|e| Error::Io(e.to_string()))?
        },
        move |result| Message::FileRead { source, result },
    )
}

/// Runs decoding or disk work on Tokio's blocking pool so the executor
/// driving the UI tasks stays responsive.
async fn run_blocking<T, F>(work: F) -> Result<T, String>
where
    F: FnOnce() -> Result<T, String> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| e.to_string())?
}

// =============================================================================
// Result store observation
// =============================================================================

/// Pulls the latest store snapshot into the viewer and starts decoding the
/// new content, if the store changed since the last call.
pub fn sync_viewer(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    if !ctx.store_rx.has_changed().unwrap_or(false) {
        return Task::none();
    }
    let snapshot = ctx.store_rx.borrow_and_update().clone();
    let variant = ctx.variant();

    match ctx.viewer.sync(&snapshot, variant).cloned() {
        None | Some(Content::Empty) => Task::none(),
        Some(Content::Image { url }) => decode_result(ctx, url),
        Some(Content::Video { url, .. }) => extract_result_poster(ctx, url),
    }
}

fn decode_result(ctx: &UpdateContext<'_>, url: ObjectUrl) -> Task<Message> {
    let Some(blob) = ctx.registry.resolve(&url).cloned() else {
        return Task::done(Message::Viewer(viewer::Message::ResultDecoded {
            url,
            result: Err("result released".to_string()),
        }));
    };
    Task::perform(
        run_blocking(move || decode_image(blob.bytes()).map_err(|e| e.to_string())),
        move |result| Message::Viewer(viewer::Message::ResultDecoded { url, result }),
    )
}

/// Writes the result video to a temp file so both the poster extractor
/// and the player can open it by path.
fn extract_result_poster(ctx: &mut UpdateContext<'_>, url: ObjectUrl) -> Task<Message> {
    let path = match ctx.registry.materialize(&url) {
        Ok(Some(path)) => path,
        Ok(None) => return poster_failed(url, "result released".to_string()),
        Err(e) => return poster_failed(url, e.to_string()),
    };
    let source = path.clone();
    Task::perform(
        run_blocking(move || extract_poster(&source).map_err(|e| e.to_string())),
        move |result| Message::Viewer(viewer::Message::PosterExtracted { url, path, result }),
    )
}

fn poster_failed(url: ObjectUrl, detail: String) -> Task<Message> {
    Task::done(Message::Viewer(viewer::Message::PosterExtracted {
        url,
        path: PathBuf::new(),
        result: Err(detail),
    }))
}

// =============================================================================
// Viewer
// =============================================================================

pub fn handle_viewer_message(
    ctx: &mut UpdateContext<'_>,
    message: viewer::Message,
) -> Task<Message> {
    match ctx.viewer.update(message) {
        ViewerEvent::None => Task::none(),
        ViewerEvent::SaveResult(url) => {
            ctx.diagnostics.log_action(UserAction::SaveResult);
            let Some(blob) = ctx.registry.resolve(&url) else {
                ctx.notifications
                    .push(Notification::error("notification-save-error").with_arg(
                        "detail",
                        "result released",
                    ));
                return Task::none();
            };
            let extension = extension_for_mime(blob.mime());
            let filename = format!("dehazed.{extension}");
            let title = ctx.i18n.tr("viewer-save-button");
            let directory = crate::app::paths::default_export_dir();

            Task::perform(
                async move {
                    let mut dialog = rfd::AsyncFileDialog::new()
                        .set_title(&title)
                        .set_file_name(&filename)
                        .add_filter(extension, &[extension]);
                    if directory.exists() {
                        dialog = dialog.set_directory(&directory);
                    }
                    dialog.save_file().await.map(|h| h.path().to_path_buf())
                },
                move |path| Message::SaveResultDialogResult { url, path },
            )
        }
    }
}

/// Writes the stored result to the path chosen in the save dialog.
pub fn handle_save_result(
    ctx: &mut UpdateContext<'_>,
    url: &ObjectUrl,
    path: Option<PathBuf>,
) -> Task<Message> {
    let Some(path) = path else {
        return Task::none();
    };
    let Some(blob) = ctx.registry.resolve(url).cloned() else {
        ctx.notifications.push(
            Notification::error("notification-save-error").with_arg("detail", "result released"),
        );
        return Task::none();
    };
    Task::perform(
        run_blocking(move || {
            std::fs::write(&path, blob.bytes())
                .map(|()| path)
                .map_err(|e| e.to_string())
        }),
        Message::ResultSaved,
    )
}

pub fn handle_result_saved(
    ctx: &mut UpdateContext<'_>,
    result: Result<PathBuf, String>,
) -> Task<Message> {
    match result {
        Ok(_) => ctx
            .notifications
            .push(Notification::success("notification-save-success")),
        Err(detail) => ctx.notifications.push(
            Notification::error("notification-save-error")
                .with_arg("detail", detail)
                .with_error_type(ErrorType::IoError),
        ),
    }
    Task::none()
}

// =============================================================================
// Navbar
// =============================================================================

pub fn handle_navbar_message(
    ctx: &mut UpdateContext<'_>,
    message: navbar::Message,
) -> Task<Message> {
    match navbar::update(message) {
        navbar::Event::Reset => handle_uploader_message(ctx, uploader::Message::Reset),
        navbar::Event::ExportDiagnostics => {
            ctx.diagnostics.log_action(UserAction::ExportDiagnostics);
            let filename = crate::diagnostics::generate_default_filename();
            let directory = crate::diagnostics::default_export_directory();
            let title = ctx.i18n.tr("navbar-export-diagnostics");

            Task::perform(
                async move {
                    let mut dialog = rfd::AsyncFileDialog::new()
                        .set_title(&title)
                        .set_file_name(&filename)
                        .add_filter("JSON", &["json"]);
                    if directory.exists() {
                        dialog = dialog.set_directory(&directory);
                    }
                    dialog.save_file().await.map(|h| h.path().to_path_buf())
                },
                Message::DiagnosticsExportDialogResult,
            )
        }
    }
}

// =============================================================================
// Files
// =============================================================================

pub fn handle_file_read(
    ctx: &mut UpdateContext<'_>,
    source: FileSource,
    result: Result<crate::domain::media::SelectedFile, crate::error::Error>,
) -> Task<Message> {
    match result {
        Ok(file) => handle_uploader_message(ctx, uploader::Message::FileSelected { file, source }),
        Err(error) => {
            ctx.notifications.push(
                Notification::error("notification-file-read-error")
                    .with_arg("detail", error.to_string())
                    .with_error_type(ErrorType::IoError),
            );
            Task::none()
        }
    }
}

fn elapsed_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}
