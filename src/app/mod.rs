// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the upload form, the
//! result viewer and the navbar.
//!
//! The `App` struct owns every shared resource (result store, object URL
//! registry, request sequencer, dehazing client) and translates component
//! events into side effects. Resources are released when the app is dropped.

pub mod config;
mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::application::port::DehazeService;
use crate::application::{RequestId, RequestSequencer, ResultStore, UploadSchema};
use crate::diagnostics::{
    AppStateEvent, DiagnosticsCollector, DiagnosticsHandle, ErrorType,
    WarningType,
};
use crate::domain::upload::UploadResult;
use crate::i18n::I18n;
use crate::infrastructure::{HttpClientConfig, HttpDehazeClient};
use crate::media::ObjectUrlRegistry;
use crate::ui::notifications::{self, Notification};
use crate::ui::theming::AppTheme;
use crate::ui::uploader::{self, FileSource};
use crate::ui::viewer;
use config::Config;
use iced::{window, Element, Subscription, Task, Theme};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use update::{InFlight, UpdateContext};

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    theme: AppTheme,
    store: ResultStore,
    store_rx: watch::Receiver<UploadResult>,
    registry: ObjectUrlRegistry,
    sequencer: RequestSequencer,
    service: Option<Arc<dyn DehazeService>>,
    uploader: uploader::State,
    viewer: viewer::State,
    notifications: notifications::Manager,
    diagnostics: DiagnosticsCollector,
    diagnostics_handle: DiagnosticsHandle,
    /// Paths of the drop gesture in progress.
    pending_drops: Vec<PathBuf>,
    in_flight: HashMap<RequestId, InFlight>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("variant", &self.config.service.variant)
            .field("phase", self.uploader.phase())
            .field("has_result", &!self.store.is_empty())
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 640;
pub const WINDOW_DEFAULT_WIDTH: u32 = 1024;
pub const MIN_WINDOW_HEIGHT: u32 = 480;
pub const MIN_WINDOW_WIDTH: u32 = 560;

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires Fn for boot; flags are consumed on the first call.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads configuration, applies CLI overrides and optionally starts
    /// reading the file passed on the command line.
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        paths::init_cli_overrides(flags.config_dir.clone());
        let (mut config, config_warning) = config::load();

        if let Some(variant) = flags.variant {
            config.service.variant = variant;
        }
        if let Some(endpoint) = flags.endpoint.clone() {
            config.service.endpoint = Some(endpoint);
        }

        let i18n = I18n::new(flags.lang.clone(), config.general.language.as_deref());
        let client = HttpDehazeClient::new(HttpClientConfig::new(
            config.service.effective_endpoint(),
            config.service.timeout(),
        ));

        let (service, client_error) = match client {
            Ok(client) => (Some(Arc::new(client) as Arc<dyn DehazeService>), None),
            Err(error) => (None, Some(error)),
        };
        let mut app = Self::with_service(config, i18n, service);

        if let Some(error) = client_error {
            app.notifications.push(
                Notification::error("error-service-general")
                    .with_arg("detail", error.to_string())
                    .with_error_type(ErrorType::ServiceError),
            );
        }

        if let Some(key) = config_warning {
            let warning =
                Notification::warning(key).with_warning_type(WarningType::ConfigurationIssue);
            app.notifications.push(warning);
        }

        let task = match flags.file_path {
            Some(path) => update::read_file(PathBuf::from(path), FileSource::Cli),
            None => Task::none(),
        };

        (app, task)
    }

    /// Builds the application around an explicit service, without touching
    /// the config file or the network. Used by `new` and by tests.
    pub fn with_service(
        config: Config,
        i18n: I18n,
        service: Option<Arc<dyn DehazeService>>,
    ) -> Self {
        let diagnostics = DiagnosticsCollector::new(config.diagnostics.capacity());
        let handle = diagnostics.handle();

        let mut notifications = notifications::Manager::new();
        notifications.set_diagnostics(handle.clone());

        let schema = UploadSchema::new(
            config.service.variant,
            config.upload.strict_kind_check(),
        );
        let store = ResultStore::new();
        let store_rx = store.subscribe();

        handle.log_state(AppStateEvent::Started {
            variant: config.service.variant.as_str().to_string(),
            locale: i18n.current_locale().to_string(),
            endpoint: service.as_ref().map(|service| service.endpoint().to_string()),
        });

        Self {
            theme: AppTheme::new(config.general.theme_mode),
            i18n,
            config,
            store,
            store_rx,
            registry: ObjectUrlRegistry::new(),
            sequencer: RequestSequencer::new(),
            service,
            uploader: uploader::State::new(schema),
            viewer: viewer::State::new(),
            notifications,
            diagnostics,
            diagnostics_handle: handle,
            pending_drops: Vec::new(),
            in_flight: HashMap::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    #[must_use]
    pub fn uploader(&self) -> &uploader::State {
        &self.uploader
    }

    #[must_use]
    pub fn viewer(&self) -> &viewer::State {
        &self.viewer
    }

    #[must_use]
    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    #[must_use]
    pub fn notifications(&self) -> &notifications::Manager {
        &self.notifications
    }

    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    pub fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    pub fn theme(&self) -> Theme {
        self.theme.iced_theme()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_tick_subscription(self.notifications.has_notifications()),
            self.uploader.subscription().map(Message::Uploader),
            self.viewer.subscription().map(Message::Viewer),
        ])
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        self.diagnostics.process_pending();

        match message {
            Message::Tick(_) => {
                self.notifications.tick();
                Task::none()
            }
            Message::Notification(notification_message) => {
                self.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::FileDropped(path) => {
                let first = self.pending_drops.is_empty();
                self.pending_drops.push(path);
                if first {
                    Task::perform(tokio::time::sleep(update::DROP_SETTLE_DELAY), |()| {
                        Message::DropSettled
                    })
                } else {
                    Task::none()
                }
            }
            Message::DropSettled => {
                let paths = std::mem::take(&mut self.pending_drops);
                update::handle_uploader_message(
                    &mut self.update_context(),
                    uploader::Message::FilesDropped(paths),
                )
            }
            Message::OpenFileDialogResult(Some(path)) => {
                update::read_file(path, FileSource::Dialog)
            }
            Message::OpenFileDialogResult(None) => Task::none(),
            Message::FileRead { source, result } => {
                update::handle_file_read(&mut self.update_context(), source, result)
            }
            Message::Uploader(uploader_message) => {
                update::handle_uploader_message(&mut self.update_context(), uploader_message)
            }
            Message::Viewer(viewer_message) => {
                update::handle_viewer_message(&mut self.update_context(), viewer_message)
            }
            Message::Navbar(navbar_message) => {
                update::handle_navbar_message(&mut self.update_context(), navbar_message)
            }
            Message::SaveResultDialogResult { url, path } => {
                update::handle_save_result(&mut self.update_context(), &url, path)
            }
            Message::ResultSaved(result) => {
                update::handle_result_saved(&mut self.update_context(), result)
            }
            Message::DiagnosticsExportDialogResult(path) => {
                self.export_diagnostics(path);
                Task::none()
            }
        }
    }

    fn export_diagnostics(&mut self, path: Option<PathBuf>) {
        let Some(path) = path else {
            return;
        };
        self.diagnostics.process_pending();
        match self.diagnostics.export_to_file(&path) {
            Ok(written) => self.notifications.push(
                Notification::success("notification-diagnostics-exported")
                    .with_arg("path", written.display().to_string()),
            ),
            Err(error) => self.notifications.push(
                Notification::error("notification-diagnostics-export-error")
                    .with_arg("detail", error.to_string())
                    .with_error_type(ErrorType::ExportError),
            ),
        }
    }

    fn update_context(&mut self) -> UpdateContext<'_> {
        UpdateContext {
            i18n: &self.i18n,
            store: &self.store,
            store_rx: &mut self.store_rx,
            registry: &mut self.registry,
            sequencer: &mut self.sequencer,
            service: self.service.as_ref(),
            uploader: &mut self.uploader,
            viewer: &mut self.viewer,
            notifications: &mut self.notifications,
            diagnostics: &self.diagnostics_handle,
            in_flight: &mut self.in_flight,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            variant: self.uploader.variant(),
            uploader: &self.uploader,
            viewer: &self.viewer,
            notifications: &self.notifications,
            can_reset: self.uploader.file().is_some()
                || !self.store.is_empty()
                || !matches!(self.uploader.phase(), uploader::Phase::Idle),
        })
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.uploader.release(&mut self.registry);
        self.registry.revoke_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::{ServiceError, ServiceResponse};
    use crate::diagnostics::DiagnosticEventKind;
    use crate::domain::media::{Blob, SelectedFile, Variant};
    use crate::domain::upload::UploadRequest;
    use futures_util::future::BoxFuture;

    #[derive(Debug)]
    struct EchoService;

    impl DehazeService for EchoService {
        fn dehaze(
            &self,
            request: UploadRequest,
        ) -> BoxFuture<'static, Result<ServiceResponse, ServiceError>> {
            let bytes = request.file.blob.bytes().to_vec();
            Box::pin(async move {
                Ok(ServiceResponse {
                    bytes,
                    content_type: Some("image/png".to_string()),
                })
            })
        }

        fn endpoint(&self) -> &str {
            "http://localhost:0/dehaze"
        }
    }

    fn app(variant: Variant) -> App {
        let mut config = Config::default();
        config.service.variant = variant;
        App::with_service(
            config,
            I18n::new(Some("en-US".to_string()), None),
            Some(Arc::new(EchoService)),
        )
    }

    fn select_png(app: &mut App) {
        let _ = app.update(Message::FileRead {
            source: FileSource::Dialog,
            result: Ok(SelectedFile::new(
                "haze.png",
                Blob::new("image/png", vec![1, 2, 3]),
            )),
        });
    }

    #[test]
    fn title_is_localized() {
        assert!(!app(Variant::ImageOnly).title().starts_with("MISSING"));
    }

    #[test]
    fn startup_logs_service_endpoint() {
        let mut app = app(Variant::Combined);
        app.diagnostics.process_pending();
        let started = app.diagnostics().iter().find_map(|event| match &event.kind {
            DiagnosticEventKind::AppState {
                state: AppStateEvent::Started { endpoint, .. },
            } => Some(endpoint.clone()),
            _ => None,
        });
        assert_eq!(started, Some(Some("http://localhost:0/dehaze".to_string())));
    }

    #[test]
    fn file_read_selects_file() {
        let mut app = app(Variant::ImageOnly);
        select_png(&mut app);
        assert_eq!(app.uploader().file().map(|f| f.name.as_str()), Some("haze.png"));
    }

    #[test]
    fn file_read_error_shows_toast() {
        let mut app = app(Variant::ImageOnly);
        let _ = app.update(Message::FileRead {
            source: FileSource::DragDrop,
            result: Err(crate::error::Error::Io("denied".to_string())),
        });
        assert!(app.uploader().file().is_none());
        assert!(app.notifications().has_notifications());
    }

    #[test]
    fn drop_paths_are_batched_until_settled() {
        let mut app = app(Variant::Combined);
        let _ = app.update(Message::FileDropped(PathBuf::from("a.png")));
        let _ = app.update(Message::FileDropped(PathBuf::from("b.png")));
        assert_eq!(app.pending_drops.len(), 2);

        let _ = app.update(Message::DropSettled);
        assert!(app.pending_drops.is_empty());
        assert!(app.uploader().multiple_files_rejected());
    }

    #[test]
    fn cancelled_dialog_changes_nothing() {
        let mut app = app(Variant::ImageOnly);
        let _ = app.update(Message::OpenFileDialogResult(None));
        let _ = app.update(Message::SaveResultDialogResult {
            url: crate::domain::media::ObjectUrl::from_id(1),
            path: None,
        });
        assert!(app.uploader().file().is_none());
        assert!(!app.notifications().has_notifications());
    }

    #[test]
    fn drop_releases_all_object_urls() {
        let mut app = app(Variant::Combined);
        let _ = app.update(Message::FileRead {
            source: FileSource::Dialog,
            result: Ok(SelectedFile::new(
                "clip.mp4",
                Blob::new("video/mp4", vec![0; 16]),
            )),
        });
        assert_eq!(app.registry().live_count(), 1);
        let path = match app.uploader().preview() {
            uploader::Preview::Video { path, .. } => path.clone(),
            other => panic!("expected a video preview, got {other:?}"),
        };
        assert!(path.exists());
        drop(app);
        assert!(!path.exists());
    }

    #[test]
    fn diagnostics_export_writes_file() {
        let mut app = app(Variant::ImageOnly);
        select_png(&mut app);
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let _ = app.update(Message::DiagnosticsExportDialogResult(Some(path.clone())));
        assert!(path.exists());
        assert!(app.notifications().has_notifications());
    }
}
