// SPDX-License-Identifier: MPL-2.0
//! Upload form state machine.
//!
//! ```text
//!            submit (valid)            response (current id)
//!   Idle ──────────────────▶ Pending ─────────────────────▶ Success
//!    ▲                         │  ▲
//!    │ reset                   │  │ retry
//!    │                         ▼  │
//!    └──────────────────────  Failed
//! ```
//!
//! The state never performs I/O itself. [`State::update`] returns an
//! [`Event`] describing the side effect the application must run (open a
//! dialog, decode a preview, send a request, commit a result).

use crate::application::port::{ServiceError, ServiceResponse};
use crate::application::{
    Candidate, Field, RequestId, RequestSequencer, UploadSchema, ValidationErrors,
};
use crate::domain::media::{MediaKind, ObjectUrl, ProcessingModel, SelectedFile, Variant};
use crate::domain::upload::UploadRequest;
use crate::media::{ImageData, ObjectUrlRegistry, Poster};
use crate::video_player::{Player, PlayerMessage};
use iced::Subscription;
use std::path::PathBuf;

/// Observable upload phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
    },
    Success,
    Failed {
        reason: ServiceError,
    },
}

impl Phase {
    /// Short name used in diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Pending { .. } => "pending",
            Phase::Success => "success",
            Phase::Failed { .. } => "failed",
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Phase::Pending { .. })
    }
}

/// Local preview of the selected file.
#[derive(Debug, Default)]
pub enum Preview {
    #[default]
    None,
    /// Image bytes are being decoded in the background.
    Decoding,
    Image(ImageData),
    /// Video previews own an object URL until the file is replaced. The
    /// player appears once the poster proves the file decodes.
    Video {
        url: ObjectUrl,
        path: PathBuf,
        poster: Option<Poster>,
        player: Option<Player>,
    },
    /// The file is kept but cannot be shown.
    Unavailable,
}

impl Preview {
    fn object_url(&self) -> Option<&ObjectUrl> {
        match self {
            Preview::Video { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Where a file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    Dialog,
    DragDrop,
    Cli,
}

impl FileSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FileSource::Dialog => "file_dialog",
            FileSource::DragDrop => "drag_drop",
            FileSource::Cli => "cli",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    BrowseRequested,
    /// Paths dropped on the window in one gesture.
    FilesDropped(Vec<PathBuf>),
    FileSelected {
        file: SelectedFile,
        source: FileSource,
    },
    TypeSelected(MediaKind),
    ModelSelected(ProcessingModel),
    Submit,
    Retry,
    Reset,
    PreviewDecoded {
        generation: u64,
        result: Result<ImageData, String>,
    },
    PosterExtracted {
        url: ObjectUrl,
        result: Result<Poster, String>,
    },
    UploadFinished {
        request_id: RequestId,
        result: Result<ServiceResponse, ServiceError>,
    },
    Player(PlayerMessage),
}

/// Side effects requested from the application.
#[derive(Debug)]
pub enum Event {
    None,
    OpenFileDialog,
    ReadFile {
        path: PathBuf,
        source: FileSource,
    },
    MultipleFilesRejected(usize),
    DecodePreview {
        generation: u64,
        file: SelectedFile,
    },
    ExtractPoster {
        url: ObjectUrl,
        path: PathBuf,
    },
    ValidationFailed(ValidationErrors),
    Send {
        request_id: RequestId,
        request: UploadRequest,
    },
    Completed {
        request_id: RequestId,
        response: ServiceResponse,
    },
    Failed {
        request_id: RequestId,
        reason: ServiceError,
    },
    StaleDiscarded(RequestId),
    /// Form cleared; the application resets the result store.
    Reset,
}

/// Shared resources the form touches while updating.
pub struct UpdateContext<'a> {
    pub registry: &'a mut ObjectUrlRegistry,
    pub sequencer: &'a mut RequestSequencer,
}

#[derive(Debug)]
pub struct State {
    schema: UploadSchema,
    phase: Phase,
    file: Option<SelectedFile>,
    kind: Option<MediaKind>,
    model: Option<ProcessingModel>,
    preview: Preview,
    preview_generation: u64,
    errors: ValidationErrors,
    multiple_files_rejected: bool,
    last_request: Option<UploadRequest>,
}

impl State {
    #[must_use]
    pub fn new(schema: UploadSchema) -> Self {
        Self {
            schema,
            phase: Phase::Idle,
            file: None,
            kind: None,
            model: None,
            preview: Preview::None,
            preview_generation: 0,
            errors: ValidationErrors::default(),
            multiple_files_rejected: false,
            last_request: None,
        }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.schema.variant()
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    #[must_use]
    pub fn kind(&self) -> Option<MediaKind> {
        self.kind
    }

    #[must_use]
    pub fn model(&self) -> Option<ProcessingModel> {
        self.model
    }

    #[must_use]
    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    #[must_use]
    pub fn multiple_files_rejected(&self) -> bool {
        self.multiple_files_rejected
    }

    /// The request most recently sent, which Retry resends unchanged.
    #[must_use]
    pub fn last_request(&self) -> Option<&UploadRequest> {
        self.last_request.as_ref()
    }

    /// Retry is offered only when resending the same request could succeed.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        matches!(&self.phase, Phase::Failed { reason } if reason.is_transient())
            && self.last_request.is_some()
    }

    /// Playback events for the video preview, if one is playable.
    pub fn subscription(&self) -> Subscription<Message> {
        match &self.preview {
            Preview::Video {
                player: Some(player),
                ..
            } => player.subscription().map(Message::Player),
            _ => Subscription::none(),
        }
    }

    pub fn update(&mut self, message: Message, ctx: &mut UpdateContext<'_>) -> Event {
        match message {
            Message::BrowseRequested => Event::OpenFileDialog,
            Message::FilesDropped(mut paths) => {
                if paths.len() == 1 {
                    self.multiple_files_rejected = false;
                    let path = paths.remove(0);
                    Event::ReadFile {
                        path,
                        source: FileSource::DragDrop,
                    }
                } else if paths.is_empty() {
                    Event::None
                } else {
                    self.multiple_files_rejected = true;
                    Event::MultipleFilesRejected(paths.len())
                }
            }
            Message::FileSelected { file, .. } => self.select_file(file, ctx.registry),
            Message::TypeSelected(kind) => {
                self.kind = Some(kind);
                self.errors.clear(Field::Type);
                Event::None
            }
            Message::ModelSelected(model) => {
                self.model = Some(model);
                self.errors.clear(Field::Model);
                Event::None
            }
            Message::Submit => self.submit(ctx.sequencer),
            Message::Retry => self.retry(ctx.sequencer),
            Message::Reset => {
                self.reset(ctx);
                Event::Reset
            }
            Message::PreviewDecoded { generation, result } => {
                if generation == self.preview_generation
                    && matches!(self.preview, Preview::Decoding)
                {
                    self.preview = match result {
                        Ok(image) => Preview::Image(image),
                        Err(_) => Preview::Unavailable,
                    };
                }
                Event::None
            }
            Message::PosterExtracted { url, result } => {
                if let Preview::Video {
                    url: current,
                    path,
                    poster,
                    player,
                } = &mut self.preview
                {
                    if *current == url {
                        *player = result
                            .as_ref()
                            .ok()
                            .map(|found| Player::new(path.clone(), found.info.duration_secs));
                        *poster = result.ok();
                    }
                }
                Event::None
            }
            Message::UploadFinished { request_id, result } => {
                self.finish(request_id, result, ctx.sequencer)
            }
            Message::Player(message) => {
                if let Preview::Video {
                    player: Some(player),
                    ..
                } = &mut self.preview
                {
                    player.update(message);
                }
                Event::None
            }
        }
    }

    /// Revokes the preview URL, if any. Called on replace, reset and teardown.
    pub fn release(&mut self, registry: &mut ObjectUrlRegistry) {
        if let Some(url) = self.preview.object_url() {
            registry.revoke(url);
        }
        self.preview = Preview::None;
    }

    fn select_file(&mut self, file: SelectedFile, registry: &mut ObjectUrlRegistry) -> Event {
        self.release(registry);
        self.preview_generation += 1;
        self.errors.clear(Field::File);
        self.multiple_files_rejected = false;
        if !self.phase.is_pending() {
            self.phase = Phase::Idle;
        }

        let event = match file.kind() {
            Some(MediaKind::Image) => {
                self.preview = Preview::Decoding;
                Event::DecodePreview {
                    generation: self.preview_generation,
                    file: file.clone(),
                }
            }
            Some(MediaKind::Video) => {
                let url = registry.create(file.blob.clone());
                match registry.materialize(&url) {
                    Ok(Some(path)) => {
                        self.preview = Preview::Video {
                            url: url.clone(),
                            path: path.clone(),
                            poster: None,
                            player: None,
                        };
                        Event::ExtractPoster { url, path }
                    }
                    Ok(None) | Err(_) => {
                        registry.revoke(&url);
                        self.preview = Preview::Unavailable;
                        Event::None
                    }
                }
            }
            None => {
                self.preview = Preview::Unavailable;
                Event::None
            }
        };

        self.file = Some(file);
        event
    }

    fn submit(&mut self, sequencer: &mut RequestSequencer) -> Event {
        let candidate = Candidate {
            file: self.file.as_ref(),
            kind: self.kind.map(MediaKind::as_str),
            model: self.model.map(ProcessingModel::as_str),
        };

        match self.schema.validate(&candidate) {
            Ok(request) => {
                self.errors = ValidationErrors::default();
                self.last_request = Some(request.clone());
                self.send(request, sequencer)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Event::ValidationFailed(errors)
            }
        }
    }

    fn retry(&mut self, sequencer: &mut RequestSequencer) -> Event {
        if !self.can_retry() {
            return Event::None;
        }
        match self.last_request.clone() {
            Some(request) => self.send(request, sequencer),
            None => Event::None,
        }
    }

    fn send(&mut self, request: UploadRequest, sequencer: &mut RequestSequencer) -> Event {
        let request_id = sequencer.issue();
        self.phase = Phase::Pending { request_id };
        Event::Send {
            request_id,
            request,
        }
    }

    fn finish(
        &mut self,
        request_id: RequestId,
        result: Result<ServiceResponse, ServiceError>,
        sequencer: &RequestSequencer,
    ) -> Event {
        if !sequencer.is_current(request_id) {
            return Event::StaleDiscarded(request_id);
        }
        match result {
            Ok(response) => {
                self.phase = Phase::Success;
                Event::Completed {
                    request_id,
                    response,
                }
            }
            Err(reason) => {
                self.phase = Phase::Failed {
                    reason: reason.clone(),
                };
                Event::Failed { request_id, reason }
            }
        }
    }

    fn reset(&mut self, ctx: &mut UpdateContext<'_>) {
        self.release(ctx.registry);
        ctx.sequencer.invalidate();
        self.preview_generation += 1;
        self.phase = Phase::Idle;
        self.file = None;
        self.kind = None;
        self.model = None;
        self.errors = ValidationErrors::default();
        self.multiple_files_rejected = false;
        self.last_request = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Issue;
    use crate::domain::media::Blob;
    use crate::media::VideoInfo;

    struct Harness {
        state: State,
        registry: ObjectUrlRegistry,
        sequencer: RequestSequencer,
    }

    impl Harness {
        fn new(variant: Variant) -> Self {
            Self {
                state: State::new(UploadSchema::new(variant, true)),
                registry: ObjectUrlRegistry::new(),
                sequencer: RequestSequencer::new(),
            }
        }

        fn send(&mut self, message: Message) -> Event {
            let mut ctx = UpdateContext {
                registry: &mut self.registry,
                sequencer: &mut self.sequencer,
            };
            self.state.update(message, &mut ctx)
        }

        fn select(&mut self, file: SelectedFile) -> Event {
            self.send(Message::FileSelected {
                file,
                source: FileSource::Dialog,
            })
        }

        fn submit(&mut self) -> RequestId {
            match self.send(Message::Submit) {
                Event::Send { request_id, .. } => request_id,
                other => panic!("expected Send, got {other:?}"),
            }
        }
    }

    fn png() -> SelectedFile {
        SelectedFile::new("haze.png", Blob::new("image/png", vec![1, 2, 3]))
    }

    fn mp4() -> SelectedFile {
        SelectedFile::new("clip.mp4", Blob::new("video/mp4", vec![0; 16]))
    }

    fn ok_response() -> Result<ServiceResponse, ServiceError> {
        Ok(ServiceResponse {
            bytes: vec![9],
            content_type: Some("image/png".into()),
        })
    }

    #[test]
    fn browse_requests_dialog() {
        let mut h = Harness::new(Variant::Combined);
        assert!(matches!(h.send(Message::BrowseRequested), Event::OpenFileDialog));
    }

    #[test]
    fn single_drop_reads_file_and_multiple_are_rejected() {
        let mut h = Harness::new(Variant::Combined);
        let event = h.send(Message::FilesDropped(vec!["a.png".into(), "b.png".into()]));
        assert!(matches!(event, Event::MultipleFilesRejected(2)));
        assert!(h.state.multiple_files_rejected());
        assert!(h.state.file().is_none());

        let event = h.send(Message::FilesDropped(vec!["a.png".into()]));
        assert!(matches!(
            event,
            Event::ReadFile { source: FileSource::DragDrop, .. }
        ));
        assert!(!h.state.multiple_files_rejected());
    }

    #[test]
    fn image_selection_requests_preview_decode() {
        let mut h = Harness::new(Variant::Combined);
        let event = h.select(png());
        let Event::DecodePreview { generation, .. } = event else {
            panic!("expected DecodePreview");
        };
        assert!(matches!(h.state.preview(), Preview::Decoding));

        let image = ImageData::from_rgba(1, 1, vec![0, 0, 0, 255]);
        h.send(Message::PreviewDecoded {
            generation,
            result: Ok(image),
        });
        assert!(matches!(h.state.preview(), Preview::Image(_)));
        assert_eq!(h.registry.live_count(), 0);
    }

    #[test]
    fn stale_preview_decode_is_ignored() {
        let mut h = Harness::new(Variant::Combined);
        let Event::DecodePreview { generation: old, .. } = h.select(png()) else {
            panic!("expected DecodePreview");
        };
        h.select(png());

        h.send(Message::PreviewDecoded {
            generation: old,
            result: Ok(ImageData::from_rgba(1, 1, vec![0; 4])),
        });
        assert!(matches!(h.state.preview(), Preview::Decoding));
    }

    #[test]
    fn failed_preview_decode_keeps_file() {
        let mut h = Harness::new(Variant::Combined);
        let Event::DecodePreview { generation, .. } = h.select(png()) else {
            panic!("expected DecodePreview");
        };
        h.send(Message::PreviewDecoded {
            generation,
            result: Err("corrupt".into()),
        });
        assert!(matches!(h.state.preview(), Preview::Unavailable));
        assert!(h.state.file().is_some());
    }

    #[test]
    fn video_preview_url_is_revoked_when_file_replaced() {
        let mut h = Harness::new(Variant::Combined);
        let Event::ExtractPoster { url, path } = h.select(mp4()) else {
            panic!("expected ExtractPoster");
        };
        assert!(path.exists());
        assert_eq!(h.registry.live_count(), 1);

        h.select(png());
        assert_eq!(h.registry.live_count(), 0);
        assert!(h.registry.resolve(&url).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn invalid_submit_reports_errors_without_sending() {
        let mut h = Harness::new(Variant::Combined);
        let event = h.send(Message::Submit);
        let Event::ValidationFailed(errors) = event else {
            panic!("expected ValidationFailed");
        };
        assert_eq!(errors.get(Field::File), Some(Issue::MissingFile));
        assert_eq!(errors.get(Field::Type), Some(Issue::InvalidType));
        assert_eq!(errors.get(Field::Model), Some(Issue::InvalidModel));
        assert_eq!(h.state.phase(), &Phase::Idle);

        h.send(Message::TypeSelected(MediaKind::Image));
        assert_eq!(h.state.errors().get(Field::Type), None);
        assert_eq!(h.state.errors().len(), 2);
    }

    #[test]
    fn unsupported_file_is_rejected_before_network() {
        let mut h = Harness::new(Variant::ImageOnly);
        h.select(SelectedFile::new("haze.gif", Blob::new("image/gif", vec![1])));
        let event = h.send(Message::Submit);
        let Event::ValidationFailed(errors) = event else {
            panic!("expected ValidationFailed");
        };
        assert_eq!(
            errors.get(Field::File).map(Issue::message).as_deref(),
            Some("Only .jpg, .jpeg, .png, .mp4 and .webp formats are supported.")
        );
    }

    #[test]
    fn valid_submit_enters_pending_and_success() {
        let mut h = Harness::new(Variant::Combined);
        h.select(mp4());
        h.send(Message::TypeSelected(MediaKind::Video));
        h.send(Message::ModelSelected(ProcessingModel::Ffa));

        let Event::Send { request_id, request } = h.send(Message::Submit) else {
            panic!("expected Send");
        };
        assert_eq!(request.kind(), MediaKind::Video);
        assert_eq!(request.model(), Some(ProcessingModel::Ffa));
        assert_eq!(h.state.phase(), &Phase::Pending { request_id });

        let event = h.send(Message::UploadFinished {
            request_id,
            result: ok_response(),
        });
        assert!(matches!(event, Event::Completed { .. }));
        assert_eq!(h.state.phase(), &Phase::Success);
    }

    #[test]
    fn second_submit_sends_again_and_supersedes_first() {
        let mut h = Harness::new(Variant::ImageOnly);
        h.select(png());
        let first = h.submit();
        let second = h.submit();
        assert_ne!(first, second);

        let event = h.send(Message::UploadFinished {
            request_id: first,
            result: ok_response(),
        });
        assert!(matches!(event, Event::StaleDiscarded(id) if id == first));
        assert_eq!(h.state.phase(), &Phase::Pending { request_id: second });

        let event = h.send(Message::UploadFinished {
            request_id: second,
            result: ok_response(),
        });
        assert!(matches!(event, Event::Completed { request_id, .. } if request_id == second));
    }

    #[test]
    fn failure_enters_failed_and_retry_resends_same_request() {
        let mut h = Harness::new(Variant::ImageOnly);
        h.select(png());
        let first = h.submit();
        h.send(Message::UploadFinished {
            request_id: first,
            result: Err(ServiceError::Status(503)),
        });
        assert_eq!(
            h.state.phase(),
            &Phase::Failed {
                reason: ServiceError::Status(503)
            }
        );
        assert!(h.state.can_retry());

        let Event::Send { request_id, request } = h.send(Message::Retry) else {
            panic!("expected Send");
        };
        assert!(request_id > first);
        assert_eq!(request.file.name, "haze.png");
    }

    #[test]
    fn permanent_failure_offers_no_retry() {
        let mut h = Harness::new(Variant::ImageOnly);
        h.select(png());
        let request_id = h.submit();
        h.send(Message::UploadFinished {
            request_id,
            result: Err(ServiceError::Rejected("unsupported codec".into())),
        });
        assert!(matches!(h.state.phase(), Phase::Failed { .. }));
        assert!(!h.state.can_retry());
        assert!(matches!(h.send(Message::Retry), Event::None));

        // A fresh submit is still possible.
        assert!(matches!(h.send(Message::Submit), Event::Send { .. }));
    }

    #[test]
    fn video_preview_becomes_playable_after_poster() {
        let mut h = Harness::new(Variant::Combined);
        let Event::ExtractPoster { url, .. } = h.select(mp4()) else {
            panic!("expected ExtractPoster");
        };
        assert!(matches!(
            h.state.preview(),
            Preview::Video { player: None, .. }
        ));

        h.send(Message::PosterExtracted {
            url,
            result: Ok(Poster {
                frame: ImageData::from_rgba(1, 1, vec![0; 4]),
                info: VideoInfo {
                    width: 1,
                    height: 1,
                    duration_secs: 5.0,
                },
            }),
        });
        let Preview::Video {
            player: Some(player),
            path,
            ..
        } = h.state.preview()
        else {
            panic!("expected a playable preview");
        };
        assert!(path.exists());
        assert!((player.duration_secs() - 5.0).abs() < f64::EPSILON);

        h.send(Message::Player(PlayerMessage::TogglePlayback));
        assert!(matches!(
            h.state.preview(),
            Preview::Video { player: Some(p), .. } if p.is_playing()
        ));
    }

    #[test]
    fn undecodable_video_has_no_player() {
        let mut h = Harness::new(Variant::Combined);
        let Event::ExtractPoster { url, .. } = h.select(mp4()) else {
            panic!("expected ExtractPoster");
        };
        h.send(Message::PosterExtracted {
            url,
            result: Err("no video stream".into()),
        });
        assert!(matches!(
            h.state.preview(),
            Preview::Video {
                poster: None,
                player: None,
                ..
            }
        ));
    }

    #[test]
    fn retry_outside_failed_phase_does_nothing() {
        let mut h = Harness::new(Variant::ImageOnly);
        assert!(matches!(h.send(Message::Retry), Event::None));
    }

    #[test]
    fn reset_clears_form_and_discards_in_flight_result() {
        let mut h = Harness::new(Variant::Combined);
        h.select(mp4());
        h.send(Message::TypeSelected(MediaKind::Video));
        h.send(Message::ModelSelected(ProcessingModel::Dcp));
        let request_id = h.submit();

        assert!(matches!(h.send(Message::Reset), Event::Reset));
        assert!(h.state.file().is_none());
        assert_eq!(h.state.kind(), None);
        assert_eq!(h.state.phase(), &Phase::Idle);
        assert_eq!(h.registry.live_count(), 0);

        let event = h.send(Message::UploadFinished {
            request_id,
            result: ok_response(),
        });
        assert!(matches!(event, Event::StaleDiscarded(_)));
        assert_eq!(h.state.phase(), &Phase::Idle);
    }

    #[test]
    fn new_file_during_pending_keeps_pending() {
        let mut h = Harness::new(Variant::ImageOnly);
        h.select(png());
        let request_id = h.submit();
        h.select(png());
        assert_eq!(h.state.phase(), &Phase::Pending { request_id });
    }
}
