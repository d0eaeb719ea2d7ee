// SPDX-License-Identifier: MPL-2.0
//! Playback state machine for one video.
//!
//! ```text
//!   Stopped ──play──▶ Buffering ──frame──▶ Playing ──pause──▶ Paused
//!                                             ▲                 │
//!                                             └──────play───────┘
//!   any ──seek──▶ Seeking ──frame──▶ Playing or Paused
//! ```
//!
//! The player never decodes anything itself. It remembers what the user
//! asked for, forwards commands to the decoder once the subscription has
//! started, and folds decoder events back into its state.

use super::decoder::{DecodedFrame, DecoderCommand};
use super::subscription::{self, CommandSender, PlaybackEvent, PlaybackKey, PlaybackMessage};
use iced::Subscription;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Positions closer than this to the end count as "at the end".
const END_TOLERANCE_SECS: f64 = 0.1;

/// A frame this close to a dragged seek target ends the drag preview.
const SEEK_SETTLE_SECS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    /// Nothing decoded yet.
    Stopped,
    Playing {
        position_secs: f64,
    },
    Paused {
        position_secs: f64,
    },
    Seeking {
        target_secs: f64,
        resume_playing: bool,
    },
    Buffering {
        position_secs: f64,
    },
    Error {
        message: String,
    },
}

impl PlaybackState {
    #[must_use]
    pub fn position(&self) -> Option<f64> {
        match self {
            Self::Stopped => Some(0.0),
            Self::Playing { position_secs }
            | Self::Paused { position_secs }
            | Self::Buffering { position_secs } => Some(*position_secs),
            Self::Seeking { target_secs, .. } => Some(*target_secs),
            Self::Error { .. } => None,
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. } | Self::Buffering { .. })
    }

    /// Playing now, or about to resume once a seek lands.
    fn will_play(&self) -> bool {
        match self {
            Self::Seeking { resume_playing, .. } => *resume_playing,
            other => other.is_playing(),
        }
    }
}

/// Messages from the playback controls and the decoder subscription.
#[derive(Debug, Clone)]
pub enum PlayerMessage {
    TogglePlayback,
    /// Slider dragged; only moves the handle.
    SeekPreview(f64),
    /// Slider released; seeks to the previewed position.
    SeekCommit,
    Playback(PlaybackMessage),
}

/// One playable video file on disk.
#[derive(Debug)]
pub struct Player {
    key: PlaybackKey,
    duration_secs: f64,
    state: PlaybackState,
    frame: Option<DecodedFrame>,
    seek_preview: Option<f64>,
    commands: Option<CommandSender>,
}

impl Player {
    /// Every player gets its own session, so showing the same file twice
    /// still starts a fresh decoder.
    #[must_use]
    pub fn new(path: PathBuf, duration_secs: f64) -> Self {
        Self {
            key: PlaybackKey {
                session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
                path,
            },
            duration_secs: duration_secs.max(0.0),
            state: PlaybackState::Stopped,
            frame: None,
            seek_preview: None,
            commands: None,
        }
    }

    pub fn subscription(&self) -> Subscription<PlayerMessage> {
        subscription::playback(self.key.clone()).map(PlayerMessage::Playback)
    }

    #[must_use]
    pub fn session(&self) -> u64 {
        self.key.session
    }

    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Latest decoded frame, if any arrived yet.
    #[must_use]
    pub fn frame(&self) -> Option<&DecodedFrame> {
        self.frame.as_ref()
    }

    /// Where the timeline handle sits: the drag preview while dragging,
    /// otherwise the playback position.
    #[must_use]
    pub fn timeline_position(&self) -> f64 {
        self.seek_preview
            .or_else(|| self.state.position())
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.will_play()
    }

    pub fn update(&mut self, message: PlayerMessage) {
        match message {
            PlayerMessage::TogglePlayback => {
                if self.is_playing() {
                    self.pause();
                } else {
                    self.play();
                }
            }
            PlayerMessage::SeekPreview(target_secs) => {
                self.seek_preview = Some(target_secs.clamp(0.0, self.duration_secs));
            }
            PlayerMessage::SeekCommit => {
                if let Some(target_secs) = self.seek_preview {
                    self.seek(target_secs);
                }
            }
            PlayerMessage::Playback(PlaybackMessage { session, event }) => {
                if session == self.key.session {
                    self.apply(event);
                }
            }
        }
    }

    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Stopped => {
                self.state = PlaybackState::Buffering { position_secs: 0.0 };
            }
            PlaybackState::Paused { position_secs } => {
                let at_end = self.duration_secs - position_secs < END_TOLERANCE_SECS;
                if self.duration_secs > 0.0 && at_end {
                    self.seek_to(0.0, true);
                    return;
                }
                self.state = PlaybackState::Buffering { position_secs };
            }
            _ => return,
        }
        self.send(DecoderCommand::Play);
    }

    pub fn pause(&mut self) {
        match self.state {
            PlaybackState::Playing { position_secs }
            | PlaybackState::Buffering { position_secs } => {
                self.state = PlaybackState::Paused { position_secs };
                self.send(DecoderCommand::Pause);
            }
            PlaybackState::Seeking { target_secs, .. } => {
                self.state = PlaybackState::Seeking {
                    target_secs,
                    resume_playing: false,
                };
                self.send(DecoderCommand::Pause);
            }
            _ => {}
        }
    }

    /// Seeks within `[0, duration]`, keeping the current play/pause intent.
    pub fn seek(&mut self, target_secs: f64) {
        let resume = self.state.will_play();
        self.seek_to(target_secs, resume);
    }

    fn seek_to(&mut self, target_secs: f64, resume_playing: bool) {
        let target_secs = target_secs.clamp(0.0, self.duration_secs);
        self.state = PlaybackState::Seeking {
            target_secs,
            resume_playing,
        };
        self.send(DecoderCommand::Seek { target_secs });
        if resume_playing {
            self.send(DecoderCommand::Play);
        }
    }

    fn apply(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Started(commands) => {
                self.commands = Some(commands);
                // Decode the first frame right away so the controls have
                // something to show; replay whatever was asked before start.
                match self.state.clone() {
                    PlaybackState::Stopped => self.seek_to(0.0, false),
                    PlaybackState::Seeking {
                        target_secs,
                        resume_playing,
                    } => self.seek_to(target_secs, resume_playing),
                    PlaybackState::Buffering { .. } => self.send(DecoderCommand::Play),
                    _ => {}
                }
            }
            PlaybackEvent::Frame(frame) => {
                let position_secs = frame.pts_secs;
                self.frame = Some(frame);
                if self
                    .seek_preview
                    .is_some_and(|target| (target - position_secs).abs() < SEEK_SETTLE_SECS)
                {
                    self.seek_preview = None;
                }
                self.state = match self.state {
                    PlaybackState::Playing { .. } | PlaybackState::Buffering { .. } => {
                        PlaybackState::Playing { position_secs }
                    }
                    PlaybackState::Seeking {
                        resume_playing: true,
                        ..
                    } => PlaybackState::Playing { position_secs },
                    PlaybackState::Seeking {
                        resume_playing: false,
                        ..
                    }
                    | PlaybackState::Stopped => PlaybackState::Paused { position_secs },
                    ref other => other.clone(),
                };
            }
            PlaybackEvent::Buffering => {
                if let PlaybackState::Playing { position_secs } = self.state {
                    self.state = PlaybackState::Buffering { position_secs };
                }
            }
            PlaybackEvent::EndOfStream => {
                let position_secs = self
                    .frame
                    .as_ref()
                    .map_or(self.duration_secs, |frame| frame.pts_secs.max(self.duration_secs));
                self.duration_secs = position_secs;
                self.state = PlaybackState::Paused { position_secs };
                self.seek_preview = None;
            }
            PlaybackEvent::Error(message) => {
                self.state = PlaybackState::Error { message };
                self.seek_preview = None;
            }
        }
    }

    fn send(&self, command: DecoderCommand) {
        if let Some(commands) = &self.commands {
            // A closed channel means the subscription is being torn down.
            let _ = commands.send(command);
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.send(DecoderCommand::Stop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::widget::image;
    use tokio::sync::mpsc;

    fn player(duration_secs: f64) -> Player {
        Player::new(PathBuf::from("/tmp/clip.mp4"), duration_secs)
    }

    /// Attaches a command channel the way the subscription would.
    fn started(player: &mut Player) -> mpsc::UnboundedReceiver<DecoderCommand> {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = player.session();
        player.update(PlayerMessage::Playback(PlaybackMessage {
            session,
            event: PlaybackEvent::Started(CommandSender::new(tx)),
        }));
        rx
    }

    fn frame_at(player: &mut Player, pts_secs: f64) {
        let session = player.session();
        player.update(PlayerMessage::Playback(PlaybackMessage {
            session,
            event: PlaybackEvent::Frame(DecodedFrame {
                handle: image::Handle::from_rgba(1, 1, vec![0; 4]),
                width: 1,
                height: 1,
                pts_secs,
            }),
        }));
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<DecoderCommand>) -> Vec<DecoderCommand> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn sessions_are_unique() {
        assert_ne!(player(1.0).session(), player(1.0).session());
    }

    #[test]
    fn start_decodes_first_frame_while_paused() {
        let mut p = player(10.0);
        let mut rx = started(&mut p);
        assert_eq!(drain(&mut rx), vec![DecoderCommand::Seek { target_secs: 0.0 }]);

        frame_at(&mut p, 0.0);
        assert_eq!(p.state(), &PlaybackState::Paused { position_secs: 0.0 });
        assert!(p.frame().is_some());
    }

    #[test]
    fn play_before_start_is_replayed_on_start() {
        let mut p = player(10.0);
        p.update(PlayerMessage::TogglePlayback);
        assert!(p.is_playing());

        let mut rx = started(&mut p);
        assert_eq!(drain(&mut rx), vec![DecoderCommand::Play]);
    }

    #[test]
    fn toggle_plays_and_pauses() {
        let mut p = player(10.0);
        let mut rx = started(&mut p);
        frame_at(&mut p, 0.0);
        drain(&mut rx);

        p.update(PlayerMessage::TogglePlayback);
        frame_at(&mut p, 1.5);
        assert_eq!(p.state(), &PlaybackState::Playing { position_secs: 1.5 });

        p.update(PlayerMessage::TogglePlayback);
        assert_eq!(p.state(), &PlaybackState::Paused { position_secs: 1.5 });
        assert_eq!(
            drain(&mut rx),
            vec![DecoderCommand::Play, DecoderCommand::Pause]
        );
    }

    #[test]
    fn seek_is_clamped_and_keeps_intent() {
        let mut p = player(10.0);
        let mut rx = started(&mut p);
        frame_at(&mut p, 0.0);
        drain(&mut rx);

        p.update(PlayerMessage::SeekPreview(42.0));
        assert!((p.timeline_position() - 10.0).abs() < f64::EPSILON);
        p.update(PlayerMessage::SeekCommit);
        assert_eq!(
            p.state(),
            &PlaybackState::Seeking {
                target_secs: 10.0,
                resume_playing: false
            }
        );
        assert_eq!(drain(&mut rx), vec![DecoderCommand::Seek { target_secs: 10.0 }]);

        frame_at(&mut p, 9.8);
        assert_eq!(p.state(), &PlaybackState::Paused { position_secs: 9.8 });
    }

    #[test]
    fn seek_while_playing_resumes() {
        let mut p = player(10.0);
        let mut rx = started(&mut p);
        frame_at(&mut p, 0.0);
        p.play();
        frame_at(&mut p, 0.5);
        drain(&mut rx);

        p.seek(-3.0);
        assert_eq!(
            drain(&mut rx),
            vec![
                DecoderCommand::Seek { target_secs: 0.0 },
                DecoderCommand::Play
            ]
        );
        frame_at(&mut p, 0.0);
        assert!(matches!(p.state(), PlaybackState::Playing { .. }));
    }

    #[test]
    fn play_at_end_restarts_from_beginning() {
        let mut p = player(4.0);
        let mut rx = started(&mut p);
        frame_at(&mut p, 0.0);
        p.play();
        frame_at(&mut p, 3.96);
        let session = p.session();
        p.update(PlayerMessage::Playback(PlaybackMessage {
            session,
            event: PlaybackEvent::EndOfStream,
        }));
        assert_eq!(p.state(), &PlaybackState::Paused { position_secs: 4.0 });
        drain(&mut rx);

        p.play();
        assert_eq!(
            drain(&mut rx),
            vec![
                DecoderCommand::Seek { target_secs: 0.0 },
                DecoderCommand::Play
            ]
        );
    }

    #[test]
    fn events_from_other_sessions_are_ignored() {
        let mut p = player(10.0);
        let stale = p.session() + 1000;
        p.update(PlayerMessage::Playback(PlaybackMessage {
            session: stale,
            event: PlaybackEvent::Error("old decoder".into()),
        }));
        assert_eq!(p.state(), &PlaybackState::Stopped);
    }

    #[test]
    fn decoder_error_is_kept() {
        let mut p = player(10.0);
        let session = p.session();
        p.update(PlayerMessage::Playback(PlaybackMessage {
            session,
            event: PlaybackEvent::Error("no video stream".into()),
        }));
        assert_eq!(
            p.state(),
            &PlaybackState::Error {
                message: "no video stream".to_string()
            }
        );
        assert!(!p.is_playing());
    }

    #[test]
    fn dropping_player_stops_decoder() {
        let mut p = player(10.0);
        let mut rx = started(&mut p);
        drain(&mut rx);
        drop(p);
        assert_eq!(drain(&mut rx), vec![DecoderCommand::Stop]);
    }
}
