// SPDX-License-Identifier: MPL-2.0
//! Iced subscription driving one decoder per playback session.

use super::decoder::{AsyncDecoder, DecodedFrame, DecoderCommand, DecoderEvent};
use iced::futures::SinkExt;
use iced::{stream, Subscription};
use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;

const OUTPUT_CAPACITY: usize = 100;

/// Identity of a playback subscription. Changing either field tears the
/// old decoder down and starts a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaybackKey {
    pub session: u64,
    pub path: PathBuf,
}

/// Cloneable handle the UI uses to steer the decoder.
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<DecoderCommand>,
}

impl CommandSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<DecoderCommand>) -> Self {
        Self { tx }
    }

    /// # Errors
    ///
    /// Fails once the subscription has been dropped.
    pub fn send(&self, command: DecoderCommand) -> Result<(), String> {
        self.tx
            .send(command)
            .map_err(|_| "video playback is not running".to_string())
    }
}

impl fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSender")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    Started(CommandSender),
    Frame(DecodedFrame),
    Buffering,
    EndOfStream,
    Error(String),
}

/// An event tagged with the session that produced it, so a player can drop
/// late events from a decoder it no longer owns.
#[derive(Debug, Clone)]
pub struct PlaybackMessage {
    pub session: u64,
    pub event: PlaybackEvent,
}

impl From<DecoderEvent> for PlaybackEvent {
    fn from(event: DecoderEvent) -> Self {
        match event {
            DecoderEvent::FrameReady(frame) => PlaybackEvent::Frame(frame),
            DecoderEvent::Buffering => PlaybackEvent::Buffering,
            DecoderEvent::EndOfStream => PlaybackEvent::EndOfStream,
            DecoderEvent::Error(message) => PlaybackEvent::Error(message),
        }
    }
}

/// Opens the file behind `key` and streams its playback events.
///
/// The first event is always [`PlaybackEvent::Started`] (or an error); the
/// decoder then idles until it receives a command.
pub fn playback(key: PlaybackKey) -> Subscription<PlaybackMessage> {
    let PlaybackKey { session, path } = key.clone();
    Subscription::run_with_id(
        key,
        stream::channel(OUTPUT_CAPACITY, move |mut output| async move {
            let tag = |event: PlaybackEvent| PlaybackMessage { session, event };

            let mut decoder = match AsyncDecoder::new(&path) {
                Ok(decoder) => decoder,
                Err(error) => {
                    let _ = output.send(tag(PlaybackEvent::Error(error.to_string()))).await;
                    std::future::pending::<()>().await;
                    return;
                }
            };

            let (tx, mut commands) = mpsc::unbounded_channel();
            let _ = output
                .send(tag(PlaybackEvent::Started(CommandSender::new(tx))))
                .await;

            loop {
                tokio::select! {
                    command = commands.recv() => {
                        let Some(command) = command else { break };
                        if let Err(error) = decoder.send_command(command) {
                            let _ = output.send(tag(PlaybackEvent::Error(error.to_string()))).await;
                        }
                    }
                    event = decoder.recv_event() => {
                        let Some(event) = event else { break };
                        if output.send(tag(event.into())).await.is_err() {
                            break;
                        }
                    }
                }
            }

            // Iced owns the stream's lifetime; park until it is dropped.
            std::future::pending::<()>().await;
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash(key: &PlaybackKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn keys_differ_by_session_and_path() {
        let base = PlaybackKey {
            session: 1,
            path: PathBuf::from("/tmp/a.mp4"),
        };
        let next_session = PlaybackKey {
            session: 2,
            ..base.clone()
        };
        let other_path = PlaybackKey {
            path: PathBuf::from("/tmp/b.mp4"),
            ..base.clone()
        };
        assert_eq!(hash(&base), hash(&base.clone()));
        assert_ne!(hash(&base), hash(&next_session));
        assert_ne!(hash(&base), hash(&other_path));
    }

    #[test]
    fn decoder_events_map_to_playback_events() {
        assert!(matches!(
            PlaybackEvent::from(DecoderEvent::EndOfStream),
            PlaybackEvent::EndOfStream
        ));
        assert!(matches!(
            PlaybackEvent::from(DecoderEvent::Error("boom".into())),
            PlaybackEvent::Error(message) if message == "boom"
        ));
    }

    #[test]
    fn sender_reports_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = CommandSender::new(tx);
        assert!(sender.send(DecoderCommand::Play).is_ok());
        drop(rx);
        assert!(sender.send(DecoderCommand::Pause).is_err());
    }
}
