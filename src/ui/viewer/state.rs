// SPDX-License-Identifier: MPL-2.0
//! Viewer state: the current content plus its decoded pixels.

use super::content::Content;
use crate::domain::media::{ObjectUrl, Variant};
use crate::domain::upload::UploadResult;
use crate::media::{ImageData, Poster};
use crate::video_player::{Player, PlayerMessage};
use iced::Subscription;
use std::path::PathBuf;

/// Decoded form of the current content.
#[derive(Debug, Default)]
pub enum Visual {
    #[default]
    Loading,
    Image(ImageData),
    /// `player` is present when the content asks for playback controls.
    Video {
        poster: Poster,
        player: Option<Player>,
    },
    /// The result blob could not be decoded; it can still be saved.
    Unavailable,
}

#[derive(Debug, Clone)]
pub enum Message {
    SaveRequested,
    ResultDecoded {
        url: ObjectUrl,
        result: Result<ImageData, String>,
    },
    /// `path` is the materialized file the player will read.
    PosterExtracted {
        url: ObjectUrl,
        path: PathBuf,
        result: Result<Poster, String>,
    },
    Player(PlayerMessage),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    None,
    SaveResult(ObjectUrl),
}

#[derive(Debug, Default)]
pub struct State {
    content: Content,
    visual: Visual,
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    /// Playback events for the result video, if one is showing.
    pub fn subscription(&self) -> Subscription<Message> {
        match &self.visual {
            Visual::Video {
                player: Some(player),
                ..
            } => player.subscription().map(Message::Player),
            _ => Subscription::none(),
        }
    }

    /// Re-renders from a store snapshot.
    ///
    /// Returns the new content when it changed, so the caller can start
    /// decoding it.
    pub fn sync(&mut self, snapshot: &UploadResult, variant: Variant) -> Option<&Content> {
        let content = Content::from_store(snapshot, variant);
        if content == self.content {
            return None;
        }
        self.content = content;
        self.visual = Visual::Loading;
        Some(&self.content)
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::SaveRequested => self
                .content
                .url()
                .map_or(Event::None, |url| Event::SaveResult(url.clone())),
            Message::ResultDecoded { url, result } => {
                if matches!(&self.content, Content::Image { url: current } if *current == url) {
                    self.visual = result.map_or(Visual::Unavailable, Visual::Image);
                }
                Event::None
            }
            Message::PosterExtracted { url, path, result } => {
                if let Content::Video {
                    url: current,
                    controls,
                } = &self.content
                {
                    if *current == url {
                        self.visual = match result {
                            Ok(poster) => {
                                let player = controls
                                    .then(|| Player::new(path, poster.info.duration_secs));
                                Visual::Video { poster, player }
                            }
                            Err(_) => Visual::Unavailable,
                        };
                    }
                }
                Event::None
            }
            Message::Player(message) => {
                if let Visual::Video {
                    player: Some(player),
                    ..
                } = &mut self.visual
                {
                    player.update(message);
                }
                Event::None
            }
        }
    }
}
