// SPDX-License-Identifier: MPL-2.0
//! Silent playback of video files on disk.
//!
//! Previews and results live in memory behind object URLs; the registry
//! materializes them into temp files and a [`Player`] plays that file. Each
//! player owns one decoder thread, reached through an iced subscription.

mod decoder;
mod state;
mod subscription;

pub use decoder::{AsyncDecoder, DecodedFrame, DecoderCommand, DecoderEvent};
pub use state::{PlaybackState, Player, PlayerMessage};
pub use subscription::{playback, CommandSender, PlaybackEvent, PlaybackKey, PlaybackMessage};
