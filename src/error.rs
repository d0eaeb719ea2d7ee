// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.
//!
//! Variants carry rendered messages rather than source errors so that
//! results can travel inside iced messages, which must be `Clone`.

use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    /// Reading or writing a local file failed.
    Io(String),
    /// `settings.toml` could not be parsed or written.
    Config(String),
    /// Image bytes could not be decoded.
    Decode(String),
    /// A video poster frame could not be extracted.
    Poster(PosterError),
    /// The HTTP client could not be built.
    Http(String),
}

/// Why a poster frame could not be pulled out of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterError {
    /// The container holds no video stream, or is not a container at all.
    NoVideoStream,
    /// The stream reports zero dimensions or malformed data.
    Corrupted,
    /// Packets were read but no frame came out of the decoder.
    NoFrame(String),
    Other(String),
}

impl PosterError {
    /// Buckets an ffmpeg message.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("no video stream") || lower.contains("invalid data found") {
            PosterError::NoVideoStream
        } else if lower.contains("corrupt") || lower.contains("malformed") {
            PosterError::Corrupted
        } else if ["decode", "decoder", "packet", "scaler"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            PosterError::NoFrame(message.to_string())
        } else {
            PosterError::Other(message.to_string())
        }
    }
}

impl fmt::Display for PosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PosterError::NoVideoStream => f.write_str("no video stream"),
            PosterError::Corrupted => f.write_str("video stream is corrupted"),
            PosterError::NoFrame(detail) => write!(f, "no frame decoded: {detail}"),
            PosterError::Other(detail) => f.write_str(detail),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "file access failed: {e}"),
            Error::Config(e) => write!(f, "invalid settings: {e}"),
            Error::Decode(e) => write!(f, "image decoding failed: {e}"),
            Error::Poster(e) => write!(f, "poster extraction failed: {e}"),
            Error::Http(e) => write!(f, "HTTP client unavailable: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<PosterError> for Error {
    fn from(err: PosterError) -> Self {
        Error::Poster(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
