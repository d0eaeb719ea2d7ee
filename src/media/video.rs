// SPDX-License-Identifier: MPL-2.0
//! Opening video streams and extracting poster frames for previews and
//! results.

use crate::error::{PosterError, Result};
use crate::media::ImageData;
use std::path::Path;
use std::sync::Once;

static FFMPEG_INIT: Once = Once::new();

/// Initializes FFmpeg once and lowers its log level to errors only.
pub fn init_ffmpeg() -> Result<()> {
    let mut init_result: Result<()> = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            let message = format!("FFmpeg initialization failed: {e}");
            init_result = Err(PosterError::Other(message).into());
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Basic stream facts shown next to a video result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
}

/// A decoded first frame plus the stream facts read along the way.
#[derive(Debug, Clone)]
pub struct Poster {
    pub frame: ImageData,
    pub info: VideoInfo,
}

fn video_error(context: &str, err: impl std::fmt::Display) -> PosterError {
    PosterError::classify(&format!("{context}: {err}"))
}

/// The best video stream of a container, opened with a decoder and an RGBA
/// scaler. Shared by poster extraction and the playback decoder.
pub(crate) struct VideoStream {
    pub input: ffmpeg_next::format::context::Input,
    pub index: usize,
    pub decoder: ffmpeg_next::decoder::Video,
    pub scaler: ffmpeg_next::software::scaling::Context,
    /// Seconds per stream timestamp tick.
    pub time_base: f64,
    pub info: VideoInfo,
}

impl VideoStream {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        init_ffmpeg()?;

        let input =
            ffmpeg_next::format::input(&path).map_err(|e| video_error("Failed to open video", e))?;

        let (index, time_base, stream_duration, parameters) = {
            let stream = input
                .streams()
                .best(ffmpeg_next::media::Type::Video)
                .ok_or(PosterError::NoVideoStream)?;
            let rational = stream.time_base();
            let time_base =
                f64::from(rational.numerator()) / f64::from(rational.denominator());
            (stream.index(), time_base, stream.duration(), stream.parameters())
        };

        // Some muxers only record the container duration, in AV_TIME_BASE units.
        let duration_secs = if stream_duration > 0 {
            stream_duration as f64 * time_base
        } else if input.duration() > 0 {
            input.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
        } else {
            0.0
        };

        let context = ffmpeg_next::codec::context::Context::from_parameters(parameters)
            .map_err(|e| video_error("Failed to create decoder context", e))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| video_error("Failed to create video decoder", e))?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(PosterError::Corrupted.into());
        }

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| video_error("Failed to create scaler", e))?;

        Ok(Self {
            input,
            index,
            decoder,
            scaler,
            time_base,
            info: VideoInfo {
                width,
                height,
                duration_secs,
            },
        })
    }
}

/// Runs the scaler on a decoded frame and returns `(width, height, rgba)`
/// with row padding removed.
pub(crate) fn scale_to_rgba(
    scaler: &mut ffmpeg_next::software::scaling::Context,
    decoded: &ffmpeg_next::frame::Video,
) -> Result<(u32, u32, Vec<u8>)> {
    let mut rgba_frame = ffmpeg_next::frame::Video::empty();
    scaler
        .run(decoded, &mut rgba_frame)
        .map_err(|e| video_error("Frame scaler failed", e))?;
    if rgba_frame.data(0).is_empty() {
        return Err(PosterError::NoFrame("scaler produced no data".to_string()).into());
    }
    let width = rgba_frame.width();
    let height = rgba_frame.height();
    let pixels = copy_rows(rgba_frame.data(0), rgba_frame.stride(0), width, height);
    Ok((width, height, pixels))
}

/// Decodes the first frame of a video file into RGBA.
///
/// # Errors
///
/// Returns [`PosterError`] when the file has no video stream or no frame can
/// be decoded.
pub fn extract_poster<P: AsRef<Path>>(path: P) -> Result<Poster> {
    let VideoStream {
        mut input,
        index,
        mut decoder,
        mut scaler,
        info,
        ..
    } = VideoStream::open(path.as_ref())?;

    let mut decoded = ffmpeg_next::frame::Video::empty();
    let mut got_frame = false;

    for (stream, packet) in input.packets() {
        if stream.index() != index {
            continue;
        }
        decoder
            .send_packet(&packet)
            .map_err(|e| video_error("Packet send failed", e))?;
        if decoder.receive_frame(&mut decoded).is_ok() {
            got_frame = true;
            break;
        }
    }

    if !got_frame {
        // Short clips may only yield their frame once the decoder is drained.
        decoder
            .send_eof()
            .map_err(|e| video_error("Decoder flush failed", e))?;
        got_frame = decoder.receive_frame(&mut decoded).is_ok();
    }

    if !got_frame {
        return Err(PosterError::NoFrame("decoder drained".to_string()).into());
    }

    let (width, height, pixels) = scale_to_rgba(&mut scaler, &decoded)?;
    Ok(Poster {
        frame: ImageData::from_rgba(width, height, pixels),
        info,
    })
}

/// Copies tightly packed RGBA rows out of a strided plane.
fn copy_rows(data: &[u8], stride: usize, width: u32, height: u32) -> Vec<u8> {
    let row_len = width as usize * 4;
    let mut out = Vec::with_capacity(row_len * height as usize);
    for y in 0..height as usize {
        let start = y * stride;
        out.extend_from_slice(&data[start..start + row_len]);
    }
    out
}
