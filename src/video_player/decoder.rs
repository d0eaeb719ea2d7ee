// SPDX-License-Identifier: MPL-2.0
//! Background video decoder.
//!
//! FFmpeg contexts are not `Send`, so each decoder owns a blocking thread
//! that opens the file, waits for commands and paces frames against the
//! wall clock while playing.

use crate::error::{Error, Result};
use crate::media::video::{scale_to_rgba, VideoStream};
use iced::widget::image;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long the idle loop sleeps between command checks.
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Bounded so a burst of seeks cannot queue up decoded frames.
const EVENT_CAPACITY: usize = 2;

/// One frame ready for display.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
    /// Presentation timestamp.
    pub pts_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecoderCommand {
    Play,
    Pause,
    /// Jumps to the keyframe at or before the target. While paused the
    /// decoder still emits one frame so the seek is visible.
    Seek { target_secs: f64 },
    Stop,
}

#[derive(Debug, Clone)]
pub enum DecoderEvent {
    FrameReady(DecodedFrame),
    Buffering,
    EndOfStream,
    Error(String),
}

/// Handle to a decoder thread. Dropping it closes the command channel and
/// ends the thread.
pub struct AsyncDecoder {
    command_tx: mpsc::UnboundedSender<DecoderCommand>,
    event_rx: mpsc::Receiver<DecoderEvent>,
}

impl AsyncDecoder {
    /// Spawns the decoder thread for a file on disk.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file does not exist. Problems with the
    /// stream itself arrive later as [`DecoderEvent::Error`].
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(Error::Io(format!("video file not found: {}", path.display())));
        }

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(EVENT_CAPACITY);

        tokio::task::spawn_blocking(move || {
            if let Err(error) = decode_loop(&path, command_rx, &event_tx) {
                let _ = event_tx.blocking_send(DecoderEvent::Error(error.to_string()));
            }
        });

        Ok(Self {
            command_tx,
            event_rx,
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::Io`] once the decoder thread has exited.
    pub fn send_command(&self, command: DecoderCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Io("video decoder is not running".to_string()))
    }

    /// Next event, or `None` after the decoder thread has exited.
    pub async fn recv_event(&mut self) -> Option<DecoderEvent> {
        self.event_rx.recv().await
    }
}

/// Wall-clock pacing anchored at the first frame after play or seek.
#[derive(Debug, Default)]
struct Clock {
    anchor: Option<(Instant, f64)>,
}

impl Clock {
    fn reset(&mut self) {
        self.anchor = None;
    }

    /// How long to wait before showing a frame with the given timestamp.
    fn delay_for(&mut self, pts_secs: f64, now: Instant) -> Duration {
        let (started, first_pts) = *self.anchor.get_or_insert((now, pts_secs));
        let due = started + Duration::from_secs_f64((pts_secs - first_pts).max(0.0));
        due.saturating_duration_since(now)
    }
}

fn seek_stream(stream: &mut VideoStream, target_secs: f64) -> Result<()> {
    // Input::seek works in AV_TIME_BASE units; the open range lets FFmpeg
    // land on the previous keyframe.
    #[allow(clippy::cast_possible_truncation)]
    let timestamp = (target_secs * f64::from(ffmpeg_next::ffi::AV_TIME_BASE)) as i64;
    stream
        .input
        .seek(timestamp, ..timestamp)
        .map_err(|e| Error::Io(format!("seek failed: {e}")))?;
    stream.decoder.flush();
    Ok(())
}

/// Decodes the next frame of the video stream, or `None` at end of stream.
fn next_frame(stream: &mut VideoStream) -> Result<Option<DecodedFrame>> {
    let mut decoded = ffmpeg_next::frame::Video::empty();
    let mut got_frame = false;

    for (packet_stream, packet) in stream.input.packets() {
        if packet_stream.index() != stream.index {
            continue;
        }
        if stream.decoder.send_packet(&packet).is_err() {
            continue;
        }
        if stream.decoder.receive_frame(&mut decoded).is_ok() {
            got_frame = true;
            break;
        }
    }

    if !got_frame {
        return Ok(None);
    }

    let pts_secs = decoded
        .timestamp()
        .map_or(0.0, |pts| pts as f64 * stream.time_base);
    let (width, height, pixels) = scale_to_rgba(&mut stream.scaler, &decoded)?;
    Ok(Some(DecodedFrame {
        handle: image::Handle::from_rgba(width, height, pixels),
        width,
        height,
        pts_secs,
    }))
}

fn decode_loop(
    path: &Path,
    mut command_rx: mpsc::UnboundedReceiver<DecoderCommand>,
    event_tx: &mpsc::Sender<DecoderEvent>,
) -> Result<()> {
    let mut stream = VideoStream::open(path)?;

    let mut playing = false;
    let mut single_frame = false;
    let mut position_secs = 0.0_f64;
    let mut clock = Clock::default();

    loop {
        match command_rx.try_recv() {
            Ok(DecoderCommand::Play) => {
                if !playing && position_secs > 0.0 {
                    if let Err(error) = seek_stream(&mut stream, position_secs) {
                        let _ = event_tx.blocking_send(DecoderEvent::Error(error.to_string()));
                    }
                }
                playing = true;
                clock.reset();
                let _ = event_tx.blocking_send(DecoderEvent::Buffering);
            }
            Ok(DecoderCommand::Pause) => {
                playing = false;
                clock.reset();
            }
            Ok(DecoderCommand::Seek { target_secs }) => {
                if let Err(error) = seek_stream(&mut stream, target_secs) {
                    let _ = event_tx.blocking_send(DecoderEvent::Error(error.to_string()));
                } else {
                    position_secs = target_secs;
                    clock.reset();
                    single_frame = !playing;
                    let _ = event_tx.blocking_send(DecoderEvent::Buffering);
                }
            }
            Ok(DecoderCommand::Stop) | Err(mpsc::error::TryRecvError::Disconnected) => break,
            Err(mpsc::error::TryRecvError::Empty) => {}
        }

        if !playing && !single_frame {
            std::thread::sleep(IDLE_POLL);
            continue;
        }

        match next_frame(&mut stream)? {
            Some(frame) => {
                if playing {
                    let wait = clock.delay_for(frame.pts_secs, Instant::now());
                    if !wait.is_zero() {
                        std::thread::sleep(wait);
                    }
                }
                position_secs = frame.pts_secs;
                single_frame = false;
                if event_tx
                    .blocking_send(DecoderEvent::FrameReady(frame))
                    .is_err()
                {
                    break;
                }
            }
            None => {
                playing = false;
                single_frame = false;
                clock.reset();
                let _ = event_tx.blocking_send(DecoderEvent::EndOfStream);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_paces_frames_from_first_timestamp() {
        let mut clock = Clock::default();
        let start = Instant::now();
        assert_eq!(clock.delay_for(10.0, start), Duration::ZERO);
        assert_eq!(clock.delay_for(10.5, start), Duration::from_millis(500));

        // Late frames are shown immediately.
        let later = start + Duration::from_secs(2);
        assert_eq!(clock.delay_for(11.0, later), Duration::ZERO);
    }

    #[test]
    fn clock_reset_reanchors() {
        let mut clock = Clock::default();
        let start = Instant::now();
        clock.delay_for(1.0, start);
        clock.reset();
        assert_eq!(clock.delay_for(30.0, start), Duration::ZERO);
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        assert!(matches!(
            AsyncDecoder::new("/nonexistent/clip.mp4"),
            Err(Error::Io(_))
        ));
    }

    #[tokio::test]
    async fn garbage_file_reports_error_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.mp4");
        std::fs::write(&path, b"not a video").expect("write");

        let mut decoder = AsyncDecoder::new(&path).expect("decoder should spawn");
        let event = tokio::time::timeout(Duration::from_secs(5), decoder.recv_event())
            .await
            .expect("decoder should answer");
        assert!(matches!(event, Some(DecoderEvent::Error(_))));
    }
}
