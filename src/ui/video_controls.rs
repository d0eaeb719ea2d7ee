// SPDX-License-Identifier: MPL-2.0
//! Playback surface shared by the upload preview and the result viewer.
//!
//! Shows the latest decoded frame (or the poster until one arrives) above
//! a toolbar with play/pause, a timeline and the elapsed time.

use crate::i18n::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::video_player::{PlaybackState, Player, PlayerMessage};
use iced::widget::{button, image, slider, text, Column, Row, Text};
use iced::{alignment, ContentFit, Element, Length, Theme};

/// Millisecond steps keep the handle smooth on long clips.
const SLIDER_STEP_SECS: f64 = 0.001;

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    /// Shown until the decoder delivers its first frame.
    pub poster: Option<&'a image::Handle>,
    pub height: Length,
}

/// Formats seconds as `m:ss`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to >= 0 first
#[must_use]
pub fn format_time(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn view<'a>(player: &'a Player, ctx: ViewContext<'a>) -> Element<'a, PlayerMessage> {
    let i18n = ctx.i18n;

    let shown = player.frame().map(|frame| &frame.handle).or(ctx.poster);
    let screen: Element<'a, PlayerMessage> = match shown {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(ctx.height)
            .into(),
        None => Text::new("…").size(typography::TITLE_MD).into(),
    };

    let failed = matches!(player.state(), PlaybackState::Error { .. });
    let toggle_key = if player.is_playing() {
        "video-pause"
    } else {
        "video-play"
    };
    let toggle = button(Text::new(i18n.tr(toggle_key)).size(typography::CAPTION))
        .on_press_maybe((!failed).then_some(PlayerMessage::TogglePlayback))
        .padding([spacing::XXS, spacing::SM]);

    let duration = player.duration_secs();
    let position = player.timeline_position().min(duration);
    let timeline = slider(0.0..=duration, position, PlayerMessage::SeekPreview)
        .on_release(PlayerMessage::SeekCommit)
        .step(SLIDER_STEP_SECS)
        .width(Length::Fill);

    let clock = Text::new(format!("{} / {}", format_time(position), format_time(duration)))
        .size(typography::CAPTION);

    let toolbar = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(toggle)
        .push(timeline)
        .push(clock);

    let mut column = Column::new()
        .spacing(spacing::XS)
        .align_x(alignment::Horizontal::Center)
        .push(screen)
        .push(toolbar);

    if let PlaybackState::Error { message } = player.state() {
        let detail = i18n.tr_with_args("video-playback-error", &[("detail", message.as_str())]);
        column = column.push(
            Text::new(detail)
                .size(typography::CAPTION)
                .style(|_theme: &Theme| text::Style {
                    color: Some(palette::ERROR_500),
                }),
        );
    }

    column.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn times_are_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.4), "1:05");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(600.0), "10:00");
    }

    #[test]
    fn controls_render_before_first_frame() {
        let i18n = I18n::new(Some("en-US".to_string()), None);
        let player = Player::new(PathBuf::from("/tmp/clip.mp4"), 12.0);
        let _element = view(
            &player,
            ViewContext {
                i18n: &i18n,
                poster: None,
                height: Length::Fill,
            },
        );
    }

    #[test]
    fn playback_labels_are_translated() {
        for locale in ["en-US", "fr"] {
            let i18n = I18n::new(Some(locale.to_string()), None);
            for key in ["video-play", "video-pause"] {
                assert!(!i18n.tr(key).starts_with("MISSING"), "{locale}: {key}");
            }
        }
    }
}
