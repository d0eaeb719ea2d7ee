// SPDX-License-Identifier: MPL-2.0
//! Button styles.

use crate::ui::design_tokens::{
    palette::{self, WHITE},
    radius, shadow,
};
use iced::widget::button;
use iced::{Background, Border, Theme};

/// Main call to action (submit, retry).
pub fn primary(theme: &Theme, status: button::Status) -> button::Style {
    let (background, border_color, elevation) = match status {
        button::Status::Hovered => (palette::PRIMARY_400, palette::PRIMARY_500, shadow::MD),
        button::Status::Pressed => (palette::PRIMARY_600, palette::PRIMARY_700, shadow::SM),
        button::Status::Active => (palette::PRIMARY_500, palette::PRIMARY_600, shadow::SM),
        button::Status::Disabled => return disabled(theme, status),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color: WHITE,
        border: Border {
            color: border_color,
            width: 1.0,
            radius: radius::SM.into(),
        },
        shadow: elevation,
        snap: true,
    }
}

/// Greyed out and non-interactive, adapted to the current theme.
pub fn disabled(theme: &Theme, _status: button::Status) -> button::Style {
    let is_dark = theme.extended_palette().is_dark;
    button::Style {
        background: Some(Background::Color(if is_dark {
            palette::GRAY_700
        } else {
            palette::GRAY_200
        })),
        text_color: palette::GRAY_400,
        border: Border {
            color: palette::GRAY_400,
            width: 1.0,
            radius: radius::SM.into(),
        },
        shadow: shadow::NONE,
        snap: true,
    }
}

/// Destructive action (reset).
pub fn danger(theme: &Theme, status: button::Status) -> button::Style {
    let mut style = button::secondary(theme, status);
    if matches!(status, button::Status::Hovered) {
        style.background = Some(Background::Color(palette::ERROR_500));
        style.text_color = WHITE;
    }
    style.border.radius = radius::SM.into();
    style
}
