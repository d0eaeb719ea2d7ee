// SPDX-License-Identifier: MPL-2.0
//! Theme selection and the matching color scheme.

use crate::ui::design_tokens::palette;
use iced::theme::Palette;
use iced::{Color, Theme};
use serde::{Deserialize, Serialize};

/// Semantic colors used by the custom styles.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub surface: Color,
    pub surface_raised: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub brand: Color,
    pub drop_zone: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub info: Color,
}

impl ColorScheme {
    #[must_use]
    pub fn light() -> Self {
        Self {
            surface: palette::WHITE,
            surface_raised: palette::GRAY_100,
            text_primary: palette::GRAY_900,
            text_muted: palette::GRAY_700,
            brand: palette::PRIMARY_600,
            drop_zone: palette::HAZE,
            error: palette::ERROR_500,
            warning: palette::WARNING_500,
            success: palette::SUCCESS_500,
            info: palette::INFO_500,
        }
    }

    #[must_use]
    pub fn dark() -> Self {
        Self {
            surface: palette::GRAY_900,
            surface_raised: palette::GRAY_800,
            text_primary: palette::WHITE,
            text_muted: palette::GRAY_200,
            brand: palette::PRIMARY_400,
            drop_zone: palette::GRAY_700,
            error: palette::ERROR_500,
            warning: palette::WARNING_500,
            success: palette::SUCCESS_500,
            info: palette::INFO_500,
        }
    }
}

/// User preference for light or dark rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    /// Returns true if the effective theme is dark.
    /// `System` asks the OS and falls back to dark when detection fails.
    #[must_use]
    pub fn is_dark(self) -> bool {
        match self {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::System => !matches!(dark_light::detect(), Ok(dark_light::Mode::Light)),
        }
    }
}

/// Resolved theme: the mode plus the colors it selects.
#[derive(Debug, Clone)]
pub struct AppTheme {
    pub mode: ThemeMode,
    pub colors: ColorScheme,
}

impl AppTheme {
    #[must_use]
    pub fn new(mode: ThemeMode) -> Self {
        let colors = if mode.is_dark() {
            ColorScheme::dark()
        } else {
            ColorScheme::light()
        };
        Self { mode, colors }
    }

    /// Builds the iced theme carrying the brand colors.
    #[must_use]
    pub fn iced_theme(&self) -> Theme {
        let name = if self.mode.is_dark() {
            "Dehaze Dark"
        } else {
            "Dehaze Light"
        };
        Theme::custom(
            name.to_string(),
            Palette {
                background: self.colors.surface,
                text: self.colors.text_primary,
                primary: self.colors.brand,
                success: self.colors.success,
                warning: self.colors.warning,
                danger: self.colors.error,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_scheme_has_light_surface() {
        assert!(ColorScheme::light().surface.r > 0.9);
    }

    #[test]
    fn dark_scheme_has_dark_surface() {
        assert!(ColorScheme::dark().surface.r < 0.2);
    }

    #[test]
    fn explicit_modes_pick_matching_scheme() {
        assert_eq!(AppTheme::new(ThemeMode::Light).colors, ColorScheme::light());
        assert_eq!(AppTheme::new(ThemeMode::Dark).colors, ColorScheme::dark());
    }

    #[test]
    fn theme_mode_is_dark_returns_correct_values() {
        assert!(!ThemeMode::Light.is_dark());
        assert!(ThemeMode::Dark.is_dark());
        let _ = ThemeMode::System.is_dark();
    }

    #[test]
    fn theme_mode_serializes_lowercase() {
        let json = serde_json::to_string(&ThemeMode::System).expect("serialize");
        assert_eq!(json, "\"system\"");
    }
}
