// SPDX-License-Identifier: MPL-2.0
//! Design tokens shared by every widget in the dehazing front end.
//!
//! Values are grouped by concern so views never hard-code colors or sizes:
//!
//! - [`palette`]: raw colors, including the haze/clear brand ramp
//! - [`opacity`]: alpha levels for overlays and surfaces
//! - [`spacing`]: the 8 px grid
//! - [`sizing`]: fixed widget dimensions
//! - [`typography`]: font sizes
//! - [`border`], [`radius`], [`shadow`]: surface decoration
//!
//! Relationships between tokens are checked at compile time at the bottom
//! of this file.

pub mod palette {
    use iced::Color;

    pub const WHITE: Color = Color::WHITE;
    pub const GRAY_900: Color = Color::from_rgb(0.09, 0.10, 0.11);
    pub const GRAY_800: Color = Color::from_rgb(0.14, 0.15, 0.17);
    pub const GRAY_700: Color = Color::from_rgb(0.28, 0.30, 0.32);
    pub const GRAY_400: Color = Color::from_rgb(0.45, 0.47, 0.50);
    pub const GRAY_200: Color = Color::from_rgb(0.78, 0.80, 0.82);
    pub const GRAY_100: Color = Color::from_rgb(0.90, 0.91, 0.92);

    // Brand ramp: a clear-sky teal.
    pub const PRIMARY_300: Color = Color::from_rgb(0.55, 0.85, 0.86);
    pub const PRIMARY_400: Color = Color::from_rgb(0.33, 0.74, 0.77);
    pub const PRIMARY_500: Color = Color::from_rgb(0.16, 0.62, 0.66);
    pub const PRIMARY_600: Color = Color::from_rgb(0.11, 0.51, 0.55);
    pub const PRIMARY_700: Color = Color::from_rgb(0.08, 0.40, 0.44);

    // Haze tint used behind the empty drop zone.
    pub const HAZE: Color = Color::from_rgb(0.80, 0.82, 0.84);

    pub const ERROR_500: Color = Color::from_rgb(0.86, 0.23, 0.22);
    pub const WARNING_500: Color = Color::from_rgb(0.93, 0.63, 0.15);
    pub const SUCCESS_500: Color = Color::from_rgb(0.24, 0.68, 0.40);
    pub const INFO_500: Color = Color::from_rgb(0.36, 0.58, 0.96);
}

pub mod opacity {
    pub const TRANSPARENT: f32 = 0.0;
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
    pub const OPAQUE: f32 = 1.0;

    /// Panels drawn over the window background.
    pub const SURFACE: f32 = 0.95;
}

/// 8 px grid.
pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
    pub const XL: f32 = 32.0;
}

pub mod sizing {
    pub const ICON_MD: f32 = 24.0;

    pub const NAVBAR_HEIGHT: f32 = 52.0;

    pub const FORM_WIDTH: f32 = 420.0;
    pub const PREVIEW_MAX_HEIGHT: f32 = 260.0;
    pub const TOAST_WIDTH: f32 = 320.0;
}

pub mod typography {
    /// Navbar brand.
    pub const TITLE_LG: f32 = 24.0;

    /// Panel titles.
    pub const TITLE_MD: f32 = 18.0;

    pub const BODY_LG: f32 = 16.0;
    pub const BODY: f32 = 14.0;
    pub const CAPTION: f32 = 12.0;
}

pub mod border {
    pub const WIDTH_SM: f32 = 1.0;
    pub const WIDTH_MD: f32 = 2.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
    pub const LG: f32 = 12.0;
}

pub mod shadow {
    use iced::{Color, Shadow, Vector};

    pub const NONE: Shadow = Shadow {
        color: Color::TRANSPARENT,
        offset: Vector::ZERO,
        blur_radius: 0.0,
    };

    pub const SM: Shadow = Shadow {
        color: Color::from_rgba(0.0, 0.0, 0.0, 0.12),
        offset: Vector::new(0.0, 1.0),
        blur_radius: 2.0,
    };

    pub const MD: Shadow = Shadow {
        color: Color::from_rgba(0.0, 0.0, 0.0, 0.2),
        offset: Vector::new(0.0, 2.0),
        blur_radius: 6.0,
    };
}

const _: () = {
    assert!(spacing::XXS > 0.0);
    assert!(spacing::XS > spacing::XXS);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);
    assert!(spacing::XL > spacing::LG);

    assert!(opacity::TRANSPARENT == 0.0);
    assert!(opacity::OPAQUE == 1.0);
    assert!(opacity::SURFACE > 0.0 && opacity::SURFACE < 1.0);

    assert!(typography::TITLE_LG > typography::TITLE_MD);
    assert!(typography::TITLE_MD > typography::BODY_LG);
    assert!(typography::BODY_LG > typography::BODY);
    assert!(typography::BODY > typography::CAPTION);

    assert!(border::WIDTH_MD > border::WIDTH_SM);
    assert!(sizing::FORM_WIDTH > sizing::TOAST_WIDTH);
};
