// SPDX-License-Identifier: MPL-2.0
//! Top bar with the application title and app-level actions.

use crate::domain::media::Variant;
use crate::i18n::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, Container, Row, Space, Text};
use iced::{alignment::Vertical, Element, Length};

/// Contextual data needed to render the navbar.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub variant: Variant,
    /// Whether there is anything to reset (a file, a result or a request).
    pub can_reset: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    Reset,
    ExportDiagnostics,
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Reset,
    ExportDiagnostics,
}

pub fn update(message: Message) -> Event {
    match message {
        Message::Reset => Event::Reset,
        Message::ExportDiagnostics => Event::ExportDiagnostics,
    }
}

/// i18n key of the title for a workflow.
#[must_use]
pub fn title_key(variant: Variant) -> &'static str {
    match variant {
        Variant::ImageOnly => "navbar-title-image-only",
        Variant::Combined => "navbar-title-combined",
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let title = Text::new(ctx.i18n.tr(title_key(ctx.variant))).size(typography::TITLE_LG);

    let export = button(Text::new(ctx.i18n.tr("navbar-export-diagnostics")))
        .on_press(Message::ExportDiagnostics)
        .padding([spacing::XXS, spacing::SM]);

    let reset_label = Text::new(ctx.i18n.tr("navbar-reset-button"));
    let reset = if ctx.can_reset {
        button(reset_label)
            .on_press(Message::Reset)
            .style(styles::button::danger)
    } else {
        button(reset_label).style(styles::button::disabled)
    }
    .padding([spacing::XXS, spacing::SM]);

    let row = Row::new()
        .spacing(spacing::SM)
        .padding([spacing::XS, spacing::MD])
        .align_y(Vertical::Center)
        .push(title)
        .push(Space::new().width(Length::Fill))
        .push(export)
        .push(reset);

    Container::new(row)
        .width(Length::Fill)
        .height(Length::Fixed(sizing::NAVBAR_HEIGHT))
        .center_y(Length::Fixed(sizing::NAVBAR_HEIGHT))
        .style(styles::container::navbar)
        .into()
}
