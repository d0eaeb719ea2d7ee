// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.

use super::Message;
use crate::domain::media::Variant;
use crate::i18n::I18n;
use crate::ui::design_tokens::spacing;
use crate::ui::navbar;
use crate::ui::notifications::{self, Toast};
use crate::ui::uploader;
use crate::ui::viewer;
use iced::widget::{scrollable, Column, Container, Row, Stack};
use iced::{alignment, Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub variant: Variant,
    pub uploader: &'a uploader::State,
    pub viewer: &'a viewer::State,
    pub notifications: &'a notifications::Manager,
    pub can_reset: bool,
}

/// Navbar on top, the form and the result side by side, toasts overlaid.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let navbar = navbar::view(navbar::ViewContext {
        i18n: ctx.i18n,
        variant: ctx.variant,
        can_reset: ctx.can_reset,
    })
    .map(Message::Navbar);

    let form = scrollable(
        uploader::view(ctx.uploader, uploader::ViewContext { i18n: ctx.i18n })
            .map(Message::Uploader),
    )
    .height(Length::Fill);

    let mut body = Row::new()
        .spacing(spacing::LG)
        .padding(spacing::LG)
        .align_y(alignment::Vertical::Top)
        .push(form);

    if let Some(result) = viewer::view(ctx.viewer, viewer::ViewContext { i18n: ctx.i18n }) {
        body = body.push(result.map(Message::Viewer));
    }

    let main = Column::new()
        .push(navbar)
        .push(Container::new(body).width(Length::Fill).height(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill);

    let toasts = Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification);

    Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(main)
        .push(toasts)
        .into()
}
