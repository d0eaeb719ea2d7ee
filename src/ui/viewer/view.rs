// SPDX-License-Identifier: MPL-2.0
//! Result card rendering.

use super::content::Content;
use super::state::{Message, State, Visual};
use crate::i18n::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use crate::ui::video_controls::{self, format_time};
use iced::widget::{button, image, Column, Container, Text};
use iced::{alignment, ContentFit, Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

/// Renders the processed result, or nothing while the store is empty.
pub fn view<'a>(state: &'a State, ctx: ViewContext<'a>) -> Option<Element<'a, Message>> {
    let i18n = ctx.i18n;
    if matches!(state.content(), Content::Empty) {
        return None;
    }

    let body: Element<'a, Message> = match state.visual() {
        Visual::Loading => Text::new("…").size(typography::TITLE_MD).into(),
        Visual::Image(data) => image(data.handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        Visual::Video { poster, player } => {
            let duration = format_time(poster.info.duration_secs);
            let screen: Element<'a, Message> = match player {
                Some(player) => video_controls::view(
                    player,
                    video_controls::ViewContext {
                        i18n,
                        poster: Some(&poster.frame.handle),
                        height: Length::Fill,
                    },
                )
                .map(Message::Player),
                None => image(poster.frame.handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into(),
            };
            Column::new()
                .spacing(spacing::XS)
                .align_x(alignment::Horizontal::Center)
                .push(screen)
                .push(
                    Text::new(i18n.tr_with_args(
                        "viewer-video-label",
                        &[("duration", duration.as_str())],
                    ))
                    .size(typography::CAPTION),
                )
                .into()
        }
        Visual::Unavailable => Text::new(i18n.tr("viewer-result-unavailable"))
            .size(typography::BODY)
            .into(),
    };

    let body = Container::new(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .center(Length::Fill);

    let column = Column::new()
        .spacing(spacing::SM)
        .align_x(alignment::Horizontal::Center)
        .push(Text::new(i18n.tr("viewer-title")).size(typography::TITLE_MD))
        .push(body)
        .push(
            button(Text::new(i18n.tr("viewer-save-button")))
                .on_press(Message::SaveRequested)
                .padding([spacing::XXS, spacing::SM]),
        );

    Some(
        Container::new(column)
            .padding(spacing::LG)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(styles::container::panel)
            .into(),
    )
}
