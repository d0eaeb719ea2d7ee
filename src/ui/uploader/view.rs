// SPDX-License-Identifier: MPL-2.0
//! Upload form rendering.

use super::state::{Message, Phase, Preview, State};
use crate::application::port::ServiceError;
use crate::application::{Field, Issue};
use crate::domain::media::{MediaKind, ProcessingModel};
use crate::i18n::I18n;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use crate::ui::video_controls;
use iced::widget::{button, container, image, pick_list, text, Column, Container, Row, Text};
use iced::{alignment, ContentFit, Element, Length, Theme};
use std::fmt;

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

/// Pick list entry with a localized label.
#[derive(Debug, Clone, PartialEq)]
struct Choice<T> {
    value: T,
    label: String,
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn kind_label(i18n: &I18n, kind: MediaKind) -> String {
    match kind {
        MediaKind::Image => i18n.tr("media-kind-image"),
        MediaKind::Video => i18n.tr("media-kind-video"),
    }
}

fn model_label(i18n: &I18n, model: ProcessingModel) -> String {
    match model {
        ProcessingModel::Dcp => i18n.tr("model-dcp"),
        ProcessingModel::Ffa => i18n.tr("model-ffa"),
    }
}

/// Localized text for a validation issue.
pub fn issue_text(i18n: &I18n, issue: Issue) -> String {
    match issue {
        Issue::KindMismatch { expected } => {
            i18n.tr_with_args(issue.i18n_key(), &[("expected", expected.as_str())])
        }
        _ => i18n.tr(issue.i18n_key()),
    }
}

/// Localized text for a failed round trip.
pub fn service_error_text(i18n: &I18n, reason: &ServiceError) -> String {
    match reason {
        ServiceError::Status(code) => {
            let status = code.to_string();
            i18n.tr_with_args(reason.i18n_key(), &[("status", status.as_str())])
        }
        ServiceError::Rejected(detail)
        | ServiceError::Connection(detail)
        | ServiceError::Other(detail) => {
            i18n.tr_with_args(reason.i18n_key(), &[("detail", detail.as_str())])
        }
        ServiceError::Timeout | ServiceError::EmptyBody => i18n.tr(reason.i18n_key()),
    }
}

fn error_line<'a>(message: String) -> Element<'a, Message> {
    Text::new(message)
        .size(typography::CAPTION)
        .style(|_theme: &Theme| text::Style {
            color: Some(palette::ERROR_500),
        })
        .into()
}

fn field_error<'a>(state: &State, i18n: &I18n, field: Field) -> Option<Element<'a, Message>> {
    state
        .errors()
        .get(field)
        .map(|issue| error_line(issue_text(i18n, issue)))
}

pub fn view<'a>(state: &'a State, ctx: ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;

    let mut form = Column::new()
        .spacing(spacing::SM)
        .width(Length::Fixed(sizing::FORM_WIDTH))
        .push(Text::new(i18n.tr("uploader-title")).size(typography::TITLE_MD))
        .push(drop_zone(state, i18n));

    if let Some(error) = field_error(state, i18n, Field::File) {
        form = form.push(error);
    }
    if state.multiple_files_rejected() {
        form = form.push(error_line(i18n.tr("uploader-multiple-files")));
    }

    if state.variant().has_selection() {
        form = form.push(selectors(state, i18n));
    }

    form = form
        .push(
            button(Text::new(i18n.tr("uploader-submit-button")))
                .on_press(Message::Submit)
                .padding([spacing::XS, spacing::MD])
                .style(styles::button::primary),
        )
        .push(status(state, i18n));

    Container::new(form)
        .padding(spacing::LG)
        .style(styles::container::panel)
        .into()
}

fn drop_zone<'a>(state: &'a State, i18n: &'a I18n) -> Element<'a, Message> {
    let mut content = Column::new()
        .spacing(spacing::XS)
        .align_x(alignment::Horizontal::Center);

    match state.file() {
        None => {
            let hint = Text::new(i18n.tr("uploader-drop-hint")).size(typography::BODY);
            content = content.push(hint);
        }
        Some(file) => {
            if let Some(preview) = preview(state.preview(), i18n) {
                content = content.push(preview);
            }
            let name = i18n.tr_with_args("uploader-selected-file", &[("name", file.name.as_str())]);
            content = content.push(Text::new(name).size(typography::CAPTION));
        }
    }

    content = content.push(
        button(Text::new(i18n.tr("uploader-browse-button")))
            .on_press(Message::BrowseRequested)
            .padding([spacing::XXS, spacing::SM]),
    );

    Container::new(content)
        .padding(spacing::MD)
        .center_x(Length::Fill)
        .style(styles::container::drop_zone)
        .into()
}

fn preview<'a>(preview: &'a Preview, i18n: &'a I18n) -> Option<Element<'a, Message>> {
    let frame = |handle: &image::Handle| -> Element<'a, Message> {
        image(handle.clone())
            .content_fit(ContentFit::Contain)
            .height(Length::Fixed(sizing::PREVIEW_MAX_HEIGHT))
            .into()
    };

    match preview {
        Preview::None => None,
        Preview::Decoding => Some(Text::new("…").size(typography::TITLE_MD).into()),
        Preview::Image(data) => Some(frame(&data.handle)),
        Preview::Video {
            player: Some(player),
            poster,
            ..
        } => Some(
            video_controls::view(
                player,
                video_controls::ViewContext {
                    i18n,
                    poster: poster.as_ref().map(|poster| &poster.frame.handle),
                    height: Length::Fixed(sizing::PREVIEW_MAX_HEIGHT),
                },
            )
            .map(Message::Player),
        ),
        Preview::Video {
            poster: Some(poster),
            ..
        } => Some(frame(&poster.frame.handle)),
        Preview::Video { poster: None, .. } => {
            Some(Text::new(i18n.tr("media-kind-video")).into())
        }
        Preview::Unavailable => Some(
            Text::new(i18n.tr("uploader-preview-unavailable"))
                .size(typography::CAPTION)
                .into(),
        ),
    }
}

fn selectors<'a>(state: &'a State, i18n: &I18n) -> Element<'a, Message> {
    let kinds: Vec<Choice<MediaKind>> = MediaKind::ALL
        .iter()
        .map(|&value| Choice {
            value,
            label: kind_label(i18n, value),
        })
        .collect();
    let selected_kind = state.kind().map(|value| Choice {
        value,
        label: kind_label(i18n, value),
    });

    let models: Vec<Choice<ProcessingModel>> = ProcessingModel::ALL
        .iter()
        .map(|&value| Choice {
            value,
            label: model_label(i18n, value),
        })
        .collect();
    let selected_model = state.model().map(|value| Choice {
        value,
        label: model_label(i18n, value),
    });

    let mut type_column = Column::new()
        .width(Length::Fill)
        .spacing(spacing::XXS)
        .push(Text::new(i18n.tr("uploader-type-label")).size(typography::BODY))
        .push(
            pick_list(kinds, selected_kind, |choice: Choice<MediaKind>| {
                Message::TypeSelected(choice.value)
            })
            .placeholder(i18n.tr("uploader-type-placeholder"))
            .width(Length::Fill),
        );
    if let Some(error) = field_error(state, i18n, Field::Type) {
        type_column = type_column.push(error);
    }

    let mut model_column = Column::new()
        .width(Length::Fill)
        .spacing(spacing::XXS)
        .push(Text::new(i18n.tr("uploader-model-label")).size(typography::BODY))
        .push(
            pick_list(models, selected_model, |choice: Choice<ProcessingModel>| {
                Message::ModelSelected(choice.value)
            })
            .placeholder(i18n.tr("uploader-model-placeholder"))
            .width(Length::Fill),
        );
    if let Some(error) = field_error(state, i18n, Field::Model) {
        model_column = model_column.push(error);
    }

    Row::new()
        .spacing(spacing::MD)
        .push(type_column)
        .push(model_column)
        .into()
}

fn status<'a>(state: &'a State, i18n: &I18n) -> Element<'a, Message> {
    match state.phase() {
        Phase::Idle => Text::new("").into(),
        Phase::Pending { .. } => Text::new(i18n.tr("uploader-pending"))
            .size(typography::BODY)
            .into(),
        Phase::Success => Text::new(i18n.tr("uploader-success"))
            .size(typography::BODY)
            .style(|_theme: &Theme| text::Style {
                color: Some(palette::SUCCESS_500),
            })
            .into(),
        Phase::Failed { reason } => {
            let mut banner = Column::new()
                .spacing(spacing::XXS)
                .push(Text::new(i18n.tr("uploader-failed-title")).size(typography::BODY))
                .push(Text::new(service_error_text(i18n, reason)).size(typography::CAPTION));
            if state.can_retry() {
                banner = banner.push(
                    button(Text::new(i18n.tr("uploader-retry-button")))
                        .on_press(Message::Retry)
                        .padding([spacing::XXS, spacing::SM])
                        .style(styles::button::primary),
                );
            }
            container(banner)
                .width(Length::Fill)
                .padding(spacing::SM)
                .style(styles::container::error_banner)
                .into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> I18n {
        I18n::new(Some("en-US".to_string()), None)
    }

    #[test]
    fn issue_text_matches_schema_messages() {
        let i18n = english();
        for issue in [
            Issue::MissingFile,
            Issue::UnsupportedFormat,
            Issue::InvalidType,
            Issue::InvalidModel,
            Issue::KindMismatch {
                expected: MediaKind::Video,
            },
        ] {
            assert_eq!(issue_text(&i18n, issue), issue.message());
        }
    }

    #[test]
    fn service_errors_include_details() {
        let i18n = english();
        assert!(service_error_text(&i18n, &ServiceError::Status(503)).contains("503"));
        assert!(
            service_error_text(&i18n, &ServiceError::Rejected("bad model".into()))
                .contains("bad model")
        );
        assert!(!service_error_text(&i18n, &ServiceError::Timeout).starts_with("MISSING"));
    }

    #[test]
    fn choice_displays_label() {
        let choice = Choice {
            value: MediaKind::Image,
            label: "Image".to_string(),
        };
        assert_eq!(choice.to_string(), "Image");
    }
}
