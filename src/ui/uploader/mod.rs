// SPDX-License-Identifier: MPL-2.0
//! Upload form: file selection, local preview, validation and submission.

mod state;
mod view;

pub use state::{Event, FileSource, Message, Phase, Preview, State, UpdateContext};
pub use view::{issue_text, service_error_text, view, ViewContext};
