// SPDX-License-Identifier: MPL-2.0
//! Processed result viewer.
//!
//! The viewer observes the result store and renders nothing while it is
//! empty. Images are shown decoded. Videos start on their poster frame and,
//! when the content asks for controls, play from the materialized result
//! file with play/pause and a seekable timeline.

mod content;
mod state;
mod view;

pub use content::Content;
pub use state::{Event, Message, State, Visual};
pub use view::{view, ViewContext};
