// SPDX-License-Identifier: MPL-2.0
//! Toast notifications.
//!
//! Success and info toasts disappear after a few seconds, warnings stay a
//! little longer and errors wait for the user to dismiss them. Warnings and
//! errors are also recorded in diagnostics when a handle is attached.

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;
