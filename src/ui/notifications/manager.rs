// SPDX-License-Identifier: MPL-2.0
//! Queue and lifetime of toasts.
//!
//! At most [`MAX_VISIBLE`] toasts are shown; the rest wait in a queue and
//! are promoted as visible ones are dismissed or expire.

use super::notification::{Notification, NotificationId, Severity};
use crate::diagnostics::{DiagnosticsHandle, ErrorEvent, ErrorType, WarningEvent, WarningType};
use std::collections::VecDeque;

const MAX_VISIBLE: usize = 3;

/// Toast interactions.
#[derive(Debug, Clone)]
pub enum Message {
    /// Close button pressed on a toast.
    Dismiss(NotificationId),
    Tick,
}

/// Owns every toast, shown or waiting.
#[derive(Debug, Default)]
pub struct Manager {
    /// Newest first.
    visible: VecDeque<Notification>,
    queue: VecDeque<Notification>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl Manager {
    /// Creates an empty manager that logs nothing until
    /// [`set_diagnostics`](Self::set_diagnostics) is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings and errors pushed afterwards are also logged here.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Shows the notification, or queues it when the screen is full.
    pub fn push(&mut self, notification: Notification) {
        if let Some(handle) = &self.diagnostics {
            match notification.severity() {
                Severity::Warning => handle.log_warning(WarningEvent::new(
                    notification.warning_type().unwrap_or(WarningType::Other),
                    notification.message_key(),
                )),
                Severity::Error => handle.log_error(ErrorEvent::new(
                    notification.error_type().unwrap_or(ErrorType::Other),
                    notification.message_key(),
                )),
                Severity::Success | Severity::Info => {}
            }
        }

        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_front(notification);
        } else {
            self.queue.push_back(notification);
        }
    }

    /// Returns `true` if a notification with `id` was removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_from_queue();
            return true;
        }
        if let Some(pos) = self.queue.iter().position(|n| n.id() == id) {
            self.queue.remove(pos);
            return true;
        }
        false
    }

    /// Drops expired toasts. Driven by the app's periodic tick.
    pub fn tick(&mut self) {
        let expired: Vec<NotificationId> = self
            .visible
            .iter()
            .filter(|n| n.should_auto_dismiss())
            .map(Notification::id)
            .collect();
        for id in expired {
            self.dismiss(id);
        }
    }

    /// Applies a toast interaction.
    pub fn handle_message(&mut self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::Tick => self.tick(),
        }
    }

    /// Shown toasts, newest first.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    /// Number of toasts on screen.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Number of toasts waiting for a free slot.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether any toast is shown or queued. The app only ticks while true.
    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.visible.is_empty() || !self.queue.is_empty()
    }

    /// Removes upload error toasts once a later upload succeeds.
    pub fn clear_service_errors(&mut self) {
        let before = self.visible.len();
        self.visible
            .retain(|n| !n.message_key().starts_with("error-service-"));
        self.queue
            .retain(|n| !n.message_key().starts_with("error-service-"));
        if self.visible.len() < before {
            self.promote_from_queue();
        }
    }

    /// Drops every toast without logging.
    pub fn clear(&mut self) {
        self.visible.clear();
        self.queue.clear();
    }

    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            match self.queue.pop_front() {
                Some(next) => self.visible.push_back(next),
                None => break,
            }
        }
    }
}
