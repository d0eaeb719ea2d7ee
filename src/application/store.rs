// SPDX-License-Identifier: MPL-2.0
//! The result store.
//!
//! Holds the most recent processed result. The store is owned by the
//! application and observed through a `watch` channel; it never releases
//! object URLs itself. Instead [`ResultStore::commit`] and
//! [`ResultStore::reset`] hand the superseded URL back to the caller, who
//! owns the registry.

use crate::domain::media::{MediaKind, ObjectUrl};
use crate::domain::upload::UploadResult;
use tokio::sync::watch;

#[derive(Debug)]
pub struct ResultStore {
    tx: watch::Sender<UploadResult>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UploadResult::default());
        Self { tx }
    }

    /// Current result URL; empty when nothing has been stored.
    #[must_use]
    pub fn url(&self) -> ObjectUrl {
        self.tx.borrow().url.clone()
    }

    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.tx.borrow().kind
    }

    #[must_use]
    pub fn snapshot(&self) -> UploadResult {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().url.is_empty()
    }

    /// Observes every future write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UploadResult> {
        self.tx.subscribe()
    }

    /// Overwrites the stored result.
    ///
    /// Returns the previous URL so that it can be revoked, or `None` if the
    /// store was empty or already held the same URL.
    pub fn commit(&self, result: UploadResult) -> Option<ObjectUrl> {
        let new_url = result.url.clone();
        let previous = self.tx.send_replace(result);
        (!previous.url.is_empty() && previous.url != new_url).then_some(previous.url)
    }

    /// Empties the store, returning the URL that was held.
    pub fn reset(&self) -> Option<ObjectUrl> {
        let previous = self.tx.send_replace(UploadResult::default());
        (!previous.url.is_empty()).then_some(previous.url)
    }
}
