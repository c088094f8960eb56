//! Append-only activity log.
//!
//! Entries read `"{YYYY-MM-DD HH:MM:SS} - {message}"` and are kept newest
//! first. The whole list is rewritten to the `logs` blob on every entry.
//! From the caller's point of view the log is a write-only sink: a failed
//! write is reported through `tracing` and otherwise ignored.

use crate::durable::{load_list, store_list, DurableStore, LOGS_BLOB};
use crate::error::StoreError;
use crate::notify::{SubscriptionId, Subscribers};
use crate::Confirmation;
use returnsdesk_model::{format_timestamp, Clock};
use std::fmt;
use std::sync::Arc;

/// Marker prefixed to messages describing a recovered failure.
pub const ERROR_MARKER: &str = "❌";

/// Timestamped, persisted message log.
pub struct ActivityLog {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    entries: Vec<String>,
    subscribers: Subscribers<[String]>,
}

impl ActivityLog {
    /// Loads the log from `store`.
    pub fn open(store: Arc<dyn DurableStore>, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let entries = load_list(store.as_ref(), LOGS_BLOB)?;
        Ok(Self {
            store,
            clock,
            entries,
            subscribers: Subscribers::new(),
        })
    }

    /// Records `message` with the current time.
    pub fn add(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if message.starts_with(ERROR_MARKER) {
            tracing::warn!(target: "returnsdesk::activity", "{}", message);
        } else {
            tracing::info!(target: "returnsdesk::activity", "{}", message);
        }

        let entry = format!("{} - {}", format_timestamp(self.clock.now()), message);
        self.entries.insert(0, entry);
        self.persist();
    }

    /// Empties the log, then records that it was cleared.
    ///
    /// Returns false and does nothing if the request was declined.
    pub fn clear(&mut self, confirmation: Confirmation) -> bool {
        if !confirmation.is_confirmed() {
            return false;
        }
        self.entries.clear();
        self.persist();
        self.add("Activity log cleared manually");
        true
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Registers a listener called with the full entry list after each change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[String]) + Send + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    /// Removes a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn persist(&mut self) {
        if let Err(e) = store_list(self.store.as_ref(), LOGS_BLOB, &self.entries) {
            tracing::warn!(error = %e, "failed to persist activity log");
        }
        self.subscribers.notify(&self.entries);
    }
}

impl fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityLog")
            .field("entries", &self.entries.len())
            .field("subscribers", &self.subscribers)
            .finish()
    }
}
