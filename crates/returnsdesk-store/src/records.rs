//! The authoritative record store.

use crate::activity::ActivityLog;
use crate::durable::{load_list, store_list, DurableStore, ARCHIVE_BLOB, REPORTS_BLOB};
use crate::error::StoreError;
use crate::notify::{SubscriptionId, Subscribers};
use crate::Confirmation;
use returnsdesk_model::{format_timestamp, Clock, IdGenerator, Report, ReportDraft};
use std::fmt;
use std::sync::Arc;

/// Whether a save created a new report or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// A new report was appended.
    Created,
    /// An existing report was replaced in place.
    Updated,
}

/// Owns the active and archived report lists.
///
/// Every mutating call writes the affected lists through to the durable
/// store before committing them in memory, then notifies subscribers with
/// the active list. If the write fails, the in-memory state is unchanged.
///
/// Mutation takes `&mut self`: one logical caller at a time.
pub struct RecordStore {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
    log: ActivityLog,
    active: Vec<Report>,
    archive: Vec<Report>,
    subscribers: Subscribers<[Report]>,
}

impl RecordStore {
    /// Loads both lists from `store`.
    pub fn open(
        store: Arc<dyn DurableStore>,
        log: ActivityLog,
        clock: Arc<dyn Clock>,
        ids: IdGenerator,
    ) -> Result<Self, StoreError> {
        let active = load_list(store.as_ref(), REPORTS_BLOB)?;
        let archive = load_list(store.as_ref(), ARCHIVE_BLOB)?;
        tracing::debug!(
            active = active.len(),
            archived = archive.len(),
            "record store loaded"
        );
        Ok(Self {
            store,
            clock,
            ids,
            log,
            active,
            archive,
            subscribers: Subscribers::new(),
        })
    }

    /// Opens a store and its activity log on one backend with a fresh id generator.
    pub fn open_default(
        store: Arc<dyn DurableStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let log = ActivityLog::open(Arc::clone(&store), Arc::clone(&clock))?;
        Self::open(store, log, clock, IdGenerator::new())
    }

    /// Active reports in insertion order.
    pub fn snapshot(&self) -> &[Report] {
        &self.active
    }

    /// Archived reports in the order they were archived.
    pub fn archive(&self) -> &[Report] {
        &self.archive
    }

    /// Returns the active report with `id`.
    pub fn find(&self, id: &str) -> Option<&Report> {
        self.active.iter().find(|r| r.id == id)
    }

    /// The activity log shared with collaborators.
    pub fn activity(&mut self) -> &mut ActivityLog {
        &mut self.log
    }

    /// Read-only view of the activity log.
    pub fn activity_entries(&self) -> &[String] {
        self.log.entries()
    }

    /// The clock used for stamps and identifiers.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Generates an identifier not used by any active report (best-effort).
    pub fn generate_id(&mut self, brand: &str) -> String {
        let now = self.clock.now();
        let active = &self.active;
        self.ids
            .generate(now, brand, |candidate| active.iter().any(|r| r.id == candidate))
    }

    /// Returns a blank draft holding a freshly generated id.
    pub fn new_draft(&mut self) -> ReportDraft {
        ReportDraft {
            id: Some(self.generate_id("")),
            ..Default::default()
        }
    }

    /// Inserts or replaces a report.
    ///
    /// A draft without an id gets one generated from its brand. The draft's
    /// timestamp is always discarded in favour of the current time.
    pub fn save_report(&mut self, draft: ReportDraft) -> Result<Report, StoreError> {
        let id = match draft.resolved_id() {
            Some(id) => id.to_string(),
            None => self.generate_id(&draft.fields.brand),
        };
        let report = Report::from_draft(draft, id, format_timestamp(self.clock.now()));

        let mut next = self.active.clone();
        let kind = match next.iter().position(|r| r.id == report.id) {
            Some(idx) => {
                next[idx] = report.clone();
                SaveKind::Updated
            }
            None => {
                next.push(report.clone());
                SaveKind::Created
            }
        };

        self.commit_active(next)?;
        match kind {
            SaveKind::Created => self.log.add(format!("Report saved: {}", report.id)),
            SaveKind::Updated => self.log.add(format!("Report updated: {}", report.id)),
        }
        Ok(report)
    }

    /// Removes the active report with `id`. Returns false if it was absent.
    pub fn delete_report(&mut self, id: &str) -> Result<bool, StoreError> {
        if self.find(id).is_none() {
            self.log.add(format!("Delete skipped, report not found: {}", id));
            return Ok(false);
        }
        let next = self.active.iter().filter(|r| r.id != id).cloned().collect();
        self.commit_active(next)?;
        self.log.add(format!("Report deleted: {}", id));
        Ok(true)
    }

    /// Empties the active list. Returns false if the request was declined.
    pub fn clear_all(&mut self, confirmation: Confirmation) -> Result<bool, StoreError> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }
        self.commit_active(Vec::new())?;
        self.log.add("All reports deleted");
        Ok(true)
    }

    /// Moves the oldest reports to the archive.
    ///
    /// With `threshold > 0`, runs only when more than `threshold` reports are
    /// active and keeps the `threshold` most recent. With `threshold == 0`,
    /// moves every active report, but only when `confirmation` is given.
    /// Age is the ascending string order of `timestamp`; ties keep list order.
    ///
    /// Returns the number of reports moved.
    pub fn auto_archive(
        &mut self,
        threshold: usize,
        confirmation: Confirmation,
    ) -> Result<usize, StoreError> {
        let count = self.active.len();
        if threshold > 0 && count <= threshold {
            return Ok(0);
        }
        if threshold == 0 && !confirmation.is_confirmed() {
            return Ok(0);
        }
        let over = count - threshold;
        if over == 0 {
            return Ok(0);
        }

        let mut by_age: Vec<usize> = (0..count).collect();
        by_age.sort_by(|&a, &b| self.active[a].timestamp.cmp(&self.active[b].timestamp));
        let mut moving = vec![false; count];
        for &idx in &by_age[..over] {
            moving[idx] = true;
        }

        let mut next_archive = self.archive.clone();
        next_archive.extend(by_age[..over].iter().map(|&idx| self.active[idx].clone()));
        let next_active: Vec<Report> = self
            .active
            .iter()
            .zip(&moving)
            .filter(|(_, moved)| !**moved)
            .map(|(report, _)| report.clone())
            .collect();

        // Both blobs are written before either list changes in memory.
        store_list(self.store.as_ref(), ARCHIVE_BLOB, &next_archive)?;
        if let Err(err) = store_list(self.store.as_ref(), REPORTS_BLOB, &next_active) {
            if let Err(restore) = store_list(self.store.as_ref(), ARCHIVE_BLOB, &self.archive) {
                tracing::warn!(error = %restore, "failed to restore archive blob");
            }
            return Err(err);
        }
        self.archive = next_archive;
        self.active = next_active;
        self.subscribers.notify(&self.active);
        self.log
            .add(format!("Auto-archive: {} reports moved to archive.", over));
        Ok(over)
    }

    /// Registers a listener called with the active list after each change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[Report]) + Send + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    /// Removes a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn commit_active(&mut self, next: Vec<Report>) -> Result<(), StoreError> {
        store_list(self.store.as_ref(), REPORTS_BLOB, &next)?;
        self.active = next;
        self.subscribers.notify(&self.active);
        Ok(())
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("active", &self.active.len())
            .field("archive", &self.archive.len())
            .field("log", &self.log)
            .finish()
    }
}
