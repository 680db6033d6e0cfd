use super::notification_models::{Notification, NotificationStatus};

/// Point-in-time copy of the read-model, safe to hand to rendering code.
#[derive(Debug, Clone, Default)]
pub struct InboxSnapshot {
    pub items: Vec<Notification>,
    pub unread: u64,
}

/// In-memory projection of one inbox: the visible entries, newest first,
/// plus a tracked unread count that is adjusted in O(1) per mutation and
/// only recomputed by full scan when a fresh snapshot is loaded.
#[derive(Debug, Default)]
pub struct NotificationStore {
    entries: Vec<Notification>,
    unread: u64,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or seed) the collection from a REST page read.
    ///
    /// The list must not contain duplicate ids. Entries are ordered newest
    /// first and the unread count is recomputed from scratch.
    pub fn load_snapshot(&mut self, mut list: Vec<Notification>) {
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        self.unread = list
            .iter()
            .filter(|n| n.status == NotificationStatus::Unread)
            .count() as u64;
        self.entries = list;
    }

    /// Merge a pushed notification into the collection.
    ///
    /// A REST fetch can race the push delivery for the same entry, so an id
    /// that is already present makes this a no-op. Returns whether the entry
    /// was inserted.
    pub fn apply_inbound(&mut self, incoming: Notification) -> bool {
        if self.entries.iter().any(|n| n.id == incoming.id) {
            return false;
        }
        if incoming.status == NotificationStatus::Unread {
            self.unread += 1;
        }
        self.insert_sorted(incoming);
        true
    }

    /// Apply a local status transition.
    ///
    /// Unknown ids are a no-op. A transition to deleted removes the entry
    /// from the visible collection. Returns the entry as it was before the
    /// change so the caller can revert a failed optimistic mutation.
    pub fn apply_status_change(
        &mut self,
        id: i64,
        new_status: NotificationStatus,
    ) -> Option<Notification> {
        let idx = self.entries.iter().position(|n| n.id == id)?;
        let previous = self.entries[idx].clone();
        match new_status {
            NotificationStatus::Unread => {
                if previous.status != NotificationStatus::Unread {
                    self.unread += 1;
                }
                self.entries[idx].status = NotificationStatus::Unread;
            }
            NotificationStatus::Read => {
                if previous.status == NotificationStatus::Unread {
                    self.unread = self.unread.saturating_sub(1);
                }
                self.entries[idx].status = NotificationStatus::Read;
            }
            NotificationStatus::Deleted => {
                if previous.status == NotificationStatus::Unread {
                    self.unread = self.unread.saturating_sub(1);
                }
                self.entries.remove(idx);
            }
        }
        Some(previous)
    }

    /// Restore an entry returned by [`apply_status_change`], undoing the
    /// optimistic transition. Reinserts the entry if it had been removed.
    ///
    /// [`apply_status_change`]: NotificationStore::apply_status_change
    pub fn revert(&mut self, previous: Notification) {
        if let Some(idx) = self.entries.iter().position(|n| n.id == previous.id) {
            let current = self.entries[idx].status;
            if current == NotificationStatus::Unread
                && previous.status != NotificationStatus::Unread
            {
                self.unread = self.unread.saturating_sub(1);
            } else if current != NotificationStatus::Unread
                && previous.status == NotificationStatus::Unread
            {
                self.unread += 1;
            }
            self.entries[idx] = previous;
        } else {
            if previous.status == NotificationStatus::Unread {
                self.unread += 1;
            }
            self.insert_sorted(previous);
        }
    }

    /// Pure read of the current collection and unread count.
    pub fn snapshot(&self) -> InboxSnapshot {
        InboxSnapshot {
            items: self.entries.clone(),
            unread: self.unread,
        }
    }

    pub fn list(&self) -> &[Notification] {
        &self.entries
    }

    pub fn unread_count(&self) -> u64 {
        self.unread
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_sorted(&mut self, incoming: Notification) {
        let at = self
            .entries
            .iter()
            .position(|n| (n.created_at, n.id) < (incoming.created_at, incoming.id))
            .unwrap_or(self.entries.len());
        self.entries.insert(at, incoming);
    }
}
