//! In-memory reminder store (default, thread-safe).
//!
//! Uses DashMap for per-key locking and keeps an insertion sequence number per
//! record so listing preserves the seed order.

use super::ReminderBackend;
use crate::entity::Reminder;
use crate::error::{Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Stored record plus its position in the list.
struct Slot {
    seq: u64,
    reminder: Reminder,
}

/// Thread-safe in-memory reminder store.
///
/// Cloning is cheap and every clone shares the same records.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use dunning_kit::backend::{InMemoryBackend, ReminderBackend};
/// use dunning_kit::entity::{Client, Reminder};
///
/// let backend = InMemoryBackend::new();
/// let due = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let client = Client::new("c1", "Acme", "ap@acme.test", "Jane");
///
/// backend.insert(Reminder::new("1", "INV-001", client, due, 250.0))?;
/// assert!(backend.get("1")?.is_some());
/// assert!(backend.get("2")?.is_none());
/// # Ok::<(), dunning_kit::Error>(())
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, Slot>>,
    next_seq: Arc<AtomicU64>,
}

impl InMemoryBackend {
    /// Create an empty store.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record counts for logging.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            reminders: self.store.len(),
            history_items: self
                .store
                .iter()
                .map(|slot| slot.reminder.history.len())
                .sum(),
        }
    }

    /// Print store statistics to debug log.
    pub fn log_stats(&self) {
        let stats = self.stats();
        debug!(
            "Store Stats: {} reminders, {} history items",
            stats.reminders, stats.history_items
        );
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn check_id(id: &str, reminder: &Reminder) -> Result<()> {
    if reminder.id != id {
        return Err(Error::ValidationError(format!(
            "replacement for reminder {} carries id {}",
            id, reminder.id
        )));
    }
    Ok(())
}

impl ReminderBackend for InMemoryBackend {
    fn get(&self, id: &str) -> Result<Option<Reminder>> {
        let found = self.store.get(id).map(|slot| slot.reminder.clone());
        debug!(
            "✓ InMemory GET {} -> {}",
            id,
            if found.is_some() { "HIT" } else { "MISS" }
        );
        Ok(found)
    }

    fn insert(&self, reminder: Reminder) -> Result<()> {
        match self.store.entry(reminder.id.clone()) {
            Entry::Occupied(_) => Err(Error::DuplicateId(reminder.id)),
            Entry::Vacant(vacant) => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                debug!("✓ InMemory INSERT {} (#{})", reminder.id, seq);
                vacant.insert(Slot { seq, reminder });
                Ok(())
            }
        }
    }

    fn replace(&self, id: &str, reminder: Reminder) -> Result<Reminder> {
        check_id(id, &reminder)?;
        let mut slot = self
            .store
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let previous = std::mem::replace(&mut slot.reminder, reminder);
        debug!("✓ InMemory REPLACE {}", id);
        Ok(previous)
    }

    fn remove(&self, id: &str) -> Result<Option<Reminder>> {
        let removed = self.store.remove(id).map(|(_, slot)| slot.reminder);
        debug!("✓ InMemory REMOVE {}", id);
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<Reminder>> {
        let mut slots: Vec<(u64, Reminder)> = self
            .store
            .iter()
            .map(|slot| (slot.seq, slot.reminder.clone()))
            .collect();
        slots.sort_by_key(|(seq, _)| *seq);
        Ok(slots.into_iter().map(|(_, reminder)| reminder).collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.store.len())
    }

    fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.store.contains_key(id))
    }

    fn update<F>(&self, id: &str, f: F) -> Result<Reminder>
    where
        F: FnOnce(&Reminder) -> Result<Reminder>,
    {
        let mut slot = self
            .store
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let next = f(&slot.reminder)?;
        check_id(id, &next)?;
        slot.reminder = next.clone();
        debug!("✓ InMemory UPDATE {}", id);
        Ok(next)
    }
}

/// Store statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreStats {
    pub reminders: usize,
    pub history_items: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Client, ReminderStatus};
    use chrono::NaiveDate;

    fn reminder(id: &str) -> Reminder {
        Reminder::new(
            id,
            format!("INV-{}", id),
            Client::new("c", "Client", "c@example.test", "Contact"),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            10.0,
        )
    }

    #[test]
    fn test_inmemory_backend_insert_get() {
        let backend = InMemoryBackend::new();
        backend.insert(reminder("1")).expect("Failed to insert");

        let found = backend.get("1").expect("Failed to get");
        assert_eq!(found.map(|r| r.invoice_number), Some("INV-1".to_string()));
    }

    #[test]
    fn test_inmemory_backend_miss() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.get("nonexistent").expect("Failed to get"), None);
    }

    #[test]
    fn test_inmemory_backend_rejects_duplicates() {
        let backend = InMemoryBackend::new();
        backend.insert(reminder("1")).expect("Failed to insert");
        assert_eq!(
            backend.insert(reminder("1")),
            Err(Error::DuplicateId("1".to_string()))
        );
    }

    #[test]
    fn test_inmemory_backend_list_preserves_insertion_order() {
        let backend = InMemoryBackend::new();
        for id in ["z", "a", "m", "b"] {
            backend.insert(reminder(id)).expect("Failed to insert");
        }
        backend
            .replace("a", reminder("a").with_status(ReminderStatus::Sent))
            .expect("Failed to replace");

        let ids: Vec<String> = backend
            .list()
            .expect("Failed to list")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["z", "a", "m", "b"]);
    }

    #[test]
    fn test_inmemory_backend_replace() {
        let backend = InMemoryBackend::new();
        backend.insert(reminder("1")).expect("Failed to insert");

        let previous = backend
            .replace("1", reminder("1").with_status(ReminderStatus::Paid))
            .expect("Failed to replace");
        assert_eq!(previous.status, ReminderStatus::Scheduled);
        assert_eq!(
            backend.get("1").expect("Failed to get").map(|r| r.status),
            Some(ReminderStatus::Paid)
        );
    }

    #[test]
    fn test_inmemory_backend_replace_unknown_or_mismatched() {
        let backend = InMemoryBackend::new();
        backend.insert(reminder("1")).expect("Failed to insert");

        assert_eq!(
            backend.replace("9", reminder("9")),
            Err(Error::NotFound("9".to_string()))
        );
        assert!(matches!(
            backend.replace("1", reminder("2")),
            Err(Error::ValidationError(_))
        ));
        assert_eq!(backend.len().expect("Failed to count"), 1);
    }

    #[test]
    fn test_inmemory_backend_update_failure_keeps_record() {
        let backend = InMemoryBackend::new();
        backend.insert(reminder("1")).expect("Failed to insert");

        let result = backend.update("1", |_| Err(Error::Other("refused".to_string())));
        assert!(result.is_err());
        assert_eq!(
            backend.get("1").expect("Failed to get"),
            Some(reminder("1"))
        );

        let updated = backend
            .update("1", |r| Ok(r.clone().with_days_overdue(4)))
            .expect("Failed to update");
        assert_eq!(updated.days_overdue, 4);
    }

    #[test]
    fn test_inmemory_backend_remove() {
        let backend = InMemoryBackend::new();
        backend.insert(reminder("1")).expect("Failed to insert");

        let removed = backend.remove("1").expect("Failed to remove");
        assert_eq!(removed.map(|r| r.id), Some("1".to_string()));
        assert_eq!(backend.remove("1").expect("Failed to remove"), None);
        assert!(backend.is_empty().expect("Failed to count"));
    }

    #[test]
    fn test_inmemory_backend_clone_shares_store() {
        let backend1 = InMemoryBackend::new();
        backend1.insert(reminder("1")).expect("Failed to insert");

        let backend2 = backend1.clone();
        assert!(backend2.contains("1").expect("Failed to check contains"));
        assert_eq!(backend2.stats().reminders, 1);
    }

    #[test]
    fn test_inmemory_backend_thread_safe() {
        let backend = InMemoryBackend::new();
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let b = backend.clone();
                std::thread::spawn(move || {
                    b.insert(reminder(&format!("r{}", i)))
                        .expect("Failed to insert");
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread failed");
        }

        assert_eq!(backend.len().expect("Failed to count"), 10);
    }
}
