//! Reminder store backends.

use crate::entity::Reminder;
use crate::error::{Error, Result};

pub mod inmemory;

pub use inmemory::{InMemoryBackend, StoreStats};

/// Trait for reminder store implementations.
///
/// Holds the canonical, ordered list of reminders for a session. Records are
/// only ever swapped whole: there is no partial-update surface. `remove`
/// exists to undo a failed batch insert.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self`.
/// Implementations should use interior mutability.
pub trait ReminderBackend: Send + Sync + Clone {
    /// Look up a reminder by id.
    ///
    /// # Returns
    /// - `Ok(Some(reminder))` - Reminder found
    /// - `Ok(None)` - No reminder with that id
    ///
    /// # Errors
    /// Returns `Err` if the backend itself fails
    fn get(&self, id: &str) -> Result<Option<Reminder>>;

    /// Add a new reminder at the end of the list.
    ///
    /// # Errors
    /// Returns `Error::DuplicateId` if the id is already present
    fn insert(&self, reminder: Reminder) -> Result<()>;

    /// Swap the record stored under `id` for `reminder`, keeping its position.
    ///
    /// Returns the previous value.
    ///
    /// # Errors
    /// - `Error::NotFound` if no reminder has that id
    /// - `Error::ValidationError` if `reminder.id` differs from `id`
    fn replace(&self, id: &str, reminder: Reminder) -> Result<Reminder>;

    /// Drop the reminder stored under `id`, returning it if it was present.
    ///
    /// # Errors
    /// Returns `Err` if the backend itself fails
    fn remove(&self, id: &str) -> Result<Option<Reminder>>;

    /// All reminders in insertion order.
    ///
    /// # Errors
    /// Returns `Err` if the backend itself fails
    fn list(&self) -> Result<Vec<Reminder>>;

    /// Number of reminders held.
    ///
    /// # Errors
    /// Returns `Err` if the backend itself fails
    fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    /// # Errors
    /// Returns `Err` if the backend itself fails
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// # Errors
    /// Returns `Err` if the backend itself fails
    fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Read-modify-write of a single record.
    ///
    /// `f` receives the current value and returns its replacement. If `f`
    /// fails, the stored record is left as it was.
    ///
    /// Default implementation is `get` followed by `replace`; backends that
    /// can hold a per-record lock should override it.
    ///
    /// # Errors
    /// - `Error::NotFound` if no reminder has that id
    /// - Whatever `f` returns
    fn update<F>(&self, id: &str, f: F) -> Result<Reminder>
    where
        F: FnOnce(&Reminder) -> Result<Reminder>,
    {
        let current = self
            .get(id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let next = f(&current)?;
        self.replace(id, next.clone())?;
        Ok(next)
    }

    /// Insert many reminders, all or nothing.
    ///
    /// On the first failure every reminder this call already inserted is
    /// removed again before the error is returned.
    ///
    /// # Errors
    /// Returns the first insert error
    fn insert_all(&self, reminders: Vec<Reminder>) -> Result<()> {
        let mut inserted: Vec<String> = Vec::with_capacity(reminders.len());
        for reminder in reminders {
            let id = reminder.id.clone();
            if let Err(e) = self.insert(reminder) {
                for done in inserted.iter().rev() {
                    if let Err(undo) = self.remove(done) {
                        warn!("Failed to roll back reminder {}: {}", done, undo);
                    }
                }
                return Err(e);
            }
            inserted.push(id);
        }
        Ok(())
    }
}
