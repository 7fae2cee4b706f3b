//! History id generation.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generator for history item ids.
///
/// Every id handed out is strictly greater than all previous ones, so the
/// order of ids is the chronological order of the events they label. Ids
/// start at 1; once `u64::MAX` has been used the sequence is exhausted and
/// refuses to hand out more.
#[derive(Debug)]
pub struct HistoryIdSequence {
    // Largest id already used, 0 when none.
    last: AtomicU64,
}

impl HistoryIdSequence {
    /// Start handing out ids at `first` (0 is treated as 1).
    pub fn new(first: u64) -> Self {
        HistoryIdSequence {
            last: AtomicU64::new(first.saturating_sub(1)),
        }
    }

    /// Start right after the largest id already in use.
    pub fn starting_after(max_existing: Option<u64>) -> Self {
        HistoryIdSequence {
            last: AtomicU64::new(max_existing.unwrap_or(0)),
        }
    }

    /// Allocate the next id.
    ///
    /// # Errors
    ///
    /// Returns `Error::Other` when every id up to `u64::MAX` is taken.
    pub fn next_id(&self) -> Result<u64> {
        self.last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                last.checked_add(1)
            })
            .map(|last| last + 1)
            .map_err(|_| Error::Other("history id sequence exhausted".to_string()))
    }

    /// The id the next call to `next_id` will return, `None` once exhausted.
    pub fn peek(&self) -> Option<u64> {
        self.last.load(Ordering::SeqCst).checked_add(1)
    }

    /// Never hand out `id` or anything below it again.
    pub fn advance_past(&self, id: u64) {
        self.last.fetch_max(id, Ordering::SeqCst);
    }
}

impl Default for HistoryIdSequence {
    fn default() -> Self {
        Self::new(1)
    }
}
