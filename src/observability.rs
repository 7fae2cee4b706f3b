//! Hooks for monitoring board activity.
//!
//! Implement [`BoardMetrics`] to feed transition counts into your monitoring
//! system:
//!
//! ```
//! use dunning_kit::observability::BoardMetrics;
//! use dunning_kit::{ReminderAction, ReminderStatus};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct CountingMetrics {
//!     transitions: AtomicUsize,
//! }
//!
//! impl BoardMetrics for CountingMetrics {
//!     fn record_transition(
//!         &self,
//!         _id: &str,
//!         _action: &ReminderAction,
//!         _from: ReminderStatus,
//!         _to: ReminderStatus,
//!     ) {
//!         self.transitions.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//! ```
//!
//! The trait's default methods log through the `log` crate; [`LogMetrics`]
//! uses them as-is and [`NoOpMetrics`] (the board default) silences them.

use crate::action::ReminderAction;
use crate::entity::ReminderStatus;

/// Trait for board metrics collection.
pub trait BoardMetrics: Send + Sync {
    /// Record an applied transition.
    fn record_transition(
        &self,
        id: &str,
        action: &ReminderAction,
        from: ReminderStatus,
        to: ReminderStatus,
    ) {
        debug!("Reminder {}: {} ({} -> {})", id, action, from, to);
    }

    /// Record an action the engine refused.
    fn record_rejected(&self, id: &str, action: &ReminderAction, from: ReminderStatus) {
        debug!("Reminder {}: refused {} in status {}", id, action, from);
    }

    /// Record an action addressed to an unknown reminder.
    fn record_not_found(&self, id: &str, action: &ReminderAction) {
        debug!("Reminder {}: {} ignored, no such reminder", id, action);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl BoardMetrics for NoOpMetrics {
    fn record_transition(
        &self,
        _id: &str,
        _action: &ReminderAction,
        _from: ReminderStatus,
        _to: ReminderStatus,
    ) {
    }
    fn record_rejected(&self, _id: &str, _action: &ReminderAction, _from: ReminderStatus) {}
    fn record_not_found(&self, _id: &str, _action: &ReminderAction) {}
}

/// Metrics that only log.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl BoardMetrics for LogMetrics {}
