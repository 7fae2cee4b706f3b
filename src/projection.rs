//! Read-only views over the reminder list: Kanban columns, suggested
//! actions, and totals.
//!
//! All functions are pure and preserve the store order wherever the view
//! does not impose its own.

use crate::entity::{Reminder, ReminderStatus};
use serde::Serialize;

/// Pre-filter applied before grouping reminders into columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoardTab {
    /// No filtering.
    #[default]
    All,
    /// Unpaid reminders that are past due.
    Overdue,
    /// Only reminders in the given status.
    Status(ReminderStatus),
}

impl BoardTab {
    pub fn matches(&self, reminder: &Reminder) -> bool {
        match self {
            BoardTab::All => true,
            BoardTab::Overdue => reminder.is_overdue(),
            BoardTab::Status(status) => reminder.status == *status,
        }
    }
}

/// Reminders partitioned into one column per status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusColumns {
    columns: [Vec<Reminder>; 5],
}

impl StatusColumns {
    /// Reminders in the column for `status`, in store order.
    pub fn get(&self, status: ReminderStatus) -> &[Reminder] {
        &self.columns[status.column_index()]
    }

    /// Columns in board order.
    pub fn iter(&self) -> impl Iterator<Item = (ReminderStatus, &[Reminder])> {
        ReminderStatus::ALL
            .into_iter()
            .map(move |status| (status, self.get(status)))
    }

    /// Total number of reminders across all columns.
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `reminders` (after applying `tab`) into status columns.
pub fn group_by_status(reminders: &[Reminder], tab: BoardTab) -> StatusColumns {
    let mut grouped = StatusColumns::default();
    for reminder in reminders.iter().filter(|r| tab.matches(r)) {
        grouped.columns[reminder.status.column_index()].push(reminder.clone());
    }
    grouped
}

/// Unpaid reminders most in need of attention, at most `limit` of them.
///
/// Ordered by `days_overdue` descending, then status priority descending.
/// Equal keys keep their store order.
pub fn suggested_actions(reminders: &[Reminder], limit: usize) -> Vec<Reminder> {
    let mut candidates: Vec<Reminder> = reminders
        .iter()
        .filter(|r| !r.status.is_paid())
        .cloned()
        .collect();

    candidates.sort_by(|a, b| {
        b.days_overdue
            .cmp(&a.days_overdue)
            .then_with(|| b.status.priority().cmp(&a.status.priority()))
    });
    candidates.truncate(limit);
    candidates
}

/// Headline numbers for the reminders dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub total: usize,
    pub scheduled: usize,
    pub sent: usize,
    pub engaged: usize,
    pub escalated: usize,
    pub paid: usize,
    pub overdue: usize,
    /// Sum of unpaid amounts.
    pub total_outstanding: f64,
    /// Sum of paid amounts.
    pub total_collected: f64,
}

impl BoardSummary {
    pub fn count(&self, status: ReminderStatus) -> usize {
        match status {
            ReminderStatus::Scheduled => self.scheduled,
            ReminderStatus::Sent => self.sent,
            ReminderStatus::Engaged => self.engaged,
            ReminderStatus::Escalated => self.escalated,
            ReminderStatus::Paid => self.paid,
        }
    }
}

pub fn summarize(reminders: &[Reminder]) -> BoardSummary {
    let mut summary = BoardSummary {
        total: reminders.len(),
        ..BoardSummary::default()
    };

    for reminder in reminders {
        match reminder.status {
            ReminderStatus::Scheduled => summary.scheduled += 1,
            ReminderStatus::Sent => summary.sent += 1,
            ReminderStatus::Engaged => summary.engaged += 1,
            ReminderStatus::Escalated => summary.escalated += 1,
            ReminderStatus::Paid => summary.paid += 1,
        }
        if reminder.status.is_paid() {
            summary.total_collected += reminder.amount;
        } else {
            summary.total_outstanding += reminder.amount;
        }
        if reminder.is_overdue() {
            summary.overdue += 1;
        }
    }
    summary
}
