//! Reminder data model: statuses, history log, engagement flags.
//!
//! Field names serialize in camelCase so seed data can be shared with the
//! presentation layer unchanged.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest invoice amount a reminder may carry. Keeps every amount exactly
/// representable in cents for formatting and totals.
pub const MAX_AMOUNT: f64 = 1e15;

/// Lifecycle status of a reminder. One Kanban column per variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Scheduled,
    Sent,
    Engaged,
    Escalated,
    Paid,
}

impl ReminderStatus {
    /// All statuses in column order.
    pub const ALL: [ReminderStatus; 5] = [
        ReminderStatus::Scheduled,
        ReminderStatus::Sent,
        ReminderStatus::Engaged,
        ReminderStatus::Escalated,
        ReminderStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Scheduled => "scheduled",
            ReminderStatus::Sent => "sent",
            ReminderStatus::Engaged => "engaged",
            ReminderStatus::Escalated => "escalated",
            ReminderStatus::Paid => "paid",
        }
    }

    /// Position of the status' column on the board.
    pub fn column_index(&self) -> usize {
        match self {
            ReminderStatus::Scheduled => 0,
            ReminderStatus::Sent => 1,
            ReminderStatus::Engaged => 2,
            ReminderStatus::Escalated => 3,
            ReminderStatus::Paid => 4,
        }
    }

    /// Urgency used as the secondary key when ranking suggested actions.
    pub fn priority(&self) -> u8 {
        match self {
            ReminderStatus::Escalated => 4,
            ReminderStatus::Sent => 3,
            ReminderStatus::Scheduled => 2,
            ReminderStatus::Engaged => 1,
            ReminderStatus::Paid => 0,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, ReminderStatus::Paid)
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ReminderStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::ValidationError(format!("unknown reminder status: {}", s)))
    }
}

/// Channel of a logged history event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Email,
    Phone,
    Payment,
    Message,
}

/// Outcome recorded on a history event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    Opened,
    NotOpened,
    Responded,
    NoResponse,
    Completed,
}

/// One immutable logged event on a reminder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Generation order of ids is chronological order.
    pub id: u64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub message: String,
    pub status: HistoryStatus,
}

impl HistoryItem {
    pub fn new(
        id: u64,
        date: NaiveDate,
        kind: HistoryKind,
        message: impl Into<String>,
        status: HistoryStatus,
    ) -> Self {
        HistoryItem {
            id,
            date,
            kind,
            message: message.into(),
            status,
        }
    }

    /// An email the client is known to have opened.
    pub fn is_opened_email(&self) -> bool {
        self.kind == HistoryKind::Email && self.status == HistoryStatus::Opened
    }
}

/// Observed client response flags. Each flag only ever moves towards `true`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Engagement {
    pub email_opened: bool,
    pub replied: bool,
    pub ignored: bool,
}

impl Engagement {
    /// Flag-wise OR of two engagement records.
    pub fn merge(self, other: Engagement) -> Engagement {
        Engagement {
            email_opened: self.email_opened || other.email_opened,
            replied: self.replied || other.replied,
            ignored: self.ignored || other.ignored,
        }
    }
}

/// Reference data for the invoiced client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact_person: String,
}

impl Client {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        contact_person: impl Into<String>,
    ) -> Self {
        Client {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            contact_person: contact_person.into(),
        }
    }
}

/// A tracked follow-up for one outstanding invoice.
///
/// Values are never mutated in place by the engine: every transition builds a
/// complete new `Reminder` which the store swaps in whole.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub invoice_number: String,
    pub client: Client,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub last_reminder_sent: NaiveDate,
    pub status: ReminderStatus,
    /// Append-only, in chronological order.
    #[serde(default)]
    pub history: Vec<HistoryItem>,
    #[serde(default)]
    pub engagement: Engagement,
    /// Advisory text for the operator. Never interpreted.
    #[serde(default)]
    pub suggested_action: String,
    #[serde(default)]
    pub days_overdue: u32,
}

impl Reminder {
    /// Create a scheduled reminder with an empty history.
    pub fn new(
        id: impl Into<String>,
        invoice_number: impl Into<String>,
        client: Client,
        due_date: NaiveDate,
        amount: f64,
    ) -> Self {
        Reminder {
            id: id.into(),
            invoice_number: invoice_number.into(),
            client,
            due_date,
            amount,
            last_reminder_sent: due_date,
            status: ReminderStatus::Scheduled,
            history: Vec::new(),
            engagement: Engagement::default(),
            suggested_action: String::new(),
            days_overdue: 0,
        }
    }

    pub fn with_status(mut self, status: ReminderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_days_overdue(mut self, days: u32) -> Self {
        self.days_overdue = days;
        self
    }

    pub fn with_last_reminder_sent(mut self, date: NaiveDate) -> Self {
        self.last_reminder_sent = date;
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryItem>) -> Self {
        self.history = history;
        self
    }

    pub fn with_engagement(mut self, engagement: Engagement) -> Self {
        self.engagement = engagement;
        self
    }

    pub fn with_suggested_action(mut self, text: impl Into<String>) -> Self {
        self.suggested_action = text.into();
        self
    }

    /// Append one history item, raising `email_opened` when the item is an
    /// opened email.
    pub fn append_history(mut self, item: HistoryItem) -> Self {
        if item.is_opened_email() {
            self.engagement.email_opened = true;
        }
        self.history.push(item);
        self
    }

    pub fn last_history(&self) -> Option<&HistoryItem> {
        self.history.last()
    }

    /// Largest history id on this reminder, if any.
    pub fn max_history_id(&self) -> Option<u64> {
        self.history.iter().map(|item| item.id).max()
    }

    pub fn is_overdue(&self) -> bool {
        !self.status.is_paid() && self.days_overdue > 0
    }

    /// Bring derived fields in line with the history and status.
    ///
    /// Used on seed data only; never lowers an engagement flag.
    pub fn reconciled(mut self) -> Self {
        if self.history.iter().any(HistoryItem::is_opened_email) {
            self.engagement.email_opened = true;
        }
        if self.status.is_paid() {
            self.days_overdue = 0;
        }
        self
    }

    /// Check the data model invariants.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` describing the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::ValidationError("reminder id is empty".to_string()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::ValidationError(format!(
                "reminder {}: amount must be a non-negative number, got {}",
                self.id, self.amount
            )));
        }
        if self.amount > MAX_AMOUNT {
            return Err(Error::ValidationError(format!(
                "reminder {}: amount {} exceeds the maximum of {}",
                self.id, self.amount, MAX_AMOUNT
            )));
        }
        if self.status.is_paid() && self.days_overdue != 0 {
            return Err(Error::ValidationError(format!(
                "reminder {}: paid reminders cannot be {} days overdue",
                self.id, self.days_overdue
            )));
        }
        if self
            .history
            .windows(2)
            .any(|pair| pair[0].id >= pair[1].id)
        {
            return Err(Error::ValidationError(format!(
                "reminder {}: history ids must be unique and increasing",
                self.id
            )));
        }
        if !self.engagement.email_opened && self.history.iter().any(HistoryItem::is_opened_email)
        {
            return Err(Error::ValidationError(format!(
                "reminder {}: opened email in history but engagement.emailOpened is false",
                self.id
            )));
        }
        Ok(())
    }
}
