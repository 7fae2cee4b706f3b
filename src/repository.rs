//! Seed sources for the reminder board.
//!
//! The board does not know where reminders come from. At start-up it asks a
//! [`ReminderRepository`] for the initial list, validates it, and owns the
//! records from then on.
//!
//! Provided implementations:
//! - [`InMemoryRepository`]: hand-built lists, mostly for tests
//! - [`JsonRepository`]: the camelCase JSON shape the presentation layer uses
//! - [`SampleRepository`]: the bundled demo dataset

use crate::entity::{
    Client, Engagement, HistoryItem, HistoryKind, HistoryStatus, Reminder, ReminderStatus,
};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;

/// Trait for seed data sources.
pub trait ReminderRepository: Send + Sync {
    /// Load every reminder, in board order.
    ///
    /// # Errors
    /// Returns `Err` if the source is unavailable or malformed
    fn fetch_all(&self) -> Result<Vec<Reminder>>;

    /// Count reminders (optional, for statistics).
    ///
    /// # Errors
    /// Returns `Err` if the source is unavailable or malformed
    fn count(&self) -> Result<u64> {
        Ok(self.fetch_all()?.len() as u64)
    }
}

// ============================================================================
// In-Memory Repository
// ============================================================================

/// Repository over a list built in code.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRepository {
    data: Vec<Reminder>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        InMemoryRepository { data: Vec::new() }
    }

    /// Append a reminder to the seed list.
    pub fn insert(&mut self, reminder: Reminder) {
        self.data.push(reminder);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<Reminder>> for InMemoryRepository {
    fn from(data: Vec<Reminder>) -> Self {
        InMemoryRepository { data }
    }
}

impl ReminderRepository for InMemoryRepository {
    fn fetch_all(&self) -> Result<Vec<Reminder>> {
        Ok(self.data.clone())
    }

    fn count(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }
}

// ============================================================================
// JSON Repository
// ============================================================================

/// Repository over a JSON array of reminders.
#[derive(Clone, Debug)]
pub struct JsonRepository {
    json: String,
}

impl JsonRepository {
    pub fn new(json: impl Into<String>) -> Self {
        JsonRepository { json: json.into() }
    }

    /// # Errors
    /// Returns `Err` if the reader fails
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Ok(Self::new(json))
    }

    /// # Errors
    /// Returns `Err` if the file cannot be read
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Other(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Ok(Self::new(json))
    }
}

impl ReminderRepository for JsonRepository {
    fn fetch_all(&self) -> Result<Vec<Reminder>> {
        let reminders: Vec<Reminder> = serde_json::from_str(&self.json)?;
        Ok(reminders)
    }
}

// ============================================================================
// Sample Repository
// ============================================================================

/// The demo dataset shown on a fresh board.
#[derive(Clone, Copy, Debug, Default)]
pub struct SampleRepository;

fn ymd(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| Error::Other(format!("invalid sample date {}-{}-{}", y, m, d)))
}

fn entry(
    id: u64,
    date: NaiveDate,
    kind: HistoryKind,
    message: &str,
    status: HistoryStatus,
) -> HistoryItem {
    HistoryItem::new(id, date, kind, message, status)
}

impl ReminderRepository for SampleRepository {
    fn fetch_all(&self) -> Result<Vec<Reminder>> {
        use HistoryKind::*;
        use HistoryStatus::*;

        Ok(vec![
            Reminder::new(
                "1",
                "INV-2024-001",
                Client::new("c1", "Acme Corporation", "billing@acme.example", "John Smith"),
                ymd(2024, 3, 1)?,
                1500.0,
            )
            .with_status(ReminderStatus::Scheduled)
            .with_last_reminder_sent(ymd(2024, 3, 5)?)
            .with_days_overdue(14)
            .with_history(vec![entry(
                1,
                ymd(2024, 3, 5)?,
                Message,
                "Reminder scheduled",
                Completed,
            )])
            .with_suggested_action("Send first reminder"),
            Reminder::new(
                "2",
                "INV-2024-002",
                Client::new("c2", "Globex Inc", "accounts@globex.example", "Sarah Connor"),
                ymd(2024, 2, 20)?,
                3250.0,
            )
            .with_status(ReminderStatus::Sent)
            .with_last_reminder_sent(ymd(2024, 3, 8)?)
            .with_days_overdue(24)
            .with_history(vec![
                entry(2, ymd(2024, 2, 27)?, Email, "Reminder sent", Opened),
                entry(3, ymd(2024, 3, 8)?, Email, "Reminder sent", NotOpened),
            ])
            .with_engagement(Engagement {
                email_opened: true,
                replied: false,
                ignored: false,
            })
            .with_suggested_action("Follow up by phone"),
            Reminder::new(
                "3",
                "INV-2024-003",
                Client::new("c3", "Initech", "finance@initech.example", "Bill Lumbergh"),
                ymd(2024, 2, 1)?,
                780.5,
            )
            .with_status(ReminderStatus::Escalated)
            .with_last_reminder_sent(ymd(2024, 3, 10)?)
            .with_days_overdue(43)
            .with_history(vec![
                entry(4, ymd(2024, 2, 8)?, Email, "Reminder sent", NotOpened),
                entry(5, ymd(2024, 2, 22)?, Phone, "Follow-up call made", NoResponse),
                entry(6, ymd(2024, 3, 10)?, Email, "Final notice sent", NotOpened),
            ])
            .with_engagement(Engagement {
                email_opened: false,
                replied: false,
                ignored: true,
            })
            .with_suggested_action("Consider collections agency"),
            Reminder::new(
                "4",
                "INV-2024-004",
                Client::new("c4", "Umbrella Corp", "ap@umbrella.example", "Alice Abernathy"),
                ymd(2024, 3, 4)?,
                5400.0,
            )
            .with_status(ReminderStatus::Engaged)
            .with_last_reminder_sent(ymd(2024, 3, 9)?)
            .with_days_overdue(11)
            .with_history(vec![
                entry(7, ymd(2024, 3, 6)?, Email, "Reminder sent", Opened),
                entry(8, ymd(2024, 3, 9)?, Message, "Client engaged", Responded),
            ])
            .with_engagement(Engagement {
                email_opened: true,
                replied: true,
                ignored: false,
            })
            .with_suggested_action("Offer payment plan"),
            Reminder::new(
                "5",
                "INV-2024-005",
                Client::new("c5", "Stark Industries", "payables@stark.example", "Pepper Potts"),
                ymd(2024, 2, 26)?,
                2000.0,
            )
            .with_status(ReminderStatus::Sent)
            .with_last_reminder_sent(ymd(2024, 3, 11)?)
            .with_days_overdue(18)
            .with_history(vec![entry(9, ymd(2024, 3, 11)?, Email, "Reminder sent", Opened)])
            .with_engagement(Engagement {
                email_opened: true,
                replied: false,
                ignored: false,
            })
            .with_suggested_action("Send second reminder"),
            Reminder::new(
                "6",
                "INV-2024-006",
                Client::new("c6", "Wayne Enterprises", "invoices@wayne.example", "Lucius Fox"),
                ymd(2024, 3, 1)?,
                12000.0,
            )
            .with_status(ReminderStatus::Paid)
            .with_last_reminder_sent(ymd(2024, 3, 3)?)
            .with_history(vec![
                entry(10, ymd(2024, 3, 3)?, Email, "Reminder sent", Opened),
                entry(11, ymd(2024, 3, 7)?, Payment, "Payment received", Completed),
            ])
            .with_engagement(Engagement {
                email_opened: true,
                replied: true,
                ignored: false,
            })
            .with_suggested_action("No action needed"),
        ])
    }
}
