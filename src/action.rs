//! The fixed set of named actions the presentation layer may invoke.
//!
//! Actions replace ad-hoc button handlers and drag callbacks with one explicit,
//! type-safe vocabulary that the transition engine interprets.
//!
//! | Action | Resulting status |
//! |--------|------------------|
//! | `SendReminder` | `scheduled` → `sent`, otherwise unchanged |
//! | `Escalate` | `escalated` |
//! | `NegotiatePayment` | `engaged` |
//! | `MarkPaid` | `paid` |
//! | `MoveTo(s)` | `s` (drag-and-drop between columns) |
//! | `LogCall`, `SendMessage`, `RecordReply` | unchanged |

use crate::entity::ReminderStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A command addressed to a single reminder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum ReminderAction {
    /// Send (or re-send) a payment reminder email.
    SendReminder,
    /// Send the final notice.
    Escalate,
    /// Offer the client a payment arrangement.
    NegotiatePayment,
    /// Record that the invoice has been settled.
    MarkPaid,
    /// Drag-and-drop the reminder onto another column.
    MoveTo(ReminderStatus),
    /// Log an outbound phone call.
    LogCall,
    /// Send a short follow-up message.
    SendMessage,
    /// Record that the client answered.
    RecordReply,
}

impl ReminderAction {
    /// Communication actions log history without touching the status.
    pub fn is_communication(&self) -> bool {
        matches!(
            self,
            ReminderAction::LogCall | ReminderAction::SendMessage | ReminderAction::RecordReply
        )
    }

    /// Status the reminder ends up in when the action is applied to `current`.
    pub fn target_status(&self, current: ReminderStatus) -> ReminderStatus {
        match self {
            ReminderAction::SendReminder if current == ReminderStatus::Scheduled => {
                ReminderStatus::Sent
            }
            ReminderAction::SendReminder => current,
            ReminderAction::Escalate => ReminderStatus::Escalated,
            ReminderAction::NegotiatePayment => ReminderStatus::Engaged,
            ReminderAction::MarkPaid => ReminderStatus::Paid,
            ReminderAction::MoveTo(target) => *target,
            ReminderAction::LogCall | ReminderAction::SendMessage | ReminderAction::RecordReply => {
                current
            }
        }
    }
}

impl fmt::Display for ReminderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderAction::SendReminder => write!(f, "send reminder"),
            ReminderAction::Escalate => write!(f, "escalate"),
            ReminderAction::NegotiatePayment => write!(f, "negotiate payment"),
            ReminderAction::MarkPaid => write!(f, "mark as paid"),
            ReminderAction::MoveTo(target) => write!(f, "move to {}", target),
            ReminderAction::LogCall => write!(f, "log call"),
            ReminderAction::SendMessage => write!(f, "send message"),
            ReminderAction::RecordReply => write!(f, "record reply"),
        }
    }
}
