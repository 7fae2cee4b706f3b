//! Transition engine: pure mapping from (reminder, action) to a new reminder.
//!
//! Every successful transition
//! 1. checks the action against the configured [`TransitionPolicy`],
//! 2. sets the status to the action's target,
//! 3. applies the action's side effects (`last_reminder_sent`, `days_overdue`,
//!    engagement flags),
//! 4. appends exactly one history item.
//!
//! Existing history is never removed or reordered, and the input reminder is
//! never touched; callers get a complete new value back.
//!
//! # Legality table (strict policy)
//!
//! ```text
//! from \ to   scheduled  sent  engaged  escalated  paid
//! scheduled       -       ✓      ✓         ✓        ✓
//! sent            ✓       -      ✓         ✓        ✓
//! engaged         ✓       ✓      -         ✓        ✓
//! escalated       .       .      ✓         -        ✓
//! paid            .       .      .         .        -
//! ```
//!
//! Button actions carry their own preconditions on top: `Escalate` needs
//! `scheduled` or `sent`; `MarkPaid` is accepted in any status; everything
//! else needs a reminder that is not paid.

use crate::action::ReminderAction;
use crate::config::TransitionPolicy;
use crate::entity::{HistoryItem, HistoryKind, HistoryStatus, Reminder, ReminderStatus};
use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Inputs a transition needs from outside the reminder itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionContext {
    /// Date stamped on the history item and on `last_reminder_sent`.
    pub today: NaiveDate,
    /// Id for the appended history item. Must be larger than every id in use.
    pub history_id: u64,
}

impl TransitionContext {
    pub fn new(today: NaiveDate, history_id: u64) -> Self {
        TransitionContext { today, history_id }
    }
}

/// Pure transition function with a configurable legality policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransitionEngine {
    policy: TransitionPolicy,
}

impl TransitionEngine {
    pub fn new(policy: TransitionPolicy) -> Self {
        TransitionEngine { policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Columns a reminder may be dragged to from `from` under the strict policy.
    pub fn legal_targets(from: ReminderStatus) -> &'static [ReminderStatus] {
        use ReminderStatus::*;
        match from {
            Scheduled => &[Sent, Engaged, Escalated, Paid],
            Sent => &[Scheduled, Engaged, Escalated, Paid],
            Engaged => &[Scheduled, Sent, Escalated, Paid],
            Escalated => &[Engaged, Paid],
            Paid => &[],
        }
    }

    /// Whether `action` may be applied to a reminder in status `from`.
    pub fn is_allowed(&self, from: ReminderStatus, action: &ReminderAction) -> bool {
        if self.policy == TransitionPolicy::Permissive {
            return true;
        }
        match action {
            ReminderAction::Escalate => {
                matches!(from, ReminderStatus::Scheduled | ReminderStatus::Sent)
            }
            ReminderAction::MoveTo(target) => Self::legal_targets(from).contains(target),
            // A repeated payment on a paid reminder is still recorded.
            ReminderAction::MarkPaid => true,
            ReminderAction::SendReminder
            | ReminderAction::NegotiatePayment
            | ReminderAction::LogCall
            | ReminderAction::SendMessage
            | ReminderAction::RecordReply => !from.is_paid(),
        }
    }

    /// Actions available for a reminder in status `from`, buttons first,
    /// then drag targets in column order.
    pub fn available_actions(&self, from: ReminderStatus) -> Vec<ReminderAction> {
        let buttons = [
            ReminderAction::SendReminder,
            ReminderAction::Escalate,
            ReminderAction::NegotiatePayment,
            ReminderAction::MarkPaid,
            ReminderAction::LogCall,
            ReminderAction::SendMessage,
            ReminderAction::RecordReply,
        ];
        buttons
            .into_iter()
            .chain(ReminderStatus::ALL.into_iter().map(ReminderAction::MoveTo))
            .filter(|action| self.is_allowed(from, action))
            .collect()
    }

    /// Apply `action` to `reminder`, returning the new reminder value.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` if the policy refuses the action.
    pub fn apply(
        &self,
        reminder: &Reminder,
        action: ReminderAction,
        ctx: &TransitionContext,
    ) -> Result<Reminder> {
        let from = reminder.status;
        if !self.is_allowed(from, &action) {
            return Err(Error::InvalidTransition {
                id: reminder.id.clone(),
                from,
                action,
            });
        }

        let to = action.target_status(from);
        let (kind, message, status) = history_entry(action, to);

        let mut next = reminder.clone();
        next.status = to;

        match action {
            ReminderAction::SendReminder | ReminderAction::Escalate => {
                next.last_reminder_sent = ctx.today;
            }
            ReminderAction::NegotiatePayment | ReminderAction::RecordReply => {
                next.engagement.replied = true;
            }
            ReminderAction::MoveTo(ReminderStatus::Sent | ReminderStatus::Escalated) => {
                next.last_reminder_sent = ctx.today;
            }
            _ => {}
        }
        if to.is_paid() {
            next.days_overdue = 0;
        }

        let next = next.append_history(HistoryItem::new(
            ctx.history_id,
            ctx.today,
            kind,
            message,
            status,
        ));

        debug!(
            "✓ Transition {} on {}: {} -> {} (history #{})",
            action, reminder.id, from, to, ctx.history_id
        );
        Ok(next)
    }
}

/// History item template for an action landing in `target`.
fn history_entry(
    action: ReminderAction,
    target: ReminderStatus,
) -> (HistoryKind, &'static str, HistoryStatus) {
    match action {
        ReminderAction::SendReminder => (HistoryKind::Email, "Reminder sent", HistoryStatus::Opened),
        ReminderAction::Escalate => (
            HistoryKind::Email,
            "Final notice sent",
            HistoryStatus::Opened,
        ),
        ReminderAction::NegotiatePayment => (
            HistoryKind::Email,
            "Payment negotiation offer sent",
            HistoryStatus::Opened,
        ),
        ReminderAction::MarkPaid => (
            HistoryKind::Payment,
            "Payment received",
            HistoryStatus::Completed,
        ),
        ReminderAction::LogCall => (
            HistoryKind::Phone,
            "Follow-up call made",
            HistoryStatus::NoResponse,
        ),
        ReminderAction::SendMessage => (
            HistoryKind::Message,
            "Follow-up message sent",
            HistoryStatus::NotOpened,
        ),
        ReminderAction::RecordReply => (
            HistoryKind::Message,
            "Client replied",
            HistoryStatus::Responded,
        ),
        ReminderAction::MoveTo(_) => match target {
            ReminderStatus::Scheduled => (
                HistoryKind::Message,
                "Reminder scheduled",
                HistoryStatus::Completed,
            ),
            ReminderStatus::Sent => (HistoryKind::Email, "Reminder sent", HistoryStatus::Opened),
            ReminderStatus::Engaged => (
                HistoryKind::Message,
                "Client engaged",
                HistoryStatus::Responded,
            ),
            ReminderStatus::Escalated => (
                HistoryKind::Email,
                "Escalated to final notice",
                HistoryStatus::Opened,
            ),
            ReminderStatus::Paid => (
                HistoryKind::Payment,
                "Payment received",
                HistoryStatus::Completed,
            ),
        },
    }
}
