//! The reminder board: composition root for store, engine, clock and metrics.
//!
//! [`ReminderBoard`] is the only mutation surface for reminders. The
//! presentation layer holds one board per session and calls its commands; it
//! never edits reminder values itself.

use crate::action::ReminderAction;
use crate::backend::ReminderBackend;
use crate::clock::{Clock, SystemClock};
use crate::config::BoardConfig;
use crate::entity::{Reminder, ReminderStatus};
use crate::error::{Error, Result};
use crate::format;
use crate::key::HistoryIdSequence;
use crate::observability::{BoardMetrics, NoOpMetrics};
use crate::projection::{self, BoardSummary, BoardTab, StatusColumns};
use crate::repository::ReminderRepository;
use crate::transition::{TransitionContext, TransitionEngine};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Session-scoped reminder board.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use dunning_kit::backend::InMemoryBackend;
/// use dunning_kit::clock::FixedClock;
/// use dunning_kit::repository::SampleRepository;
/// use dunning_kit::{ReminderBoard, ReminderStatus};
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let board = ReminderBoard::new(InMemoryBackend::new()).with_clock(FixedClock(today));
/// board.seed(&SampleRepository)?;
///
/// let sent = board.send_reminder("1")?;
/// assert_eq!(sent.status, ReminderStatus::Sent);
/// assert!(board.send_reminder("missing").unwrap_err().is_not_found());
/// # Ok::<(), dunning_kit::Error>(())
/// ```
pub struct ReminderBoard<B: ReminderBackend> {
    backend: B,
    engine: TransitionEngine,
    clock: Box<dyn Clock>,
    metrics: Box<dyn BoardMetrics>,
    config: BoardConfig,
    history_ids: HistoryIdSequence,
}

impl<B: ReminderBackend> ReminderBoard<B> {
    /// Create a board with the default configuration.
    pub fn new(backend: B) -> Self {
        ReminderBoard {
            backend,
            engine: TransitionEngine::default(),
            clock: Box::new(SystemClock),
            metrics: Box::new(NoOpMetrics),
            config: BoardConfig::default(),
            history_ids: HistoryIdSequence::default(),
        }
    }

    /// Create a board with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration is invalid.
    pub fn with_config(backend: B, config: BoardConfig) -> Result<Self> {
        config.validate()?;
        let mut board = Self::new(backend);
        board.engine = TransitionEngine::new(config.policy);
        board.config = config;
        Ok(board)
    }

    /// Set the source of "today".
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn BoardMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Load the initial reminders from `repository`.
    ///
    /// Every seed is reconciled (derived fields brought in line with its
    /// history) and validated before anything is stored, so a bad seed leaves
    /// the board unchanged.
    ///
    /// # Errors
    ///
    /// - Whatever the repository returns
    /// - `Error::ValidationError` if a seed violates an invariant
    /// - `Error::DuplicateId` if an id repeats or is already on the board
    pub fn seed<R: ReminderRepository>(&self, repository: &R) -> Result<usize> {
        let seeds: Vec<Reminder> = repository
            .fetch_all()?
            .into_iter()
            .map(Reminder::reconciled)
            .collect();

        let mut seen = HashSet::with_capacity(seeds.len());
        for reminder in &seeds {
            reminder.validate()?;
            if !seen.insert(reminder.id.as_str()) || self.backend.contains(&reminder.id)? {
                return Err(Error::DuplicateId(reminder.id.clone()));
            }
        }

        if let Some(max) = seeds.iter().filter_map(Reminder::max_history_id).max() {
            self.history_ids.advance_past(max);
        }

        let count = seeds.len();
        self.backend.insert_all(seeds)?;
        info!("Seeded reminder board with {} reminders", count);
        Ok(count)
    }

    /// Add one reminder, e.g. when an invoice becomes eligible for follow-up.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError` if the reminder violates an invariant
    /// - `Error::DuplicateId` if the id is taken
    pub fn add(&self, reminder: Reminder) -> Result<()> {
        let reminder = reminder.reconciled();
        reminder.validate()?;
        if let Some(max) = reminder.max_history_id() {
            self.history_ids.advance_past(max);
        }
        self.backend.insert(reminder)
    }

    // ------------------------------------------------------------------------
    // Store access
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `Error::NotFound` if no reminder has that id.
    pub fn get(&self, id: &str) -> Result<Reminder> {
        self.backend
            .get(id)?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// All reminders in board order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend fails.
    pub fn reminders(&self) -> Result<Vec<Reminder>> {
        self.backend.list()
    }

    /// Swap in a complete new value for reminder `id`.
    ///
    /// For edits that are not lifecycle events, such as a new suggested
    /// action or a recomputed `days_overdue`. The replacement must keep the
    /// existing history as a prefix, must not lower any engagement flag, and
    /// must leave `status` and `last_reminder_sent` alone: those only change
    /// through [`ReminderBoard::apply`].
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if no reminder has that id
    /// - `Error::ValidationError` if the replacement breaks an invariant
    pub fn replace(&self, id: &str, reminder: Reminder) -> Result<Reminder> {
        reminder.validate()?;
        let next_max = reminder.max_history_id();
        let stored = self.backend.update(id, |current| {
            if reminder.status != current.status {
                return Err(Error::ValidationError(format!(
                    "reminder {}: status {} -> {} must go through a transition",
                    id, current.status, reminder.status
                )));
            }
            if reminder.last_reminder_sent != current.last_reminder_sent {
                return Err(Error::ValidationError(format!(
                    "reminder {}: last reminder date only moves with a transition",
                    id
                )));
            }
            let kept = current.history.len();
            if reminder.history.len() < kept || reminder.history[..kept] != current.history[..] {
                return Err(Error::ValidationError(format!(
                    "reminder {}: history is append-only",
                    id
                )));
            }
            if current.engagement.merge(reminder.engagement) != reminder.engagement {
                return Err(Error::ValidationError(format!(
                    "reminder {}: engagement flags cannot be cleared",
                    id
                )));
            }
            Ok(reminder)
        })?;
        if let Some(max) = next_max {
            self.history_ids.advance_past(max);
        }
        Ok(stored)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Apply `action` to reminder `id` and store the result.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if no reminder has that id
    /// - `Error::InvalidTransition` if the policy refuses the action
    pub fn apply(&self, id: &str, action: ReminderAction) -> Result<Reminder> {
        let today = self.clock.today();
        let mut from: Option<ReminderStatus> = None;

        let result = self.backend.update(id, |current| {
            from = Some(current.status);
            let ctx = TransitionContext::new(today, self.history_ids.next_id()?);
            let next = self.engine.apply(current, action, &ctx)?;
            next.validate()?;
            Ok(next)
        });

        match (&result, from) {
            (Ok(next), Some(from)) => {
                self.metrics
                    .record_transition(id, &action, from, next.status)
            }
            (Err(Error::InvalidTransition { .. }), Some(from)) => {
                warn!("Refused {} on reminder {} in status {}", action, id, from);
                self.metrics.record_rejected(id, &action, from)
            }
            (Err(Error::NotFound(_)), _) => {
                warn!("Refused {} on unknown reminder {}", action, id);
                self.metrics.record_not_found(id, &action)
            }
            (Err(e), _) => warn!("Failed to apply {} to reminder {}: {}", action, id, e),
            _ => {}
        }
        result
    }

    pub fn send_reminder(&self, id: &str) -> Result<Reminder> {
        self.apply(id, ReminderAction::SendReminder)
    }

    pub fn escalate(&self, id: &str) -> Result<Reminder> {
        self.apply(id, ReminderAction::Escalate)
    }

    pub fn negotiate_payment(&self, id: &str) -> Result<Reminder> {
        self.apply(id, ReminderAction::NegotiatePayment)
    }

    pub fn mark_paid(&self, id: &str) -> Result<Reminder> {
        self.apply(id, ReminderAction::MarkPaid)
    }

    /// Drag-and-drop onto the `target` column.
    pub fn move_to(&self, id: &str, target: ReminderStatus) -> Result<Reminder> {
        self.apply(id, ReminderAction::MoveTo(target))
    }

    pub fn log_call(&self, id: &str) -> Result<Reminder> {
        self.apply(id, ReminderAction::LogCall)
    }

    pub fn send_message(&self, id: &str) -> Result<Reminder> {
        self.apply(id, ReminderAction::SendMessage)
    }

    pub fn record_reply(&self, id: &str) -> Result<Reminder> {
        self.apply(id, ReminderAction::RecordReply)
    }

    /// Actions the engine would accept for reminder `id` right now.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no reminder has that id.
    pub fn available_actions(&self, id: &str) -> Result<Vec<ReminderAction>> {
        let reminder = self.get(id)?;
        Ok(self.engine.available_actions(reminder.status))
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// Kanban columns for the given tab.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend fails.
    pub fn columns(&self, tab: BoardTab) -> Result<StatusColumns> {
        Ok(projection::group_by_status(&self.reminders()?, tab))
    }

    /// Top unpaid reminders by urgency, capped at `suggestion_limit`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend fails.
    pub fn suggested_actions(&self) -> Result<Vec<Reminder>> {
        Ok(projection::suggested_actions(
            &self.reminders()?,
            self.config.suggestion_limit,
        ))
    }

    /// # Errors
    ///
    /// Returns `Err` if the backend fails.
    pub fn summary(&self) -> Result<BoardSummary> {
        Ok(projection::summarize(&self.reminders()?))
    }

    /// Amount in the board currency, e.g. `$2,000.00`.
    pub fn format_amount(&self, reminder: &Reminder) -> String {
        format::format_currency(reminder.amount, &self.config.currency)
    }

    /// Relative label for the last reminder date, e.g. `3 days ago`.
    pub fn last_contacted(&self, reminder: &Reminder) -> String {
        format::format_days_ago(reminder.last_reminder_sent, self.clock.today())
    }

    /// Current reminders as a JSON array (same shape the repository reads).
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializationError` if encoding fails.
    pub fn export_json(&self) -> Result<String> {
        let reminders = self.reminders()?;
        serde_json::to_string_pretty(&reminders)
            .map_err(|e| Error::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::clock::FixedClock;
    use crate::config::TransitionPolicy;
    use crate::entity::{Client, HistoryKind};
    use crate::repository::{InMemoryRepository, JsonRepository, SampleRepository};
    use std::sync::{Arc, Mutex};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn board() -> ReminderBoard<InMemoryBackend> {
        let board = ReminderBoard::new(InMemoryBackend::new()).with_clock(FixedClock(today()));
        board.seed(&SampleRepository).expect("Failed to seed");
        board
    }

    #[derive(Clone, Default)]
    struct RecordingMetrics {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl BoardMetrics for RecordingMetrics {
        fn record_transition(
            &self,
            id: &str,
            _action: &ReminderAction,
            from: ReminderStatus,
            to: ReminderStatus,
        ) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:{}->{}", id, from, to));
        }

        fn record_rejected(&self, id: &str, _action: &ReminderAction, from: ReminderStatus) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:rejected@{}", id, from));
        }

        fn record_not_found(&self, id: &str, _action: &ReminderAction) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:missing", id));
        }
    }

    #[test]
    fn test_seed_loads_sample() {
        let board = board();
        assert_eq!(board.reminders().unwrap().len(), 6);
        let ids: Vec<String> = board.reminders().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_seed_twice_is_rejected() {
        let board = board();
        assert_eq!(
            board.seed(&SampleRepository),
            Err(Error::DuplicateId("1".to_string()))
        );
        assert_eq!(board.reminders().unwrap().len(), 6);
    }

    #[test]
    fn test_seed_with_invalid_reminder_stores_nothing() {
        let mut repo = InMemoryRepository::new();
        let good = SampleRepository.fetch_all().unwrap().remove(0);
        let mut bad = good.clone();
        bad.id = "bad".to_string();
        bad.amount = f64::NAN;
        repo.insert(good);
        repo.insert(bad);

        let board = ReminderBoard::new(InMemoryBackend::new());
        assert!(board.seed(&repo).is_err());
        assert!(board.reminders().unwrap().is_empty());
    }

    #[test]
    fn test_new_history_ids_follow_seeded_ids() {
        let board = board();
        let seeded_max = board
            .reminders()
            .unwrap()
            .iter()
            .filter_map(Reminder::max_history_id)
            .max()
            .unwrap();

        let after = board.log_call("2").unwrap();
        assert!(after.last_history().unwrap().id > seeded_max);
        assert_eq!(after.last_history().unwrap().date, today());
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let board = board();
        let before = board.reminders().unwrap();

        assert!(board.mark_paid("nope").unwrap_err().is_not_found());
        assert!(board.get("nope").unwrap_err().is_not_found());
        assert!(board.available_actions("nope").is_err());
        assert_eq!(board.reminders().unwrap(), before);
    }

    #[test]
    fn test_metrics_hooks() {
        let metrics = RecordingMetrics::default();
        let events = metrics.events.clone();
        let board = ReminderBoard::new(InMemoryBackend::new())
            .with_clock(FixedClock(today()))
            .with_metrics(Box::new(metrics));
        board.seed(&SampleRepository).unwrap();

        board.send_reminder("1").unwrap();
        board.move_to("6", ReminderStatus::Scheduled).unwrap_err();
        board.escalate("missing").unwrap_err();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["1:scheduled->sent", "6:rejected@paid", "missing:missing"]
        );
    }

    struct CaptureLogger {
        warnings: Mutex<Vec<String>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.warnings
                    .lock()
                    .unwrap()
                    .push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        warnings: Mutex::new(Vec::new()),
    };

    #[test]
    fn test_default_board_warns_on_refusals() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Warn);

        let board = board();
        board.escalate("4").unwrap_err();
        board.send_reminder("ghost-42").unwrap_err();

        let warnings = LOGGER.warnings.lock().unwrap();
        assert!(warnings
            .iter()
            .any(|w| w == "Refused escalate on reminder 4 in status engaged"));
        assert!(warnings
            .iter()
            .any(|w| w == "Refused send reminder on unknown reminder ghost-42"));
    }

    #[test]
    fn test_rejected_transition_leaves_record() {
        let board = board();
        let before = board.get("4").unwrap();
        let err = board.escalate("4").unwrap_err();
        assert!(err.is_invalid_transition());
        assert_eq!(board.get("4").unwrap(), before);
    }

    #[test]
    fn test_permissive_board_reopens_paid() {
        let config = BoardConfig::default().with_policy(TransitionPolicy::Permissive);
        let board = ReminderBoard::with_config(InMemoryBackend::new(), config)
            .unwrap()
            .with_clock(FixedClock(today()));
        board.seed(&SampleRepository).unwrap();

        let reopened = board.move_to("6", ReminderStatus::Sent).unwrap();
        assert_eq!(reopened.status, ReminderStatus::Sent);
        assert_eq!(reopened.last_reminder_sent, today());
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = BoardConfig::default().with_suggestion_limit(0);
        assert!(ReminderBoard::with_config(InMemoryBackend::new(), config).is_err());
    }

    #[test]
    fn test_replace_enforces_append_only_history() {
        let board = board();
        let mut truncated = board.get("2").unwrap();
        truncated.history.pop();
        assert!(matches!(
            board.replace("2", truncated),
            Err(Error::ValidationError(_))
        ));

        let edited = board
            .get("2")
            .unwrap()
            .with_suggested_action("Call accounts payable");
        board.replace("2", edited).unwrap();
        assert_eq!(
            board.get("2").unwrap().suggested_action,
            "Call accounts payable"
        );
    }

    #[test]
    fn test_replace_refuses_status_change() {
        let board = board();
        let paid = board.get("6").unwrap();
        let reopened = paid
            .clone()
            .with_status(ReminderStatus::Scheduled)
            .with_days_overdue(30);
        assert!(matches!(
            board.replace("6", reopened),
            Err(Error::ValidationError(_))
        ));
        assert_eq!(board.get("6").unwrap(), paid);

        let resent = board.get("1").unwrap().with_last_reminder_sent(today());
        assert!(board.replace("1", resent).is_err());

        let aged = board.get("1").unwrap().with_days_overdue(15);
        assert_eq!(board.replace("1", aged).unwrap().days_overdue, 15);
    }

    #[test]
    fn test_exhausted_history_ids_are_refused() {
        let mut seed = SampleRepository.fetch_all().unwrap().remove(0);
        seed.history.last_mut().unwrap().id = u64::MAX;
        let board = ReminderBoard::new(InMemoryBackend::new()).with_clock(FixedClock(today()));
        board.seed(&InMemoryRepository::from(vec![seed])).unwrap();
        let before = board.get("1").unwrap();

        assert!(board.log_call("1").is_err());
        assert!(board.log_call("1").is_err());
        let after = board.get("1").unwrap();
        assert_eq!(after, before);
        assert!(after.validate().is_ok());
    }

    #[test]
    fn test_replace_refuses_clearing_engagement() {
        let board = board();
        let mut cleared = board.get("4").unwrap();
        cleared.engagement.replied = false;
        assert!(board.replace("4", cleared).is_err());
    }

    #[test]
    fn test_views() {
        let board = board();
        let columns = board.columns(BoardTab::All).unwrap();
        assert_eq!(columns.get(ReminderStatus::Sent).len(), 2);

        let ids: Vec<String> = board
            .suggested_actions()
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["3", "2", "5", "1", "4"]);

        let summary = board.summary().unwrap();
        assert_eq!(summary.total, 6);
        assert_eq!(summary.total_collected, 12000.0);
    }

    #[test]
    fn test_formatting_helpers_use_board_settings() {
        let board = board();
        let reminder = board.get("5").unwrap();
        assert_eq!(board.format_amount(&reminder), "$2,000.00");
        assert_eq!(board.last_contacted(&reminder), "4 days ago");

        let sent = board.send_reminder("5").unwrap();
        assert_eq!(board.last_contacted(&sent), "Today");
    }

    #[test]
    fn test_export_round_trips_through_json_repository() {
        let board = board();
        board.negotiate_payment("3").unwrap();

        let exported = board.export_json().unwrap();
        let restored = ReminderBoard::new(InMemoryBackend::new());
        restored.seed(&JsonRepository::new(exported)).unwrap();

        assert_eq!(restored.reminders().unwrap(), board.reminders().unwrap());
        let three = restored.get("3").unwrap();
        assert_eq!(three.status, ReminderStatus::Engaged);
        assert_eq!(three.last_history().unwrap().kind, HistoryKind::Email);
    }

    #[test]
    fn test_add_single_reminder() {
        let board = board();
        let reminder = Reminder::new(
            "7",
            "INV-2024-007",
            Client::new("c7", "Hooli", "ap@hooli.example", "Gavin Belson"),
            today(),
            42.0,
        );
        board.add(reminder.clone()).unwrap();
        assert_eq!(board.add(reminder), Err(Error::DuplicateId("7".to_string())));
        assert_eq!(board.reminders().unwrap().last().unwrap().id, "7");
    }
}
