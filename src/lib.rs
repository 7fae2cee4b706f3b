//! # dunning-kit
//!
//! A typed reminder lifecycle engine for invoice follow-ups.
//!
//! ## Features
//!
//! - **Explicit state machine:** five statuses, a legality table, and a closed set of actions
//! - **Append-only history:** every transition logs exactly one event
//! - **Immutable updates:** transitions build new values; the store swaps whole records
//! - **Board projections:** Kanban columns, suggested-action ranking, totals
//! - **Deterministic:** "today" and history ids are injected, never ambient
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use dunning_kit::backend::InMemoryBackend;
//! use dunning_kit::clock::FixedClock;
//! use dunning_kit::projection::BoardTab;
//! use dunning_kit::repository::SampleRepository;
//! use dunning_kit::{ReminderBoard, ReminderStatus};
//!
//! // 1. Build the board at the composition root
//! let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let board = ReminderBoard::new(InMemoryBackend::new()).with_clock(FixedClock(today));
//!
//! // 2. Seed it
//! board.seed(&SampleRepository)?;
//!
//! // 3. Drive it with commands
//! let paid = board.mark_paid("5")?;
//! assert_eq!(paid.status, ReminderStatus::Paid);
//! assert_eq!(paid.days_overdue, 0);
//!
//! // 4. Render the views
//! let columns = board.columns(BoardTab::All)?;
//! assert_eq!(columns.get(ReminderStatus::Paid).len(), 2);
//! # Ok::<(), dunning_kit::Error>(())
//! ```

#[macro_use]
extern crate log;

pub mod action;
pub mod backend;
pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod format;
pub mod key;
pub mod observability;
pub mod projection;
pub mod repository;
pub mod service;
pub mod transition;

// Re-exports for convenience
pub use action::ReminderAction;
pub use backend::ReminderBackend;
pub use config::{BoardConfig, TransitionPolicy};
pub use entity::{Client, Engagement, HistoryItem, HistoryKind, HistoryStatus, Reminder, ReminderStatus};
pub use error::{Error, Result};
pub use repository::ReminderRepository;
pub use service::ReminderBoard;
pub use transition::{TransitionContext, TransitionEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
