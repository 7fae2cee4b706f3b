//! Basic usage example of the reminder board.

use chrono::NaiveDate;
use dunning_kit::backend::InMemoryBackend;
use dunning_kit::clock::FixedClock;
use dunning_kit::error::{Error, Result};
use dunning_kit::format::format_currency;
use dunning_kit::observability::LogMetrics;
use dunning_kit::projection::BoardTab;
use dunning_kit::repository::SampleRepository;
use dunning_kit::{ReminderBoard, ReminderStatus};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Dunning Kit - Basic Example ===\n");

    // 1. Build the board
    println!("1. Building the board with a fixed clock...");
    let today = NaiveDate::from_ymd_opt(2024, 3, 15)
        .ok_or_else(|| Error::Other("invalid date".to_string()))?;
    let board = ReminderBoard::new(InMemoryBackend::new())
        .with_clock(FixedClock(today))
        .with_metrics(Box::new(LogMetrics));
    println!("   ✓ Board ready\n");

    // 2. Seed the demo data
    println!("2. Seeding sample reminders:");
    let count = board.seed(&SampleRepository)?;
    println!("   ✓ {} reminders loaded\n", count);

    // 3. Columns
    println!("3. Board columns:");
    let columns = board.columns(BoardTab::All)?;
    for (status, column) in columns.iter() {
        let ids: Vec<&str> = column.iter().map(|r| r.id.as_str()).collect();
        println!("   {:<10} {:?}", status, ids);
    }
    println!();

    // 4. Suggested actions
    println!("4. Suggested actions:");
    for reminder in board.suggested_actions()? {
        println!(
            "   {} {} {} overdue {} days (last contact: {})",
            reminder.invoice_number,
            reminder.client.name,
            board.format_amount(&reminder),
            reminder.days_overdue,
            board.last_contacted(&reminder)
        );
    }
    println!();

    // 5. Drive the lifecycle
    println!("5. Sending a reminder and escalating INV-2024-001:");
    board.send_reminder("1")?;
    let escalated = board.escalate("1")?;
    println!("   ✓ Reminder 1 is now {}\n", escalated.status);

    // 6. Refused transition
    println!("6. Dragging a paid reminder back to scheduled:");
    match board.move_to("6", ReminderStatus::Scheduled) {
        Ok(_) => println!("   ✗ Unexpectedly accepted\n"),
        Err(e) => println!("   ✓ Refused: {}\n", e),
    }

    // 7. Payment
    println!("7. Marking INV-2024-005 as paid:");
    let paid = board.mark_paid("5")?;
    println!(
        "   ✓ Reminder 5 is {} with {} history entries\n",
        paid.status,
        paid.history.len()
    );

    // 8. Summary
    let summary = board.summary()?;
    println!("8. Summary:");
    println!("   Paid: {}, overdue: {}", summary.paid, summary.overdue);
    println!(
        "   Outstanding: {}",
        format_currency(summary.total_outstanding, &board.config().currency)
    );
    println!(
        "   Collected:   {}",
        format_currency(summary.total_collected, &board.config().currency)
    );

    println!("\n=== Example Complete ===\n");
    Ok(())
}
