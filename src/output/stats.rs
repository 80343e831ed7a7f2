//! Session statistics and checkpoint status reports
//!
//! Both reports go to stdout; progress during a run goes through tracing.

use crate::state::CrawlState;
use std::time::Duration;

/// Summary of one crawl session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReport {
    /// Rows fetched and recorded during this session
    pub processed: usize,

    /// Rows whose fetch succeeded
    pub succeeded: usize,

    /// Rows recorded as failures (empty extraction fields)
    pub failed: usize,

    /// Rows already recorded by an earlier session
    pub skipped: usize,

    /// Emails reported for the first time during this session
    pub new_emails: usize,

    /// Phone numbers reported for the first time during this session
    pub new_phones: usize,

    /// Index of the last recorded row after the session (-1 if none)
    pub last_completed_index: i64,

    /// Input rows still waiting to be processed
    pub remaining: usize,

    /// Wall-clock duration of the session
    pub elapsed: Duration,
}

impl SessionReport {
    /// Share of processed rows that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        if self.processed > 0 {
            (self.succeeded as f64 / self.processed as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints the end-of-session summary
pub fn print_report(report: &SessionReport) {
    println!("=== Session Summary ===\n");

    println!("Rows:");
    println!("  Processed this session: {}", report.processed);
    println!("  Succeeded: {}", report.succeeded);
    println!("  Failed: {}", report.failed);
    println!("  Already recorded: {}", report.skipped);
    println!("  Remaining: {}", report.remaining);
    println!();

    println!("New contacts:");
    println!("  Emails: {}", report.new_emails);
    println!("  Phone numbers: {}", report.new_phones);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} rows) in {:.1}s",
        report.success_rate(),
        report.succeeded,
        report.processed,
        report.elapsed.as_secs_f64()
    );
    println!("Last completed index: {}", report.last_completed_index);
}

/// Snapshot of a stored checkpoint, shown by `--status`
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointStatus {
    pub rows_total: usize,
    pub rows_recorded: usize,
    pub last_completed_index: i64,
    pub known_emails: usize,
    pub known_phones: usize,
    pub dedup_enabled: bool,
    pub updated_at: Option<String>,
}

impl CheckpointStatus {
    /// Builds a status from an optional checkpoint and the input size
    pub fn new(state: Option<&CrawlState>, rows_total: usize) -> Self {
        match state {
            Some(state) => Self {
                rows_total,
                rows_recorded: state.rows_recorded(),
                last_completed_index: state.last_completed_index,
                known_emails: state.ledger.email_count(),
                known_phones: state.ledger.phone_count(),
                dedup_enabled: state.ledger.is_enabled(),
                updated_at: Some(state.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
            },
            None => Self {
                rows_total,
                rows_recorded: 0,
                last_completed_index: -1,
                known_emails: 0,
                known_phones: 0,
                dedup_enabled: true,
                updated_at: None,
            },
        }
    }

    pub fn remaining(&self) -> usize {
        self.rows_total.saturating_sub(self.rows_recorded)
    }
}

/// Prints the checkpoint status
pub fn print_status(status: &CheckpointStatus) {
    println!("=== Checkpoint Status ===\n");

    match &status.updated_at {
        Some(updated_at) => println!("Last saved: {}", updated_at),
        None => println!("No checkpoint found, the next run starts from the first row"),
    }
    println!();

    let percentage = if status.rows_total > 0 {
        (status.rows_recorded as f64 / status.rows_total as f64) * 100.0
    } else {
        0.0
    };

    println!("Progress:");
    println!(
        "  Rows recorded: {} / {} ({:.1}%)",
        status.rows_recorded, status.rows_total, percentage
    );
    println!("  Last completed index: {}", status.last_completed_index);
    println!("  Remaining: {}", status.remaining());
    println!();

    println!("Known contacts:");
    if status.dedup_enabled {
        println!("  Emails: {}", status.known_emails);
        println!("  Phone numbers: {}", status.known_phones);
    } else {
        println!("  Deduplication disabled");
    }
}
