//! Output module for everything a session writes besides the checkpoint
//!
//! This module handles:
//! - Appending extracted rows to the output CSV
//! - The per-row outcome log
//! - Session statistics and status reports

mod crawl_log;
mod csv_output;
pub mod stats;
mod traits;

pub use crawl_log::CrawlLog;
pub use csv_output::{read_data_rows, CsvOutput, OutputRows};
pub use stats::{print_report, print_status, CheckpointStatus, SessionReport};
pub use traits::{OutputError, OutputResult};
