//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RowState`: lifecycle of one input row within a session
//! - `DedupLedger`: emails and phone numbers already known
//! - `CrawlState`: everything a resumed session needs, serialized as the checkpoint

mod crawl_state;
mod ledger;
mod row_state;

// Re-export main types
pub use crawl_state::{CrawlState, STATE_VERSION};
pub use ledger::{DedupLedger, TRACKED_FIELDS};
pub use row_state::RowState;
