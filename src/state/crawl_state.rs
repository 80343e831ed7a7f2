use crate::config::Config;
use crate::state::DedupLedger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current checkpoint format; other versions are not loaded
pub const STATE_VERSION: u32 = 1;

/// Everything a session needs to resume where the previous one stopped
///
/// `last_completed_index` is the 0-based index of the last input row whose
/// output row was durably written (`-1` before the first one). It never runs
/// ahead of the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlState {
    pub version: u32,

    pub last_completed_index: i64,

    pub ledger: DedupLedger,

    /// Settings the state was created with; they win over the config file on resume
    pub settings: Config,

    /// Hash of the config file the state was created from
    pub config_hash: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl CrawlState {
    /// State for a first session: nothing recorded, empty ledger
    pub fn fresh(settings: Config, config_hash: Option<String>) -> Self {
        let ledger = if settings.dedup.enabled {
            DedupLedger::new()
        } else {
            DedupLedger::disabled()
        };

        Self {
            version: STATE_VERSION,
            last_completed_index: -1,
            ledger,
            settings,
            config_hash,
            updated_at: Utc::now(),
        }
    }

    /// True until the first row has been recorded
    pub fn is_fresh(&self) -> bool {
        self.last_completed_index < 0
    }

    /// Whether row `index` was recorded by this or an earlier session
    pub fn is_recorded(&self, index: usize) -> bool {
        (index as i64) <= self.last_completed_index
    }

    /// Number of rows recorded so far
    pub fn rows_recorded(&self) -> usize {
        (self.last_completed_index + 1) as usize
    }

    /// Advances the checkpoint to row `index`
    ///
    /// The index only moves forward; an older index is ignored.
    pub fn advance_to(&mut self, index: usize) {
        let index = index as i64;
        if index > self.last_completed_index {
            self.last_completed_index = index;
            self.updated_at = Utc::now();
        }
    }

    /// Moves the checkpoint back so only `rows` rows count as recorded
    ///
    /// Used when the output file lost rows the checkpoint still counts. The
    /// ledger is left as is.
    pub fn rewind_to_rows(&mut self, rows: usize) {
        let index = rows as i64 - 1;
        if index < self.last_completed_index {
            self.last_completed_index = index;
            self.updated_at = Utc::now();
        }
    }
}
