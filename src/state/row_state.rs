/// Row state definitions for tracking crawl progress
///
/// Every input row goes through `Pending → Fetching → {Succeeded | FetchFailed} → Recorded`.
/// Rows recorded by an earlier session are never revisited.
use crate::ProspectorError;
use std::fmt;

/// Represents the current state of an input row in the crawl loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowState {
    // ===== Active States =====
    /// Row is eligible and waiting to be fetched
    Pending,

    /// The row's website is being fetched
    Fetching,

    // ===== Outcome States =====
    /// Page fetched; extraction results are ready to be written
    Succeeded,

    /// Fetch failed (unreachable, timeout, malformed URL, non-2xx)
    ///
    /// Not retried: the row is recorded with empty fields.
    FetchFailed,

    // ===== Terminal State =====
    /// Output row written and checkpoint advanced
    Recorded,
}

impl RowState {
    /// Returns true once nothing more happens to the row
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Recorded)
    }

    /// Outcome written to the crawl log, for the two outcome states
    pub fn outcome(&self) -> Option<&'static str> {
        match self {
            Self::Succeeded => Some("success"),
            Self::FetchFailed => Some("error"),
            _ => None,
        }
    }

    /// Checks whether `next` may follow this state
    pub fn can_transition_to(&self, next: RowState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Succeeded)
                | (Self::Fetching, Self::FetchFailed)
                | (Self::Succeeded, Self::Recorded)
                | (Self::FetchFailed, Self::Recorded)
        )
    }

    /// Moves to `next`, rejecting transitions the lifecycle does not allow
    pub fn transition(self, next: RowState) -> Result<RowState, ProspectorError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ProspectorError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Succeeded => "succeeded",
            Self::FetchFailed => "fetch_failed",
            Self::Recorded => "recorded",
        }
    }
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
