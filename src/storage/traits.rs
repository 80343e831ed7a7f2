//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::state::CrawlState;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported checkpoint version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint backends
///
/// A store holds at most one [`CrawlState`]. Saving replaces it as a whole,
/// so a reader never observes a half-written state.
pub trait CheckpointStore {
    /// Loads the saved state
    ///
    /// # Returns
    ///
    /// * `Ok(Some(state))` - A usable state was found
    /// * `Ok(None)` - Nothing saved yet, or the saved state was unusable
    /// * `Err(StorageError)` - The store itself could not be read
    fn load(&self) -> StorageResult<Option<CrawlState>>;

    /// Replaces the saved state
    fn save(&self, state: &CrawlState) -> StorageResult<()>;

    /// Removes the saved state, if any
    fn clear(&self) -> StorageResult<()>;
}
