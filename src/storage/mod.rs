//! Storage module for persisting crawl state between sessions
//!
//! This module handles:
//! - The checkpoint store interface
//! - A JSON file implementation with atomic replacement
//! - Recovery from missing or unreadable checkpoint files

mod json;
mod traits;

pub use json::JsonCheckpointStore;
pub use traits::{CheckpointStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the checkpoint store at the given path
///
/// # Arguments
///
/// * `path` - Path to the checkpoint file (need not exist yet)
pub fn open_store(path: &Path) -> JsonCheckpointStore {
    JsonCheckpointStore::new(path)
}
