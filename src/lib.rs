//! Site-Prospector: a resumable website contact harvester
//!
//! This crate walks a list of websites read from a CSV file, runs a fixed
//! pipeline of pattern extractors over each landing page (emails, phone
//! numbers, social links, industry keywords, competitor software), reports
//! only contacts that were not already known, and checkpoints its progress so
//! an interrupted session picks up at the next unprocessed row.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod input;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Site-Prospector operations
#[derive(Debug, Error)]
pub enum ProspectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] extract::ExtractionError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid row state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RowState,
        to: state::RowState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are fatal and always surface before the first row is fetched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid extraction pattern: {0}")]
    InvalidPattern(String),

    #[error("Input file {path} has no '{column}' column")]
    MissingColumn { column: String, path: String },

    #[error("Field '{field}' is declared by both '{first}' and '{second}'")]
    DuplicateField {
        field: String,
        first: String,
        second: String,
    },
}

/// Result type alias for Site-Prospector operations
pub type Result<T> = std::result::Result<T, ProspectorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Coordinator;
pub use extract::{normalize_phone, Pipeline};
pub use state::{CrawlState, DedupLedger, RowState};
