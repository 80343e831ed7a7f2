//! Extractor trait and extraction error types

use std::collections::HashMap;
use thiserror::Error;

/// Findings of one unit: field name to the values matched, in document order
///
/// Values may repeat; collapsing to a set happens when the record is rendered.
pub type ExtractionResult = HashMap<String, Vec<String>>;

/// Errors raised while running extractor units
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unit '{unit}' produced undeclared field '{field}'")]
    UndeclaredField { unit: String, field: String },

    #[error("Unit '{unit}' did not produce declared field '{field}'")]
    MissingUnitField { unit: String, field: String },

    #[error("Record is missing field '{0}'")]
    MissingField(String),

    #[error("Unit '{unit}' failed: {message}")]
    UnitFailed { unit: String, message: String },
}

/// A single extraction unit
///
/// Units must be independent of one another: each one only sees the page
/// content, never another unit's output.
pub trait Extractor: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &str;

    /// Output fields owned by this unit, in output order
    fn fields(&self) -> &[&'static str];

    /// Runs the unit over the page content
    ///
    /// Implementations return every declared field, using an empty list when
    /// nothing matched.
    fn extract(&self, content: &str) -> Result<ExtractionResult, ExtractionError>;
}
