//! Combined per-page record

use crate::extract::traits::{ExtractionError, ExtractionResult};
use std::collections::BTreeSet;

/// Union of every unit's findings for one page, in header order
///
/// Each field holds a set: repeats within one page collapse. The field list
/// always equals the pipeline headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRecord {
    fields: Vec<(String, BTreeSet<String>)>,
}

impl CombinedRecord {
    /// Builds a record holding every header, failing if any is missing
    pub fn from_results(
        headers: &[String],
        mut merged: ExtractionResult,
    ) -> Result<Self, ExtractionError> {
        let fields = headers
            .iter()
            .map(|header| {
                merged
                    .remove(header)
                    .map(|values| (header.clone(), values.into_iter().collect()))
                    .ok_or_else(|| ExtractionError::MissingField(header.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { fields })
    }

    /// A record with every header present and empty
    pub fn empty(headers: &[String]) -> Self {
        Self {
            fields: headers
                .iter()
                .map(|header| (header.clone(), BTreeSet::new()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&BTreeSet<String>> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values)
    }

    /// Fields in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Renders a set as one output cell: sorted values joined by `", "`
pub fn render_set(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
