//! Free-text keyword signal: does the site mention renting?

use crate::extract::compile;
use crate::extract::traits::{ExtractionError, ExtractionResult, Extractor};
use crate::ConfigError;
use regex::Regex;

/// French, Spanish and English renting vocabulary
const RENTING_PATTERN: &str = r"(?i)\b(?:lo(?:uer|cation)|alquiler|rent(?:al)?)";

/// Reports every renting keyword occurrence (repeats included)
pub struct RentingKeywordExtractor {
    pattern: Regex,
}

impl RentingKeywordExtractor {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: compile("renting_keywords", RENTING_PATTERN)?,
        })
    }
}

impl Extractor for RentingKeywordExtractor {
    fn name(&self) -> &str {
        "renting_keywords"
    }

    fn fields(&self) -> &[&'static str] {
        &["renting_keywords"]
    }

    fn extract(&self, content: &str) -> Result<ExtractionResult, ExtractionError> {
        let keywords = self
            .pattern
            .find_iter(content)
            .map(|m| m.as_str().to_string())
            .collect();

        let mut result = ExtractionResult::new();
        result.insert("renting_keywords".to_string(), keywords);
        Ok(result)
    }
}
