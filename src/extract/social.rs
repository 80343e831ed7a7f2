//! Social profile URL extraction

use crate::extract::compile;
use crate::extract::traits::{ExtractionError, ExtractionResult, Extractor};
use crate::ConfigError;
use regex::Regex;

const LINKEDIN_URL_PATTERN: &str =
    r"(?i)https?://(?:www\.)?linkedin\.com/[a-zA-Z%\däëüïöâêûîôàèùìòé_,/-]{4,}";
const FACEBOOK_URL_PATTERN: &str =
    r"https?://(?:www\.)?facebook\.com/[a-zA-Z%\däëüïöâêûîôàèùìòé_,./-]{3,}";

/// Extracts profile URLs for one social platform
///
/// One instance exists per platform so each owns exactly one output field.
pub struct SocialProfileExtractor {
    name: &'static str,
    fields: [&'static str; 1],
    pattern: Regex,
}

impl SocialProfileExtractor {
    /// LinkedIn company and profile pages (case-insensitive)
    pub fn linkedin() -> Result<Self, ConfigError> {
        Self::with_pattern("linkedin_urls", LINKEDIN_URL_PATTERN)
    }

    /// Facebook pages
    pub fn facebook() -> Result<Self, ConfigError> {
        Self::with_pattern("facebook_urls", FACEBOOK_URL_PATTERN)
    }

    fn with_pattern(field: &'static str, pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            name: field,
            fields: [field],
            pattern: compile(field, pattern)?,
        })
    }
}

impl Extractor for SocialProfileExtractor {
    fn name(&self) -> &str {
        self.name
    }

    fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    fn extract(&self, content: &str) -> Result<ExtractionResult, ExtractionError> {
        let urls = self
            .pattern
            .find_iter(content)
            .map(|m| m.as_str().to_string())
            .collect();

        let mut result = ExtractionResult::new();
        result.insert(self.fields[0].to_string(), urls);
        Ok(result)
    }
}
