//! Extraction module for turning page markup into contact and business signals
//!
//! Every unit is an independent, stateless pattern matcher over the raw page
//! content. The [`Pipeline`] runs them in a fixed order and merges their
//! findings into one [`CombinedRecord`] whose field set always equals
//! [`Pipeline::headers`].
//!
//! # Units, in pipeline order
//!
//! 1. `emails`
//! 2. `phone_numbers` (normalized to `+33…`)
//! 3. `linkedin_urls`
//! 4. `facebook_urls`
//! 5. `renting_keywords`
//! 6. `industry_kw`, `most_likely_industry`, `probability`
//! 7. `software_link`, `software_name`

mod contact;
mod industry;
mod keywords;
mod phone;
mod pipeline;
mod record;
mod social;
mod software;
mod traits;

pub use contact::{EmailExtractor, PhoneExtractor};
pub use industry::{format_probability, IndustryClassifier};
pub use keywords::RentingKeywordExtractor;
pub use phone::normalize_phone;
pub use pipeline::Pipeline;
pub use record::{render_set, CombinedRecord};
pub use social::SocialProfileExtractor;
pub use software::SoftwareFingerprinter;
pub use traits::{ExtractionError, ExtractionResult, Extractor};

use crate::ConfigError;
use regex::Regex;

/// Compiles a built-in pattern, reporting the owning unit on failure
pub(crate) fn compile(unit: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("{} pattern '{}': {}", unit, pattern, e)))
}
