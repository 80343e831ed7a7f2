//! Email and phone number extraction

use crate::extract::traits::{ExtractionError, ExtractionResult, Extractor};
use crate::extract::{compile, normalize_phone};
use crate::ConfigError;
use regex::Regex;

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]{1,200}@[A-Za-z0-9.-]{1,200}\.[A-Za-z]{2,}";

/// Locally formatted numbers: optional `+`, `33` or `0` trunk, then a
/// non-zero digit and four digit pairs with optional separators.
///
/// The candidate must be preceded by a quote or whitespace; that character is
/// consumed here and the number itself is capture group 1.
const PHONE_PATTERN: &str =
    r#"['"\s](\+?\(?(?:33|0)\)?[.\- ]?[1-9](?:[\-. ]?\d{2}){4})"#;

/// Extracts `local@domain.tld` shaped addresses
///
/// Matches ending in `gif` are dropped: they are almost always image names
/// such as `logo@2x.gif`.
pub struct EmailExtractor {
    pattern: Regex,
}

impl EmailExtractor {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: compile("emails", EMAIL_PATTERN)?,
        })
    }

    fn find_all(&self, content: &str) -> Vec<String> {
        self.pattern
            .find_iter(content)
            .map(|m| m.as_str())
            .filter(|email| !email.ends_with("gif"))
            .map(str::to_string)
            .collect()
    }
}

impl Extractor for EmailExtractor {
    fn name(&self) -> &str {
        "emails"
    }

    fn fields(&self) -> &[&'static str] {
        &["emails"]
    }

    fn extract(&self, content: &str) -> Result<ExtractionResult, ExtractionError> {
        let mut result = ExtractionResult::new();
        result.insert("emails".to_string(), self.find_all(content));
        Ok(result)
    }
}

/// Extracts phone numbers and normalizes them
///
/// Candidates the normalizer rejects are dropped without error.
pub struct PhoneExtractor {
    pattern: Regex,
}

impl PhoneExtractor {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: compile("phone_numbers", PHONE_PATTERN)?,
        })
    }

    /// Scans for candidates one start position at a time
    ///
    /// A candidate followed by a digit is rejected and the scan resumes one
    /// character after its delimiter, so a number starting inside the
    /// rejected span is still found. An accepted number resumes the scan at
    /// its end, where the next delimiter may sit.
    fn find_all(&self, content: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut start = 0;

        while let Some(caps) = self.pattern.captures_at(content, start) {
            let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                break;
            };

            if followed_by_non_digit(content, number.end()) {
                found.extend(normalize_phone(number.as_str()));
                start = number.end();
            } else {
                let delimiter = content[whole.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                start = whole.start() + delimiter;
            }
        }

        found
    }
}

/// The number must be followed by some character that is not a digit
fn followed_by_non_digit(content: &str, end: usize) -> bool {
    content[end..]
        .chars()
        .next()
        .map(|c| !c.is_ascii_digit())
        .unwrap_or(false)
}

impl Extractor for PhoneExtractor {
    fn name(&self) -> &str {
        "phone_numbers"
    }

    fn fields(&self) -> &[&'static str] {
        &["phone_numbers"]
    }

    fn extract(&self, content: &str) -> Result<ExtractionResult, ExtractionError> {
        let mut result = ExtractionResult::new();
        result.insert("phone_numbers".to_string(), self.find_all(content));
        Ok(result)
    }
}
