//! Phone number normalization
//!
//! Candidates arrive in many local spellings (`01 23 45 67 89`,
//! `+33 (0)6.12…`, `612345678`). Normalization reduces them to one dialable
//! form with the `+33` country code so numbers can be compared.

/// Country code prepended to national numbers
const COUNTRY_CODE: &str = "+33";

/// Normalizes a free-text phone number
///
/// # Rules
///
/// Every character other than `+` and `0-9` is dropped, then:
///
/// | Shape | Result |
/// |-------|--------|
/// | empty | rejected |
/// | `+` followed by exactly 11 digits | kept as is |
/// | `0` + 9 digits (10 total) | `+33` + the 9 digits |
/// | 9 digits, no leading `0` | `+33` + the 9 digits |
/// | anything else | rejected |
///
/// # Returns
///
/// * `Some(String)` - The normalized number
/// * `None` - The candidate is not a valid number
///
/// # Examples
///
/// ```
/// use site_prospector::normalize_phone;
///
/// assert_eq!(normalize_phone("01 23 45 67 89").as_deref(), Some("+33123456789"));
/// assert_eq!(normalize_phone("123"), None);
/// ```
pub fn normalize_phone(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| *c == '+' || c.is_ascii_digit())
        .collect();

    if let Some(rest) = kept.strip_prefix('+') {
        if rest.len() == 11 && rest.chars().all(|c| c.is_ascii_digit()) {
            return Some(kept);
        }
        return None;
    }

    // A '+' anywhere but the front never makes a valid number
    if kept.is_empty() || kept.contains('+') {
        return None;
    }

    match (kept.strip_prefix('0'), kept.len()) {
        (Some(national), 10) => Some(format!("{}{}", COUNTRY_CODE, national)),
        (None, 9) => Some(format!("{}{}", COUNTRY_CODE, kept)),
        _ => None,
    }
}
