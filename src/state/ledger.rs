use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fields whose values are reported only the first time they are seen
pub const TRACKED_FIELDS: [&str; 2] = ["emails", "phone_numbers"];

/// Known emails and phone numbers
///
/// Both sets only ever grow. They are seeded from the input dataset, extended
/// with everything extracted from each page, and persisted in the checkpoint.
/// A disabled ledger tracks nothing and passes every value through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupLedger {
    enabled: bool,
    emails: BTreeSet<String>,
    phone_numbers: BTreeSet<String>,
}

impl DedupLedger {
    /// Creates an empty ledger that tracks the contact fields
    pub fn new() -> Self {
        Self {
            enabled: true,
            emails: BTreeSet::new(),
            phone_numbers: BTreeSet::new(),
        }
    }

    /// Creates a ledger for which every field passes through unchanged
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Adds pre-existing values to the known sets
    pub fn seed<E, P>(&mut self, emails: E, phone_numbers: P)
    where
        E: IntoIterator<Item = String>,
        P: IntoIterator<Item = String>,
    {
        if !self.enabled {
            return;
        }
        self.emails.extend(emails);
        self.phone_numbers.extend(phone_numbers);
    }

    /// Returns true when `field` goes through deduplication
    pub fn is_tracked(&self, field: &str) -> bool {
        self.enabled && TRACKED_FIELDS.contains(&field)
    }

    /// Returns the values of `field` that should be reported
    ///
    /// For tracked fields this is `extracted − known`, after which the whole
    /// extracted set becomes known: a value is reported at most once per
    /// ledger lifetime. Other fields pass through unchanged.
    pub fn reconcile(&mut self, field: &str, extracted: &BTreeSet<String>) -> BTreeSet<String> {
        let Some(known) = self.known_mut(field) else {
            return extracted.clone();
        };

        let emitted: BTreeSet<String> = extracted.difference(known).cloned().collect();
        known.extend(extracted.iter().cloned());
        emitted
    }

    /// Marks values as known without reporting them
    pub fn absorb<I>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(known) = self.known_mut(field) {
            known.extend(values);
        }
    }

    pub fn contains(&self, field: &str, value: &str) -> bool {
        match field {
            "emails" => self.emails.contains(value),
            "phone_numbers" => self.phone_numbers.contains(value),
            _ => false,
        }
    }

    pub fn email_count(&self) -> usize {
        self.emails.len()
    }

    pub fn phone_count(&self) -> usize {
        self.phone_numbers.len()
    }

    fn known_mut(&mut self, field: &str) -> Option<&mut BTreeSet<String>> {
        if !self.enabled {
            return None;
        }
        match field {
            "emails" => Some(&mut self.emails),
            "phone_numbers" => Some(&mut self.phone_numbers),
            _ => None,
        }
    }
}

impl Default for DedupLedger {
    fn default() -> Self {
        Self::new()
    }
}
