//! Competitor software fingerprinting
//!
//! Booking and rental platforms leave recognizable hostnames (widgets, CDN
//! assets, checkout links) in the pages of the shops using them.

use crate::extract::compile;
use crate::extract::traits::{ExtractionError, ExtractionResult, Extractor};
use crate::ConfigError;
use regex::Regex;

/// Product registry: name and detection pattern
///
/// When a pattern has a `hit` group, only that group is reported as the
/// matched link; otherwise the whole match is.
const SOFTWARE_PATTERNS: &[(&str, &str)] = &[
    ("Skilou", r"skilou(?:resa)?\.com"),
    ("Ouibike", r"ouibike\.net"),
    ("Rodeeo", r"(?:my\.)?rodeeo\.app"),
    ("Notre Sphère", r"notresphere\.com"),
    ("Elloha", r"reservation\.elloha\.com"),
    ("Regiondo", r"(?:pro\.)?regiondo\.(?:com|fr|net)"),
    ("Trekker", r"book\.trekker\.fr"),
    ("Canoego", r"www\.canoego\.fr"),
    ("Axyomes", r"axyomes\.com"),
    ("Nautic Manager", r"www\.nauticmanager\.com"),
    ("SamBoat", r"cdn\.samboat\.fr"),
    ("Guidap", r"(?:cart\.)?guidap\.(?:com|net)|<(?P<hit>guidap)-"),
    ("Surfnow", r"app\.surfnow\.fr"),
    ("Awoo", r"awoo\.fr"),
    ("FareHarbor", r"fareharbor\.com"),
    ("Ginkoia", r"[gG]inkoia"),
    ("Cilea", r"[cC]ilea"),
];

const FIELDS: [&str; 2] = ["software_link", "software_name"];

/// Detects third-party booking software by hostname fingerprints
pub struct SoftwareFingerprinter {
    products: Vec<(&'static str, Regex)>,
}

impl SoftwareFingerprinter {
    pub fn new() -> Result<Self, ConfigError> {
        let products = SOFTWARE_PATTERNS
            .iter()
            .map(|(name, pattern)| compile(name, pattern).map(|re| (*name, re)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { products })
    }

    /// Returns the distinct matched links and the distinct product names
    pub fn detect(&self, content: &str) -> (Vec<String>, Vec<String>) {
        let mut links: Vec<String> = Vec::new();
        let mut names = Vec::new();

        for (name, pattern) in &self.products {
            let mut found = false;
            for caps in pattern.captures_iter(content) {
                let Some(hit) = caps.name("hit").or_else(|| caps.get(0)) else {
                    continue;
                };
                found = true;
                if !links.iter().any(|link| link == hit.as_str()) {
                    links.push(hit.as_str().to_string());
                }
            }
            if found {
                names.push(name.to_string());
            }
        }

        (links, names)
    }
}

impl Extractor for SoftwareFingerprinter {
    fn name(&self) -> &str {
        "software"
    }

    fn fields(&self) -> &[&'static str] {
        &FIELDS
    }

    fn extract(&self, content: &str) -> Result<ExtractionResult, ExtractionError> {
        let (links, names) = self.detect(content);

        let mut result = ExtractionResult::new();
        result.insert(FIELDS[0].to_string(), links);
        result.insert(FIELDS[1].to_string(), names);
        Ok(result)
    }
}
