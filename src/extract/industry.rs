//! Industry classification from keyword vocabularies
//!
//! Each industry owns a vocabulary; the industry with the largest share of all
//! keyword occurrences on the page is reported together with that share.

use crate::extract::compile;
use crate::extract::traits::{ExtractionError, ExtractionResult, Extractor};
use crate::ConfigError;
use regex::Regex;

/// Industries in tie-break order: on equal shares the earlier one wins
const INDUSTRY_PATTERNS: &[(&str, &str)] = &[
    ("bike", r"v[ée]lo|bi(?:ke|cycle(?:tte)?|cloo)|cycle|(?:2|deux) roues"),
    (
        "nautism",
        r"paddle|k(?:ayak|ite)|cano[eë]|nauti(?:que|c|sme)|bateaux?|jet-?ski|voile|embarcations?|water|glisse|plaisance",
    ),
    ("ski", r"ski|snow(?:-?board)?|pistes?|mou?nta(?:in|gne)|neige|glisse"),
    ("diy", r"jardin(?:age|erie)?|outil(?:lage|s)?|motoculture|tondeuse"),
    ("scooter", r"moto|scoot(?:er)?|(?:deux|2) roues"),
];

const FIELDS: [&str; 3] = ["industry_kw", "most_likely_industry", "probability"];

/// Classifies a page into the most likely industry
pub struct IndustryClassifier {
    industries: Vec<(&'static str, Regex)>,
}

impl IndustryClassifier {
    pub fn new() -> Result<Self, ConfigError> {
        let industries = INDUSTRY_PATTERNS
            .iter()
            .map(|(industry, pattern)| {
                compile(industry, &format!("(?i){}", pattern)).map(|re| (*industry, re))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { industries })
    }

    /// Returns all matched keywords, the winning industry and its share
    ///
    /// The winner must have a strictly larger share than every industry
    /// before it; with no matches at all the label is empty and the share 0.
    pub fn classify(&self, content: &str) -> (Vec<String>, String, f64) {
        let mut all_keywords = Vec::new();
        let mut counts = Vec::with_capacity(self.industries.len());

        for (industry, pattern) in &self.industries {
            let before = all_keywords.len();
            all_keywords.extend(pattern.find_iter(content).map(|m| m.as_str().to_string()));
            counts.push((*industry, all_keywords.len() - before));
        }

        let total = all_keywords.len();
        let mut best_share = 0.0;
        let mut best_industry = String::new();

        if total > 0 {
            for (industry, count) in counts {
                let share = count as f64 / total as f64;
                if share > best_share {
                    best_share = share;
                    best_industry = industry.to_string();
                }
            }
        }

        (all_keywords, best_industry, best_share)
    }
}

/// Renders a share rounded to 3 decimals: `0`, `0.75`, `0.667`, `1.0`
///
/// An exact zero (nothing matched) is rendered without a fraction.
pub fn format_probability(share: f64) -> String {
    if share == 0.0 {
        return "0".to_string();
    }
    let rounded = (share * 1000.0).round() / 1000.0;
    format!("{:?}", rounded)
}

impl Extractor for IndustryClassifier {
    fn name(&self) -> &str {
        "industry"
    }

    fn fields(&self) -> &[&'static str] {
        &FIELDS
    }

    fn extract(&self, content: &str) -> Result<ExtractionResult, ExtractionError> {
        let (keywords, industry, share) = self.classify(content);

        let mut result = ExtractionResult::new();
        result.insert(FIELDS[0].to_string(), keywords);
        result.insert(FIELDS[1].to_string(), vec![industry]);
        result.insert(FIELDS[2].to_string(), vec![format_probability(share)]);
        Ok(result)
    }
}
