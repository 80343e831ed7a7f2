//! Ordered extraction pipeline

use crate::extract::record::CombinedRecord;
use crate::extract::traits::{ExtractionError, ExtractionResult, Extractor};
use crate::extract::{
    EmailExtractor, IndustryClassifier, PhoneExtractor, RentingKeywordExtractor,
    SocialProfileExtractor, SoftwareFingerprinter,
};
use crate::ConfigError;
use std::collections::HashMap;

/// A fixed, ordered list of extractor units
///
/// The concatenation of the units' fields is the output schema; it is
/// computed once at construction and never changes afterwards.
pub struct Pipeline {
    units: Vec<Box<dyn Extractor>>,
    headers: Vec<String>,
}

impl Pipeline {
    /// Builds a pipeline from units in the given order
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Every field is owned by exactly one unit
    /// * `Err(ConfigError::DuplicateField)` - Two units declare the same field
    pub fn new(units: Vec<Box<dyn Extractor>>) -> Result<Self, ConfigError> {
        let mut headers = Vec::new();
        {
            let mut owners: HashMap<&str, &str> = HashMap::new();
            for unit in &units {
                for field in unit.fields() {
                    if let Some(first) = owners.insert(*field, unit.name()) {
                        return Err(ConfigError::DuplicateField {
                            field: field.to_string(),
                            first: first.to_string(),
                            second: unit.name().to_string(),
                        });
                    }
                    headers.push(field.to_string());
                }
            }
        }

        Ok(Self { units, headers })
    }

    /// The standard contact/business-signal pipeline
    pub fn standard() -> Result<Self, ConfigError> {
        Self::new(vec![
            Box::new(EmailExtractor::new()?),
            Box::new(PhoneExtractor::new()?),
            Box::new(SocialProfileExtractor::linkedin()?),
            Box::new(SocialProfileExtractor::facebook()?),
            Box::new(RentingKeywordExtractor::new()?),
            Box::new(IndustryClassifier::new()?),
            Box::new(SoftwareFingerprinter::new()?),
        ])
    }

    /// Output field names in unit order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn unit_names(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.name()).collect()
    }

    /// Runs every unit over the same content and merges their findings
    ///
    /// A failing unit does not abort the page: the failure is logged and the
    /// unit's fields are left empty.
    pub fn extract(&self, content: &str) -> Result<CombinedRecord, ExtractionError> {
        let mut merged = ExtractionResult::new();

        for unit in &self.units {
            let findings = match run_unit(unit.as_ref(), content) {
                Ok(findings) => findings,
                Err(e) => {
                    tracing::warn!("Extractor '{}' failed, leaving its fields empty: {}", unit.name(), e);
                    unit.fields()
                        .iter()
                        .map(|field| (field.to_string(), Vec::new()))
                        .collect()
                }
            };
            merged.extend(findings);
        }

        CombinedRecord::from_results(&self.headers, merged)
    }
}

/// Runs one unit and checks it produced exactly its declared fields
fn run_unit(unit: &dyn Extractor, content: &str) -> Result<ExtractionResult, ExtractionError> {
    let findings = unit.extract(content)?;

    if let Some(field) = findings
        .keys()
        .find(|field| !unit.fields().iter().any(|declared| *declared == field.as_str()))
    {
        return Err(ExtractionError::UndeclaredField {
            unit: unit.name().to_string(),
            field: field.clone(),
        });
    }

    if let Some(field) = unit
        .fields()
        .iter()
        .find(|field| !findings.contains_key(**field))
    {
        return Err(ExtractionError::MissingUnitField {
            unit: unit.name().to_string(),
            field: field.to_string(),
        });
    }

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedUnit {
        name: &'static str,
        fields: Vec<&'static str>,
        emit: Vec<(&'static str, &'static str)>,
    }

    impl Extractor for FixedUnit {
        fn name(&self) -> &str {
            self.name
        }

        fn fields(&self) -> &[&'static str] {
            &self.fields
        }

        fn extract(&self, _content: &str) -> Result<ExtractionResult, ExtractionError> {
            let mut result = ExtractionResult::new();
            for (field, value) in &self.emit {
                result
                    .entry(field.to_string())
                    .or_default()
                    .push(value.to_string());
            }
            Ok(result)
        }
    }

    struct FailingUnit;

    impl Extractor for FailingUnit {
        fn name(&self) -> &str {
            "failing"
        }

        fn fields(&self) -> &[&'static str] {
            &["broken"]
        }

        fn extract(&self, _content: &str) -> Result<ExtractionResult, ExtractionError> {
            Err(ExtractionError::UnitFailed {
                unit: "failing".to_string(),
                message: "malformed content".to_string(),
            })
        }
    }

    #[test]
    fn test_standard_headers() {
        let pipeline = Pipeline::standard().unwrap();
        assert_eq!(
            pipeline.headers(),
            &[
                "emails",
                "phone_numbers",
                "linkedin_urls",
                "facebook_urls",
                "renting_keywords",
                "industry_kw",
                "most_likely_industry",
                "probability",
                "software_link",
                "software_name",
            ]
        );
    }

    #[test]
    fn test_headers_match_record_on_empty_content() {
        let pipeline = Pipeline::standard().unwrap();
        let record = pipeline.extract("").unwrap();
        assert_eq!(record.len(), pipeline.headers().len());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let units: Vec<Box<dyn Extractor>> = vec![
            Box::new(FixedUnit {
                name: "first",
                fields: vec!["emails"],
                emit: vec![],
            }),
            Box::new(FixedUnit {
                name: "second",
                fields: vec!["other", "emails"],
                emit: vec![],
            }),
        ];

        match Pipeline::new(units) {
            Err(ConfigError::DuplicateField {
                field,
                first,
                second,
            }) => {
                assert_eq!(field, "emails");
                assert_eq!(first, "first");
                assert_eq!(second, "second");
            }
            _ => panic!("expected a duplicate field error"),
        }
    }

    #[test]
    fn test_failing_unit_is_isolated() {
        let units: Vec<Box<dyn Extractor>> = vec![
            Box::new(FailingUnit),
            Box::new(FixedUnit {
                name: "ok",
                fields: vec!["emails"],
                emit: vec![("emails", "a@b.fr")],
            }),
        ];
        let pipeline = Pipeline::new(units).unwrap();

        let record = pipeline.extract("anything").unwrap();
        assert!(record.get("broken").unwrap().is_empty());
        assert_eq!(record.get("emails").unwrap().len(), 1);
    }

    #[test]
    fn test_undeclared_field_is_dropped() {
        let units: Vec<Box<dyn Extractor>> = vec![Box::new(FixedUnit {
            name: "sneaky",
            fields: vec!["emails"],
            emit: vec![("emails", "a@b.fr"), ("phones", "+33123456789")],
        })];
        let pipeline = Pipeline::new(units).unwrap();

        let record = pipeline.extract("anything").unwrap();
        assert_eq!(record.len(), 1);
        assert!(record.get("emails").unwrap().is_empty());
        assert!(record.get("phones").is_none());
    }

    #[test]
    fn test_full_page_extraction() {
        let pipeline = Pipeline::standard().unwrap();
        let html = r#"<html><body>
            <p>Location de vélo, vélo électrique, vélo enfant et ski</p>
            <a href="mailto:contact@annecy-loisirs.fr">contact@annecy-loisirs.fr</a>
            <span>Tel: 04 50 00 00 00</span>
            <a href="https://www.linkedin.com/company/annecy-loisirs">in</a>
            <script src="https://fareharbor.com/embeds/book/"></script>
        </body></html>"#;

        let record = pipeline.extract(html).unwrap();
        let get = |field: &str| record.get(field).unwrap().iter().cloned().collect::<Vec<_>>();

        assert_eq!(get("emails"), vec!["contact@annecy-loisirs.fr"]);
        assert_eq!(get("phone_numbers"), vec!["+33450000000"]);
        assert_eq!(
            get("linkedin_urls"),
            vec!["https://www.linkedin.com/company/annecy-loisirs"]
        );
        assert_eq!(get("renting_keywords"), vec!["Location"]);
        assert_eq!(get("most_likely_industry"), vec!["bike"]);
        assert_eq!(get("probability"), vec!["0.75"]);
        assert_eq!(get("software_name"), vec!["FareHarbor"]);
    }
}
