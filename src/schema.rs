//! Content schemas: one JSON Schema per document type, embedded at build time.

use crate::constants::*;
use crate::error::{Result, SiteError};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Conference,
    SponsorshipTier,
    SiteSettings,
    MapLocation,
    ConferenceLocation,
    SpecialRegistration,
    SponsorRegistration,
    CancellationPolicy,
    Testimonial,
    GalleryItem,
}

impl DocumentType {
    pub const ALL: [DocumentType; 10] = [
        DocumentType::Conference,
        DocumentType::SponsorshipTier,
        DocumentType::SiteSettings,
        DocumentType::MapLocation,
        DocumentType::ConferenceLocation,
        DocumentType::SpecialRegistration,
        DocumentType::SponsorRegistration,
        DocumentType::CancellationPolicy,
        DocumentType::Testimonial,
        DocumentType::GalleryItem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Conference => CONFERENCE_TYPE,
            DocumentType::SponsorshipTier => SPONSORSHIP_TIER_TYPE,
            DocumentType::SiteSettings => SITE_SETTINGS_TYPE,
            DocumentType::MapLocation => MAP_LOCATION_TYPE,
            DocumentType::ConferenceLocation => CONFERENCE_LOCATION_TYPE,
            DocumentType::SpecialRegistration => SPECIAL_REGISTRATION_TYPE,
            DocumentType::SponsorRegistration => SPONSOR_REGISTRATION_TYPE,
            DocumentType::CancellationPolicy => CANCELLATION_POLICY_TYPE,
            DocumentType::Testimonial => TESTIMONIAL_TYPE,
            DocumentType::GalleryItem => GALLERY_ITEM_TYPE,
        }
    }

    fn schema_source(self) -> &'static str {
        match self {
            DocumentType::Conference => include_str!("../schemas/conference.json"),
            DocumentType::SponsorshipTier => include_str!("../schemas/sponsorshipTier.json"),
            DocumentType::SiteSettings => include_str!("../schemas/siteSettings.json"),
            DocumentType::MapLocation => include_str!("../schemas/mapLocation.json"),
            DocumentType::ConferenceLocation => include_str!("../schemas/conferenceLocation.json"),
            DocumentType::SpecialRegistration => include_str!("../schemas/specialRegistration.json"),
            DocumentType::SponsorRegistration => include_str!("../schemas/sponsorRegistration.json"),
            DocumentType::CancellationPolicy => include_str!("../schemas/cancellationPolicy.json"),
            DocumentType::Testimonial => include_str!("../schemas/testimonial.json"),
            DocumentType::GalleryItem => include_str!("../schemas/galleryItem.json"),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SiteError::Validation(format!("unknown document type '{s}'")))
    }
}

/// Compiled validators for every document type
pub struct SchemaRegistry {
    compiled: HashMap<DocumentType, JSONSchema>,
}

impl SchemaRegistry {
    pub fn load() -> Result<Self> {
        let mut compiled = HashMap::new();
        for doc_type in DocumentType::ALL {
            let schema: Value = serde_json::from_str(doc_type.schema_source())?;
            let validator = JSONSchema::options()
                .with_draft(Draft::Draft7)
                .compile(&schema)
                .map_err(|e| SiteError::Config(format!("schema for '{doc_type}' does not compile: {e}")))?;
            compiled.insert(doc_type, validator);
        }
        Ok(Self { compiled })
    }

    /// Validate a document against the schema named by its `_type`.
    ///
    /// Returns every violation as `path: message`; an empty list means valid.
    pub fn violations(&self, doc: &Value) -> Result<Vec<String>> {
        let type_name = doc
            .get("_type")
            .and_then(Value::as_str)
            .ok_or_else(|| SiteError::Validation("document has no _type".to_string()))?;
        let doc_type: DocumentType = type_name.parse()?;
        Ok(self.violations_as(doc_type, doc))
    }

    pub fn violations_as(&self, doc_type: DocumentType, doc: &Value) -> Vec<String> {
        let Some(validator) = self.compiled.get(&doc_type) else {
            return vec![format!("no schema registered for '{doc_type}'")];
        };
        match validator.validate(doc) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{path}: {e}")
                    }
                })
                .collect(),
        }
    }

    /// Like [`violations`](Self::violations) but folds problems into one error.
    pub fn validate(&self, doc: &Value) -> Result<()> {
        let problems = self.violations(doc)?;
        if problems.is_empty() {
            Ok(())
        } else {
            let id = doc.get("_id").and_then(Value::as_str).unwrap_or("<new>");
            Err(SiteError::Validation(format!("{id}: {}", problems.join("; "))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_embedded_schema_compiles() {
        let registry = SchemaRegistry::load().unwrap();
        assert_eq!(registry.compiled.len(), DocumentType::ALL.len());
    }

    #[test]
    fn type_names_round_trip() {
        for t in DocumentType::ALL {
            assert_eq!(t.as_str().parse::<DocumentType>().unwrap(), t);
        }
        assert!("venue".parse::<DocumentType>().is_err());
    }

    #[test]
    fn valid_conference_passes() {
        let registry = SchemaRegistry::load().unwrap();
        let doc = json!({
            "_type": "conference",
            "title": "Global Nursing Summit",
            "slug": {"current": "nursing-summit-2025"},
            "date": "2025-10-20",
            "email": "program@nursing.example",
            "registrationUrl": "https://nursing.example/register"
        });
        assert!(registry.validate(&doc).is_ok());
    }

    #[test]
    fn out_of_range_location_is_reported() {
        let registry = SchemaRegistry::load().unwrap();
        let doc = json!({"_type": "mapLocation", "title": "Nowhere", "latitude": 123.0, "longitude": 10.0});
        let problems = registry.violations(&doc).unwrap();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("/latitude"));
    }

    #[test]
    fn missing_fields_and_bad_urls_are_all_listed() {
        let registry = SchemaRegistry::load().unwrap();
        let doc = json!({
            "_type": "conference",
            "title": "X",
            "registrationUrl": "ftp://nope"
        });
        let problems = registry.violations(&doc).unwrap();
        // short title, bad url, missing slug, missing date
        assert!(problems.len() >= 4, "{problems:?}");
    }

    #[test]
    fn unknown_or_missing_type_is_an_error() {
        let registry = SchemaRegistry::load().unwrap();
        assert!(registry.violations(&json!({"title": "x"})).is_err());
        assert!(registry.violations(&json!({"_type": "venue"})).is_err());
    }

    #[test]
    fn tier_prices_need_currency_codes() {
        let registry = SchemaRegistry::load().unwrap();
        let doc = json!({
            "_type": "sponsorshipTier",
            "name": "Gold",
            "slug": {"current": "gold"},
            "price": {"usd": 100}
        });
        assert!(registry.validate(&doc).is_err());
    }
}
