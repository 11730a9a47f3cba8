//! Content document shapes as read from the CMS.
//!
//! Field names follow the CMS (camelCase, `_id` etc.); optional fields stay
//! `Option` so half-filled drafts still deserialize.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accepts `YYYY-MM-DD` as well as datetime strings; editors switch field types.
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => {
            let day = s.get(..10).unwrap_or(&s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

/// Reference to another document (`{"_ref": "..."}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_ref")]
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub asset: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceEvent {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Option<Slug>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub registration_url: Option<String>,
    pub abstract_url: Option<String>,
    pub poster: Option<ImageRef>,
}

impl ConferenceEvent {
    pub fn slug_str(&self) -> Option<&str> {
        self.slug.as_ref().map(|s| s.current.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipTier {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: Option<Slug>,
    /// Currency code (`INR`, `USD`, ...) to price in major units
    #[serde(default)]
    pub price: BTreeMap<String, f64>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub order: Option<i64>,
}

impl SponsorshipTier {
    pub fn price_in(&self, currency: &str) -> Option<f64> {
        self.price.get(&currency.to_ascii_uppercase()).copied()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderVisibility {
    pub show_events: bool,
    pub show_sponsorship: bool,
    pub show_gallery: bool,
    pub show_contact: bool,
}

impl Default for HeaderVisibility {
    fn default() -> Self {
        Self { show_events: true, show_sponsorship: true, show_gallery: true, show_contact: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: Option<String>,
    pub logo: Option<ImageRef>,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub header_visibility: HeaderVisibility,
    #[serde(default)]
    pub footer_faq: Vec<FaqEntry>,
}

/// Which location document type to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Map,
    Conference,
}

impl LocationKind {
    pub fn doc_type(self) -> &'static str {
        match self {
            LocationKind::Map => crate::constants::MAP_LOCATION_TYPE,
            LocationKind::Conference => crate::constants::CONFERENCE_LOCATION_TYPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLocation {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i64,
    pub order: Option<i64>,
}

impl MapLocation {
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialRegistration {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub payment_status: PaymentStatus,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub conference: Option<Reference>,
    #[serde(default)]
    pub email_sent: bool,
}

/// A block of editorial rich text; only the plain spans are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub children: Vec<TextSpan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    #[serde(default)]
    pub text: String,
}

impl TextBlock {
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySection {
    pub heading: String,
    #[serde(default)]
    pub body: Vec<TextBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicy {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<PolicySection>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_updated: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub rating: Option<u8>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub image: Option<ImageRef>,
    pub caption: Option<String>,
    pub order: Option<i64>,
}

/// Written once a sponsorship payment is verified
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorRegistration {
    pub tier: Option<String>,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub invoice_number: String,
    pub payment_status: PaymentStatus,
}
