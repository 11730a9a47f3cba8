//! Display-ready shapes handed to the templates.

use crate::config::FeatureFlags;
use crate::domain::{
    CancellationPolicy, ConferenceEvent, FaqEntry, MapLocation, SiteSettings, SocialLink, SponsorshipTier, Testimonial,
};
use crate::fallback::or_placeholder;
use chrono::NaiveDate;
use serde::Serialize;

/// Header, footer and navigation shared by every page
#[derive(Debug, Clone)]
pub struct Layout {
    pub site_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub social_links: Vec<SocialLink>,
    pub faq: Vec<FaqEntry>,
    pub nav_events: bool,
    pub nav_sponsorship: bool,
    pub nav_map: bool,
    pub nav_contact: bool,
}

impl Layout {
    pub fn new(settings: &SiteSettings, features: &FeatureFlags) -> Self {
        let visibility = &settings.header_visibility;
        Self {
            site_name: or_placeholder(settings.site_name.as_deref()),
            contact_email: settings.contact.email.clone().unwrap_or_default(),
            contact_phone: settings.contact.phone.clone().unwrap_or_default(),
            social_links: settings.social_links.clone(),
            faq: settings.footer_faq.clone(),
            nav_events: visibility.show_events,
            nav_sponsorship: visibility.show_sponsorship && features.show_sponsorship,
            nav_map: features.show_map,
            nav_contact: visibility.show_contact,
        }
    }
}

pub fn date_label(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => or_placeholder(None),
    }
}

#[derive(Debug, Clone)]
pub struct EventCard {
    pub title: String,
    pub slug: String,
    pub date: String,
    pub location: String,
    pub email: String,
    pub registration_url: String,
    pub abstract_url: String,
}

impl From<&ConferenceEvent> for EventCard {
    fn from(event: &ConferenceEvent) -> Self {
        Self {
            title: event.title.clone(),
            slug: event.slug_str().unwrap_or_default().to_string(),
            date: date_label(event.date),
            location: or_placeholder(event.location.as_deref()),
            email: event.email.clone().unwrap_or_default(),
            registration_url: event.registration_url.clone().unwrap_or_default(),
            abstract_url: event.abstract_url.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceView {
    pub currency: String,
    pub amount: String,
}

pub fn amount_label(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

#[derive(Debug, Clone)]
pub struct TierView {
    pub name: String,
    pub slug: String,
    pub prices: Vec<PriceView>,
    pub benefits: Vec<String>,
    pub featured: bool,
}

impl From<&SponsorshipTier> for TierView {
    fn from(tier: &SponsorshipTier) -> Self {
        Self {
            name: tier.name.clone(),
            slug: tier.slug.as_ref().map(|s| s.current.clone()).unwrap_or_default(),
            prices: tier
                .price
                .iter()
                .map(|(currency, amount)| PriceView { currency: currency.clone(), amount: amount_label(*amount) })
                .collect(),
            benefits: tier.benefits.clone(),
            featured: tier.is_featured,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestimonialView {
    pub name: String,
    pub role: String,
    pub quote: String,
    pub stars: String,
}

impl From<&Testimonial> for TestimonialView {
    fn from(t: &Testimonial) -> Self {
        let rating = t.rating.unwrap_or(0).min(5) as usize;
        Self {
            name: t.name.clone(),
            role: t.role.clone().unwrap_or_default(),
            quote: t.quote.clone(),
            stars: format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SectionView {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PolicyView {
    pub title: String,
    pub sections: Vec<SectionView>,
    pub last_updated: String,
}

impl PolicyView {
    pub fn new(policy: Option<&CancellationPolicy>) -> Self {
        match policy {
            Some(p) => Self {
                title: p.title.clone(),
                sections: p
                    .sections
                    .iter()
                    .map(|s| SectionView {
                        heading: s.heading.clone(),
                        paragraphs: s.body.iter().map(|b| b.plain_text()).filter(|t| !t.trim().is_empty()).collect(),
                    })
                    .collect(),
                last_updated: date_label(p.last_updated),
            },
            None => Self {
                title: "Cancellation Policy".to_string(),
                sections: Vec::new(),
                last_updated: or_placeholder(None),
            },
        }
    }
}

/// Marker handed to the client-side map
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub id: String,
    pub title: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: String,
}

impl From<&MapLocation> for Marker {
    fn from(l: &MapLocation) -> Self {
        Self {
            id: l.id.clone(),
            title: l.title.clone(),
            address: l.address.clone().unwrap_or_default(),
            lat: l.latitude,
            lng: l.longitude,
            category: l.category.clone().unwrap_or_default(),
        }
    }
}

/// JSON for embedding inside a `<script>` element.
pub fn markers_json(locations: &[MapLocation]) -> String {
    let markers: Vec<Marker> = locations.iter().map(Marker::from).collect();
    serde_json::to_string(&markers)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}
