//! Constant content served when the CMS cannot be reached, so pages still render.

use crate::constants::{DEFAULT_CONTACT_EMAIL, DEFAULT_SITE_NAME, PLACEHOLDER_TEXT};
use crate::domain::{ContactInfo, HeaderVisibility, MapLocation, SiteSettings};

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        site_name: Some(DEFAULT_SITE_NAME.to_string()),
        logo: None,
        contact: ContactInfo {
            email: Some(DEFAULT_CONTACT_EMAIL.to_string()),
            phone: None,
            address: None,
        },
        social_links: Vec::new(),
        header_visibility: HeaderVisibility::default(),
        footer_faq: Vec::new(),
    }
}

/// Fill gaps in published settings from the defaults.
pub fn complete_settings(mut settings: SiteSettings) -> SiteSettings {
    if settings.site_name.as_deref().map_or(true, |s| s.trim().is_empty()) {
        settings.site_name = Some(DEFAULT_SITE_NAME.to_string());
    }
    if settings.contact.email.as_deref().map_or(true, |s| s.trim().is_empty()) {
        settings.contact.email = Some(DEFAULT_CONTACT_EMAIL.to_string());
    }
    settings
}

/// Text for an optional field that editors left empty.
pub fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => PLACEHOLDER_TEXT.to_string(),
    }
}

/// Pins shown on the map when the location fetch fails
pub fn test_locations() -> Vec<MapLocation> {
    let pin = |id: &str, title: &str, address: &str, lat: f64, lng: f64, priority: i64| MapLocation {
        id: id.to_string(),
        title: title.to_string(),
        address: Some(address.to_string()),
        latitude: lat,
        longitude: lng,
        category: Some("venue".to_string()),
        is_active: true,
        priority,
        order: None,
    };
    vec![
        pin("fallback-london", "London", "ExCeL London, Royal Victoria Dock", 51.5081, 0.0294, 10),
        pin("fallback-dubai", "Dubai", "Dubai World Trade Centre", 25.2252, 55.2866, 8),
        pin("fallback-singapore", "Singapore", "Marina Bay Sands Expo", 1.2834, 103.8607, 6),
        pin("fallback-boston", "Boston", "Hynes Convention Center", 42.3479, -71.0876, 4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_locations_are_displayable() {
        let pins = test_locations();
        assert!(!pins.is_empty());
        assert!(pins.iter().all(|p| p.is_active && p.has_valid_coordinates()));
    }

    #[test]
    fn placeholder_for_blank_values() {
        assert_eq!(or_placeholder(None), PLACEHOLDER_TEXT);
        assert_eq!(or_placeholder(Some("  ")), PLACEHOLDER_TEXT);
        assert_eq!(or_placeholder(Some("Berlin")), "Berlin");
    }
}
