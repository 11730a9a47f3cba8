/// Document `_type` names as stored in the CMS dataset
pub const CONFERENCE_TYPE: &str = "conference";
pub const SPONSORSHIP_TIER_TYPE: &str = "sponsorshipTier";
pub const SITE_SETTINGS_TYPE: &str = "siteSettings";
pub const MAP_LOCATION_TYPE: &str = "mapLocation";
pub const CONFERENCE_LOCATION_TYPE: &str = "conferenceLocation";
pub const SPECIAL_REGISTRATION_TYPE: &str = "specialRegistration";
pub const SPONSOR_REGISTRATION_TYPE: &str = "sponsorRegistration";
pub const CANCELLATION_POLICY_TYPE: &str = "cancellationPolicy";
pub const TESTIMONIAL_TYPE: &str = "testimonial";
pub const GALLERY_ITEM_TYPE: &str = "galleryItem";

// Order id prefixes for orders fabricated locally instead of by the gateway
pub const MOCK_ORDER_PREFIX: &str = "order_mock_";
pub const FALLBACK_ORDER_PREFIX: &str = "order_fallback_";

/// Currencies accepted by the order endpoint
pub const SUPPORTED_CURRENCIES: &[&str] = &["INR", "USD", "EUR", "GBP"];

/// Gateway limit on receipt length
pub const MAX_RECEIPT_LEN: usize = 40;

pub const DEFAULT_CONTACT_EMAIL: &str = "info@conference.example";
pub const DEFAULT_SITE_NAME: &str = "International Conference Series";
pub const PLACEHOLDER_TEXT: &str = "To be announced";

pub const DEFAULT_CMS_API_VERSION: &str = "2023-05-03";
pub const DEFAULT_RAZORPAY_API_BASE: &str = "https://api.razorpay.com";

/// True when `order_id` was fabricated locally rather than issued by the gateway
pub fn is_synthetic_order_id(order_id: &str) -> bool {
    order_id.starts_with(MOCK_ORDER_PREFIX) || order_id.starts_with(FALLBACK_ORDER_PREFIX)
}
