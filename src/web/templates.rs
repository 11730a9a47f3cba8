use askama::Template;

use crate::web::models::{EventCard, Layout, PolicyView, TestimonialView, TierView};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub layout: Layout,
    pub events: Vec<EventCard>,
    pub tiers: Vec<TierView>,
    pub testimonials: Vec<TestimonialView>,
    pub show_sponsorship: bool,
    pub show_testimonials: bool,
}

#[derive(Template)]
#[template(path = "event.html")]
pub struct EventTemplate {
    pub layout: Layout,
    pub event: EventCard,
}

#[derive(Template)]
#[template(path = "sponsorship.html")]
pub struct SponsorshipTemplate {
    pub layout: Layout,
    pub tiers: Vec<TierView>,
    pub unavailable: bool,
}

#[derive(Template)]
#[template(path = "locations.html")]
pub struct LocationsTemplate {
    pub layout: Layout,
    pub markers_json: String,
    pub count: usize,
    pub is_fallback: bool,
}

#[derive(Template)]
#[template(path = "cancellation_policy.html")]
pub struct PolicyTemplate {
    pub layout: Layout,
    pub policy: PolicyView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub layout: Layout,
    pub status: u16,
    pub title: String,
    pub message: String,
}
