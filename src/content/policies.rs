use super::{fetch_list, fetch_one};
use crate::cms::{ContentSource, Direction, Query};
use crate::constants::{CANCELLATION_POLICY_TYPE, GALLERY_ITEM_TYPE, TESTIMONIAL_TYPE};
use crate::domain::{CancellationPolicy, GalleryItem, Testimonial};
use crate::error::Result;

pub async fn cancellation_policy(source: &dyn ContentSource) -> Result<Option<CancellationPolicy>> {
    let query = Query::new(CANCELLATION_POLICY_TYPE)
        .order_by("_updatedAt", Direction::Desc)
        .first();
    fetch_one(source, &query).await
}

pub async fn testimonials(source: &dyn ContentSource) -> Result<Vec<Testimonial>> {
    let query = Query::new(TESTIMONIAL_TYPE)
        .eq("isActive", true)
        .order_by("_createdAt", Direction::Desc);
    fetch_list(source, &query).await
}

pub async fn gallery(source: &dyn ContentSource) -> Result<Vec<GalleryItem>> {
    let query = Query::new(GALLERY_ITEM_TYPE)
        .defined("image.asset")
        .order_by("order", Direction::Asc);
    fetch_list(source, &query).await
}
