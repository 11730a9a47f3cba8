use super::{fetch_list, fetch_one};
use crate::cms::{ContentSource, Direction, Query};
use crate::constants::SPONSORSHIP_TIER_TYPE;
use crate::domain::SponsorshipTier;
use crate::error::Result;

/// Active tiers in display order, ties broken by name.
pub async fn list_tiers(source: &dyn ContentSource) -> Result<Vec<SponsorshipTier>> {
    let query = Query::new(SPONSORSHIP_TIER_TYPE)
        .eq("isActive", true)
        .order_by("order", Direction::Asc)
        .order_by("name", Direction::Asc);
    let mut tiers: Vec<SponsorshipTier> = fetch_list(source, &query).await?;
    tiers.sort_by(|a, b| {
        a.order
            .unwrap_or(i64::MAX)
            .cmp(&b.order.unwrap_or(i64::MAX))
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(tiers)
}

/// Looked up fresh: the price shown at checkout must not come from a stale cache.
pub async fn tier_by_slug(source: &dyn ContentSource, slug: &str) -> Result<Option<SponsorshipTier>> {
    let query = Query::new(SPONSORSHIP_TIER_TYPE).eq("slug.current", slug).first().fresh();
    fetch_one(source, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::InMemorySource;
    use serde_json::json;

    #[tokio::test]
    async fn only_active_tiers_in_order() {
        let src = InMemorySource::with_documents(vec![
            json!({"_id": "t1", "_type": "sponsorshipTier", "name": "Silver", "slug": {"current": "silver"}, "isActive": true, "order": 2, "price": {"USD": 500}}),
            json!({"_id": "t2", "_type": "sponsorshipTier", "name": "Platinum", "slug": {"current": "platinum"}, "isActive": true, "order": 0, "price": {"USD": 5000}}),
            json!({"_id": "t3", "_type": "sponsorshipTier", "name": "Retired", "slug": {"current": "retired"}, "isActive": false, "order": 1}),
            json!({"_id": "t4", "_type": "sponsorshipTier", "name": "Bronze", "slug": {"current": "bronze"}, "isActive": true}),
        ]);
        let tiers = list_tiers(&src).await.unwrap();
        let names: Vec<_> = tiers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Platinum", "Silver", "Bronze"]);
    }

    #[tokio::test]
    async fn tier_lookup_by_slug() {
        let src = InMemorySource::with_documents(vec![
            json!({"_id": "t1", "_type": "sponsorshipTier", "name": "Gold", "slug": {"current": "gold"}, "price": {"INR": 100000}, "benefits": ["Booth", "Logo on banner"]}),
        ]);
        let tier = tier_by_slug(&src, "gold").await.unwrap().unwrap();
        assert_eq!(tier.benefits, ["Booth", "Logo on banner"]);
        assert_eq!(tier.price_in("INR"), Some(100000.0));
    }
}
