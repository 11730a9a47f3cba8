use super::{fetch_list, fetch_one};
use crate::cms::{ContentSource, Direction, Query};
use crate::constants::CONFERENCE_TYPE;
use crate::domain::ConferenceEvent;
use crate::error::Result;

const EVENT_FIELDS: [&str; 9] = [
    "_id",
    "title",
    "slug",
    "date",
    "location",
    "email",
    "registrationUrl",
    "abstractUrl",
    "poster",
];

/// Conferences with a slug, newest date first.
pub async fn list_events(source: &dyn ContentSource) -> Result<Vec<ConferenceEvent>> {
    let query = Query::new(CONFERENCE_TYPE)
        .defined("slug.current")
        .order_by("date", Direction::Desc)
        .project(EVENT_FIELDS);
    let mut events: Vec<ConferenceEvent> = fetch_list(source, &query).await?;

    events.retain(|e| e.slug_str().is_some_and(|s| !s.is_empty()));
    // Undated drafts sink to the end
    events.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(events)
}

pub async fn event_by_slug(source: &dyn ContentSource, slug: &str) -> Result<Option<ConferenceEvent>> {
    let query = Query::new(CONFERENCE_TYPE)
        .eq("slug.current", slug)
        .project(EVENT_FIELDS)
        .first();
    fetch_one(source, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::InMemorySource;
    use chrono::NaiveDate;
    use serde_json::json;

    fn source() -> InMemorySource {
        InMemorySource::with_documents(vec![
            json!({"_id": "e1", "_type": "conference", "title": "Old", "slug": {"current": "old"}, "date": "2023-03-01"}),
            json!({"_id": "e2", "_type": "conference", "title": "New", "slug": {"current": "new"}, "date": "2025-06-10"}),
            json!({"_id": "e3", "_type": "conference", "title": "No slug", "date": "2026-01-01"}),
            json!({"_id": "e4", "_type": "conference", "title": "Undated", "slug": {"current": "undated"}}),
            json!({"_id": "e5", "_type": "conference", "title": "Mid", "slug": {"current": "mid"}, "date": "2024-08-15T10:00:00Z"}),
        ])
    }

    #[tokio::test]
    async fn events_are_slugged_and_newest_first() {
        let events = list_events(&source()).await.unwrap();
        let slugs: Vec<_> = events.iter().filter_map(|e| e.slug_str()).collect();
        assert_eq!(slugs, ["new", "mid", "old", "undated"]);
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2025, 6, 10));
    }

    #[tokio::test]
    async fn lookup_by_slug() {
        let src = source();
        let hit = event_by_slug(&src, "mid").await.unwrap().unwrap();
        assert_eq!(hit.title, "Mid");
        assert!(event_by_slug(&src, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_documents_are_skipped() {
        let src = InMemorySource::with_documents(vec![
            json!({"_id": "ok", "_type": "conference", "title": "Fine", "slug": {"current": "fine"}, "date": "2025-01-01"}),
            json!({"_id": "bad", "_type": "conference", "title": 42, "slug": {"current": "bad"}}),
        ]);
        let events = list_events(&src).await.unwrap();
        assert_eq!(events.len(), 1);
    }
}
