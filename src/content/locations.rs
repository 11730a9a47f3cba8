use super::fetch_list;
use crate::cms::{ContentSource, Direction, Query};
use crate::domain::{LocationKind, MapLocation};
use crate::error::Result;
use tracing::warn;

/// Active locations, highest priority first then by title, with
/// out-of-range coordinates dropped.
pub async fn active_locations(source: &dyn ContentSource, kind: LocationKind) -> Result<Vec<MapLocation>> {
    let query = Query::new(kind.doc_type())
        .eq("isActive", true)
        .order_by("priority", Direction::Desc)
        .order_by("title", Direction::Asc);
    let locations: Vec<MapLocation> = fetch_list(source, &query).await?;
    Ok(prepare_markers(locations))
}

/// Filter and order locations for display. Also applied to the fallback list.
pub fn prepare_markers(mut locations: Vec<MapLocation>) -> Vec<MapLocation> {
    locations.retain(|l| {
        if !l.is_active {
            return false;
        }
        let valid = l.has_valid_coordinates();
        if !valid {
            warn!(id = %l.id, lat = l.latitude, lng = l.longitude, "dropping location with invalid coordinates");
        }
        valid
    });
    locations.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.title.cmp(&b.title)));
    locations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::InMemorySource;
    use serde_json::json;

    fn loc(id: &str, title: &str, lat: f64, lng: f64, active: bool, priority: i64) -> serde_json::Value {
        json!({
            "_id": id, "_type": "mapLocation", "title": title,
            "latitude": lat, "longitude": lng, "isActive": active, "priority": priority
        })
    }

    #[tokio::test]
    async fn active_valid_locations_sorted_by_priority_then_title() {
        let src = InMemorySource::with_documents(vec![
            loc("1", "Zurich", 47.37, 8.54, true, 5),
            loc("2", "Amsterdam", 52.37, 4.90, true, 5),
            loc("3", "Dubai", 25.20, 55.27, true, 9),
            loc("4", "Hidden", 10.0, 10.0, false, 10),
            loc("5", "Broken", 95.0, 10.0, true, 10),
            loc("6", "Antimeridian", 0.0, -181.0, true, 1),
            loc("7", "Boston", 42.36, -71.06, true, 0),
        ]);
        let markers = active_locations(&src, LocationKind::Map).await.unwrap();
        let titles: Vec<_> = markers.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Dubai", "Amsterdam", "Zurich", "Boston"]);
    }

    #[tokio::test]
    async fn kinds_read_their_own_document_type() {
        let mut conference = loc("c1", "Venue Hall", 1.0, 1.0, true, 1);
        conference["_type"] = json!("conferenceLocation");
        let src = InMemorySource::with_documents(vec![loc("m1", "Map Pin", 2.0, 2.0, true, 1), conference]);

        let conf = active_locations(&src, LocationKind::Conference).await.unwrap();
        assert_eq!(conf.len(), 1);
        assert_eq!(conf[0].title, "Venue Hall");
    }
}
