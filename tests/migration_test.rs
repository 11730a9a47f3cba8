use anyhow::Result;
use conf_site::cms::InMemorySource;
use conf_site::migration;
use conf_site::schema::SchemaRegistry;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[test]
fn invalid_documents_are_rejected_with_reasons() -> Result<()> {
    let registry = SchemaRegistry::load()?;
    let plan = migration::plan(
        &registry,
        vec![
            json!({"_id": "m-1", "_type": "mapLocation", "title": "Berlin", "latitude": 52.5, "longitude": 13.4}),
            json!({"_id": "m-2", "_type": "mapLocation", "title": "Off the map", "latitude": 95.0, "longitude": 0.0}),
            json!({"_type": "mapLocation", "title": "No id", "latitude": 1.0, "longitude": 1.0}),
            json!({"_id": "x", "_type": "unknownType"}),
        ],
    );
    assert_eq!(plan.accepted.len(), 1);
    assert_eq!(plan.rejected.len(), 3);
    assert_eq!(plan.rejected[0].label, "m-2");
    assert!(plan.rejected[0].problems.iter().any(|p| p.contains("latitude")));
    assert_eq!(plan.rejected[1].label, "#2");
    Ok(())
}

#[tokio::test]
async fn documents_are_written_in_batches() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("export.ndjson");
    let lines: Vec<String> = (0..5)
        .map(|i| {
            json!({"_id": format!("q-{i}"), "_type": "testimonial", "name": "Guest", "quote": "Well organised",
                   "rating": 4, "isActive": true})
            .to_string()
        })
        .collect();
    fs::write(&path, lines.join("\n") + "\n\n")?;

    let documents = migration::read_documents(&path)?;
    assert_eq!(documents.len(), 5);
    let plan = migration::plan(&SchemaRegistry::load()?, documents);
    assert!(plan.rejected.is_empty());

    let target = InMemorySource::new();
    let written = migration::apply(&target, &plan.accepted, 2).await?;
    assert_eq!(written, 5);
    assert_eq!(target.documents().await.len(), 5);

    // createOrReplace makes a re-run idempotent
    migration::apply(&target, &plan.accepted, 2).await?;
    assert_eq!(target.documents().await.len(), 5);
    Ok(())
}

#[test]
fn json_arrays_and_single_documents_are_read() -> Result<()> {
    let dir = tempdir()?;
    let array = dir.path().join("docs.json");
    fs::write(&array, r#"[{"_id": "a", "_type": "galleryItem"}, {"_id": "b", "_type": "galleryItem"}]"#)?;
    assert_eq!(migration::read_documents(&array)?.len(), 2);

    let single = dir.path().join("one.json");
    fs::write(&single, r#"{"_id": "a", "_type": "galleryItem"}"#)?;
    assert_eq!(migration::read_documents(&single)?.len(), 1);
    Ok(())
}
