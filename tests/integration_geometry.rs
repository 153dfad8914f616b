use std::sync::Arc;

use studio_desk::geometry::{FileKv, GeometryStore, KeyValueStore, SizeLimits, WindowGeometry};

fn file_store(path: &std::path::Path) -> GeometryStore {
    GeometryStore::new(Arc::new(FileKv::open(path)))
}

#[test]
fn geometry_survives_a_fresh_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("geometry.json");

    let first = file_store(&path);
    assert_eq!(first.load("CALENDAR"), None);
    first.save("CALENDAR", WindowGeometry::new(40, 60, 500, 400));
    drop(first);

    let second = file_store(&path);
    assert_eq!(second.load("CALENDAR"), Some(WindowGeometry::new(40, 60, 500, 400)));
    assert_eq!(second.load("NOTES"), None);

    let raw = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let stored: serde_json::Value =
        serde_json::from_str(doc["window:CALENDAR:geometry"].as_str().unwrap()).unwrap();
    assert_eq!(
        stored,
        serde_json::json!({"x": 40, "y": 60, "width": 500, "height": 400})
    );
}

#[test]
fn malformed_values_read_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geometry.json");
    let kv = Arc::new(FileKv::open(&path));
    kv.set("window:CALENDAR:geometry", "{not json".to_string()).unwrap();
    kv.set("window:NOTES:geometry", r#"{"x":1,"y":2}"#.to_string()).unwrap();

    let store = GeometryStore::new(kv);
    assert_eq!(store.load("CALENDAR"), None);
    assert_eq!(store.load("NOTES"), None);

    store.save("CALENDAR", WindowGeometry::new(0, 0, 300, 300));
    assert_eq!(store.load("CALENDAR"), Some(WindowGeometry::new(0, 0, 300, 300)));
}

#[test]
fn unreadable_state_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geometry.json");
    std::fs::write(&path, "]]]").unwrap();
    let store = file_store(&path);
    assert_eq!(store.load("CALENDAR"), None);
    store.save("CALENDAR", WindowGeometry::new(1, 2, 300, 240));
    assert_eq!(
        file_store(&path).load("CALENDAR"),
        Some(WindowGeometry::new(1, 2, 300, 240))
    );
}

#[test]
fn reference_minimum_applies_to_stored_sizes() {
    let undersized = WindowGeometry::new(5, 5, 100, 500);
    assert_eq!(
        undersized.with_limits(SizeLimits::REFERENCE),
        WindowGeometry::new(5, 5, 260, 500)
    );
}
