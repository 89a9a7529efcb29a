use std::fs;

use shelf_catalog::{CatalogError, MetadataCatalog, ensure_fresh};

// Nothing listens on the discard port; connections are refused immediately.
const DEAD_URL: &str = "http://127.0.0.1:9/all-games";

#[test]
fn fresh_cache_is_used_without_downloading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, r#"[{"slug":"witcher_3","title":"The Witcher 3"}]"#).unwrap();

    let catalog = ensure_fresh(DEAD_URL, &path, 24).unwrap();
    assert_eq!(catalog.lookup("witcher_3"), Some("The Witcher 3"));
}

#[test]
fn failed_refresh_falls_back_to_stale_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, r#"[{"slug":"stalker_2","title":"S.T.A.L.K.E.R. 2"}]"#).unwrap();

    // A zero-hour interval makes every cache stale.
    let catalog = ensure_fresh(DEAD_URL, &path, 0).unwrap();
    assert_eq!(catalog.len(), 1);
}

#[test]
fn failed_refresh_without_cache_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let err = ensure_fresh(DEAD_URL, &path, 24).unwrap_err();
    assert!(matches!(err, CatalogError::Download(_)));
    assert!(!path.exists());
}

#[test]
fn corrupt_cache_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "not json at all").unwrap();

    assert!(matches!(
        MetadataCatalog::load(&path),
        Err(CatalogError::Json(_))
    ));
}
