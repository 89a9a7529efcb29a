use super::*;

#[test]
fn tag_wraps_value() {
    assert_eq!(tag(Some("GOG")), Some(" (GOG)".to_string()));
    assert_eq!(tag(Some("Windows")), Some(" (Windows)".to_string()));
}

#[test]
fn tag_empty_or_missing_is_none() {
    assert_eq!(tag(Some("")), None);
    assert_eq!(tag(None), None);
}

#[test]
fn catalog_id_is_exactly_five_digits() {
    assert!(is_catalog_id("(83415)"));
    assert!(!is_catalog_id("(8341)"));
    assert!(!is_catalog_id("(834150)"));
    assert!(!is_catalog_id("(GOG12)"));
    assert!(!is_catalog_id("83415"));
}

#[test]
fn base_name_drops_all_groups() {
    assert_eq!(base_name("Game (Windows) (GOG) (83415)"), "Game");
    assert_eq!(base_name("Game (Deluxe Edition) 2"), "Game 2");
    assert_eq!(base_name("Plain Name"), "Plain Name");
    assert_eq!(base_name(""), "");
}

#[test]
fn base_name_nested_groups() {
    assert_eq!(base_name("Game (Build (old)) Extra"), "Game Extra");
}

#[test]
fn base_name_unclosed_group() {
    assert_eq!(base_name("Game (broken"), "Game");
}

#[test]
fn numeric_tag_takes_last_numeric_group() {
    assert_eq!(numeric_tag("Game (111)"), Some(111));
    assert_eq!(numeric_tag("Game (Windows) (GOG) (83415)"), Some(83415));
    assert_eq!(numeric_tag("Game (1) (2)"), Some(2));
    assert_eq!(numeric_tag("Game (222) (GOG)"), Some(222));
}

#[test]
fn numeric_tag_absent() {
    assert_eq!(numeric_tag("Game"), None);
    assert_eq!(numeric_tag("Game (GOG)"), None);
    assert_eq!(numeric_tag("Game ()"), None);
}
