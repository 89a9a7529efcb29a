use super::*;

const RAW: &str = "stalker_2_heart_of_chornobyl_windows_gog_(83415)";

fn keep_ids() -> NormalizeOptions {
    NormalizeOptions::new().strip_catalog_ids(false)
}

fn catalog() -> Vec<CatalogTitle> {
    vec![
        CatalogTitle::new("stalker_2", "S.T.A.L.K.E.R. 2"),
        CatalogTitle::new("stalker_2_heart_of_chornobyl", "S.T.A.L.K.E.R. 2: Heart of Chornobyl™"),
        CatalogTitle::new("witcher_3", "The Witcher® 3: Wild Hunt"),
    ]
}

#[test]
fn full_example_keeps_catalog_id_when_not_stripping() {
    assert_eq!(
        normalize_name(RAW, &keep_ids()),
        "Stalker 2 Heart Of Chornobyl (Windows) (GOG) (83415)"
    );
}

#[test]
fn full_example_strips_catalog_id() {
    assert_eq!(
        normalize_name(RAW, &NormalizeOptions::new()),
        "Stalker 2 Heart Of Chornobyl (Windows) (GOG)"
    );
}

#[test]
fn only_seven_wide_ids_are_stripped() {
    let opts = NormalizeOptions::new();
    assert_eq!(normalize_name("game_(1234)", &opts), "Game (1234)");
    assert_eq!(normalize_name("game_(123456)", &opts), "Game (123456)");
    assert_eq!(normalize_name("game_(12345)", &opts), "Game");
}

#[test]
fn platform_tags_disabled() {
    let opts = NormalizeOptions::new().insert_platform_tags(false);
    assert_eq!(normalize_name("some_game_gog", &opts), "Some Game Gog");
}

#[test]
fn empty_input() {
    assert_eq!(normalize_name("", &NormalizeOptions::new()), "");
    assert_eq!(Normalizer::default().normalize(""), "");
}

#[test]
fn plain_name_only_capitalized() {
    assert_eq!(normalize_name("half life", &keep_ids()), "Half Life");
}

#[test]
fn capitalization_lowercases_rest_of_token() {
    assert_eq!(
        normalize_name("DOOM_eternal_gog", &NormalizeOptions::new()),
        "Doom Eternal (GOG)"
    );
    assert_eq!(normalize_name("mcDonald land", &keep_ids()), "Mcdonald Land");
}

#[test]
fn parenthetical_tokens_pass_through() {
    assert_eq!(
        normalize_name("game (deluxe edition)", &keep_ids()),
        "Game (deluxe edition)"
    );
}

#[test]
fn idempotent_without_underscores_or_tags() {
    let opts = NormalizeOptions::new();
    for input in ["half life", "  spaced   out  ", "x", "already Done", "ünïcode wörds"] {
        let once = normalize_name(input, &opts);
        assert_eq!(normalize_name(&once, &opts), once, "input: {input:?}");
    }
}

#[test]
fn slug_cut_at_marker() {
    assert_eq!(catalog_slug(RAW), "stalker_2_heart_of_chornobyl");
    assert_eq!(catalog_slug("witcher_3_gog_(12345)"), "witcher_3");
    assert_eq!(catalog_slug("witcher_3_gog"), "witcher_3");
    assert_eq!(catalog_slug("witcher_3_(12345)"), "witcher_3");
    assert_eq!(catalog_slug("witcher_3"), "witcher_3");
}

#[test]
fn exact_catalog_match_wins_over_substring() {
    let catalog = catalog();
    let normalizer = Normalizer::new(NormalizeOptions::new()).with_catalog(&catalog);
    assert_eq!(normalizer.normalize(RAW), "S.T.A.L.K.E.R. 2: Heart of Chornobyl");
}

#[test]
fn substring_match_fallback() {
    let catalog = catalog();
    let normalizer = Normalizer::new(NormalizeOptions::new()).with_catalog(&catalog);
    assert_eq!(
        normalizer.normalize("witcher_3_goty_windows_gog_(11111)"),
        "The Witcher 3: Wild Hunt"
    );
}

#[test]
fn unmatched_name_degrades_to_local_form() {
    let catalog = catalog();
    let normalizer = Normalizer::new(NormalizeOptions::new()).with_catalog(&catalog);
    assert_eq!(
        normalizer.normalize("unknown_game_gog_(22222)"),
        "Unknown Game (GOG)"
    );
}

#[test]
fn empty_catalog_disables_lookup() {
    let normalizer = Normalizer::new(NormalizeOptions::new()).with_catalog(&[]);
    assert!(!normalizer.has_catalog());
    assert_eq!(normalizer.normalize("some_game"), "Some Game");
}

#[test]
fn catalog_titles_are_made_path_safe() {
    let catalog = vec![CatalogTitle::new("acdc", "AC/DC Live")];
    let normalizer = Normalizer::new(NormalizeOptions::new()).with_catalog(&catalog);
    assert_eq!(normalizer.normalize("acdc_gog"), "AC-DC Live");
}

#[test]
fn trademarks_removed() {
    assert_eq!(strip_trademarks("Game™ Deluxe®"), "Game Deluxe");
    assert_eq!(strip_trademarks("© 2024 Studio"), "2024 Studio");
}

#[test]
fn lookup_ignores_empty_slugs() {
    let catalog = vec![CatalogTitle::new("", "Anything")];
    assert_eq!(lookup_title(&catalog, "some_game"), None);
    assert_eq!(lookup_title(&catalog, ""), None);
}

#[test]
fn display_names_need_no_normalizing() {
    let normalizer = Normalizer::default();
    assert!(normalizer.needs_normalizing(RAW));
    assert!(normalizer.needs_normalizing("some_game"));
    assert!(!normalizer.needs_normalizing("Stalker 2 Heart Of Chornobyl (Windows) (GOG)"));
    assert!(!normalizer.needs_normalizing("S.T.A.L.K.E.R. 2: Heart of Chornobyl"));
}

#[test]
fn catalog_titles_with_underscores_are_kept() {
    let catalog = vec![CatalogTitle::new("under_score", "Under_Score™ Deluxe")];
    let normalizer = Normalizer::new(NormalizeOptions::new()).with_catalog(&catalog);
    assert!(!normalizer.needs_normalizing("Under_Score Deluxe"));
    assert!(normalizer.needs_normalizing("under_score_gog"));
}
