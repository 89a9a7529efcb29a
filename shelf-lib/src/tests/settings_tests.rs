use super::*;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings.admin.library_root, PathBuf::from("/data/library"));
    assert_eq!(settings.admin.wait_time_hours, 4);
    assert_eq!(settings.qbittorrent.category, "gog");
    assert!(!settings.romm.enabled);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let settings = Settings::from_toml_str(
        r#"
        [admin]
        library_root = "/mnt/games"

        [romm]
        enabled = true
        url = "http://romm.lan"
        dangerous_files = "delete"
        "#,
    )
    .unwrap();
    assert_eq!(settings.admin.library_root, PathBuf::from("/mnt/games"));
    assert_eq!(settings.admin.staging_root, PathBuf::from("/data/torrent"));
    assert!(settings.romm.enabled);
    assert_eq!(settings.romm.dangerous_files, PassAction::Delete);
    assert_eq!(settings.romm.empty, PassAction::Delete);
    assert_eq!(settings.cleanup.receipt_suffix, "gog-games.to.txt");
}

#[test]
fn unparsable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[admin\nlibrary_root = ").unwrap();
    assert!(matches!(
        Settings::load(&path),
        Err(SettingsError::Parse { .. })
    ));
}

#[test]
fn unknown_action_is_rejected() {
    assert!(Settings::from_toml_str("[romm]\nempty = \"purge\"").is_err());
}

#[test]
fn environment_overrides_secrets() {
    let mut settings = Settings::default();
    settings.qbittorrent.password = "from-file".to_string();
    settings.apply_overrides(|key| match key {
        ENV_QBIT_PASSWORD => Some("from-env".to_string()),
        ENV_ROMM_USERNAME => Some("romm-user".to_string()),
        ENV_ROMM_PASSWORD => Some(String::new()),
        _ => None,
    });
    assert_eq!(settings.qbittorrent.password, "from-env");
    assert_eq!(settings.romm.username, "romm-user");
    assert_eq!(settings.romm.password, "");
}

#[test]
fn save_then_load_matches() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let mut settings = Settings::default();
    settings.admin.log_file = Some(PathBuf::from("/var/log/shelf.log"));
    settings.romm.fragmented = PassAction::Off;
    settings.save(&path).unwrap();

    let loaded = Settings::from_toml_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, settings);
    assert!(!path.with_extension("toml.tmp").exists());
}

#[test]
fn save_default_writes_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    save_default(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    for section in ["[admin]", "[qbittorrent]", "[normalize]", "[gog]", "[cleanup]", "[romm]"] {
        assert!(text.contains(section), "missing {section}");
    }
}

#[test]
fn redacted_masks_passwords() {
    let mut settings = Settings::default();
    settings.qbittorrent.password = "hunter2".to_string();
    let shown = settings.redacted();
    assert_eq!(shown.qbittorrent.password, "hu****");
    assert_eq!(shown.romm.password, "");
}

#[test]
fn romm_config_drops_blank_credentials() {
    let mut settings = Settings::default();
    settings.romm.url = "http://romm.lan".to_string();
    let cfg = settings.romm_config();
    assert!(cfg.username.is_none());
    assert!(cfg.password.is_none());
}

#[test]
fn reconcile_options_follow_settings() {
    let mut settings = Settings::default();
    settings.romm.platform_slug = String::new();
    settings.romm.min_size_bytes = 42;
    let opts = settings.reconcile_options(true);
    assert!(opts.platform_slug.is_none());
    assert_eq!(opts.min_size_bytes, 42);
    assert!(opts.dry_run);
}
