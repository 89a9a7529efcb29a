//! Application settings loaded from `~/.config/shelf/settings.toml`.
//!
//! Every field has a default, so a missing file (or a file that only sets a
//! handful of keys) yields a usable configuration. The `Settings` value is
//! built once at startup and passed by reference to every step.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use shelf_core::NormalizeOptions;
use shelf_core::util::mask_secret;
use shelf_romm::{PassAction, ReconcileOptions, RommConfig};
use shelf_torrent::QbitConfig;

use crate::error::SettingsError;

/// Environment variables that take priority over secrets in the file.
pub const ENV_QBIT_PASSWORD: &str = "SHELF_QBIT_PASSWORD";
pub const ENV_ROMM_USERNAME: &str = "SHELF_ROMM_USERNAME";
pub const ENV_ROMM_PASSWORD: &str = "SHELF_ROMM_PASSWORD";

/// Canonical path to the settings file: `~/.config/shelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("shelf").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub admin: AdminSettings,
    pub qbittorrent: QbitSettings,
    pub normalize: NormalizeSettings,
    pub gog: GogSettings,
    pub cleanup: CleanupSettings,
    pub romm: RommSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Final home of every game folder.
    pub library_root: PathBuf,
    /// Where the download client leaves finished downloads.
    pub staging_root: PathBuf,
    /// Hours to sleep between pipeline cycles.
    pub wait_time_hours: u64,
    /// Run a cycle immediately instead of sleeping first.
    pub on_startup: bool,
    pub log_file: Option<PathBuf>,
    pub debug_logging: bool,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from("/data/library"),
            staging_root: PathBuf::from("/data/torrent"),
            wait_time_hours: 4,
            on_startup: true,
            log_file: None,
            debug_logging: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QbitSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Only torrents in this category are transferred.
    pub category: String,
    /// Upper bound on torrents moved per cycle; 0 means no limit.
    pub max_torrents_per_run: usize,
    /// Forget the torrent record (keeping its files) after a successful move.
    pub delete_after_processing: bool,
}

impl Default for QbitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "localhost".to_string(),
            port: 8080,
            username: "admin".to_string(),
            password: String::new(),
            category: "gog".to_string(),
            max_torrents_per_run: 0,
            delete_after_processing: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeSettings {
    pub insert_platform_tags: bool,
    pub strip_catalog_ids: bool,
    /// Prefer display titles from the metadata catalog when available.
    pub catalog_lookup: bool,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            insert_platform_tags: true,
            strip_catalog_ids: true,
            catalog_lookup: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GogSettings {
    pub all_games_file: PathBuf,
    pub all_games_url: String,
    pub cache_refresh_hours: u64,
}

impl Default for GogSettings {
    fn default() -> Self {
        Self {
            all_games_file: shelf_catalog::default_cache_path(),
            all_games_url: "https://gog-games.to/api/web/all-games".to_string(),
            cache_refresh_hours: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupSettings {
    /// Delete bonus-content archives whose name matches `extras_patterns`.
    pub remove_extras: bool,
    pub extras_patterns: Vec<String>,
    /// Delete installer receipt files ending in `receipt_suffix`.
    pub remove_text_files: bool,
    pub receipt_suffix: String,
    pub remove_empty_dirs: bool,
    pub remove_duplicates: bool,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            remove_extras: true,
            extras_patterns: [
                "soundtrack",
                "ost",
                "flac",
                "wav",
                "mp3",
                "artbook",
                "booklet",
                "wallpaper",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            remove_text_files: true,
            receipt_suffix: "gog-games.to.txt".to_string(),
            remove_empty_dirs: true,
            remove_duplicates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RommSettings {
    pub enabled: bool,
    pub url: String,
    pub username: String,
    pub password: String,
    /// Platform to reconcile; empty scans the whole catalog.
    pub platform_slug: String,
    pub page_size: u32,
    pub min_size_bytes: u64,
    pub required_extension: String,
    pub dangerous_extensions: Vec<String>,
    pub empty: PassAction,
    pub fragmented: PassAction,
    pub missing_executable: PassAction,
    pub dangerous_files: PassAction,
}

impl Default for RommSettings {
    fn default() -> Self {
        let defaults = ReconcileOptions::default();
        Self {
            enabled: false,
            url: String::new(),
            username: String::new(),
            password: String::new(),
            platform_slug: "win".to_string(),
            page_size: defaults.page_size,
            min_size_bytes: defaults.min_size_bytes,
            required_extension: defaults.required_extension,
            dangerous_extensions: defaults.dangerous_extensions,
            empty: defaults.empty,
            fragmented: defaults.fragmented,
            missing_executable: defaults.missing_executable,
            dangerous_files: defaults.dangerous_files,
        }
    }
}

impl Settings {
    /// Load settings from `path`, then apply environment overrides.
    ///
    /// A missing file yields the defaults; a file that fails to parse is an
    /// error rather than a silent fallback.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let mut settings = if path.exists() {
            let contents = fs::read_to_string(path)?;
            Self::from_toml_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            log::debug!("No settings file at {}, using defaults", path.display());
            Self::default()
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Replace secrets with values from `lookup` (normally the environment).
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(pw) = get(ENV_QBIT_PASSWORD) {
            self.qbittorrent.password = pw;
        }
        if let Some(user) = get(ENV_ROMM_USERNAME) {
            self.romm.username = user;
        }
        if let Some(pw) = get(ENV_ROMM_PASSWORD) {
            self.romm.password = pw;
        }
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A copy with passwords masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.qbittorrent.password.is_empty() {
            copy.qbittorrent.password = mask_secret(&copy.qbittorrent.password);
        }
        if !copy.romm.password.is_empty() {
            copy.romm.password = mask_secret(&copy.romm.password);
        }
        copy
    }

    /// Write these settings to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = self.to_toml_string()?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::new()
            .insert_platform_tags(self.normalize.insert_platform_tags)
            .strip_catalog_ids(self.normalize.strip_catalog_ids)
    }

    pub fn qbit_config(&self) -> QbitConfig {
        QbitConfig {
            host: self.qbittorrent.host.clone(),
            port: self.qbittorrent.port,
            username: self.qbittorrent.username.clone(),
            password: self.qbittorrent.password.clone(),
        }
    }

    pub fn romm_config(&self) -> RommConfig {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RommConfig {
            url: self.romm.url.clone(),
            username: non_empty(&self.romm.username),
            password: non_empty(&self.romm.password),
        }
    }

    pub fn reconcile_options(&self, dry_run: bool) -> ReconcileOptions {
        let r = &self.romm;
        ReconcileOptions {
            platform_slug: (!r.platform_slug.is_empty()).then(|| r.platform_slug.clone()),
            page_size: r.page_size,
            min_size_bytes: r.min_size_bytes,
            required_extension: r.required_extension.clone(),
            dangerous_extensions: r.dangerous_extensions.clone(),
            empty: r.empty,
            fragmented: r.fragmented,
            missing_executable: r.missing_executable,
            dangerous_files: r.dangerous_files,
            dry_run,
        }
    }
}

/// Write a starter settings file containing every default.
pub fn save_default(path: &Path) -> Result<(), SettingsError> {
    Settings::default().save(path)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
