use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use shelf_core::RetryPolicy;

use crate::catalog::MetadataCatalog;
use crate::error::CatalogError;

const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Information about the cached catalog file for display purposes.
#[derive(Debug, Clone)]
pub struct CacheInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub modified: DateTime<Local>,
    pub entries: usize,
}

/// Default location of the cached catalog: `~/.cache/shelf/gog_all_games.json`.
pub fn default_cache_path() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("shelf").join("gog_all_games.json")
}

/// True when the cache file is missing or older than `refresh_hours`.
pub fn is_stale(path: &Path, refresh_hours: u64) -> bool {
    is_stale_at(path, refresh_hours, SystemTime::now())
}

pub(crate) fn is_stale_at(path: &Path, refresh_hours: u64, now: SystemTime) -> bool {
    let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) else {
        return true;
    };
    let max_age = Duration::from_secs(refresh_hours.saturating_mul(3600));
    match now.duration_since(modified) {
        Ok(age) => age >= max_age,
        // Modified in the future: treat as fresh.
        Err(_) => false,
    }
}

/// Download the catalog from `url` and write it to `path`.
///
/// The payload is parsed before it replaces the cached copy, so a broken
/// response never clobbers a good cache.
pub fn fetch(url: &str, path: &Path) -> Result<MetadataCatalog, CatalogError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CatalogError::download(format!("Failed to build HTTP client: {e}")))?;

    let body = RetryPolicy::default().run(
        || download(&client, url),
        |e| matches!(e, CatalogError::Download(_)),
        |attempt, e| log::warn!("Catalog download attempt {attempt} failed: {e}"),
    )?;

    let catalog = MetadataCatalog::from_json(&body)?;
    write_atomic(path, body.as_bytes())?;
    log::info!(
        "Cached {} catalog titles to {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

fn download(client: &reqwest::blocking::Client, url: &str) -> Result<String, CatalogError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| CatalogError::download(format!("Failed to download catalog: {e}")))?;

    if !response.status().is_success() {
        return Err(CatalogError::download(format!(
            "HTTP {} for catalog ({url})",
            response.status()
        )));
    }

    response
        .text()
        .map_err(|e| CatalogError::download(format!("Failed to read catalog response: {e}")))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load the cached catalog, refreshing it first when stale.
///
/// A failed refresh is logged and the existing cache (if any) is used.
pub fn ensure_fresh(
    url: &str,
    path: &Path,
    refresh_hours: u64,
) -> Result<MetadataCatalog, CatalogError> {
    if is_stale(path, refresh_hours) {
        log::info!("Metadata catalog is stale, refreshing from {url}");
        match fetch(url, path) {
            Ok(catalog) => return Ok(catalog),
            Err(e) if path.exists() => {
                log::warn!("Catalog refresh failed, using cached copy: {e}");
            }
            Err(e) => return Err(e),
        }
    }
    MetadataCatalog::load(path)
}

/// Describe the cached catalog file, if present.
pub fn info(path: &Path) -> Result<Option<CacheInfo>, CatalogError> {
    if !path.exists() {
        return Ok(None);
    }
    let meta = fs::metadata(path)?;
    let modified: DateTime<Local> = meta.modified()?.into();
    let entries = MetadataCatalog::load(path).map(|c| c.len()).unwrap_or(0);
    Ok(Some(CacheInfo {
        path: path.to_path_buf(),
        file_size: meta.len(),
        modified,
        entries,
    }))
}

/// Delete the cached catalog file. Returns the number of bytes freed.
pub fn clear(path: &Path) -> Result<u64, CatalogError> {
    if !path.exists() {
        return Ok(0);
    }
    let size = fs::metadata(path)?.len();
    fs::remove_file(path)?;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_stale(&dir.path().join("none.json"), 24));
    }

    #[test]
    fn fresh_file_is_not_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "[]").unwrap();
        assert!(!is_stale(&path, 24));
    }

    #[test]
    fn old_file_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "[]").unwrap();
        let later = SystemTime::now() + Duration::from_secs(25 * 3600);
        assert!(is_stale_at(&path, 24, later));
    }

    #[test]
    fn zero_interval_always_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "[]").unwrap();
        assert!(is_stale(&path, 0));
    }

    #[test]
    fn clear_reports_freed_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "[]").unwrap();
        assert_eq!(clear(&path).unwrap(), 2);
        assert!(!path.exists());
        assert_eq!(clear(&path).unwrap(), 0);
    }

    #[test]
    fn info_counts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"[{"slug":"a","title":"A"}]"#).unwrap();
        let info = info(&path).unwrap().unwrap();
        assert_eq!(info.entries, 1);
        assert_eq!(info.file_size, 26);
    }
}
