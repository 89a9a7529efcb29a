//! Moving finished downloads from the staging area into the library.
//!
//! Each completed torrent's folder is moved to `library_root/<normalized
//! name>`, replacing any folder already there. Only after a successful move
//! is the torrent record dropped from the download client, and then with
//! its files kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use shelf_core::Normalizer;
use shelf_torrent::{QbitClient, TorrentError, TorrentFilter};

/// A finished download as seen by the transfer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTorrent {
    pub hash: String,
    pub name: String,
    /// Where the client says the content lives, if it reported one.
    pub content_path: Option<PathBuf>,
}

/// The download client operations the transfer step needs.
pub trait TorrentSource {
    /// Finished torrents in `category`.
    fn completed(&self, category: &str) -> Result<Vec<CompletedTorrent>, TorrentError>;

    /// Drop a torrent record, leaving its files on disk.
    fn forget(&self, hash: &str) -> Result<(), TorrentError>;
}

impl TorrentSource for QbitClient {
    fn completed(&self, category: &str) -> Result<Vec<CompletedTorrent>, TorrentError> {
        let torrents = self.torrents(Some(category), TorrentFilter::Completed)?;
        Ok(torrents
            .into_iter()
            .filter(|t| t.is_complete())
            .map(|t| CompletedTorrent {
                content_path: (!t.content_path.is_empty()).then(|| PathBuf::from(&t.content_path)),
                hash: t.hash,
                name: t.name,
            })
            .collect())
    }

    fn forget(&self, hash: &str) -> Result<(), TorrentError> {
        self.delete(&[hash], false)
    }
}

#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub staging_root: PathBuf,
    pub library_root: PathBuf,
    pub category: String,
    /// 0 means no limit.
    pub max_per_run: usize,
    pub delete_after_processing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TransferSummary {
    pub moved: usize,
    pub failed: usize,
    pub forgotten: usize,
    pub errors: Vec<String>,
}

/// Move `source` to `destination`, replacing whatever is at `destination`.
///
/// Falls back to copy-then-delete when the two paths are on different
/// filesystems.
pub fn move_dir(source: &Path, destination: &Path) -> io::Result<()> {
    if !source.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", source.display()),
        ));
    }
    if source == destination {
        return Ok(());
    }

    if destination.is_dir() {
        fs::remove_dir_all(destination)?;
    } else if destination.exists() {
        fs::remove_file(destination)?;
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "{} is on another filesystem, copying instead",
                source.display()
            );
            copy_tree(source, destination)?;
            fs::remove_dir_all(source)
        }
        Err(e) => Err(e),
    }
}

fn copy_tree(source: &Path, destination: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let target = destination.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Move every completed torrent in the configured category into the library.
///
/// A failed move keeps the torrent record so the next cycle retries it.
/// Only a failure to list torrents is returned as an error.
pub fn transfer_completed(
    source: &dyn TorrentSource,
    options: &TransferOptions,
    normalizer: &Normalizer<'_>,
) -> Result<TransferSummary, TorrentError> {
    let mut torrents = source.completed(&options.category)?;
    if options.max_per_run > 0 && torrents.len() > options.max_per_run {
        log::info!(
            "{} completed torrents, processing the first {}",
            torrents.len(),
            options.max_per_run
        );
        torrents.truncate(options.max_per_run);
    }
    log::info!(
        "Found {} completed torrents in category '{}'",
        torrents.len(),
        options.category
    );

    let mut summary = TransferSummary::default();
    for torrent in &torrents {
        let from = torrent
            .content_path
            .clone()
            .unwrap_or_else(|| options.staging_root.join(&torrent.name));

        if !move_into_library(&from, &torrent.name, options, normalizer, &mut summary) {
            continue;
        }

        if options.delete_after_processing {
            match source.forget(&torrent.hash) {
                Ok(()) => {
                    log::debug!("Removed torrent record {}", torrent.hash);
                    summary.forgotten += 1;
                }
                Err(e) => {
                    log::warn!("Failed to remove torrent record for {}: {e}", torrent.name);
                    summary
                        .errors
                        .push(format!("Failed to remove torrent {}: {e}", torrent.hash));
                }
            }
        }
    }
    Ok(summary)
}

/// Move every folder in the staging area into the library. Used when no
/// download client is configured.
pub fn transfer_staging(options: &TransferOptions, normalizer: &Normalizer<'_>) -> TransferSummary {
    let mut summary = TransferSummary::default();
    if options.staging_root == options.library_root {
        return summary;
    }

    let mut folders: Vec<PathBuf> = match fs::read_dir(&options.staging_root) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
        Err(e) => {
            log::error!(
                "Cannot read staging area {}: {e}",
                options.staging_root.display()
            );
            summary.errors.push(format!(
                "Failed to read {}: {e}",
                options.staging_root.display()
            ));
            return summary;
        }
    };
    folders.sort();

    for folder in folders {
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        move_into_library(&folder, &name, options, normalizer, &mut summary);
    }
    summary
}

fn move_into_library(
    from: &Path,
    raw_name: &str,
    options: &TransferOptions,
    normalizer: &Normalizer<'_>,
    summary: &mut TransferSummary,
) -> bool {
    let new_name = normalizer.normalize(raw_name);
    if new_name.is_empty() {
        summary.failed += 1;
        summary
            .errors
            .push(format!("{raw_name:?} normalizes to an empty name"));
        return false;
    }
    let to = options.library_root.join(&new_name);

    match move_dir(from, &to) {
        Ok(()) => {
            log::info!("Moved {raw_name} -> {}", to.display());
            summary.moved += 1;
            true
        }
        Err(e) => {
            log::error!("Failed to move {} to {}: {e}", from.display(), to.display());
            summary.failed += 1;
            summary
                .errors
                .push(format!("Failed to move {}: {e}", from.display()));
            false
        }
    }
}

#[cfg(test)]
#[path = "tests/transfer_tests.rs"]
mod tests;
