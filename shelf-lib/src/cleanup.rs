//! Library sweep: extras removal, empty-directory removal and duplicate
//! resolution over the top-level game folders of a library root.
//!
//! Every check is computed from the current filesystem state, so an
//! interrupted sweep is finished by simply running it again. A removal
//! that fails is logged, recorded in the report, and the sweep moves on.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use shelf_core::find_duplicates;
use shelf_core::util::format_bytes_approx;

use crate::settings::CleanupSettings;

/// Options controlling a cleanup sweep.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub remove_extras: bool,
    /// Lowercased substrings that mark a `.zip` as bonus content.
    pub extras_patterns: Vec<String>,
    pub remove_receipts: bool,
    pub receipt_suffix: String,
    pub remove_empty_dirs: bool,
    pub remove_duplicates: bool,
    /// Report what would be removed without touching the disk.
    pub dry_run: bool,
}

impl From<&CleanupSettings> for CleanupOptions {
    fn from(s: &CleanupSettings) -> Self {
        Self {
            remove_extras: s.remove_extras,
            extras_patterns: s
                .extras_patterns
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            remove_receipts: s.remove_text_files,
            receipt_suffix: s.receipt_suffix.clone(),
            remove_empty_dirs: s.remove_empty_dirs,
            remove_duplicates: s.remove_duplicates,
            dry_run: false,
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::from(&CleanupSettings::default())
    }
}

impl CleanupOptions {
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }
}

/// Summary of a cleanup sweep. In dry-run mode the counts are what would
/// have been removed.
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    pub files_removed: usize,
    pub dirs_removed: usize,
    pub duplicates_removed: usize,
    pub bytes_freed: u64,
    pub errors: Vec<String>,
}

/// True when `file_name` is an installer receipt.
pub fn is_receipt(file_name: &str, suffix: &str) -> bool {
    !suffix.is_empty() && file_name.to_lowercase().ends_with(&suffix.to_lowercase())
}

/// True when `file_name` is a `.zip` whose name contains any of `patterns`
/// (case-insensitive substring, so "Ghost.zip" matches "ost").
pub fn is_extra<S: AsRef<str>>(file_name: &str, patterns: &[S]) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".zip")
        && patterns.iter().any(|p| {
            let p = p.as_ref().to_lowercase();
            !p.is_empty() && lower.contains(&p)
        })
}

/// Total size of the regular files under `path`. Unreadable entries count
/// as zero.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Sweep `root`: extras first, then empty directories, then duplicates.
pub fn run_cleanup(root: &Path, options: &CleanupOptions) -> CleanupReport {
    let mut report = CleanupReport::default();

    let dirs = match top_level_dirs(root) {
        Ok(dirs) => dirs,
        Err(e) => {
            log::error!("Cannot read library root {}: {e}", root.display());
            report
                .errors
                .push(format!("Failed to read {}: {e}", root.display()));
            return report;
        }
    };

    let verb = if options.dry_run {
        "Would remove"
    } else {
        "Removed"
    };
    let mut gone: HashSet<PathBuf> = HashSet::new();

    for dir in &dirs {
        let remaining = remove_extras(root, dir, options, verb, &mut report);

        if options.remove_empty_dirs
            && remaining == Some(0)
            && (options.dry_run || record(fs::remove_dir(dir), dir, &mut report))
        {
            log::info!("{verb} empty directory: {}", relative(root, dir));
            report.dirs_removed += 1;
            gone.insert(dir.clone());
        }
    }

    if options.remove_duplicates {
        let names: Vec<String> = dirs
            .iter()
            .filter(|d| !gone.contains(*d))
            .filter_map(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();

        for group in find_duplicates(&names) {
            for name in &group.superseded {
                let path = root.join(name);
                let size = dir_size(&path);
                if options.dry_run || record(fs::remove_dir_all(&path), &path, &mut report) {
                    log::info!(
                        "{verb} duplicate: {name} ({}), keeping {}",
                        format_bytes_approx(size),
                        group.survivor,
                    );
                    report.duplicates_removed += 1;
                    report.bytes_freed += size;
                }
            }
        }
    }

    report
}

/// Remove receipts and extras directly inside `dir`. Returns how many
/// entries are left, or `None` if the directory could not be listed.
fn remove_extras(
    root: &Path,
    dir: &Path,
    options: &CleanupOptions,
    verb: &str,
    report: &mut CleanupReport,
) -> Option<usize> {
    let entries: Vec<fs::DirEntry> = match fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(e) => {
            report
                .errors
                .push(format!("Failed to read {}: {e}", dir.display()));
            return None;
        }
    };

    let mut remaining = entries.len();
    for entry in &entries {
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let doomed = (options.remove_receipts && is_receipt(&name, &options.receipt_suffix))
            || (options.remove_extras && is_extra(&name, &options.extras_patterns));
        if !doomed {
            continue;
        }

        let path = entry.path();
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if options.dry_run || record(fs::remove_file(&path), &path, report) {
            log::info!(
                "{verb} {} ({})",
                relative(root, &path),
                format_bytes_approx(size)
            );
            report.files_removed += 1;
            report.bytes_freed += size;
            remaining -= 1;
        }
    }
    Some(remaining)
}

/// Log and record a failed removal. Returns whether it succeeded.
fn record(result: std::io::Result<()>, path: &Path, report: &mut CleanupReport) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to remove {}: {e}", path.display());
            report
                .errors
                .push(format!("Failed to remove {}: {e}", path.display()));
            false
        }
    }
}

fn top_level_dirs(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
#[path = "tests/cleanup_tests.rs"]
mod tests;
