//! Catalog reconciliation: detection passes over the remote catalog and
//! one bulk delete per pass.
//!
//! Every pass is a pure function over the fetched entries, so the same
//! snapshot can be run through any combination of passes. Remote failures
//! never propagate: they are logged and the affected pass reports nothing
//! deleted.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::CatalogApi;
use crate::types::{CatalogItem, RomQuery};

/// What to do with the entries a pass flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassAction {
    /// Log the entries and delete them in one bulk call.
    Delete,
    /// Log the entries only.
    Log,
    /// Skip the pass.
    Off,
}

/// The detection passes, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Empty,
    Fragmented,
    MissingExecutable,
    DangerousFiles,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Fragmented => write!(f, "fragmented"),
            Self::MissingExecutable => write!(f, "missing executable"),
            Self::DangerousFiles => write!(f, "dangerous files"),
        }
    }
}

/// Entries whose total size is zero.
pub fn find_empty(items: &[CatalogItem]) -> Vec<u64> {
    items
        .iter()
        .filter(|item| item.fs_size_bytes == 0)
        .map(|item| item.id)
        .collect()
}

/// Non-empty entries smaller than `min_bytes`.
pub fn find_fragmented(items: &[CatalogItem], min_bytes: u64) -> Vec<u64> {
    items
        .iter()
        .filter(|item| item.fs_size_bytes > 0 && item.fs_size_bytes < min_bytes)
        .map(|item| item.id)
        .collect()
}

/// Entries with no file ending in `required_extension`.
pub fn find_missing_executable(items: &[CatalogItem], required_extension: &str) -> Vec<u64> {
    items
        .iter()
        .filter(|item| !item.has_file_with_extension(required_extension))
        .map(|item| item.id)
        .collect()
}

/// Entries with at least one file ending in a denylisted extension.
pub fn find_dangerous(items: &[CatalogItem], denylist: &[String]) -> Vec<u64> {
    items
        .iter()
        .filter(|item| denylist.iter().any(|ext| item.has_file_with_extension(ext)))
        .map(|item| item.id)
        .collect()
}

/// Reconciler configuration.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Restrict to one platform; `None` scans the whole catalog.
    pub platform_slug: Option<String>,
    pub page_size: u32,
    pub min_size_bytes: u64,
    pub required_extension: String,
    pub dangerous_extensions: Vec<String>,
    pub empty: PassAction,
    pub fragmented: PassAction,
    pub missing_executable: PassAction,
    pub dangerous_files: PassAction,
    /// Downgrade every `Delete` to `Log`.
    pub dry_run: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            platform_slug: None,
            page_size: 250,
            min_size_bytes: 1024 * 1024,
            required_extension: ".exe".to_string(),
            dangerous_extensions: vec![".bat".to_string(), ".cmd".to_string()],
            empty: PassAction::Delete,
            fragmented: PassAction::Delete,
            missing_executable: PassAction::Delete,
            dangerous_files: PassAction::Log,
            dry_run: false,
        }
    }
}

impl ReconcileOptions {
    fn action_for(&self, pass: Pass) -> PassAction {
        let action = match pass {
            Pass::Empty => self.empty,
            Pass::Fragmented => self.fragmented,
            Pass::MissingExecutable => self.missing_executable,
            Pass::DangerousFiles => self.dangerous_files,
        };
        if self.dry_run && action == PassAction::Delete {
            PassAction::Log
        } else {
            action
        }
    }

    fn detect(&self, pass: Pass, items: &[CatalogItem]) -> Vec<u64> {
        match pass {
            Pass::Empty => find_empty(items),
            Pass::Fragmented => find_fragmented(items, self.min_size_bytes),
            Pass::MissingExecutable => find_missing_executable(items, &self.required_extension),
            Pass::DangerousFiles => find_dangerous(items, &self.dangerous_extensions),
        }
    }
}

/// Outcome of one detection pass.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub pass: Pass,
    pub action: PassAction,
    pub flagged: Vec<u64>,
    pub deleted: usize,
    pub error: Option<String>,
}

/// Outcome of a reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub items_scanned: usize,
    pub passes: Vec<PassReport>,
}

impl ReconcileReport {
    pub fn total_deleted(&self) -> usize {
        self.passes.iter().map(|p| p.deleted).sum()
    }

    pub fn total_flagged(&self) -> usize {
        self.passes.iter().map(|p| p.flagged.len()).sum()
    }
}

const PASSES: [Pass; 4] = [
    Pass::Empty,
    Pass::Fragmented,
    Pass::MissingExecutable,
    Pass::DangerousFiles,
];

/// Fetch the catalog once and run every enabled pass over it.
///
/// Entries removed by an earlier pass are not flagged again by later ones.
pub fn reconcile(api: &dyn CatalogApi, options: &ReconcileOptions) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let platform_id = match options.platform_slug.as_deref().filter(|s| !s.is_empty()) {
        Some(slug) => match api.platform_id(slug) {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                log::warn!("RomM platform '{slug}' not found; skipping reconciliation");
                return report;
            }
            Err(e) => {
                log::error!("Failed to resolve RomM platform '{slug}': {e}");
                return report;
            }
        },
        None => None,
    };

    let query = RomQuery::default()
        .platform(platform_id)
        .limit(options.page_size);
    let items = match api.list_items(&query) {
        Ok(items) => items,
        Err(e) => {
            log::error!("Failed to list RomM entries: {e}");
            return report;
        }
    };
    report.items_scanned = items.len();
    log::info!("Scanning {} RomM entries", items.len());

    let mut removed: HashSet<u64> = HashSet::new();
    for pass in PASSES {
        let action = options.action_for(pass);
        if action == PassAction::Off {
            continue;
        }

        let remaining: Vec<CatalogItem> = items
            .iter()
            .filter(|item| !removed.contains(&item.id))
            .cloned()
            .collect();
        let flagged = options.detect(pass, &remaining);
        let mut pass_report = PassReport {
            pass,
            action,
            flagged: flagged.clone(),
            deleted: 0,
            error: None,
        };

        if flagged.is_empty() {
            log::info!("No {pass} entries found");
            report.passes.push(pass_report);
            continue;
        }

        for item in remaining.iter().filter(|i| flagged.contains(&i.id)) {
            match pass {
                Pass::DangerousFiles => log::warn!(
                    "Entry with {pass}: {} (ID: {})",
                    item.display_name(),
                    item.id
                ),
                _ => log::info!("Found {pass} entry: {} (ID: {})", item.display_name(), item.id),
            }
        }

        if action == PassAction::Delete {
            log::info!("Deleting {} {pass} entries", flagged.len());
            match api.delete_items(&flagged) {
                Ok(()) => {
                    pass_report.deleted = flagged.len();
                    removed.extend(flagged.iter().copied());
                }
                Err(e) => {
                    log::error!("Failed to delete {pass} entries: {e}");
                    pass_report.error = Some(e.to_string());
                }
            }
        } else {
            log::info!("{} {pass} entries found (log only)", flagged.len());
        }

        report.passes.push(pass_report);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RomFile;

    fn item(id: u64, size: u64, files: &[&str]) -> CatalogItem {
        CatalogItem {
            id,
            name: Some(format!("Game {id}")),
            fs_size_bytes: size,
            files: files
                .iter()
                .map(|f| RomFile {
                    file_name: f.to_string(),
                    file_size_bytes: 0,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_detector_returns_zero_sized_only() {
        let items = vec![item(1, 0, &[]), item(2, 500, &[])];
        assert_eq!(find_empty(&items), vec![1]);
    }

    #[test]
    fn fragmented_excludes_empty_and_large() {
        let items = vec![item(1, 0, &[]), item(2, 500, &[]), item(3, 5_000_000, &[])];
        assert_eq!(find_fragmented(&items, 1024 * 1024), vec![2]);
    }

    #[test]
    fn missing_executable() {
        let items = vec![
            item(1, 10, &["setup_game.exe", "data.bin"]),
            item(2, 10, &["readme.txt"]),
            item(3, 10, &[]),
        ];
        assert_eq!(find_missing_executable(&items, ".exe"), vec![2, 3]);
    }

    #[test]
    fn dangerous_extensions() {
        let deny = vec![".bat".to_string(), ".cmd".to_string()];
        let items = vec![
            item(1, 10, &["setup.exe", "run.BAT"]),
            item(2, 10, &["setup.exe"]),
            item(3, 10, &["fix.cmd"]),
        ];
        assert_eq!(find_dangerous(&items, &deny), vec![1, 3]);
    }

    #[test]
    fn dry_run_downgrades_delete() {
        let opts = ReconcileOptions {
            dry_run: true,
            ..Default::default()
        };
        assert_eq!(opts.action_for(Pass::Empty), PassAction::Log);
        assert_eq!(opts.action_for(Pass::DangerousFiles), PassAction::Log);
    }

    #[test]
    fn pass_action_from_config_strings() {
        #[derive(Deserialize)]
        struct Wrapper {
            action: PassAction,
        }
        let w: Wrapper = serde_json::from_str(r#"{"action": "log"}"#).unwrap();
        assert_eq!(w.action, PassAction::Log);
        let w: Wrapper = serde_json::from_str(r#"{"action": "off"}"#).unwrap();
        assert_eq!(w.action, PassAction::Off);
    }
}
