//! One pipeline cycle and the loop that repeats it.
//!
//! A cycle runs, in order: metadata catalog refresh, transfer of finished
//! downloads, library rename, cleanup, and catalog reconciliation. Every
//! step is best-effort except authenticating with the download client.

use std::thread;
use std::time::Duration;

use shelf_catalog::MetadataCatalog;
use shelf_core::Normalizer;
use shelf_romm::{CatalogApi, ReconcileReport, RommClient, reconcile};
use shelf_torrent::{QbitClient, TorrentError};

use crate::cleanup::{CleanupOptions, CleanupReport, run_cleanup};
use crate::error::PipelineError;
use crate::rename::{RenameSummary, execute_renames, plan_renames};
use crate::settings::Settings;
use crate::transfer::{
    TorrentSource, TransferOptions, TransferSummary, transfer_completed, transfer_staging,
};

/// Where a cycle finds finished downloads.
#[derive(Clone, Copy)]
pub enum Downloads<'a> {
    /// Ask the download client which torrents are complete.
    Client(&'a dyn TorrentSource),
    /// No download client: every folder in the staging area is finished.
    Staging,
    /// The download client is configured but unreachable. Staging may hold
    /// partial downloads, so nothing is moved.
    Unavailable,
}

/// What one cycle did.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Titles available for name lookups; 0 when the catalog is unavailable.
    pub catalog_titles: usize,
    pub transfer: Option<TransferSummary>,
    pub rename: Option<RenameSummary>,
    pub cleanup: CleanupReport,
    pub reconcile: Option<ReconcileReport>,
}

impl Settings {
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            staging_root: self.admin.staging_root.clone(),
            library_root: self.admin.library_root.clone(),
            category: self.qbittorrent.category.clone(),
            max_per_run: self.qbittorrent.max_torrents_per_run,
            delete_after_processing: self.qbittorrent.delete_after_processing,
        }
    }
}

/// Load the metadata catalog, refreshing it when stale. Failures are
/// logged and yield `None`.
pub fn load_catalog(settings: &Settings) -> Option<MetadataCatalog> {
    if !settings.normalize.catalog_lookup {
        return None;
    }
    let gog = &settings.gog;
    match shelf_catalog::ensure_fresh(
        &gog.all_games_url,
        &gog.all_games_file,
        gog.cache_refresh_hours,
    ) {
        Ok(catalog) => {
            log::debug!("Loaded {} catalog titles", catalog.len());
            Some(catalog)
        }
        Err(e) => {
            log::warn!("Metadata catalog unavailable, using local names only: {e}");
            None
        }
    }
}

/// Run one full cycle against the configured services.
pub fn run_cycle(settings: &Settings) -> Result<CycleReport, PipelineError> {
    let catalog = load_catalog(settings);

    let qbit = if settings.qbittorrent.enabled {
        match QbitClient::login(&settings.qbit_config()) {
            Ok(client) => Some(client),
            Err(e @ TorrentError::Authentication(_)) => return Err(e.into()),
            Err(e) => {
                log::error!("Download client unreachable, transfer skipped: {e}");
                None
            }
        }
    } else {
        None
    };
    let downloads = match &qbit {
        Some(client) => Downloads::Client(client),
        None if settings.qbittorrent.enabled => Downloads::Unavailable,
        None => Downloads::Staging,
    };

    let romm = if settings.romm.enabled {
        match RommClient::new(&settings.romm_config()) {
            Ok(client) => Some(client),
            Err(e) => {
                log::error!("RomM is enabled but cannot be used: {e}");
                None
            }
        }
    } else {
        None
    };

    let titles = catalog.as_ref().map(|c| c.titles()).unwrap_or_default();
    let normalizer = Normalizer::new(settings.normalize_options()).with_catalog(titles);

    let mut report = run_cycle_with(
        settings,
        &normalizer,
        downloads,
        romm.as_ref().map(|c| c as &dyn CatalogApi),
    )?;
    report.catalog_titles = titles.len();
    Ok(report)
}

/// Run one cycle with explicit service handles. With no catalog API
/// reconciliation is skipped.
pub fn run_cycle_with(
    settings: &Settings,
    normalizer: &Normalizer<'_>,
    downloads: Downloads<'_>,
    catalog: Option<&dyn CatalogApi>,
) -> Result<CycleReport, PipelineError> {
    let mut report = CycleReport::default();
    let library = &settings.admin.library_root;
    let transfer = settings.transfer_options();

    report.transfer = match downloads {
        Downloads::Client(source) => match transfer_completed(source, &transfer, normalizer) {
            Ok(summary) => Some(summary),
            Err(e) => {
                let err = PipelineError::from(e);
                if err.is_authentication() {
                    return Err(err);
                }
                log::error!("Transfer skipped: {err}");
                None
            }
        },
        Downloads::Staging => Some(transfer_staging(&transfer, normalizer)),
        Downloads::Unavailable => None,
    };

    report.rename = match plan_renames(library, normalizer) {
        Ok(plan) => {
            for (_, msg) in &plan.conflicts {
                log::warn!("Rename skipped: {msg}");
            }
            Some(execute_renames(&plan))
        }
        Err(e) => {
            log::error!("Cannot read library root {}: {e}", library.display());
            None
        }
    };

    report.cleanup = run_cleanup(library, &CleanupOptions::from(&settings.cleanup));

    report.reconcile = catalog.map(|api| reconcile(api, &settings.reconcile_options(false)));

    log_cycle(&report);
    Ok(report)
}

fn log_cycle(report: &CycleReport) {
    if let Some(t) = &report.transfer {
        log::info!("Transfer: {} moved, {} failed", t.moved, t.failed);
    }
    if let Some(r) = &report.rename {
        log::info!(
            "Rename: {} renamed, {} conflicts, {} errors",
            r.renamed,
            r.conflicts.len(),
            r.errors.len()
        );
    }
    let c = &report.cleanup;
    log::info!(
        "Cleanup: {} files, {} empty directories, {} duplicates removed ({})",
        c.files_removed,
        c.dirs_removed,
        c.duplicates_removed,
        shelf_core::util::format_bytes_approx(c.bytes_freed),
    );
    if let Some(r) = &report.reconcile {
        log::info!(
            "Reconcile: {} scanned, {} flagged, {} deleted",
            r.items_scanned,
            r.total_flagged(),
            r.total_deleted()
        );
    }
}

/// Time between cycles. A zero setting is raised to one hour.
pub fn cycle_interval(settings: &Settings) -> Duration {
    Duration::from_secs(settings.admin.wait_time_hours.max(1) * 3600)
}

/// Run cycles forever. Returns only when a cycle hits a fatal error.
pub fn run_forever(settings: &Settings) -> Result<(), PipelineError> {
    let interval = cycle_interval(settings);
    if !settings.admin.on_startup {
        log::info!("Waiting {}h before the first cycle", interval.as_secs() / 3600);
        thread::sleep(interval);
    }
    loop {
        run_cycle(settings)?;
        log::info!("Next cycle in {}h", interval.as_secs() / 3600);
        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;

    use shelf_core::{CatalogTitle, NormalizeOptions};
    use shelf_romm::{CatalogItem, RomQuery, RommError};

    use crate::transfer::CompletedTorrent;

    struct RejectingClient;

    impl TorrentSource for RejectingClient {
        fn completed(&self, _: &str) -> Result<Vec<CompletedTorrent>, TorrentError> {
            Err(TorrentError::Authentication("Forbidden".to_string()))
        }
        fn forget(&self, _: &str) -> Result<(), TorrentError> {
            Ok(())
        }
    }

    struct UnreachableClient;

    impl TorrentSource for UnreachableClient {
        fn completed(&self, _: &str) -> Result<Vec<CompletedTorrent>, TorrentError> {
            Err(TorrentError::ServerError {
                status: 502,
                message: "bad gateway".to_string(),
            })
        }
        fn forget(&self, _: &str) -> Result<(), TorrentError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingCatalog {
        deletes: RefCell<Vec<Vec<u64>>>,
    }

    impl CatalogApi for RecordingCatalog {
        fn platform_id(&self, _: &str) -> Result<Option<u64>, RommError> {
            Ok(Some(1))
        }
        fn list_items(&self, _: &RomQuery) -> Result<Vec<CatalogItem>, RommError> {
            Ok(vec![CatalogItem {
                id: 9,
                ..Default::default()
            }])
        }
        fn delete_items(&self, ids: &[u64]) -> Result<(), RommError> {
            self.deletes.borrow_mut().push(ids.to_vec());
            Ok(())
        }
    }

    fn settings(tmp: &tempfile::TempDir) -> Settings {
        let mut s = Settings::default();
        s.admin.library_root = tmp.path().join("library");
        s.admin.staging_root = tmp.path().join("torrent");
        fs::create_dir_all(&s.admin.library_root).unwrap();
        fs::create_dir_all(&s.admin.staging_root).unwrap();
        s
    }

    #[test]
    fn local_cycle_transfers_renames_and_cleans() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(&tmp);
        fs::create_dir_all(s.admin.staging_root.join("new_game_gog")).unwrap();
        fs::write(s.admin.staging_root.join("new_game_gog/setup.exe"), b"MZ").unwrap();
        fs::create_dir_all(s.admin.library_root.join("old_game_windows")).unwrap();
        fs::write(s.admin.library_root.join("old_game_windows/setup.exe"), b"MZ").unwrap();
        fs::create_dir_all(s.admin.library_root.join("Empty")).unwrap();

        let report = run_cycle_with(&s, &Normalizer::default(), Downloads::Staging, None).unwrap();
        assert_eq!(report.transfer.unwrap().moved, 1);
        assert_eq!(report.rename.unwrap().renamed, 1);
        assert_eq!(report.cleanup.dirs_removed, 1);
        assert!(report.reconcile.is_none());
        assert!(s.admin.library_root.join("New Game (GOG)").is_dir());
        assert!(s.admin.library_root.join("Old Game (Windows)").is_dir());
    }

    #[test]
    fn download_client_rejection_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(&tmp);
        let downloads = Downloads::Client(&RejectingClient);
        let result = run_cycle_with(&s, &Normalizer::default(), downloads, None);
        assert!(matches!(result, Err(PipelineError::Authentication(_))));
    }

    #[test]
    fn other_download_client_errors_skip_transfer() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(&tmp);
        let downloads = Downloads::Client(&UnreachableClient);
        let report = run_cycle_with(&s, &Normalizer::default(), downloads, None).unwrap();
        assert!(report.transfer.is_none());
        assert!(report.rename.is_some());
    }

    #[test]
    fn unreachable_download_client_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = settings(&tmp);
        s.qbittorrent.host = "127.0.0.1".to_string();
        s.qbittorrent.port = 9;
        s.normalize.catalog_lookup = false;
        fs::create_dir_all(s.admin.staging_root.join("partial_download_gog")).unwrap();

        let report = run_cycle(&s).unwrap();
        assert!(report.transfer.is_none());
        assert!(report.rename.is_some());
        assert!(s.admin.staging_root.join("partial_download_gog").is_dir());
    }

    #[test]
    fn unavailable_downloads_move_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(&tmp);
        fs::create_dir_all(s.admin.staging_root.join("partial_gog")).unwrap();

        let report =
            run_cycle_with(&s, &Normalizer::default(), Downloads::Unavailable, None).unwrap();
        assert!(report.transfer.is_none());
        assert!(s.admin.staging_root.join("partial_gog").is_dir());
    }

    #[test]
    fn catalog_title_survives_full_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(&tmp);
        let raw = "stalker_2_heart_of_chornobyl_windows_gog_(83415)";
        fs::create_dir_all(s.admin.staging_root.join(raw)).unwrap();
        fs::write(s.admin.staging_root.join(raw).join("setup.exe"), b"MZ").unwrap();
        let catalog = vec![CatalogTitle::new(
            "stalker_2_heart_of_chornobyl",
            "S.T.A.L.K.E.R. 2: Heart of Chornobyl",
        )];
        let normalizer = Normalizer::new(NormalizeOptions::default()).with_catalog(&catalog);

        let report = run_cycle_with(&s, &normalizer, Downloads::Staging, None).unwrap();
        assert_eq!(report.transfer.unwrap().moved, 1);
        assert_eq!(report.rename.unwrap().renamed, 0);

        let names: Vec<String> = fs::read_dir(&s.admin.library_root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["S.T.A.L.K.E.R. 2: Heart of Chornobyl".to_string()]);
    }

    #[test]
    fn reconcile_runs_when_catalog_given() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(&tmp);
        let api = RecordingCatalog::default();
        let report =
            run_cycle_with(&s, &Normalizer::default(), Downloads::Staging, Some(&api)).unwrap();
        assert_eq!(report.reconcile.unwrap().items_scanned, 1);
        assert_eq!(*api.deletes.borrow(), vec![vec![9]]);
    }

    #[test]
    fn zero_interval_is_raised() {
        let mut s = Settings::default();
        s.admin.wait_time_hours = 0;
        assert_eq!(cycle_interval(&s), Duration::from_secs(3600));
        s.admin.wait_time_hours = 4;
        assert_eq!(cycle_interval(&s), Duration::from_secs(4 * 3600));
    }
}
