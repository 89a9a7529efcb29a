//! Library management on top of `shelf-core`: settings, the cleanup sweep,
//! folder renames, the transfer from staging into the library, and the
//! pipeline that ties them to the download client and RomM.

pub mod cleanup;
pub mod error;
pub mod pipeline;
pub mod rename;
pub mod settings;
pub mod transfer;

pub use cleanup::{CleanupOptions, CleanupReport, dir_size, is_extra, is_receipt, run_cleanup};
pub use error::{PipelineError, SettingsError};
pub use pipeline::{CycleReport, Downloads, load_catalog, run_cycle, run_cycle_with, run_forever};
pub use rename::{RenameAction, RenamePlan, RenameSummary, execute_renames, plan_renames};
pub use settings::{Settings, save_default, settings_path};
pub use transfer::{
    CompletedTorrent, TorrentSource, TransferOptions, TransferSummary, move_dir,
    transfer_completed, transfer_staging,
};
