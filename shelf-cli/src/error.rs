use thiserror::Error;

use shelf_catalog::CatalogError;
use shelf_lib::{PipelineError, SettingsError};
use shelf_romm::RommError;
use shelf_torrent::TorrentError;

/// Errors that end a CLI command with exit status 1.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Metadata catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Download client: {0}")]
    Torrent(#[from] TorrentError),

    #[error("RomM: {0}")]
    Romm(#[from] RommError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
