use std::path::PathBuf;

use thiserror::Error;

use shelf_torrent::TorrentError;

/// Errors reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not valid settings TOML
    #[error("Invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors that stop a pipeline cycle.
///
/// Everything else a cycle runs into is logged and recorded in the step's
/// report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The download client rejected our credentials
    #[error("Download client authentication failed: {0}")]
    Authentication(String),

    #[error("Download client error: {0}")]
    Torrent(TorrentError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl From<TorrentError> for PipelineError {
    fn from(e: TorrentError) -> Self {
        match e {
            TorrentError::Authentication(msg) => Self::Authentication(msg),
            other => Self::Torrent(other),
        }
    }
}

impl PipelineError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}
