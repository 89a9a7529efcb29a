use serde::Deserialize;

/// A torrent as reported by `/api/v2/torrents/info`.
///
/// Only the fields the transfer step reads are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct TorrentInfo {
    pub hash: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub state: String,
    /// Download progress, 0.0 to 1.0.
    #[serde(default)]
    pub progress: f64,
    /// Absolute path of the torrent's root file or folder.
    #[serde(default)]
    pub content_path: String,
    #[serde(default)]
    pub save_path: String,
    #[serde(default)]
    pub size: i64,
}

impl TorrentInfo {
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

/// State filter accepted by the torrent list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TorrentFilter {
    #[default]
    All,
    Completed,
    Downloading,
    Seeding,
    Paused,
}

impl TorrentFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Downloading => "downloading",
            Self::Seeding => "seeding",
            Self::Paused => "paused",
        }
    }
}
