/// Errors that can occur while talking to the download client.
#[derive(Debug, thiserror::Error)]
pub enum TorrentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TorrentError {
    /// Whether repeating the same read could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::ServerError { status, .. } => *status >= 500,
            Self::Authentication(_) | Self::Json(_) => false,
        }
    }
}
