use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use shelf_core::RetryPolicy;

use crate::error::TorrentError;
use crate::types::{TorrentFilter, TorrentInfo};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection details for the qBittorrent Web UI.
#[derive(Debug, Clone)]
pub struct QbitConfig {
    /// Host name, or a full `http(s)://` base URL.
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl QbitConfig {
    /// Base URL of the Web UI, without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}:{}", host, self.port)
        }
    }
}

/// An authenticated qBittorrent session.
///
/// The session cookie returned by the login call is held in the client's
/// cookie store and sent with every later request.
pub struct QbitClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl QbitClient {
    /// Log in and return an authenticated client.
    pub fn login(config: &QbitConfig) -> Result<Self, TorrentError> {
        let base_url = config.base_url();
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .build()?;

        let resp = http
            .post(format!("{base_url}/api/v2/auth/login"))
            .header(reqwest::header::REFERER, &base_url)
            .form(&[
                ("username", config.username.as_str()),
                ("password", config.password.as_str()),
            ])
            .send()?;

        let status = resp.status();
        if status == StatusCode::FORBIDDEN {
            return Err(TorrentError::Authentication(
                "Too many failed login attempts, client IP is banned".to_string(),
            ));
        }
        let body = resp.text()?;
        if status.is_server_error() {
            return Err(TorrentError::ServerError {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }
        if !status.is_success() || body.trim() != "Ok." {
            return Err(TorrentError::Authentication(format!(
                "Login rejected for user '{}' (HTTP {}): {}",
                config.username,
                status.as_u16(),
                body.trim()
            )));
        }

        log::debug!("Logged in to qBittorrent at {base_url}");
        Ok(Self {
            http,
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Application version string, e.g. `v4.6.2`.
    pub fn version(&self) -> Result<String, TorrentError> {
        self.get_with_retry("/api/v2/app/version", &[])
            .and_then(|resp| Ok(resp.text()?.trim().to_string()))
    }

    /// List torrents, optionally restricted to a category.
    pub fn torrents(
        &self,
        category: Option<&str>,
        filter: TorrentFilter,
    ) -> Result<Vec<TorrentInfo>, TorrentError> {
        let mut query = vec![("filter", filter.as_str())];
        if let Some(cat) = category {
            query.push(("category", cat));
        }
        let resp = self.get_with_retry("/api/v2/torrents/info", &query)?;
        let text = resp.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Remove torrents from the client. With `delete_files` false the
    /// downloaded data stays on disk.
    pub fn delete(&self, hashes: &[&str], delete_files: bool) -> Result<(), TorrentError> {
        if hashes.is_empty() {
            return Ok(());
        }
        let joined = hashes.join("|");
        let resp = self
            .http
            .post(format!("{}/api/v2/torrents/delete", self.base_url))
            .form(&[
                ("hashes", joined.as_str()),
                ("deleteFiles", if delete_files { "true" } else { "false" }),
            ])
            .send()?;
        check_status(resp).map(|_| ())
    }

    fn get_with_retry(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, TorrentError> {
        let url = format!("{}{endpoint}", self.base_url);
        self.retry.run(
            || {
                let resp = self.http.get(&url).query(query).send()?;
                check_status(resp)
            },
            TorrentError::is_transient,
            |attempt, e| log::warn!("GET {endpoint} attempt {attempt} failed: {e}"),
        )
    }
}

fn check_status(resp: Response) -> Result<Response, TorrentError> {
    let status = resp.status();
    if status == StatusCode::FORBIDDEN {
        return Err(TorrentError::Authentication(
            "Session expired or not logged in".to_string(),
        ));
    }
    if !status.is_success() {
        let message = resp.text().unwrap_or_default();
        return Err(TorrentError::ServerError {
            status: status.as_u16(),
            message: message.chars().take(200).collect(),
        });
    }
    Ok(resp)
}
