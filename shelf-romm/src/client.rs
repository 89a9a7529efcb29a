use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shelf_core::RetryPolicy;

use crate::error::RommError;
use crate::types::{CatalogItem, Platform, RomListing, RomPage, RomQuery};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote catalog operations the reconciler depends on.
pub trait CatalogApi {
    /// Resolve a platform slug to its id.
    fn platform_id(&self, slug: &str) -> Result<Option<u64>, RommError>;

    /// Every entry matching the query, across all pages.
    fn list_items(&self, query: &RomQuery) -> Result<Vec<CatalogItem>, RommError>;

    /// Remove entries from the catalog, leaving their files on disk.
    fn delete_items(&self, ids: &[u64]) -> Result<(), RommError>;
}

/// Connection details for a RomM server.
#[derive(Debug, Clone, Default)]
pub struct RommConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Blocking HTTP client for the RomM API.
pub struct RommClient {
    http: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    retry: RetryPolicy,
}

impl RommClient {
    pub fn new(config: &RommConfig) -> Result<Self, RommError> {
        let base_url = config.url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RommError::Config("RomM URL is not set".to_string()));
        }
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url,
            username: config.username.clone().filter(|u| !u.is_empty()),
            password: config.password.clone(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn heartbeat(&self) -> Result<serde_json::Value, RommError> {
        self.get_json("/api/heartbeat", &[])
    }

    pub fn platforms(&self) -> Result<Vec<Platform>, RommError> {
        self.get_json("/api/platforms", &[])
    }

    /// Id of the platform whose `fs_slug` (or `slug`) equals `slug`.
    pub fn platform_id_by_slug(&self, slug: &str) -> Result<Option<u64>, RommError> {
        let platforms = self.platforms()?;
        Ok(platforms
            .iter()
            .find(|p| p.fs_slug == slug)
            .or_else(|| platforms.iter().find(|p| p.slug == slug))
            .map(|p| p.id))
    }

    pub fn rom(&self, id: u64) -> Result<CatalogItem, RommError> {
        self.get_json(&format!("/api/roms/{id}"), &[])
    }

    /// Fetch a single page of entries.
    pub fn roms_page(&self, query: &RomQuery) -> Result<RomPage, RommError> {
        let params = query.to_params();
        let pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let listing: RomListing = self.get_json("/api/roms", &pairs)?;
        Ok(listing.into())
    }

    /// Fetch every page, starting at `query.offset`.
    pub fn all_roms(&self, query: &RomQuery) -> Result<Vec<CatalogItem>, RommError> {
        let mut items: Vec<CatalogItem> = Vec::new();
        let mut query = query.clone();
        let limit = query.limit.max(1);
        query.limit = limit;

        loop {
            let page = self.roms_page(&query)?;
            let received = page.items.len() as u64;

            // A server that ignores `offset` keeps returning the first page.
            if query.offset > 0 && page.items.first().map(|i| i.id) == items.first().map(|i| i.id)
            {
                log::warn!("RomM ignored the page offset; stopping after {} items", items.len());
                break;
            }
            items.extend(page.items);

            let reached_total = page.total.is_some_and(|t| items.len() as u64 >= t);
            if received < u64::from(limit) || reached_total {
                break;
            }
            query.offset += received;
        }

        log::debug!("Fetched {} entries from RomM", items.len());
        Ok(items)
    }

    /// Bulk-delete entries by id. Never retried.
    pub fn delete_roms(&self, ids: &[u64]) -> Result<(), RommError> {
        if ids.is_empty() {
            return Ok(());
        }
        let body = serde_json::json!({ "roms": ids, "delete_from_fs": [] });
        let resp = self
            .authorize(self.http.post(format!("{}/api/roms/delete", self.base_url)))
            .json(&body)
            .send()?;
        check_status(resp, "/api/roms/delete").map(|_| ())
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => req.basic_auth(user, self.password.as_deref()),
            None => req,
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RommError> {
        let url = format!("{}{endpoint}", self.base_url);
        self.retry.run(
            || {
                let resp = self.authorize(self.http.get(&url)).query(query).send()?;
                let text = check_status(resp, endpoint)?.text()?;
                Ok(serde_json::from_str(&text)?)
            },
            RommError::is_transient,
            |attempt, e| log::warn!("GET {endpoint} attempt {attempt} failed: {e}"),
        )
    }
}

impl CatalogApi for RommClient {
    fn platform_id(&self, slug: &str) -> Result<Option<u64>, RommError> {
        self.platform_id_by_slug(slug)
    }

    fn list_items(&self, query: &RomQuery) -> Result<Vec<CatalogItem>, RommError> {
        self.all_roms(query)
    }

    fn delete_items(&self, ids: &[u64]) -> Result<(), RommError> {
        self.delete_roms(ids)
    }
}

fn check_status(resp: Response, endpoint: &str) -> Result<Response, RommError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RommError::InvalidCredentials(format!(
            "{endpoint} rejected the credentials (HTTP {})",
            status.as_u16()
        )));
    }
    if status == StatusCode::NOT_FOUND {
        return Err(RommError::NotFound(endpoint.to_string()));
    }
    if !status.is_success() {
        let message = resp.text().unwrap_or_default();
        return Err(RommError::ServerError {
            status: status.as_u16(),
            message: message.chars().take(200).collect(),
        });
    }
    Ok(resp)
}
