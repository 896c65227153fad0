//! Catalog access: the client contract and its HTTP implementation

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::types::{
    ApiInfo, Config, HealthStatus, Item, MediaKind, Photo, PhotoPage, Video, VideoPage,
};

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

const USER_AGENT: &str = concat!("px-gallery/", env!("CARGO_PKG_VERSION"));
const REMAINING_HEADER: &str = "X-Ratelimit-Remaining";
const UNKNOWN_REMAINING: i64 = -1;

/// Remote media catalog.
///
/// One call is one logical request. Paginated calls return at most
/// `per_page` items in server order.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> CatalogResult<Vec<Item>>;

    /// Curated photos or popular videos
    async fn curated_or_popular(
        &self,
        kind: MediaKind,
        page: u32,
        per_page: u32,
    ) -> CatalogResult<Vec<Item>>;

    async fn random(&self, kind: MediaKind) -> CatalogResult<Item>;

    /// Remaining request quota, for display only
    async fn info(&self) -> CatalogResult<ApiInfo>;
}

/// Trim whitespace and trailing slashes, default to http:// when no scheme is given
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Build catalog search URL
fn build_search_url(
    base: &str,
    kind: MediaKind,
    query: &str,
    page: u32,
    per_page: u32,
) -> String {
    format!(
        "{}/{}/search?query={}&page={}&per_page={}",
        base,
        kind.path(),
        urlencoding::encode(query),
        page,
        per_page
    )
}

/// Build curated (photos) or popular (videos) listing URL
fn build_listing_url(base: &str, kind: MediaKind, page: u32, per_page: u32) -> String {
    format!(
        "{}/{}/{}?page={}&per_page={}",
        base,
        kind.path(),
        kind.listing_mode().label(),
        page,
        per_page
    )
}

fn build_random_url(base: &str, kind: MediaKind) -> String {
    format!("{}/{}/random", base, kind.path())
}

/// Pull the `{"error": "..."}` message the proxy sends, or fall back to raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

/// Map a non-success response onto the catalog error taxonomy
fn classify_status(status: StatusCode, body: &str) -> CatalogError {
    let message = error_message(body);

    match status {
        StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimited(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            CatalogError::InvalidQuery(message)
        }
        // The proxy wraps upstream failures as 500 "status code: N"
        s if s.is_server_error() && message.contains("status code: 429") => {
            CatalogError::RateLimited(message)
        }
        _ => CatalogError::Network(format!("HTTP {}: {}", status, message)),
    }
}

/// HTTP client for the catalog proxy
#[derive(Debug)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
    remaining: AtomicI64,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = normalize_base_url(base_url);
        debug!(%base_url, "catalog client ready");

        Ok(Self {
            client,
            base_url,
            remaining: AtomicI64::new(UNKNOWN_REMAINING),
        })
    }

    pub fn from_config(config: &Config) -> CatalogResult<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Last quota figure seen in a response header
    pub fn remaining_requests(&self) -> Option<i64> {
        match self.remaining.load(Ordering::Relaxed) {
            UNKNOWN_REMAINING => None,
            n => Some(n),
        }
    }

    /// Fetch a single photo by id
    pub async fn photo(&self, id: u64) -> CatalogResult<Photo> {
        self.get_json(&format!("{}/photos/{}", self.base_url, id))
            .await
    }

    pub async fn health(&self) -> CatalogResult<HealthStatus> {
        self.get_json(&format!("{}/health", self.base_url)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> CatalogResult<T> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if let Some(remaining) = response
            .headers()
            .get(REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
        {
            self.remaining.store(remaining, Ordering::Relaxed);
        }

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = classify_status(status, &body);
            warn!(url, %status, error = %err, "catalog request failed");
            return Err(err);
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get_page(&self, kind: MediaKind, url: &str) -> CatalogResult<Vec<Item>> {
        let items: Vec<Item> = match kind {
            MediaKind::Photo => self
                .get_json::<PhotoPage>(url)
                .await?
                .photos
                .into_iter()
                .map(Item::from)
                .collect(),
            MediaKind::Video => self
                .get_json::<VideoPage>(url)
                .await?
                .videos
                .into_iter()
                .map(Item::from)
                .collect(),
        };
        Ok(items)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> CatalogResult<Vec<Item>> {
        let url = build_search_url(&self.base_url, kind, query, page, per_page);
        self.get_page(kind, &url).await
    }

    async fn curated_or_popular(
        &self,
        kind: MediaKind,
        page: u32,
        per_page: u32,
    ) -> CatalogResult<Vec<Item>> {
        let url = build_listing_url(&self.base_url, kind, page, per_page);
        self.get_page(kind, &url).await
    }

    async fn random(&self, kind: MediaKind) -> CatalogResult<Item> {
        let url = build_random_url(&self.base_url, kind);
        let item = match kind {
            MediaKind::Photo => Item::from(self.get_json::<Photo>(&url).await?),
            MediaKind::Video => Item::from(self.get_json::<Video>(&url).await?),
        };
        Ok(item)
    }

    async fn info(&self) -> CatalogResult<ApiInfo> {
        self.get_json(&format!("{}/info", self.base_url)).await
    }
}
