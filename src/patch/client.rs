// src/patch/client.rs
use crate::patch::models::PatchVersion;
use crate::patch::VersionSource;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header;
use scraper::{Html, Selector};
use std::time::Duration;

pub const DEFAULT_SITE_URL: &str = "https://www.leagueoflegends.com/en-us";

const USER_AGENT: &str = concat!("patchnotes/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static CARD_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[data-testid="card-title"]"#)
        .expect("Failed to compile CARD_TITLE_SELECTOR")
});

/// Client for the public patch notes site: the listing page and one detail
/// page per version.
#[derive(Debug, Clone)]
pub struct PatchSiteClient {
    http: reqwest::Client,
    site_url: String,
}

impl PatchSiteClient {
    pub fn new(site_url: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            site_url: site_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn listing_url(&self) -> String {
        format!("{}/news/tags/patch-notes/", self.site_url)
    }

    pub fn detail_url(&self, version: &PatchVersion) -> String {
        format!("{}/news/game-updates/patch-{}-notes/", self.site_url, version)
    }

    /// Downloads a page and returns its body, failing on non-2xx statuses.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!("Downloading page from: {}", url);

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "text/html,*/*")
            .send()
            .await?; // Propagates reqwest::Error as FetchError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP error status: {} for URL: {}", status, url);
            return Err(FetchError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Latest version, from the first card on the listing page.
    pub async fn latest_version(&self) -> Result<PatchVersion, FetchError> {
        let listing = self.fetch_text(&self.listing_url()).await?;
        latest_from_listing(&listing).ok_or_else(|| FetchError::VersionNotFound(self.listing_url()))
    }

    pub async fn recent_versions(&self, limit: usize) -> Result<Vec<PatchVersion>, FetchError> {
        let listing = self.fetch_text(&self.listing_url()).await?;
        Ok(versions_from_listing(&listing, limit))
    }

    /// Raw markup of the detail page for `version`. Redirects are followed.
    pub async fn patch_page(&self, version: &PatchVersion) -> Result<String, FetchError> {
        self.fetch_text(&self.detail_url(version)).await
    }
}

#[async_trait]
impl VersionSource for PatchSiteClient {
    async fn latest(&self) -> Option<PatchVersion> {
        match self.latest_version().await {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::warn!("Could not determine latest patch version: {}", e);
                None
            }
        }
    }

    async fn recent(&self, limit: usize) -> Vec<PatchVersion> {
        self.recent_versions(limit).await.unwrap_or_else(|e| {
            tracing::warn!("Could not list patch versions: {}", e);
            Vec::new()
        })
    }
}

/// Version named by the first card on the listing page.
pub fn latest_from_listing(listing_html: &str) -> Option<PatchVersion> {
    let document = Html::parse_document(listing_html);
    let card = document.select(&CARD_TITLE_SELECTOR).next()?;
    let text = card.text().collect::<String>();
    PatchVersion::from_listing_text(text.trim())
}

/// Versions named by the listing page's card titles, newest first,
/// deduplicated, at most `max(1, limit)` of them. Cards without a dotted
/// version number are skipped.
pub fn versions_from_listing(listing_html: &str, limit: usize) -> Vec<PatchVersion> {
    let limit = limit.max(1);
    let document = Html::parse_document(listing_html);
    let mut versions: Vec<PatchVersion> = Vec::new();

    for card in document.select(&CARD_TITLE_SELECTOR) {
        let text = card.text().collect::<String>();
        let Some(version) = PatchVersion::from_dotted(text.trim()) else {
            tracing::trace!("Card title without a version: {:?}", text.trim());
            continue;
        };
        if versions.contains(&version) {
            continue;
        }
        versions.push(version);
        if versions.len() >= limit {
            break;
        }
    }
    versions
}
