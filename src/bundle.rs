// src/bundle.rs
//! Aggregates every extractor into one snapshot per patch version and
//! memoizes it for the life of the process.

use std::collections::HashMap;
use std::sync::Arc;

use crate::extractors::mentions::{self, Mention};
use crate::extractors::page_meta::{self, Highlights};
use crate::extractors::sections::{
    self, ChampionChanges, ItemChanges, OtherSections, SectionEntries,
};
use crate::patch::PatchVersion;
use async_trait::async_trait;
use scraper::Html;
use serde::Serialize;
use tokio::sync::{Mutex, OnceCell};

/// Keyword for the dedicated arena section and the page-wide mention scan.
pub const ARENA_KEYWORD: &str = "arena";

/// Supplies the raw markup of a patch page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// `None` when the page is neither stored locally nor downloadable.
    async fn page(&self, version: &PatchVersion) -> Option<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArenaReport {
    pub arena: SectionEntries,
    pub mentions: Vec<Mention>,
}

/// Everything extracted from one patch page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bundle {
    pub version: PatchVersion,
    pub champions: ChampionChanges,
    pub items: ItemChanges,
    pub other: OtherSections,
    pub arena: ArenaReport,
    pub tagline: Option<String>,
    pub highlights: Highlights,
}

impl Bundle {
    /// A structurally complete bundle with every section empty.
    pub fn empty(version: PatchVersion) -> Self {
        Bundle {
            version,
            champions: ChampionChanges::new(),
            items: ItemChanges::new(),
            other: OtherSections::new(),
            arena: ArenaReport::default(),
            tagline: None,
            highlights: Highlights::default(),
        }
    }

    /// Runs every extractor over `html`; a missing page gives the empty bundle.
    pub fn from_html(version: PatchVersion, html: Option<&str>) -> Self {
        let Some(html) = html else {
            tracing::warn!("No page markup for {}; serving empty bundle", version);
            return Bundle::empty(version);
        };
        let document = Html::parse_document(html);
        Bundle::from_document(version, &document)
    }

    pub fn from_document(version: PatchVersion, document: &Html) -> Self {
        Bundle {
            champions: sections::parse_champions(document),
            items: sections::parse_items(document),
            other: sections::parse_other(document),
            arena: ArenaReport {
                arena: sections::parse_arena(document, ARENA_KEYWORD),
                mentions: mentions::scan(document, ARENA_KEYWORD),
            },
            tagline: page_meta::parse_tagline(document),
            highlights: page_meta::parse_highlights(document),
            version,
        }
    }
}

/// Process-wide memo of built bundles, keyed by version.
///
/// Each version gets its own `OnceCell`, so concurrent first requests share
/// one page fetch and one parse. Only bundles built from a real page are
/// kept; a missing page is served empty and retried on the next request.
/// Kept entries are never evicted or refreshed.
pub struct BundleCache {
    source: Arc<dyn PageSource>,
    entries: Mutex<HashMap<PatchVersion, Arc<OnceCell<Arc<Bundle>>>>>,
}

impl BundleCache {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, version: &PatchVersion) -> Arc<Bundle> {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(version.clone()).or_default().clone()
        };
        match cell.get_or_try_init(|| self.build(version)).await {
            Ok(bundle) => bundle.clone(),
            Err(PageMissing) => Arc::new(Bundle::empty(version.clone())),
        }
    }

    /// Whether `version` has already been built.
    pub async fn contains(&self, version: &PatchVersion) -> bool {
        let entries = self.entries.lock().await;
        entries
            .get(version)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    async fn build(&self, version: &PatchVersion) -> Result<Arc<Bundle>, PageMissing> {
        tracing::info!("Building bundle for {}", version);
        let Some(html) = self.source.page(version).await else {
            tracing::warn!("No page markup for {}; serving empty bundle uncached", version);
            return Err(PageMissing);
        };
        let bundle = Bundle::from_html(version.clone(), Some(&html));
        tracing::info!(
            "Bundle {} ready: {} champions, {} items, {} other sections",
            version,
            bundle.champions.len(),
            bundle.items.len(),
            bundle.other.len()
        );
        Ok(Arc::new(bundle))
    }
}

struct PageMissing;
