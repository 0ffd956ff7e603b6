// src/storage/mod.rs
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::bundle::PageSource;
use crate::patch::{PatchSiteClient, PatchVersion};
use crate::utils::error::StorageError;
use async_trait::async_trait;

/// Permanent local copies of patch pages, one `patch-<version>.html` file
/// per version. Files are never refreshed once written.
#[derive(Debug, Clone)]
pub struct PageStore {
    base_dir: PathBuf,
}

impl PageStore {
    /// Creates a new PageStore with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            std::fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn path_for(&self, version: &PatchVersion) -> PathBuf {
        self.base_dir.join(version.page_file_name())
    }

    /// Reads the stored page; `Ok(None)` when this version was never saved.
    pub async fn load(&self, version: &PatchVersion) -> Result<Option<String>, StorageError> {
        let path = self.path_for(version);
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => {
                tracing::debug!("Loaded {} ({} bytes)", path.display(), html.len());
                Ok(Some(html))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    pub async fn save(&self, version: &PatchVersion, html: &str) -> Result<PathBuf, StorageError> {
        let path = self.path_for(version);
        tokio::fs::write(&path, html).await?;
        tracing::info!("Saved patch page to {}", path.display());
        Ok(path)
    }
}

/// Raw-page provider: the local copy when present, otherwise the live site
/// (persisting what it downloads).
#[derive(Debug, Clone)]
pub struct CachedPages {
    store: PageStore,
    client: PatchSiteClient,
}

impl CachedPages {
    pub fn new(store: PageStore, client: PatchSiteClient) -> Self {
        Self { store, client }
    }
}

#[async_trait]
impl PageSource for CachedPages {
    async fn page(&self, version: &PatchVersion) -> Option<String> {
        match self.store.load(version).await {
            Ok(Some(html)) => return Some(html),
            Ok(None) => tracing::info!("{} not found; downloading patch page", version.page_file_name()),
            Err(e) => tracing::warn!("Failed to read stored page for {}: {}", version, e),
        }

        let html = match self.client.patch_page(version).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to download patch page for {}: {}", version, e);
                return None;
            }
        };

        if let Err(e) = self.store.save(version, &html).await {
            tracing::warn!("Failed to persist patch page for {}: {}", version, e);
        }
        Some(html)
    }
}
