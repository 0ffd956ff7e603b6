// src/patch/mod.rs
pub mod client;
pub mod models;

use async_trait::async_trait;

pub use client::PatchSiteClient;
pub use models::PatchVersion;

/// Where the current and recent patch versions come from.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// The newest published version, or `None` when it cannot be determined.
    async fn latest(&self) -> Option<PatchVersion>;

    /// Up to `limit` most recent versions, newest first.
    async fn recent(&self, limit: usize) -> Vec<PatchVersion>;
}
