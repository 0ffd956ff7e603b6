// src/lib.rs
//! Scrapes the public patch notes page, extracts champion, item, arena and
//! miscellaneous changes into JSON, and serves them over a small HTTP API.

pub mod api;
pub mod bundle;
pub mod extractors;
pub mod patch;
pub mod storage;
pub mod summary;
pub mod utils;

pub use bundle::{Bundle, BundleCache, PageSource};
pub use patch::{PatchVersion, VersionSource};
