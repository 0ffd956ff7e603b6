// src/utils/error.rs
use thiserror::Error;

// Errors raised by the collaborators around the extraction core.
// The core itself never returns these; callers degrade them to empty shapes.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found for an unpublished patch

    #[error("Could not find a patch version on the listing page: {0}")]
    VersionNotFound(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("ollama request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("ollama returned HTTP {0}")]
    Http(reqwest::StatusCode),

    #[error("no response text")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Bind and serve failures surface here

    #[error("Patch site interaction failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
