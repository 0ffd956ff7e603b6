// src/main.rs
use std::sync::Arc;

use clap::Parser;
use patchnotes::api::{self, AppState};
use patchnotes::bundle::BundleCache;
use patchnotes::patch::client::{PatchSiteClient, DEFAULT_SITE_URL};
use patchnotes::storage::{CachedPages, PageStore};
use patchnotes::summary::ollama::{OllamaClient, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use patchnotes::utils::{self, AppError};
use tokio::net::TcpListener;

/// Patch notes scraper and read-only JSON API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "PATCHNOTES_BIND", default_value = "127.0.0.1:8000")]
    bind: String,

    /// Directory holding the downloaded patch pages
    #[arg(long, env = "PATCHNOTES_CACHE_DIR", default_value = ".")]
    cache_dir: String,

    /// Base URL of the patch notes site
    #[arg(long, env = "PATCHNOTES_SITE_URL", default_value = DEFAULT_SITE_URL)]
    site_url: String,

    /// Ollama server used for one-line summaries
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Ollama model name
    #[arg(long, env = "OLLAMA_MODEL", default_value = DEFAULT_OLLAMA_MODEL)]
    ollama_model: String,

    /// How many versions /versions lists
    #[arg(long, default_value_t = 3)]
    versions_limit: usize,

    /// Skip building the current bundle at startup
    #[arg(long)]
    no_prewarm: bool,

    /// Debug logging for this crate (RUST_LOG still wins)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI arguments and set up logging (RUST_LOG overrides)
    let args = Args::parse();
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting with args: {:?}", args);

    // 2. Collaborators: site client, page store, summarizer
    let site = PatchSiteClient::new(&args.site_url)?;
    let store = PageStore::new(&args.cache_dir)?;
    let pages = CachedPages::new(store, site.clone());
    let summarizer = OllamaClient::new(reqwest::Client::new(), &args.ollama_url, &args.ollama_model);

    let state = AppState {
        bundles: Arc::new(BundleCache::new(Arc::new(pages))),
        versions: Arc::new(site),
        summarizer: Arc::new(summarizer),
        versions_limit: args.versions_limit,
    };

    // 3. Pre-warm the current bundle in the background
    if !args.no_prewarm {
        tokio::spawn(api::prewarm(state.clone()));
    }

    // 4. Serve
    let listener = TcpListener::bind(&args.bind)
        .await
        .map_err(|e| AppError::Config(format!("failed to bind {}: {}", args.bind, e)))?;
    api::serve(listener, state).await?;

    Ok(())
}
