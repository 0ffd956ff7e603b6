// src/api/mod.rs
//! Read-only JSON API over the bundle cache.
//!
//! Every data route exists as `/<name>`, `/<name>/` and `/<name>/:version`;
//! without a version segment the current patch is used.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::handler::Handler;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::bundle::{Bundle, BundleCache};
use crate::patch::{PatchVersion, VersionSource};
use crate::summary::{self, Summarizer};

/// Shared collaborators injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub bundles: Arc<BundleCache>,
    pub versions: Arc<dyn VersionSource>,
    pub summarizer: Arc<dyn Summarizer>,
    pub versions_limit: usize,
}

pub fn router(state: AppState) -> Router {
    let app = Router::new().route("/", get(root));
    let app = versioned(app, "/champions", champions);
    let app = versioned(app, "/items", items);
    let app = versioned(app, "/other", other);
    let app = versioned(app, "/arena", arena);
    let app = versioned(app, "/tagline", tagline);
    let app = versioned(app, "/highlights", highlights);
    let app = versioned(app, "/summary", summary_route);
    let app = versioned(app, "/bundle", bundle);
    app.route("/version", get(version))
        .route("/version/", get(version))
        .route("/versions", get(versions))
        .route("/versions/", get(versions))
        .with_state(state)
}

/// Serves the API until the listener fails.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Serving patch notes API on http://{}", addr);
    axum::serve(listener, router(state)).await
}

/// Builds the bundle for the current version ahead of the first request.
/// Failures are logged and otherwise ignored.
pub async fn prewarm(state: AppState) {
    match state.versions.latest().await {
        Some(version) => {
            let bundle = state.bundles.get(&version).await;
            tracing::info!("Pre-warmed bundle cache for {}", bundle.version);
        }
        None => tracing::warn!("Skipping bundle pre-warm: current version unknown"),
    }
}

fn versioned<H, T>(router: Router<AppState>, base: &str, handler: H) -> Router<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    router
        .route(base, get(handler.clone()))
        .route(&format!("{base}/"), get(handler.clone()))
        .route(&format!("{base}/:version"), get(handler))
}

/// Version named in the path, else the current one. A malformed segment
/// resolves to nothing rather than falling back to the current version.
async fn resolve(state: &AppState, segment: Option<Path<String>>) -> Option<PatchVersion> {
    match segment {
        Some(Path(raw)) => {
            let parsed = PatchVersion::parse(&raw);
            if parsed.is_none() {
                tracing::warn!("Rejecting malformed version segment {:?}", raw);
            }
            parsed
        }
        None => state.versions.latest().await,
    }
}

async fn resolve_bundle(state: &AppState, segment: Option<Path<String>>) -> Option<Arc<Bundle>> {
    let version = resolve(state, segment).await?;
    Some(state.bundles.get(&version).await)
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Welcome to the Patch Notes API!"}))
}

async fn champions(State(state): State<AppState>, segment: Option<Path<String>>) -> Json<Value> {
    let body = match resolve_bundle(&state, segment).await {
        Some(bundle) => json!({"champions": bundle.champions}),
        None => json!({"champions": {}}),
    };
    Json(body)
}

async fn items(State(state): State<AppState>, segment: Option<Path<String>>) -> Json<Value> {
    let body = match resolve_bundle(&state, segment).await {
        Some(bundle) => json!({"items": bundle.items}),
        None => json!({"items": {}}),
    };
    Json(body)
}

async fn other(State(state): State<AppState>, segment: Option<Path<String>>) -> Json<Value> {
    let body = match resolve_bundle(&state, segment).await {
        Some(bundle) => json!(bundle.other),
        None => json!({}),
    };
    Json(body)
}

async fn arena(State(state): State<AppState>, segment: Option<Path<String>>) -> Json<Value> {
    let body = match resolve_bundle(&state, segment).await {
        Some(bundle) => json!(bundle.arena),
        None => json!({"arena": {}, "mentions": []}),
    };
    Json(body)
}

async fn tagline(State(state): State<AppState>, segment: Option<Path<String>>) -> Json<Value> {
    let tagline = resolve_bundle(&state, segment)
        .await
        .and_then(|bundle| bundle.tagline.clone());
    Json(json!({"tagline": tagline}))
}

async fn highlights(State(state): State<AppState>, segment: Option<Path<String>>) -> Json<Value> {
    let body = match resolve_bundle(&state, segment).await {
        Some(bundle) => json!({"highlights": bundle.highlights}),
        None => json!({"highlights": crate::extractors::Highlights::default()}),
    };
    Json(body)
}

async fn summary_route(
    State(state): State<AppState>,
    segment: Option<Path<String>>,
) -> Json<summary::SummaryOutcome> {
    let bundle = resolve_bundle(&state, segment).await;
    Json(summary::summarize(state.summarizer.as_ref(), bundle.as_deref()).await)
}

async fn bundle(State(state): State<AppState>, segment: Option<Path<String>>) -> Json<Value> {
    let body = match resolve_bundle(&state, segment).await {
        Some(bundle) => json!(*bundle),
        None => json!({}),
    };
    Json(body)
}

async fn version(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"version": state.versions.latest().await}))
}

async fn versions(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"versions": state.versions.recent(state.versions_limit).await}))
}
