//! HTTP surface for the StoryLens API

use std::num::NonZeroU16;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use serde_json::json;
use tracing::{error, info};

use crate::error::StoryLensError;
use crate::rng::Randomness;
use crate::store::StoryStore;
use crate::upstream::tts::TtsClient;
use crate::upstream::vision::VisionClient;

mod files;
mod prelude;
mod stories;
mod upload;

/// Shared state for every request handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub(crate) upload_dir: PathBuf,
    pub(crate) generated_dir: PathBuf,
    pub(crate) max_upload_bytes: usize,
    pub(crate) store: Arc<dyn StoryStore>,
    pub(crate) rng: Arc<Randomness>,
    pub(crate) vision: VisionClient,
    pub(crate) tts: TtsClient,
}

impl AppState {
    /// Builds the state shared by all handlers.
    pub fn new(
        upload_dir: PathBuf,
        generated_dir: PathBuf,
        max_upload_bytes: usize,
        store: Arc<dyn StoryStore>,
        rng: Arc<Randomness>,
        vision: VisionClient,
        tts: TtsClient,
    ) -> Self {
        Self {
            upload_dir,
            generated_dir,
            max_upload_bytes,
            store,
            rng,
            vision,
            tts,
        }
    }
}

async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "status": "OK", "message": "StoryLens API is running" }))
}

async fn unknown_route_handler() -> StoryLensError {
    StoryLensError::NotFound("Route not found".to_string())
}

fn create_router(state: AppState) -> Router {
    // The body cap sits above the file cap to leave room for multipart
    // framing; the upload handler enforces the exact file limit.
    let body_limit = state.max_upload_bytes.saturating_mul(2);
    Router::new()
        .route("/api/health", axum::routing::get(health_handler))
        .route("/api/upload", axum::routing::post(upload::upload_image_handler))
        .route(
            "/api/generate-story",
            axum::routing::post(stories::generate_story_handler),
        )
        .route(
            "/api/generate-audio",
            axum::routing::post(stories::generate_audio_handler),
        )
        .route(
            "/api/story/{id}",
            axum::routing::get(stories::get_story_handler),
        )
        .route(
            "/api/image/{filename}",
            axum::routing::get(files::serve_image_handler),
        )
        .route(
            "/api/audio/{filename}",
            axum::routing::get(files::serve_audio_handler),
        )
        .fallback(unknown_route_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Binds the listener and serves the API until the process exits.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    state: AppState,
) -> Result<(), anyhow::Error> {
    let app = create_router(state);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}
