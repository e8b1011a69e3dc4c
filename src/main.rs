use clap::Parser;
use std::sync::Arc;
use storylens::config::setup_logging;
use storylens::constants::{GENERATED_DIR, MAX_UPLOAD_BYTES, REMOTE_TIMEOUT, UPLOAD_DIR};
use storylens::rng::Randomness;
use storylens::store::MemoryStoryStore;
use storylens::upstream::tts::TtsClient;
use storylens::upstream::vision::VisionClient;
use storylens::web::{AppState, setup_server};
use tracing::error;

#[tokio::main(flavor = "multi_thread", worker_threads = 32)]
async fn main() {
    let cli = storylens::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let upload_dir = cli.upload_dir.clone().unwrap_or_else(|| UPLOAD_DIR.clone());
    let generated_dir = cli
        .generated_dir
        .clone()
        .unwrap_or_else(|| GENERATED_DIR.clone());

    for dir in [&upload_dir, &generated_dir] {
        if let Err(err) = tokio::fs::create_dir_all(dir).await {
            error!("Failed to create {}: {}", dir.display(), err);
            return;
        }
    }

    let http = match reqwest::Client::builder().timeout(REMOTE_TIMEOUT).build() {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to build HTTP client: {}", err);
            return;
        }
    };

    let state = AppState::new(
        upload_dir,
        generated_dir,
        cli.max_upload_bytes.unwrap_or(MAX_UPLOAD_BYTES),
        Arc::new(MemoryStoryStore::new()),
        Arc::new(Randomness::new()),
        VisionClient::new(
            http.clone(),
            cli.vision_url.clone(),
            cli.huggingface_api_key.clone(),
        ),
        TtsClient::new(http, cli.tts_url.clone(), cli.coqui_api_key.clone()),
    );

    if let Err(err) = setup_server(&cli.listen_address, cli.port, state).await {
        error!("Application error: {}", err);
    }
}
