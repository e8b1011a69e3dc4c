//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "STORYLENS_DEBUG")]
    /// Enable debug logging. Env: STORYLENS_DEBUG
    pub debug: bool,

    #[clap(long, short, default_value = "5000", env = "STORYLENS_PORT")]
    /// http listener port, defaults to `5000`.
    /// Env: STORYLENS_PORT
    pub port: NonZeroU16,

    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "STORYLENS_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: STORYLENS_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "STORYLENS_UPLOAD_DIR")]
    /// Where uploaded images land, defaults to `./uploads`.
    /// Env: STORYLENS_UPLOAD_DIR
    pub upload_dir: Option<PathBuf>,

    #[clap(long, env = "STORYLENS_GENERATED_DIR")]
    /// Where generated audio lands, defaults to `./generated`.
    /// Env: STORYLENS_GENERATED_DIR
    pub generated_dir: Option<PathBuf>,

    #[clap(long, env = "STORYLENS_MAX_UPLOAD_BYTES")]
    /// Upload size limit in bytes, defaults to 10 MiB.
    /// Env: STORYLENS_MAX_UPLOAD_BYTES
    pub max_upload_bytes: Option<usize>,

    #[clap(
        long,
        default_value = "https://api-inference.huggingface.co/models/microsoft/kosmos-2-patch14-224",
        env = "STORYLENS_VISION_URL"
    )]
    /// Vision-language inference endpoint.
    /// Env: STORYLENS_VISION_URL
    pub vision_url: Url,

    #[clap(
        long,
        default_value = "",
        env = "HUGGINGFACE_API_KEY",
        hide_env_values = true
    )]
    /// Bearer token for the vision endpoint.
    /// Env: HUGGINGFACE_API_KEY
    pub huggingface_api_key: String,

    #[clap(
        long,
        default_value = "https://api.coqui.ai/tts",
        env = "STORYLENS_TTS_URL"
    )]
    /// Text-to-speech endpoint.
    /// Env: STORYLENS_TTS_URL
    pub tts_url: Url,

    #[clap(long, default_value = "", env = "COQUI_API_KEY", hide_env_values = true)]
    /// Bearer token for the TTS endpoint.
    /// Env: COQUI_API_KEY
    pub coqui_api_key: String,
}
