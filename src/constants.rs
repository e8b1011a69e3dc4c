//! Shared constants/setters for things
//!

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

/// The default place uploaded images land
pub static UPLOAD_DIR: LazyLock<PathBuf> = LazyLock::new(|| PathBuf::from("./uploads"));

/// The default place generated audio lands
pub static GENERATED_DIR: LazyLock<PathBuf> = LazyLock::new(|| PathBuf::from("./generated"));

/// Upload size ceiling in bytes (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types the upload endpoint accepts
pub const ALLOWED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Timeout for every outbound inference/TTS call; anything slower falls back
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Prompt sent to the vision endpoint for prose
pub const STORY_PROMPT: &str = "Write a creative short story inspired by this image:";

/// Prompt sent to the vision endpoint for verse
pub const POEM_PROMPT: &str = "Write a creative poem inspired by this image:";

/// Max age (in seconds) for served file cache entries.
pub const FILE_CACHE_MAX_AGE_SECONDS: u64 = 60 * 60;

/// Cache-Control value for served image/audio responses.
pub static FILE_CACHE_CONTROL: LazyLock<String> =
    LazyLock::new(|| format!("public, max-age={}", FILE_CACHE_MAX_AGE_SECONDS));

/// Canned stories substituted when the vision endpoint is unavailable
pub const FALLBACK_STORIES: [&str; 3] = [
    "In this captured moment, time seems to stand still. The image tells a story of beauty, wonder, and the magic found in everyday moments. Every detail speaks to the photographer's eye for capturing life's precious instances.",
    "Once upon a time, this scene unfolded before someone's eyes. They saw something special - a moment worth preserving, a memory worth keeping. The image holds secrets and stories waiting to be discovered.",
    "This photograph whispers tales of adventure, emotion, and human experience. In its pixels lie countless stories, each viewer bringing their own interpretation to the visual narrative presented here.",
];

/// Canned poems substituted when the vision endpoint is unavailable
pub const FALLBACK_POEMS: [&str; 3] = [
    "A moment frozen in time's embrace,\nWhere light and shadow softly dance,\nThis image holds a special place,\nIn memory's vast expanse.",
    "Through the lens, a story told,\nOf beauty that will never fade,\nIn colors bright and shadows bold,\nA masterpiece nature made.",
    "Captured here for all to see,\nA slice of life's grand design,\nThis photograph will always be\nA treasure, pure and fine.",
];
