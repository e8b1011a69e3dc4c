//! Streams stored images and audio, with conditional-request support

use std::io::ErrorKind;
use std::path::{Component, Path as StdPath};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::HeaderMap;
use axum::http::header::{CACHE_CONTROL, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use axum::http::response::Builder;
use axum::response::Response;
use httpdate::{fmt_http_date, parse_http_date};

use super::prelude::*;
use crate::constants::FILE_CACHE_CONTROL;

/// Serves an uploaded image by filename.
pub(crate) async fn serve_image_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Result<Response, StoryLensError> {
    serve_from_dir(&state.upload_dir, &filename, &headers, "Image not found").await
}

/// Serves a generated audio artifact (or its placeholder) by filename.
pub(crate) async fn serve_audio_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Result<Response, StoryLensError> {
    serve_from_dir(&state.generated_dir, &filename, &headers, "Audio not found").await
}

async fn serve_from_dir(
    dir: &StdPath,
    filename: &str,
    headers: &HeaderMap,
    missing: &str,
) -> Result<Response, StoryLensError> {
    let filename = confined_filename(filename)?;
    let path = dir.join(filename);

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(StoryLensError::NotFound(missing.to_string())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StoryLensError::NotFound(missing.to_string()));
        }
        Err(err) => return Err(StoryLensError::from(err)),
    };

    let cache = FileCacheHeaders::from_metadata(&metadata);
    if is_not_modified(headers, &cache) {
        return not_modified_response(&cache);
    }

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StoryLensError::NotFound(missing.to_string()));
        }
        Err(err) => return Err(StoryLensError::from(err)),
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let mut builder = Response::builder().header(CONTENT_TYPE, mime.as_ref());
    builder = apply_cache_headers(builder, &cache);
    builder.body(Body::from(bytes)).map_err(StoryLensError::from)
}

/// Rejects anything that could escape the content directory: the filename
/// must be a single normal path component.
fn confined_filename(filename: &str) -> Result<&str, StoryLensError> {
    let mut components = StdPath::new(filename).components();
    let confined = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if !confined {
        return Err(StoryLensError::BadRequest("Invalid filename".to_string()));
    }
    Ok(filename)
}

/// Cache validators derived from file metadata.
#[derive(Clone, Debug)]
struct FileCacheHeaders {
    etag: Option<HeaderValue>,
    last_modified: Option<HeaderValue>,
    modified_at: Option<SystemTime>,
}

impl FileCacheHeaders {
    fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        let modified_at = metadata.modified().ok();
        let etag = build_etag(metadata.len(), modified_at);
        let last_modified =
            modified_at.and_then(|modified| HeaderValue::from_str(&fmt_http_date(modified)).ok());
        Self {
            etag,
            last_modified,
            modified_at,
        }
    }
}

fn apply_cache_headers(mut builder: Builder, cache: &FileCacheHeaders) -> Builder {
    builder = builder.header(CACHE_CONTROL, FILE_CACHE_CONTROL.as_str());
    if let Some(etag) = cache.etag.as_ref() {
        builder = builder.header(ETAG, etag.clone());
    }
    if let Some(last_modified) = cache.last_modified.as_ref() {
        builder = builder.header(LAST_MODIFIED, last_modified.clone());
    }
    builder
}

/// Returns true when the request matches a not-modified response.
fn is_not_modified(headers: &HeaderMap, cache: &FileCacheHeaders) -> bool {
    if let Some(if_none_match) = headers.get(IF_NONE_MATCH) {
        if let Ok(value) = if_none_match.to_str() {
            let value = value.trim();
            if value == "*" {
                return true;
            }
            if let Some(etag) = cache.etag.as_ref().and_then(|value| value.to_str().ok())
                && value.split(',').any(|candidate| candidate.trim() == etag)
            {
                return true;
            }
        }
        return false;
    }

    if let (Some(if_modified_since), Some(modified_at)) =
        (headers.get(IF_MODIFIED_SINCE), cache.modified_at)
        && let Ok(value) = if_modified_since.to_str()
        && let Ok(since) = parse_http_date(value)
        && modified_at <= since
    {
        return true;
    }

    false
}

/// Builds a 304 response that preserves cache headers.
fn not_modified_response(cache: &FileCacheHeaders) -> Result<Response, StoryLensError> {
    let builder = Response::builder().status(StatusCode::NOT_MODIFIED);
    let builder = apply_cache_headers(builder, cache);
    builder.body(Body::empty()).map_err(StoryLensError::from)
}

fn build_etag(size: u64, modified_at: Option<SystemTime>) -> Option<HeaderValue> {
    let suffix = match modified_at {
        Some(modified) => modified
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs().to_string())
            .unwrap_or_else(|_| "0".to_string()),
        None => "0".to_string(),
    };
    let value = format!("W/\"{}-{}\"", size, suffix);
    HeaderValue::from_str(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confined_filename_accepts_plain_names() {
        assert!(confined_filename("a.png").is_ok());
        assert!(confined_filename("audio-1234-5678.wav").is_ok());
    }

    #[test]
    fn confined_filename_rejects_escapes() {
        for bad in ["", ".", "..", "../secret.txt", "a/b.png", "/etc/passwd"] {
            assert!(confined_filename(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn etag_is_weak_and_stable() {
        let etag = build_etag(10, None).expect("etag");
        assert_eq!(etag.to_str().expect("ascii"), "W/\"10-0\"");
    }
}
