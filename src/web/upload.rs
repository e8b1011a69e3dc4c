//! Image upload handling

use axum::extract::Multipart;
use std::path::Path as StdPath;

use super::prelude::*;
use crate::constants::ALLOWED_IMAGE_TYPES;

/// Wire form of a stored upload.
///
/// Not retained server-side; callers pass `path` back to the story
/// generator on later requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageDescriptor {
    id: String,
    filename: String,
    original_name: String,
    path: String,
    size: usize,
    mimetype: String,
    uploaded_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    success: bool,
    image: ImageDescriptor,
}

/// Accepts a single `image` multipart field, validates type and size, and
/// writes it to the upload directory under a collision-proof name.
pub(crate) async fn upload_image_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, StoryLensError> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| StoryLensError::BadRequest(err.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let mimetype = field.content_type().unwrap_or_default().to_string();
        if !ALLOWED_IMAGE_TYPES.contains(&mimetype.as_str()) {
            return Err(StoryLensError::BadRequest(
                "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.".to_string(),
            ));
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| StoryLensError::BadRequest(err.to_string()))?;
        if bytes.len() > state.max_upload_bytes {
            return Err(StoryLensError::PayloadTooLarge);
        }
        upload = Some((original_name, mimetype, bytes.to_vec()));
    }

    let (original_name, mimetype, bytes) =
        upload.ok_or_else(|| StoryLensError::BadRequest("No image file provided".to_string()))?;

    let filename = stored_filename(&state.rng, Utc::now().timestamp_millis(), &original_name);
    tokio::fs::create_dir_all(&state.upload_dir).await?;
    let path = state.upload_dir.join(&filename);
    tokio::fs::write(&path, &bytes).await?;
    info!("Stored upload {} ({} bytes)", filename, bytes.len());

    Ok(Json(UploadResponse {
        success: true,
        image: ImageDescriptor {
            id: state.rng.next_id(),
            filename,
            original_name,
            path: path.to_string_lossy().into_owned(),
            size: bytes.len(),
            mimetype,
            uploaded_at: Utc::now(),
        },
    }))
}

/// Collision-proof stored name: random id, upload instant, original extension.
fn stored_filename(rng: &Randomness, timestamp_millis: i64, original_name: &str) -> String {
    let extension = StdPath::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!("{}-{}{}", rng.next_id(), timestamp_millis, extension)
}
