//! Story and narration generation handlers

use super::prelude::*;
use crate::constants::{FALLBACK_POEMS, FALLBACK_STORIES};
use crate::store::Story;

/// Where generated content came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Sourced {
    /// Produced by the remote model
    Upstream,
    /// Locally substituted after a remote failure
    Fallback,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateStoryRequest {
    image_id: Option<String>,
    image_path: Option<String>,
    story_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateStoryResponse {
    success: bool,
    story: Story,
    sourced: Sourced,
}

/// Generates a story or poem about a previously uploaded image and stores
/// the record. Remote failures degrade to canned text, never to an error.
pub(crate) async fn generate_story_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateStoryRequest>,
) -> Result<Json<GenerateStoryResponse>, StoryLensError> {
    let image_path = request
        .image_path
        .filter(|path| !path.is_empty())
        .ok_or_else(|| StoryLensError::BadRequest("Image path is required".to_string()))?;
    let story_type = request.story_type.unwrap_or_else(|| "story".to_string());

    // A missing or unreadable image is the one failure the fallback does
    // not mask.
    let image_bytes =
        tokio::fs::read(&image_path)
            .await
            .map_err(|err| StoryLensError::Internal {
                message: "Failed to generate story",
                details: err.to_string(),
            })?;

    let (content, sourced) = match state.vision.generate(&image_bytes, &story_type).await {
        Ok(text) => (text, Sourced::Upstream),
        Err(err) => {
            info!("Vision endpoint unavailable, using canned text: {}", err);
            (
                fallback_content(&state.rng, &story_type).to_string(),
                Sourced::Fallback,
            )
        }
    };

    let story = Story {
        id: state.rng.next_id(),
        image_id: request.image_id,
        image_path,
        content,
        story_type,
        generated_at: Utc::now(),
        audio_path: None,
    };
    state.store.put(story.clone()).await;
    info!("Stored {} {}", story.story_type, story.id);

    Ok(Json(GenerateStoryResponse {
        success: true,
        story,
        sourced,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateAudioRequest {
    story_id: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateAudioResponse {
    success: bool,
    audio_path: String,
    audio_url: String,
    sourced: Sourced,
}

/// Narrates text and writes the artifact to the generated directory; on TTS
/// failure a `.txt` placeholder takes the audio slot instead. Attaches the
/// path to the story when the caller names one we know.
pub(crate) async fn generate_audio_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateAudioRequest>,
) -> Result<Json<GenerateAudioResponse>, StoryLensError> {
    let text = request
        .text
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            StoryLensError::BadRequest("Text is required for audio generation".to_string())
        })?;

    let file_id = request
        .story_id
        .clone()
        .unwrap_or_else(|| state.rng.next_id());
    let stem = format!("audio-{}-{}", file_id, Utc::now().timestamp_millis());

    let (filename, payload, sourced) = match state.tts.synthesize(&text).await {
        Ok(audio) => (format!("{stem}.wav"), audio, Sourced::Upstream),
        Err(err) => {
            info!("TTS endpoint unavailable, writing placeholder: {}", err);
            (
                format!("{stem}.txt"),
                placeholder_payload(&text).into_bytes(),
                Sourced::Fallback,
            )
        }
    };

    tokio::fs::create_dir_all(&state.generated_dir).await?;
    let path = state.generated_dir.join(&filename);
    tokio::fs::write(&path, &payload)
        .await
        .map_err(|err| StoryLensError::Internal {
            message: "Failed to generate audio",
            details: err.to_string(),
        })?;
    let audio_path = path.to_string_lossy().into_owned();

    if let Some(story_id) = request.story_id.as_deref() {
        if state.store.attach_audio(story_id, &audio_path).await {
            debug!("Attached audio to story {}", story_id);
        } else {
            debug!("No story {} to attach audio to", story_id);
        }
    }

    Ok(Json(GenerateAudioResponse {
        success: true,
        audio_url: format!("/api/audio/{}", filename),
        audio_path,
        sourced,
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct StoryResponse {
    success: bool,
    story: Story,
}

/// Fetches a stored story verbatim.
pub(crate) async fn get_story_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoryResponse>, StoryLensError> {
    match state.store.get(&id).await {
        Some(story) => Ok(Json(StoryResponse {
            success: true,
            story,
        })),
        None => Err(StoryLensError::NotFound("Story not found".to_string())),
    }
}

/// Uniform pick from the canned set; anything but exactly `poem` reads as
/// prose.
fn fallback_content(rng: &Randomness, story_type: &str) -> &'static str {
    if story_type == "poem" {
        rng.pick(&FALLBACK_POEMS)
    } else {
        rng.pick(&FALLBACK_STORIES)
    }
}

/// Text stand-in written when synthesis fails. Same logical slot as the
/// audio, not playable.
fn placeholder_payload(text: &str) -> String {
    let preview: String = text.chars().take(100).collect();
    format!("Audio for: {}...", preview)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_truncates_to_100_chars() {
        let text = "x".repeat(250);
        let payload = placeholder_payload(&text);
        assert_eq!(payload, format!("Audio for: {}...", "x".repeat(100)));
    }

    #[test]
    fn placeholder_keeps_short_text() {
        assert_eq!(placeholder_payload("hi"), "Audio for: hi...");
    }

    #[test]
    fn fallback_poems_only_for_exactly_poem() {
        let rng = Randomness::seeded(5);
        assert!(FALLBACK_POEMS.contains(&fallback_content(&rng, "poem")));
        assert!(FALLBACK_STORIES.contains(&fallback_content(&rng, "story")));
        assert!(FALLBACK_STORIES.contains(&fallback_content(&rng, "sonnet")));
    }
}
