//! Text-to-speech client

use serde::Serialize;
use tracing::debug;
use url::Url;

use super::UpstreamError;

/// Voice used for every synthesis request
const DEFAULT_SPEAKER: &str = "default";

/// Playback speed used for every synthesis request
const DEFAULT_SPEED: f32 = 1.0;

/// Request body for the speech endpoint.
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    speaker_id: &'a str,
    speed: f32,
}

/// Client for the text-to-speech endpoint.
#[derive(Clone, Debug)]
pub struct TtsClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl TtsClient {
    /// Builds a client against an endpoint; `http` carries the shared
    /// timeout configuration.
    pub fn new(http: reqwest::Client, endpoint: Url, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }

    /// Synthesizes narration for the text, returning raw audio bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, UpstreamError> {
        let request = SpeechRequest {
            text,
            speaker_id: DEFAULT_SPEAKER,
            speed: DEFAULT_SPEED,
        };

        debug!("Requesting narration from {}", self.endpoint);
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_request_wire_shape() {
        let request = SpeechRequest {
            text: "hello",
            speaker_id: DEFAULT_SPEAKER,
            speed: DEFAULT_SPEED,
        };
        let encoded = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            encoded,
            serde_json::json!({"text": "hello", "speaker_id": "default", "speed": 1.0})
        );
    }
}
