//! Vision-language inference client

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::UpstreamError;
use crate::constants::{POEM_PROMPT, STORY_PROMPT};

/// Request body for the inference endpoint.
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: InferenceInputs<'a>,
}

#[derive(Debug, Serialize)]
struct InferenceInputs<'a> {
    image: &'a str,
    text: &'a str,
}

/// Response body; the endpoint reports soft failures inline rather than
/// through the status code.
#[derive(Debug, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    generated_text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the image-to-text model endpoint.
#[derive(Clone, Debug)]
pub struct VisionClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl VisionClient {
    /// Builds a client against an endpoint; `http` carries the shared
    /// timeout configuration.
    pub fn new(http: reqwest::Client, endpoint: Url, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }

    /// Prompt for a story type. Anything but exactly `poem` reads as prose.
    pub fn prompt_for(story_type: &str) -> &'static str {
        if story_type == "poem" {
            POEM_PROMPT
        } else {
            STORY_PROMPT
        }
    }

    /// Asks the model to write about the image.
    ///
    /// Every failure mode, including a model that is still loading, comes
    /// back as an [`UpstreamError`]; the caller owns the fallback.
    pub async fn generate(
        &self,
        image_bytes: &[u8],
        story_type: &str,
    ) -> Result<String, UpstreamError> {
        let encoded = general_purpose::STANDARD.encode(image_bytes);
        let request = InferenceRequest {
            inputs: InferenceInputs {
                image: &encoded,
                text: Self::prompt_for(story_type),
            },
        };

        debug!("Requesting {} text from {}", story_type, self.endpoint);
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

        let parsed: InferenceResponse = serde_json::from_slice(&bytes)?;
        interpret(parsed)
    }
}

fn interpret(response: InferenceResponse) -> Result<String, UpstreamError> {
    if let Some(error) = response.error {
        if error.contains("loading") {
            return Err(UpstreamError::ModelLoading(error));
        }
        return Err(UpstreamError::Api(error));
    }
    response.generated_text.ok_or(UpstreamError::MissingText)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> InferenceResponse {
        serde_json::from_str(body).expect("parse response")
    }

    #[test]
    fn generated_text_wins() {
        let result = interpret(parse(r#"{"generated_text": "Once upon a time"}"#));
        assert_eq!(result.expect("text"), "Once upon a time");
    }

    #[test]
    fn loading_error_is_classified() {
        let result = interpret(parse(
            r#"{"error": "Model microsoft/kosmos-2 is currently loading"}"#,
        ));
        assert!(matches!(result, Err(UpstreamError::ModelLoading(_))));
    }

    #[test]
    fn other_inline_errors_are_api_errors() {
        let result = interpret(parse(r#"{"error": "rate limit exceeded"}"#));
        assert!(matches!(result, Err(UpstreamError::Api(_))));
    }

    #[test]
    fn empty_response_is_missing_text() {
        let result = interpret(parse("{}"));
        assert!(matches!(result, Err(UpstreamError::MissingText)));
    }

    #[test]
    fn prompt_selection_is_an_equality_test() {
        assert_eq!(VisionClient::prompt_for("poem"), POEM_PROMPT);
        assert_eq!(VisionClient::prompt_for("story"), STORY_PROMPT);
        assert_eq!(VisionClient::prompt_for("sonnet"), STORY_PROMPT);
        assert_eq!(VisionClient::prompt_for(""), STORY_PROMPT);
    }
}
