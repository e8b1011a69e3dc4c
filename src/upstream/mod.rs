//! Clients for the two remote model collaborators

pub mod tts;
pub mod vision;

use thiserror::Error;

/// Failures talking to a remote model endpoint.
///
/// The generation handlers absorb every variant into fallback content;
/// nothing here reaches a caller as an HTTP error.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport-level failure, including the request timeout
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status from the endpoint
    #[error("endpoint returned {status}: {body}")]
    Status {
        /// HTTP status returned
        status: reqwest::StatusCode,
        /// Response body, lossily decoded
        body: String,
    },

    /// The remote model is still loading
    #[error("model is loading: {0}")]
    ModelLoading(String),

    /// Error reported inline in an otherwise-OK response
    #[error("endpoint error: {0}")]
    Api(String),

    /// Response body was not the expected JSON shape
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response parsed but carried no generated text
    #[error("response missing generated_text")]
    MissingText,
}
