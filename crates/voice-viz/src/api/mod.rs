//! Clients for the voice-cloning and transcription services.
//!
//! Both are blocking `reqwest` calls; the window runs them through
//! [`worker`] so the animation never waits on the network.

pub mod transcribe;
pub mod tts;
pub mod worker;

use base64::Engine as _;
use std::time::Duration;

/// Failures talking to a remote service
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 audio: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("API Error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("No audio data received from server")]
    MissingAudio,
}

pub(crate) fn client(timeout: Duration) -> Result<reqwest::blocking::Client, ApiError> {
    Ok(reqwest::blocking::Client::builder().timeout(timeout).build()?)
}

pub(crate) fn encode_audio(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub(crate) fn decode_audio(encoded: &str) -> Result<Vec<u8>, ApiError> {
    Ok(base64::engine::general_purpose::STANDARD.decode(encoded.trim())?)
}

/// Turn a non-2xx response into [`ApiError::Status`]
pub(crate) fn check_status(
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip_of_wav_header() {
        let header = b"RIFF\x24\x00\x00\x00WAVE";
        let encoded = encode_audio(header);
        assert_eq!(encoded, "UklGRiQAAABXQVZF");
        assert_eq!(decode_audio(&encoded).unwrap(), header);
    }

    #[test]
    fn test_decode_tolerates_trailing_newline() {
        assert_eq!(decode_audio("UklGRg==\n").unwrap(), b"RIFF");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_audio("@@@"), Err(ApiError::Base64(_))));
    }

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 503,
            body: "model loading".into(),
        };
        assert_eq!(err.to_string(), "API Error: 503 - model loading");
        assert_eq!(
            ApiError::MissingAudio.to_string(),
            "No audio data received from server"
        );
    }
}
