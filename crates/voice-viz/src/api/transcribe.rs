//! Whisper transcription of reference audio.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use super::{check_status, client, encode_audio, ApiError};

pub const AUTO_LANGUAGE: &str = "auto";

#[derive(Debug, Serialize)]
pub struct TranscribeRequest {
    pub audio_base64: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    /// Language the service detected, if it reported one
    pub language: Option<String>,
    pub duration_secs: Option<f64>,
}

impl From<TranscribeResponse> for Transcript {
    fn from(resp: TranscribeResponse) -> Self {
        Self {
            text: resp.text.trim().to_string(),
            language: resp.language,
            duration_secs: resp.duration,
        }
    }
}

pub struct TranscribeClient {
    url: String,
    timeout: Duration,
}

impl TranscribeClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Transcribe WAV bytes. `language_hint` of `None` lets the service detect it.
    pub fn transcribe(&self, audio: &[u8], language_hint: Option<&str>) -> Result<Transcript, ApiError> {
        let request = TranscribeRequest {
            audio_base64: encode_audio(audio),
            language: language_hint
                .filter(|l| !l.is_empty())
                .unwrap_or(AUTO_LANGUAGE)
                .to_string(),
        };
        debug!(url = %self.url, language = %request.language, "Transcription request");

        let result = self.send(&request);
        if let Err(e) = &result {
            error!("Transcription failed: {}", e);
        }
        result
    }

    fn send(&self, request: &TranscribeRequest) -> Result<Transcript, ApiError> {
        let resp = client(self.timeout)?.post(&self.url).json(request).send()?;
        let body = check_status(resp)?.text()?;
        let parsed: TranscribeResponse = serde_json::from_str(&body)?;
        Ok(parsed.into())
    }
}
