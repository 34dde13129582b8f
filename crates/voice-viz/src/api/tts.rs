//! Voice-cloning speech synthesis.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use super::{check_status, client, decode_audio, encode_audio, ApiError};

#[derive(Debug, Serialize)]
pub struct TtsRequest {
    pub ref_audio_base64: String,
    pub ref_text: String,
    pub gen_text: String,
}

#[derive(Debug, Deserialize)]
pub struct TtsResponse {
    #[serde(default)]
    pub audio_base64: Option<String>,
}

/// Value of the `lang` query parameter. The service has a Hindi model and an
/// English one; every language other than Hindi goes to the English model.
pub fn query_lang(language_id: &str) -> &'static str {
    if language_id == "hi" {
        "hi"
    } else {
        "en"
    }
}

pub struct TtsClient {
    url: String,
    timeout: Duration,
}

impl TtsClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Speak `gen_text` in the voice of `ref_audio` (WAV bytes, transcribed by
    /// `ref_text`). Returns the generated WAV bytes.
    pub fn generate(
        &self,
        ref_audio: &[u8],
        ref_text: &str,
        gen_text: &str,
        language_id: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let request = TtsRequest {
            ref_audio_base64: encode_audio(ref_audio),
            ref_text: ref_text.to_string(),
            gen_text: gen_text.to_string(),
        };
        let lang = query_lang(language_id);
        debug!(url = %self.url, lang, chars = gen_text.chars().count(), "TTS request");

        let result = self.send(&request, lang);
        if let Err(e) = &result {
            error!("TTS generation failed: {}", e);
        }
        result
    }

    fn send(&self, request: &TtsRequest, lang: &str) -> Result<Vec<u8>, ApiError> {
        let resp = client(self.timeout)?
            .post(&self.url)
            .query(&[("lang", lang)])
            .json(request)
            .send()?;
        let body = check_status(resp)?.text()?;
        let parsed: TtsResponse = serde_json::from_str(&body)?;
        audio_from_response(parsed)
    }
}

fn audio_from_response(resp: TtsResponse) -> Result<Vec<u8>, ApiError> {
    match resp.audio_base64 {
        Some(encoded) if !encoded.is_empty() => decode_audio(&encoded),
        _ => Err(ApiError::MissingAudio),
    }
}
