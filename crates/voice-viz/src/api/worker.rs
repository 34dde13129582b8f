//! Background execution of clone jobs.
//!
//! The window spawns one job at a time and polls its channel every frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::info;

use super::transcribe::TranscribeClient;
use super::tts::TtsClient;

/// Where the services live
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub tts_url: String,
    pub whisper_url: String,
    pub timeout: Duration,
}

/// Everything needed to clone a voice and speak one text
#[derive(Debug, Clone, Default)]
pub struct CloneRequest {
    /// Reference WAV bytes
    pub ref_audio: Vec<u8>,
    /// Transcript of the reference; transcribed first when missing and
    /// `auto_transcribe` is set
    pub ref_text: Option<String>,
    pub gen_text: String,
    pub language: String,
    pub auto_transcribe: bool,
}

impl CloneRequest {
    /// Reject requests the service would refuse anyway
    pub fn validate(&self) -> Result<(), String> {
        if self.ref_audio.is_empty() {
            return Err("Upload a voice sample first".to_string());
        }
        if self.gen_text.trim().is_empty() {
            return Err("Enter text to generate".to_string());
        }
        Ok(())
    }

    fn needs_transcript(&self) -> bool {
        self.auto_transcribe
            && self
                .ref_text
                .as_deref()
                .map_or(true, |t| t.trim().is_empty())
    }

    /// Run to completion on the current thread, reporting each step
    pub fn run(&self, endpoints: &Endpoints, report: &mut dyn FnMut(JobUpdate)) {
        if let Err(msg) = self.validate() {
            report(JobUpdate::Failed(msg));
            return;
        }

        let ref_text = if self.needs_transcript() {
            report(JobUpdate::Transcribing);
            let client = TranscribeClient::new(endpoints.whisper_url.as_str(), endpoints.timeout);
            match client.transcribe(&self.ref_audio, Some(self.language.as_str())) {
                Ok(transcript) => {
                    report(JobUpdate::Transcribed(transcript.text.clone()));
                    transcript.text
                }
                Err(e) => {
                    report(JobUpdate::Failed(e.to_string()));
                    return;
                }
            }
        } else {
            self.ref_text.clone().unwrap_or_default()
        };

        report(JobUpdate::Generating);
        let client = TtsClient::new(endpoints.tts_url.as_str(), endpoints.timeout);
        match client.generate(&self.ref_audio, &ref_text, &self.gen_text, &self.language) {
            Ok(wav) => {
                info!(bytes = wav.len(), "Speech generated");
                report(JobUpdate::Generated(wav));
            }
            Err(e) => report(JobUpdate::Failed(e.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobUpdate {
    Transcribing,
    Transcribed(String),
    Generating,
    /// WAV bytes ready to play
    Generated(Vec<u8>),
    Failed(String),
}

impl JobUpdate {
    /// Whether no further updates follow
    pub fn is_final(&self) -> bool {
        matches!(self, JobUpdate::Generated(_) | JobUpdate::Failed(_))
    }
}

/// Run `request` on a new thread
pub fn spawn(request: CloneRequest, endpoints: Endpoints) -> Receiver<JobUpdate> {
    let (tx, rx): (Sender<JobUpdate>, Receiver<JobUpdate>) = mpsc::channel();
    thread::spawn(move || {
        request.run(&endpoints, &mut |update| {
            let _ = tx.send(update);
        });
    });
    rx
}
