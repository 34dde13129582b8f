//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::worker::CloneRequest;
use crate::demos;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "voice-viz")]
#[command(about = "Voice cloning demo with an audio-reactive orb", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Play a local WAV file with the visualizer
    Play {
        #[arg(value_name = "WAV")]
        file: PathBuf,
    },

    /// Clone a voice, speak some text and play it with the visualizer
    Clone(CloneArgs),

    /// Print the transcript of a WAV file
    Transcribe {
        #[arg(value_name = "WAV")]
        file: PathBuf,

        /// Language hint (default: auto-detect)
        #[arg(long)]
        lang: Option<String>,
    },

    /// List the built-in demo sentences
    Demos,

    /// List audio output devices
    Devices,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CloneArgs {
    /// Reference voice sample (default: the bundled voice for --lang)
    #[arg(long = "ref", value_name = "WAV")]
    pub reference: Option<PathBuf>,

    /// Transcript of the reference sample
    #[arg(long, value_name = "TEXT")]
    pub ref_text: Option<String>,

    /// Text to speak
    #[arg(long, value_name = "TEXT", conflicts_with = "demo")]
    pub text: Option<String>,

    /// Speak demo sentence N of the language (see `voice-viz demos`)
    #[arg(long, value_name = "N")]
    pub demo: Option<usize>,

    /// Language id, e.g. en, hi, ta (default: last used)
    #[arg(long, value_name = "ID")]
    pub lang: Option<String>,

    /// Transcribe the reference first when --ref-text is missing
    #[arg(long)]
    pub auto_transcribe: bool,
}

impl CloneArgs {
    /// Resolve files, presets and demos into a request. Missing inputs are
    /// left empty for [`CloneRequest::validate`] to report.
    pub fn to_request(&self, default_language: &str) -> Result<CloneRequest, String> {
        let language = self
            .lang
            .clone()
            .unwrap_or_else(|| default_language.to_string());

        let preset = demos::voice_preset(&language);
        let (ref_audio, preset_text) = match (&self.reference, preset) {
            (Some(path), _) => (read(path)?, None),
            (None, Some(p)) => (read(Path::new(p.audio_path))?, Some(p.ref_text)),
            (None, None) => (Vec::new(), None),
        };

        let ref_text = self
            .ref_text
            .clone()
            .or_else(|| preset_text.map(str::to_string));

        let gen_text = match (self.demo, &self.text) {
            (Some(n), _) => demos::demo(&language, n.saturating_sub(1))
                .map(|d| d.actual_text.to_string())
                .ok_or_else(|| format!("No demo {} for language '{}'", n, language))?,
            (None, Some(text)) => text.clone(),
            (None, None) => String::new(),
        };

        Ok(CloneRequest {
            ref_audio,
            ref_text,
            gen_text,
            language,
            auto_transcribe: self.auto_transcribe,
        })
    }
}

fn read(path: &Path) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("Could not read {}: {}", path.display(), e))
}
