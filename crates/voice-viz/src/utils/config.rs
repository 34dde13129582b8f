//! Configuration file management.
//!
//! Handles loading and saving user preferences to `~/.voice-viz.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use voice_viz_core::config::{DEFAULT_FADE_DURATION_MS, DEFAULT_FFT_SIZE, DEFAULT_PARTICLE_COUNT};
use voice_viz_core::{Rgb, VizConfig};

use crate::api::worker::Endpoints;

const DEFAULT_TTS_API_URL: &str = "http://localhost:8000/v1/tts";
const DEFAULT_WHISPER_API_URL: &str = "http://localhost:8000/api/whisper";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

const BRAND_BLUE: Rgb = Rgb::new(5, 83, 156);
const BRAND_BLUE_SOFT: Rgb = Rgb::new(43, 93, 137);
const BRAND_ORANGE: Rgb = Rgb::new(245, 146, 34);
const SILVER: Rgb = Rgb::new(214, 221, 232);

const CONFIG_TEMPLATE: &str = r#"# voice-viz configuration file

# =============================================================================
# Services
# =============================================================================

# Voice-cloning endpoint (POST, ?lang=en|hi)
# tts_api_url = "http://localhost:8000/v1/tts"

# Whisper transcription endpoint (POST)
# whisper_api_url = "http://localhost:8000/api/whisper"

# Seconds before a request is abandoned (default: 120)
# request_timeout_secs = 120

# =============================================================================
# Visuals
# =============================================================================

# Analyser FFT size, power of two (default: 128 -> 64 bins)
# fft_size = 128

# Particles in the ring (default: 120)
# particle_count = 120

# Fade-out after playback stops, in milliseconds (default: 550)
# fade_duration_ms = 550

# Colours as [r, g, b]
# brand_blue = [5, 83, 156]
# brand_blue_soft = [43, 93, 137]
# brand_orange = [245, 146, 34]
# silver = [214, 221, 232]

# =============================================================================
# Audio
# =============================================================================

# Output device name (default: system default). See `voice-viz devices`.
# output_device = "Device Name"

# Last language used for synthesis (auto-saved)
# last_language = "en"
"#;

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
    pub tts_api_url: Option<String>,
    pub whisper_api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,

    pub fft_size: Option<usize>,
    pub particle_count: Option<usize>,
    pub fade_duration_ms: Option<f64>,
    pub brand_blue: Option<Rgb>,
    pub brand_blue_soft: Option<Rgb>,
    pub brand_orange: Option<Rgb>,
    pub silver: Option<Rgb>,

    pub output_device: Option<String>,
    pub last_language: Option<String>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".voice-viz.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            match fs::write(&path, CONFIG_TEMPLATE) {
                Ok(()) => info!("Created config template at {:?}", path),
                Err(e) => warn!("Could not write config template to {:?}: {}", path, e),
            }
        }

        Self::load_from(&path)
    }

    /// Parse `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        Self::parse(&content).unwrap_or_else(|e| {
            warn!("Ignoring invalid config {:?}: {}", path, e);
            Self::default()
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            match toml::to_string(self) {
                Ok(content) => match fs::write(&path, &content) {
                    Ok(()) => info!("Config saved to {:?}", path),
                    Err(e) => warn!("Could not save config to {:?}: {}", path, e),
                },
                Err(e) => warn!("Could not serialize config: {}", e),
            }
        }
    }

    pub fn set_last_language(&mut self, language: &str) {
        if self.last_language.as_deref() == Some(language) {
            return;
        }
        self.last_language = Some(language.to_string());
        self.save();
    }

    pub fn tts_api_url(&self) -> String {
        self.tts_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_TTS_API_URL.to_string())
    }

    pub fn whisper_api_url(&self) -> String {
        self.whisper_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_WHISPER_API_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn brand_blue(&self) -> Rgb {
        self.brand_blue.unwrap_or(BRAND_BLUE)
    }

    pub fn brand_blue_soft(&self) -> Rgb {
        self.brand_blue_soft.unwrap_or(BRAND_BLUE_SOFT)
    }

    pub fn brand_orange(&self) -> Rgb {
        self.brand_orange.unwrap_or(BRAND_ORANGE)
    }

    pub fn silver(&self) -> Rgb {
        self.silver.unwrap_or(SILVER)
    }

    pub fn last_language(&self) -> &str {
        self.last_language.as_deref().unwrap_or("en")
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            tts_url: self.tts_api_url(),
            whisper_url: self.whisper_api_url(),
            timeout: self.request_timeout(),
        }
    }

    /// Engine settings with defaults
    pub fn viz(&self) -> VizConfig {
        VizConfig {
            fft_size: self.fft_size.unwrap_or(DEFAULT_FFT_SIZE),
            particle_count: self.particle_count.unwrap_or(DEFAULT_PARTICLE_COUNT),
            fade_duration_ms: self.fade_duration_ms.unwrap_or(DEFAULT_FADE_DURATION_MS),
            brand_blue: self.brand_blue(),
            brand_orange: self.brand_orange(),
        }
    }
}
