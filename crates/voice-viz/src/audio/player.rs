//! WAV playback through a cpal output stream.
//!
//! The stream callback pulls from a shared [`PlaybackState`]: it resamples the
//! loaded track to the device rate, converts it to the device's sample format,
//! writes it to every output channel and copies the mono signal into the
//! visualizer's tap, if one is attached.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream};
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info, warn};
use voice_viz_core::{AudioSource, SampleTap, VizError};

use super::AudioError;

/// Decoded mono audio
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Track {
    pub fn from_wav_file(path: &Path) -> Result<Self, AudioError> {
        Self::from_reader(hound::WavReader::open(path)?)
    }

    /// Decode an in-memory WAV, such as a synthesis response
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        Self::from_reader(hound::WavReader::new(Cursor::new(bytes))?)
    }

    fn from_reader<R: Read>(reader: hound::WavReader<R>) -> Result<Self, AudioError> {
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    return Err(AudioError::UnsupportedFormat(format!(
                        "{}-bit integer WAV",
                        spec.bits_per_sample
                    )));
                }
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
        };

        // Downmix to mono
        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// State shared between the UI thread and the audio callback
#[derive(Default)]
struct PlaybackState {
    track: Option<Arc<Track>>,
    /// Position in source frames
    cursor: f64,
    playing: bool,
    ended: bool,
    tap: Option<SampleTap>,
    /// Scratch for the mono mix handed to the tap
    mono: Vec<f32>,
}

impl PlaybackState {
    /// Fill one interleaved output buffer. The tap only hears buffers that
    /// started while playing; paused silence is not analysed.
    fn render<T: Sample + FromSample<f32>>(&mut self, data: &mut [T], channels: usize, out_rate: u32) {
        let channels = channels.max(1);
        let frames = data.len() / channels;
        let audible = self.playing;
        self.mono.clear();

        for frame in 0..frames {
            let sample = self.next_sample(out_rate);
            let converted = T::from_sample(sample);
            for out in &mut data[frame * channels..(frame + 1) * channels] {
                *out = converted;
            }
            if audible {
                self.mono.push(sample);
            }
        }

        match &self.tap {
            Some(tap) if audible => tap.push(self.mono.iter().copied()),
            _ => {}
        }
    }

    fn next_sample(&mut self, out_rate: u32) -> f32 {
        if !self.playing {
            return 0.0;
        }
        let Some(track) = self.track.as_ref() else {
            return 0.0;
        };

        let idx = self.cursor as usize;
        if idx >= track.samples.len() {
            self.playing = false;
            self.ended = true;
            return 0.0;
        }

        // Linear resampling to the device rate
        let frac = (self.cursor - idx as f64) as f32;
        let a = track.samples[idx];
        let b = track.samples.get(idx + 1).copied().unwrap_or(a);
        self.cursor += track.sample_rate as f64 / out_rate.max(1) as f64;
        a + (b - a) * frac
    }
}

fn lock(state: &Mutex<PlaybackState>) -> MutexGuard<'_, PlaybackState> {
    // A panic inside the callback leaves the state usable; recover it.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle that lets the visualizer listen to the player's output
#[derive(Clone)]
pub struct OutputTap {
    state: Arc<Mutex<PlaybackState>>,
}

impl AudioSource for OutputTap {
    fn connect_tap(&self, tap: SampleTap) -> voice_viz_core::Result<()> {
        let mut state = lock(&self.state);
        if state.tap.is_some() {
            return Err(VizError::BindingFailure(
                "player output is already tapped".into(),
            ));
        }
        state.tap = Some(tap);
        Ok(())
    }
}

pub struct Player {
    state: Arc<Mutex<PlaybackState>>,
    device_name: String,
    sample_rate: u32,
    _stream: Stream,
}

impl Player {
    /// Open `device_name`, or the default output device
    pub fn new(device_name: Option<&str>) -> Result<Self, AudioError> {
        let device = select_device(device_name)?;
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let config = supported.config();
        let sample_rate = config.sample_rate.0;

        info!(
            device = %name,
            sample_rate,
            channels = config.channels,
            format = ?sample_format,
            "Audio output selected"
        );

        let state = Arc::new(Mutex::new(PlaybackState::default()));
        let callback_state = Arc::clone(&state);

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, callback_state)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, callback_state)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, callback_state)?,
            other => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{:?} output on {}",
                    other, name
                )))
            }
        };
        stream.play()?;

        Ok(Self {
            state,
            device_name: name,
            sample_rate,
            _stream: stream,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn output_tap(&self) -> OutputTap {
        OutputTap {
            state: Arc::clone(&self.state),
        }
    }

    /// Replace the current track, stopped at the start
    pub fn load(&self, track: Track) {
        info!(
            duration = track.duration_secs(),
            sample_rate = track.sample_rate,
            "Track loaded"
        );
        let mut state = lock(&self.state);
        state.track = Some(Arc::new(track));
        state.cursor = 0.0;
        state.playing = false;
        state.ended = false;
    }

    pub fn has_track(&self) -> bool {
        lock(&self.state).track.is_some()
    }

    /// Start or continue playback; a finished track starts over
    pub fn play(&self) {
        let mut state = lock(&self.state);
        if state.track.is_none() {
            warn!("Play requested with no track loaded");
            return;
        }
        if state.ended {
            state.cursor = 0.0;
            state.ended = false;
        }
        state.playing = true;
    }

    pub fn pause(&self) {
        lock(&self.state).playing = false;
    }

    pub fn toggle(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Rewind and play
    pub fn restart(&self) {
        {
            let mut state = lock(&self.state);
            state.cursor = 0.0;
            state.ended = false;
        }
        self.play();
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.state).playing
    }

    pub fn has_ended(&self) -> bool {
        lock(&self.state).ended
    }

    /// (position, duration) in seconds
    pub fn progress(&self) -> (f32, f32) {
        let state = lock(&self.state);
        match &state.track {
            Some(track) if track.sample_rate > 0 => (
                (state.cursor / track.sample_rate as f64) as f32,
                track.duration_secs(),
            ),
            _ => (0.0, 0.0),
        }
    }
}

/// Output stream writing samples of type `T`
fn build_stream<T>(
    device: &Device,
    config: &cpal::StreamConfig,
    state: Arc<Mutex<PlaybackState>>,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0;
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            lock(&state).render(data, channels, sample_rate);
        },
        |err| error!("Audio stream error: {}", err),
        None,
    )?;
    Ok(stream)
}

fn select_device(name: Option<&str>) -> Result<Device, AudioError> {
    let host = cpal::default_host();
    match name {
        Some(wanted) => host
            .output_devices()
            .map_err(|_| AudioError::DeviceNotFound(wanted.to_string()))?
            .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
            .ok_or_else(|| AudioError::DeviceNotFound(wanted.to_string())),
        None => host.default_output_device().ok_or(AudioError::NoDevice),
    }
}

/// Names of all output devices, with the default flagged
pub fn list_output_devices() -> Vec<(String, bool)> {
    let host = cpal::default_host();
    let default_name = host.default_output_device().and_then(|d| d.name().ok());

    host.output_devices()
        .map(|devices| {
            devices
                .filter_map(|d| d.name().ok())
                .map(|name| {
                    let is_default = default_name.as_deref() == Some(name.as_str());
                    (name, is_default)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(samples: Vec<f32>, sample_rate: u32) -> PlaybackState {
        PlaybackState {
            track: Some(Arc::new(Track {
                samples,
                sample_rate,
            })),
            playing: true,
            ..Default::default()
        }
    }

    fn wav_bytes(spec: hound::WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_render_writes_all_channels() {
        let mut state = state_with(vec![0.5, 0.25], 48000);
        let mut data = [0.0f32; 4];
        state.render(&mut data, 2, 48000);
        assert_eq!(data, [0.5, 0.5, 0.25, 0.25]);
    }

    #[test]
    fn test_render_ends_track() {
        let mut state = state_with(vec![0.1; 3], 48000);
        let mut data = [1.0f32; 5];
        state.render(&mut data, 1, 48000);
        assert_eq!(&data[3..], &[0.0, 0.0]);
        assert!(state.ended);
        assert!(!state.playing);
    }

    #[test]
    fn test_paused_renders_silence() {
        let mut state = state_with(vec![0.9; 16], 48000);
        state.playing = false;
        let mut data = [1.0f32; 8];
        state.render(&mut data, 2, 48000);
        assert!(data.iter().all(|&s| s == 0.0));
        assert_eq!(state.cursor, 0.0);
    }

    #[test]
    fn test_resamples_to_device_rate() {
        // 24 kHz source on a 48 kHz device: every source frame lasts two output frames
        let mut state = state_with(vec![0.0, 1.0, 1.0], 24000);
        let mut data = [0.0f32; 3];
        state.render(&mut data, 1, 48000);
        assert_eq!(data, [0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_tap_receives_mono_mix() {
        let mut state = state_with(vec![0.2, 0.4], 48000);
        let tap = SampleTap::new(2);
        state.tap = Some(tap.clone());

        let mut data = [0.0f32; 4];
        state.render(&mut data, 2, 48000);

        let mut out = Vec::new();
        assert!(tap.copy_recent(&mut out));
        assert_eq!(out, vec![0.2, 0.4]);
    }

    #[test]
    fn test_render_converts_to_integer_formats() {
        let mut state = state_with(vec![1.0, 0.0, 0.0], 48000);
        let mut signed = [7i16; 2];
        state.render(&mut signed, 1, 48000);
        assert_eq!(signed, [i16::MAX, 0]);

        let mut unsigned = [0u16; 1];
        state.render(&mut unsigned, 1, 48000);
        assert_eq!(unsigned, [32768]);
    }

    #[test]
    fn test_paused_u16_output_sits_at_midpoint() {
        let mut state = state_with(vec![0.9; 4], 48000);
        state.playing = false;
        let mut data = [0u16; 4];
        state.render(&mut data, 2, 48000);
        assert!(data.iter().all(|&s| s == 32768));
    }

    #[test]
    fn test_paused_output_skips_tap() {
        let mut state = state_with(vec![0.2; 8], 48000);
        let tap = SampleTap::new(2);
        state.tap = Some(tap.clone());
        state.playing = false;

        let mut data = [0.0f32; 4];
        state.render(&mut data, 1, 48000);

        let mut out = Vec::new();
        assert!(!tap.copy_recent(&mut out));
    }

    #[test]
    fn test_output_tap_accepts_one_binding() {
        let tap = OutputTap {
            state: Arc::new(Mutex::new(PlaybackState::default())),
        };
        assert!(tap.connect_tap(SampleTap::new(8)).is_ok());
        assert!(matches!(
            tap.connect_tap(SampleTap::new(8)),
            Err(VizError::BindingFailure(_))
        ));
    }

    #[test]
    fn test_decode_stereo_int_wav() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, &[16384, 0, -16384, -16384]);
        let track = Track::from_wav_bytes(&bytes).unwrap();

        assert_eq!(track.sample_rate, 22050);
        assert_eq!(track.samples, vec![0.25, -0.5]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = Track::from_wav_bytes(b"not a wav file");
        assert!(matches!(result, Err(AudioError::Decode(_))));
    }
}
