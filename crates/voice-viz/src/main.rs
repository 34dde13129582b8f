mod api;
mod audio;
mod cli;
mod demos;
mod renderer;
mod ui;
mod utils;

use anyhow::Context;
use api::transcribe::TranscribeClient;
use api::worker::{self, JobUpdate};
use audio::{OutputTap, Player, Track};
use clap::Parser;
use cli::{Args, Command};
use nannou::prelude::*;
use renderer::{OrbPalette, OrbView, ParticleLayer};
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use ui::bindings::{parse_key, Action};
use ui::help_overlay::HelpOverlay;
use ui::status::Status;
use utils::Config;
use voice_viz_core::Visualizer;

/// Logical size of the particle canvas
const CANVAS_SIZE: f32 = 576.0;
/// Orb radius in canvas units, inside the particle ring
const ORB_RADIUS: f32 = 110.0;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Demos => demos::print_table(),
        Command::Devices => utils::log_audio_info(),
        Command::Transcribe { file, lang } => transcribe(&file, lang.as_deref())?,
        Command::Play { .. } | Command::Clone(_) => nannou::app(model).update(update).run(),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn transcribe(file: &Path, lang: Option<&str>) -> anyhow::Result<()> {
    let config = Config::load();
    let audio = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let client = TranscribeClient::new(config.whisper_api_url(), config.request_timeout());
    let transcript = client.transcribe(&audio, lang)?;

    info!(
        language = transcript.language.as_deref().unwrap_or("unknown"),
        duration_secs = transcript.duration_secs,
        "Transcribed"
    );
    println!("{}", transcript.text);
    Ok(())
}

/// Player and the visualizer listening to it
struct Playback {
    player: Player,
    viz: Visualizer<OutputTap>,
    was_playing: bool,
}

struct Model {
    playback: Option<Playback>,
    particles: ParticleLayer,
    orb_view: OrbView,
    help_overlay: HelpOverlay,
    status: Status,
    job: Option<Receiver<JobUpdate>>,
    /// Language of the cloned speech, if any
    language: Option<String>,
    config: Config,
    clock: Instant,
}

fn model(app: &App) -> Model {
    let args = Args::parse();
    app.set_exit_on_escape(false);

    if let Err(e) = app
        .new_window()
        .title("voice-viz")
        .size(720, 720)
        .min_size(400, 400)
        .view(view)
        .key_pressed(key_pressed)
        .build()
    {
        error!("Failed to open window: {}", e);
        app.quit();
    }

    let config = Config::load();
    let viz_config = config.viz();

    let playback = match Player::new(config.output_device.as_deref()) {
        Ok(player) => {
            let viz = Visualizer::new(player.output_tap(), viz_config);
            Some(Playback {
                player,
                viz,
                was_playing: false,
            })
        }
        Err(e) => {
            error!("Audio output unavailable: {}", e);
            None
        }
    };

    let orb_view = OrbView::new(OrbPalette {
        blue: config.brand_blue(),
        blue_soft: config.brand_blue_soft(),
        orange: config.brand_orange(),
        silver: config.silver(),
    });

    let mut model = Model {
        playback,
        particles: ParticleLayer::new(CANVAS_SIZE, CANVAS_SIZE),
        orb_view,
        help_overlay: HelpOverlay::new(),
        status: Status::Empty,
        job: None,
        language: None,
        config,
        clock: Instant::now(),
    };

    match args.command {
        Command::Play { file } => match Track::from_wav_file(&file) {
            Ok(track) => start_track(&mut model, track),
            Err(e) => model.status = Status::Error(format!("{}: {}", file.display(), e)),
        },
        Command::Clone(clone_args) => {
            let request = clone_args
                .to_request(model.config.last_language())
                .and_then(|req| req.validate().map(|()| req));
            match request {
                Ok(req) => {
                    model.config.set_last_language(&req.language);
                    model.language = Some(req.language.clone());
                    model.job = Some(worker::spawn(req, model.config.endpoints()));
                    model.status = Status::Generating;
                }
                Err(msg) => {
                    warn!("{}", msg);
                    model.status = Status::Error(msg);
                }
            }
        }
        _ => {}
    }

    model
}

/// Load `track` and play it right away
fn start_track(model: &mut Model, track: Track) {
    match &model.playback {
        Some(playback) => {
            playback.player.load(track);
            playback.player.play();
        }
        None => model.status = Status::Error("No audio output device".to_string()),
    }
}

fn poll_job(model: &mut Model) {
    let Some(rx) = model.job.take() else {
        return;
    };

    loop {
        let update = match rx.try_recv() {
            Ok(update) => update,
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => return,
        };
        let done = update.is_final();
        match update {
            JobUpdate::Transcribing => model.status = Status::Transcribing,
            JobUpdate::Transcribed(text) => info!(transcript = %text, "Reference transcribed"),
            JobUpdate::Generating => model.status = Status::Generating,
            JobUpdate::Generated(wav) => match Track::from_wav_bytes(&wav) {
                Ok(track) => {
                    model.status = Status::Empty;
                    start_track(model, track);
                }
                Err(e) => {
                    error!("Generated audio is unplayable: {}", e);
                    model.status = Status::Error(e.to_string());
                }
            },
            JobUpdate::Failed(msg) => model.status = Status::Error(msg),
        }
        if done {
            return;
        }
    }
    model.job = Some(rx);
}

fn update(_app: &App, model: &mut Model, _update: Update) {
    poll_job(model);

    let now_ms = model.clock.elapsed().as_secs_f64() * 1000.0;
    let Some(playback) = model.playback.as_mut() else {
        return;
    };

    // Follow play/pause/ended
    let playing = playback.player.is_playing();
    if playing != playback.was_playing {
        playback.viz.set_playing(playing, now_ms);
        playback.was_playing = playing;
    }
    playback.viz.tick(now_ms, &mut model.particles);

    let busy = model.job.is_some() || model.status.is_error();
    if !busy && playback.player.has_track() {
        let (position, duration) = playback.player.progress();
        model.status = Status::Track {
            playing,
            ended: playback.player.has_ended(),
            position,
            duration,
        };
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let bounds = app.window_rect();
    draw.background().color(rgb8(8, 14, 28));

    let side = bounds.w().min(bounds.h()) * 0.9;
    let scale = side / CANVAS_SIZE;
    let center = bounds.xy();
    let time_secs = model.clock.elapsed().as_secs_f32();

    let orb = model
        .playback
        .as_ref()
        .map(|p| p.viz.orb())
        .unwrap_or_default();
    model
        .orb_view
        .draw(&draw, center, ORB_RADIUS * scale, &orb, time_secs);
    model.particles.draw(&draw, center, side);

    model.status.draw(&draw, bounds);
    if model.help_overlay.visible {
        model.help_overlay.draw(&draw, bounds, &session_info(model));
    }

    if let Err(e) = draw.to_frame(app, &frame) {
        error!("Failed to render frame: {:?}", e);
    }
}

fn session_info(model: &Model) -> Vec<(&'static str, String)> {
    let mut info = Vec::new();
    match &model.playback {
        Some(playback) => {
            let player = &playback.player;
            info.push(("Output", format!("{} @ {} Hz", player.device_name(), player.sample_rate())));
            if player.has_track() {
                let (_, duration) = player.progress();
                info.push(("Length", format!("{:.1} s", duration)));
            }
        }
        None => info.push(("Output", "none".to_string())),
    }
    if let Some(id) = &model.language {
        let name = demos::language(id).map_or(id.as_str(), |lang| lang.name);
        info.push(("Language", name.to_string()));
    }
    info
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match parse_key(key) {
        Some(Action::Quit) => app.quit(),
        Some(Action::ShowHelp) => model.help_overlay.toggle(),
        Some(Action::TogglePlay) => {
            if let Some(playback) = &model.playback {
                if model.status.is_error() && playback.player.has_track() {
                    model.status = Status::Empty;
                }
                playback.player.toggle();
            }
        }
        Some(Action::Restart) => {
            if let Some(playback) = &model.playback {
                playback.player.restart();
            }
        }
        None => {}
    }
}
