//! Status line at the bottom of the window.

use nannou::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Nothing loaded yet
    Empty,
    Transcribing,
    Generating,
    Error(String),
    Track {
        playing: bool,
        ended: bool,
        position: f32,
        duration: f32,
    },
}

fn clock(secs: f32) -> String {
    let secs = secs.max(0.0) as u32;
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::Empty => "No audio loaded".to_string(),
            Status::Transcribing => "Transcribing reference…".to_string(),
            Status::Generating => "Generating…".to_string(),
            Status::Error(msg) => msg.clone(),
            Status::Track {
                playing,
                ended,
                position,
                duration,
            } => {
                let state = if *ended {
                    "Ended"
                } else if *playing {
                    "Playing"
                } else {
                    "Paused"
                };
                format!("{}  {} / {}", state, clock(*position), clock(*duration))
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }

    pub fn draw(&self, draw: &Draw, bounds: Rect) {
        let color = if self.is_error() {
            rgba(1.0, 0.45, 0.4, 0.95)
        } else {
            rgba(0.84, 0.87, 0.91, 0.8)
        };
        draw.text(&self.text())
            .xy(pt2(0.0, bounds.bottom() + 30.0))
            .wh(pt2(bounds.w() - 40.0, 24.0))
            .center_justify()
            .color(color)
            .font_size(16);
    }
}
