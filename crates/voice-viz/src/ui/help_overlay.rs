//! Help panel: session details and keyboard shortcuts.

use nannou::prelude::*;

use super::bindings::SHORTCUTS;

const PADDING: f32 = 24.0;
const LINE_HEIGHT: f32 = 24.0;
const FONT_SIZE: u32 = 17;
const LABEL_WIDTH: f32 = 110.0;

/// Rows shown in the panel, top to bottom
#[derive(Debug, Clone, PartialEq)]
enum Row {
    Heading(&'static str),
    Pair(String, String),
    Gap,
}

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    fn rows(session: &[(&str, String)]) -> Vec<Row> {
        let mut rows = Vec::with_capacity(session.len() + SHORTCUTS.len() + 3);
        if !session.is_empty() {
            rows.push(Row::Heading("Session"));
            rows.extend(session.iter().map(|(k, v)| Row::Pair(k.to_string(), v.clone())));
            rows.push(Row::Gap);
        }
        rows.push(Row::Heading("Keys"));
        rows.extend(SHORTCUTS.iter().map(|(k, d)| Row::Pair(k.to_string(), d.to_string())));
        rows
    }

    /// Draw centred in `bounds`. `session` is (label, value) pairs such as the
    /// output device or the current language.
    pub fn draw(&self, draw: &Draw, bounds: Rect, session: &[(&str, String)]) {
        if !self.visible {
            return;
        }

        let rows = Self::rows(session);
        let width = (bounds.w() - 60.0).clamp(280.0, 460.0);
        let height = LINE_HEIGHT * rows.len() as f32 + PADDING * 2.0;
        let center = bounds.xy();

        draw.rect()
            .xy(center)
            .w_h(width, height)
            .color(rgba(0.02, 0.05, 0.11, 0.88))
            .stroke(rgba(0.84, 0.87, 0.91, 0.35))
            .stroke_weight(1.0);

        let inner = width - PADDING * 2.0;
        let value_width = inner - LABEL_WIDTH - 12.0;
        let left = center.x - width / 2.0 + PADDING;
        let top = center.y + height / 2.0 - PADDING - LINE_HEIGHT / 2.0;

        for (i, row) in rows.iter().enumerate() {
            let y = top - i as f32 * LINE_HEIGHT;
            match row {
                Row::Heading(title) => {
                    draw.text(title)
                        .xy(pt2(center.x, y))
                        .wh(pt2(inner, LINE_HEIGHT))
                        .center_justify()
                        .color(rgba(0.45, 0.68, 0.9, 0.9))
                        .font_size(FONT_SIZE);
                }
                Row::Pair(label, value) => {
                    draw.text(label)
                        .xy(pt2(left + LABEL_WIDTH / 2.0, y))
                        .wh(pt2(LABEL_WIDTH, LINE_HEIGHT))
                        .right_justify()
                        .color(rgb8(245, 146, 34))
                        .font_size(FONT_SIZE);
                    draw.text(value)
                        .xy(pt2(left + LABEL_WIDTH + 12.0 + value_width / 2.0, y))
                        .wh(pt2(value_width, LINE_HEIGHT))
                        .left_justify()
                        .color(WHITE)
                        .font_size(FONT_SIZE);
                }
                Row::Gap => {}
            }
        }
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
