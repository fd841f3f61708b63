//! Engagement-over-time line chart for a simulated date.
//!
//! Drawing goes through [`Surface`] in a fixed 600×220 coordinate space with
//! the origin at the top left. Every call redraws from scratch.

use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};
use shared::protocol::Exchange;

pub const CHART_WIDTH: f32 = 600.0;
pub const CHART_HEIGHT: f32 = 220.0;

const BACKGROUND: Color32 = Color32::from_rgb(0x1f, 0x29, 0x37);
const GRID: Color32 = Color32::from_rgb(0x37, 0x41, 0x51);
const LABEL: Color32 = Color32::from_rgb(0x9c, 0xa3, 0xaf);
const LINE: Color32 = Color32::from_rgb(0xf4, 0x3f, 0x5e);
const MARKER: Color32 = Color32::from_rgb(0xfb, 0x71, 0x85);

const GRID_LEFT: f32 = 40.0;
const GRID_RIGHT_INSET: f32 = 10.0;
const Y_LABEL_X: f32 = 35.0;
const Y_LABEL_BASELINE_OFFSET: f32 = 4.0;
const PLOT_LEFT: f32 = 45.0;
const PLOT_HORIZONTAL_MARGIN: f32 = 60.0;
const X_LABEL_BASELINE_INSET: f32 = 2.0;
const LINE_WIDTH: f32 = 3.0;
const MARKER_RADIUS: f32 = 5.0;
const Y_LABEL_FONT: f32 = 11.0;
const X_LABEL_FONT: f32 = 10.0;

/// Horizontal anchoring of a text baseline point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Right,
    Center,
}

pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color32);
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn polyline(&mut self, points: &[Pos2], stroke: Stroke);
    fn filled_circle(&mut self, center: Pos2, radius: f32, color: Color32);
    /// `baseline` is the text's baseline point, like a canvas `fillText`.
    fn text(&mut self, baseline: Pos2, anchor: TextAnchor, text: &str, size: f32, color: Color32);
}

/// Chart-space position of each turn.
pub fn plot_points(exchanges: &[Exchange], size: Vec2) -> Vec<Pos2> {
    let step = (size.x - PLOT_HORIZONTAL_MARGIN) / exchanges.len().saturating_sub(1).max(1) as f32;
    exchanges
        .iter()
        .enumerate()
        .map(|(index, exchange)| {
            let x = PLOT_LEFT + index as f32 * step;
            let y = size.y - (exchange.engagement_score as f32 / 100.0) * size.y;
            Pos2::new(x, y)
        })
        .collect()
}

pub fn render_engagement(surface: &mut impl Surface, exchanges: &[Exchange]) {
    surface.clear();
    if exchanges.is_empty() {
        return;
    }

    let size = surface.size();
    surface.fill_rect(Rect::from_min_size(Pos2::ZERO, size), BACKGROUND);

    let grid_stroke = Stroke::new(1.0, GRID);
    for i in 0..=10u8 {
        let y = size.y / 10.0 * f32::from(i);
        surface.line(
            Pos2::new(GRID_LEFT, y),
            Pos2::new(size.x - GRID_RIGHT_INSET, y),
            grid_stroke,
        );
    }
    for i in 0..=10u8 {
        let y = size.y / 10.0 * f32::from(i) + Y_LABEL_BASELINE_OFFSET;
        surface.text(
            Pos2::new(Y_LABEL_X, y),
            TextAnchor::Right,
            &(100 - u32::from(i) * 10).to_string(),
            Y_LABEL_FONT,
            LABEL,
        );
    }

    let points = plot_points(exchanges, size);
    surface.polyline(&points, Stroke::new(LINE_WIDTH, LINE));
    for point in &points {
        surface.filled_circle(*point, MARKER_RADIUS, MARKER);
    }

    for (index, (exchange, point)) in exchanges.iter().zip(&points).enumerate() {
        surface.text(
            Pos2::new(point.x, size.y - X_LABEL_BASELINE_INSET),
            TextAnchor::Center,
            &exchange.round_label(index),
            X_LABEL_FONT,
            LABEL,
        );
    }
}

/// Paints chart space scaled into a screen rect, keeping the aspect ratio.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: Pos2,
    scale: f32,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, rect: Rect) -> Self {
        Self {
            painter,
            origin: rect.min,
            scale: rect.width() / CHART_WIDTH,
        }
    }

    /// Allocates a full-width chart area in `ui`.
    pub fn allocate(ui: &mut egui::Ui) -> (egui::Response, egui::Painter) {
        let width = ui.available_width();
        let height = width * CHART_HEIGHT / CHART_WIDTH;
        ui.allocate_painter(Vec2::new(width, height), egui::Sense::hover())
    }

    fn map(&self, point: Pos2) -> Pos2 {
        self.origin + point.to_vec2() * self.scale
    }
}

impl Surface for EguiSurface<'_> {
    fn size(&self) -> Vec2 {
        Vec2::new(CHART_WIDTH, CHART_HEIGHT)
    }

    // egui repaints the whole frame; nothing from a previous call survives.
    fn clear(&mut self) {}

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let screen = Rect::from_min_max(self.map(rect.min), self.map(rect.max));
        self.painter
            .rect_filled(screen, egui::CornerRadius::same(12), color);
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([self.map(from), self.map(to)], stroke);
    }

    fn polyline(&mut self, points: &[Pos2], stroke: Stroke) {
        let mapped: Vec<Pos2> = points.iter().map(|point| self.map(*point)).collect();
        let stroke = Stroke::new(stroke.width * self.scale, stroke.color);
        self.painter.add(Shape::line(mapped, stroke));
    }

    fn filled_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter
            .circle_filled(self.map(center), radius * self.scale, color);
    }

    fn text(&mut self, baseline: Pos2, anchor: TextAnchor, text: &str, size: f32, color: Color32) {
        let align = match anchor {
            TextAnchor::Right => Align2::RIGHT_BOTTOM,
            TextAnchor::Center => Align2::CENTER_BOTTOM,
        };
        self.painter.text(
            self.map(baseline),
            align,
            text,
            FontId::proportional(size * self.scale),
            color,
        );
    }
}

#[cfg(test)]
#[path = "tests/chart_tests.rs"]
mod tests;
