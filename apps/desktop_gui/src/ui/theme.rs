//! Dark rose palette and the shared frames built from it.

use eframe::egui;
use egui::{Color32, CornerRadius, Margin, RichText, Stroke};
use shared::domain::SessionId;

pub const APP_BG: Color32 = Color32::from_rgb(0x03, 0x07, 0x12);
pub const PANEL_BG: Color32 = Color32::from_rgb(0x11, 0x18, 0x27);
pub const CARD_BG: Color32 = Color32::from_rgb(0x1f, 0x29, 0x37);
pub const CARD_BORDER: Color32 = Color32::from_rgb(0x37, 0x41, 0x51);
pub const ACCENT: Color32 = Color32::from_rgb(0xf4, 0x3f, 0x5e);
pub const ACCENT_STRONG: Color32 = Color32::from_rgb(0xe1, 0x1d, 0x48);
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(0xfb, 0x71, 0x85);
pub const SECOND_PICK: Color32 = Color32::from_rgb(0xf4, 0x72, 0xb6);
pub const OTHER_SPEAKER: Color32 = Color32::from_rgb(0x60, 0xa5, 0xfa);
pub const TEXT: Color32 = Color32::from_rgb(0xf3, 0xf4, 0xf6);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0x9c, 0xa3, 0xaf);
pub const TEXT_FAINT: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);
pub const STRENGTHS: Color32 = Color32::from_rgb(0x4a, 0xde, 0x80);
pub const CHALLENGES: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);
pub const TIPS: Color32 = Color32::from_rgb(0x60, 0xa5, 0xfa);
pub const SUMMARY: Color32 = Color32::from_rgb(0xc0, 0x84, 0xfc);
pub const ERROR: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);

pub fn apply(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = PANEL_BG;
    visuals.window_fill = PANEL_BG;
    visuals.extreme_bg_color = CARD_BG;
    visuals.override_text_color = Some(TEXT);
    visuals.selection.bg_fill = ACCENT_STRONG;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_SOFT);
    visuals.hyperlink_color = ACCENT_SOFT;
    style.visuals = visuals;

    style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, CARD_BORDER);
    style.visuals.widgets.hovered.bg_stroke =
        Stroke::new(1.0, style.visuals.widgets.hovered.bg_stroke.color);
    style.visuals.widgets.active.bg_stroke =
        Stroke::new(1.2, style.visuals.selection.bg_fill.gamma_multiply(0.9));
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    style.spacing.interact_size = egui::vec2(40.0, 30.0);
    ctx.set_style(style);
}

pub fn card() -> egui::Frame {
    egui::Frame::NONE
        .fill(CARD_BG.gamma_multiply(0.6))
        .corner_radius(CornerRadius::same(12))
        .inner_margin(Margin::same(14))
}

pub fn outlined_card(border: Color32, tint: Color32) -> egui::Frame {
    card()
        .fill(tint)
        .stroke(Stroke::new(2.0, border))
}

pub fn primary_button(label: &str) -> egui::Button<'static> {
    egui::Button::new(RichText::new(label.to_string()).strong().color(Color32::WHITE))
        .fill(ACCENT_STRONG)
        .corner_radius(CornerRadius::same(12))
        .min_size(egui::vec2(180.0, 40.0))
}

pub fn secondary_button(label: &str) -> egui::Button<'static> {
    egui::Button::new(RichText::new(label.to_string()).color(TEXT))
        .fill(CARD_BG)
        .corner_radius(CornerRadius::same(8))
}

pub fn section_title(ui: &mut egui::Ui, title: &str) {
    ui.label(RichText::new(title).size(20.0).strong());
}

pub fn card_heading(ui: &mut egui::Ui, title: &str, color: Color32) {
    ui.label(RichText::new(title).strong().color(color));
}

pub fn inline_error(ui: &mut egui::Ui, message: &str) {
    ui.label(RichText::new(message).color(ERROR).small());
}

/// Back link on the left, the active session id faintly on the right.
pub fn step_nav(ui: &mut egui::Ui, session_id: &SessionId) -> bool {
    ui.horizontal(|ui| {
        let back = back_link(ui);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!("Session {session_id}"))
                    .small()
                    .color(TEXT_FAINT),
            );
        });
        back
    })
    .inner
}

pub fn back_link(ui: &mut egui::Ui) -> bool {
    ui.add(egui::Button::new(RichText::new("← Back").color(TEXT_MUTED)).frame(false))
        .clicked()
}
