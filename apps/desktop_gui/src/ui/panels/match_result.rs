use eframe::egui;
use egui::RichText;
use shared::{domain::SessionId, protocol::MatchResult};

use crate::controller::events::ViewAction;
use crate::ui::theme;

pub fn show(
    ui: &mut egui::Ui,
    session_id: &SessionId,
    analysis: &MatchResult,
    actions: &mut Vec<ViewAction>,
) {
    if theme::step_nav(ui, session_id) {
        actions.push(ViewAction::BackToTwins);
    }

    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(analysis.score_label())
                .size(56.0)
                .strong()
                .color(theme::ACCENT_SOFT),
        );
        ui.label(RichText::new("Compatibility Score").color(theme::TEXT_MUTED));
    });
    ui.add_space(12.0);

    ui.columns(2, |columns| {
        theme::card().show(&mut columns[0], |ui| {
            ui.set_min_width(ui.available_width());
            theme::card_heading(ui, "Strengths", theme::STRENGTHS);
            for strength in &analysis.strengths {
                ui.label(format!("+ {strength}"));
            }
        });
        theme::card().show(&mut columns[1], |ui| {
            ui.set_min_width(ui.available_width());
            theme::card_heading(ui, "Challenges", theme::CHALLENGES);
            for challenge in &analysis.challenges {
                ui.label(format!("- {challenge}"));
            }
        });
    });

    if let Some(tip) = analysis.tip() {
        ui.add_space(8.0);
        theme::card().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            theme::card_heading(ui, "Tip", theme::TIPS);
            ui.label(tip);
        });
    }

    ui.add_space(12.0);
    if ui.add(theme::primary_button("Plan a Date →")).clicked() {
        actions.push(ViewAction::ProceedToPlan);
    }
}
