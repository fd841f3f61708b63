use eframe::egui;
use egui::RichText;
use shared::{
    domain::{SessionId, DATE_GOALS},
    protocol::Plan,
};

use crate::controller::{events::ViewAction, view_state::PlannerState};
use crate::ui::theme;

/// `committed` is the plan already carried into the simulation step, shown
/// when no fresh preview exists.
pub fn show(
    ui: &mut egui::Ui,
    session_id: &SessionId,
    committed: Option<&Plan>,
    planner: &PlannerState,
    actions: &mut Vec<ViewAction>,
) {
    if theme::step_nav(ui, session_id) {
        actions.push(ViewAction::BackToMatch);
    }
    theme::section_title(ui, "Plan the Date");
    ui.add_space(6.0);

    ui.horizontal_wrapped(|ui| {
        for goal in DATE_GOALS {
            let selected = planner.selected_preset() == Some(goal);
            let button = if selected {
                theme::secondary_button(goal).fill(theme::ACCENT_STRONG)
            } else {
                theme::secondary_button(goal)
            };
            if ui.add(button).clicked() {
                actions.push(ViewAction::SelectGoal(goal));
            }
        }
    });

    let mut custom = planner.custom_text().to_string();
    let edited = ui
        .add(
            egui::TextEdit::singleline(&mut custom)
                .hint_text("Or type a custom goal...")
                .desired_width(f32::INFINITY),
        )
        .changed();
    if edited {
        actions.push(ViewAction::EditCustomGoal(custom));
    }

    ui.add_space(8.0);
    if ui
        .add_enabled(
            planner.can_generate(),
            theme::primary_button(planner.generate_button_label()),
        )
        .clicked()
    {
        actions.push(ViewAction::GeneratePlan);
    }

    if let Some(err) = &planner.error {
        theme::inline_error(ui, err.message());
    }

    if let Some(plan) = planner.preview.as_ref().or(committed) {
        ui.add_space(12.0);
        plan_preview(ui, plan);
        ui.add_space(8.0);
        if ui.add(theme::primary_button("Simulate This Date →")).clicked() {
            actions.push(ViewAction::ProceedToSim);
        }
    }
}

fn plan_preview(ui: &mut egui::Ui, plan: &Plan) {
    ui.label(
        RichText::new(plan.display_title())
            .size(18.0)
            .strong()
            .color(theme::ACCENT_SOFT),
    );

    for (index, step) in plan.steps.iter().enumerate() {
        theme::card().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(step.display_order(index).to_string())
                        .strong()
                        .background_color(theme::ACCENT_STRONG),
                );
                ui.vertical(|ui| {
                    ui.label(RichText::new(&step.activity).strong());
                    let duration = step.duration_label().unwrap_or_default();
                    ui.label(
                        RichText::new(format!("{duration} · {}", step.vibe))
                            .small()
                            .color(theme::TEXT_MUTED),
                    );
                });
            });
        });
    }

    if !plan.tips.is_empty() {
        theme::card().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            theme::card_heading(ui, "Tips", theme::TIPS);
            for tip in &plan.tips {
                ui.label(tip);
            }
        });
    }
}
