use eframe::egui;
use egui::RichText;
use shared::{
    domain::SessionId,
    protocol::{Exchange, Plan, Simulation},
};

use crate::controller::{
    events::ViewAction,
    view_state::{SimViewState, MAX_SIM_ROUNDS},
};
use crate::ui::{
    chart::{render_engagement, EguiSurface},
    theme,
};

const BUBBLE_INDENT: f32 = 48.0;

pub fn show(
    ui: &mut egui::Ui,
    session_id: &SessionId,
    plan: &Plan,
    simulation: Option<&Simulation>,
    sim_view: &SimViewState,
    actions: &mut Vec<ViewAction>,
) {
    if theme::step_nav(ui, session_id) {
        actions.push(ViewAction::BackToPlan);
    }
    theme::section_title(ui, "Date Simulation");
    ui.label(RichText::new(plan.display_title()).color(theme::TEXT_MUTED));
    ui.add_space(8.0);

    let Some(simulation) = simulation else {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    sim_view.can_run(),
                    theme::primary_button(sim_view.run_button_label(false)),
                )
                .clicked()
            {
                actions.push(ViewAction::RunSimulation);
            }
            rounds_picker(ui, sim_view, actions);
        });
        if let Some(err) = &sim_view.error {
            theme::inline_error(ui, err.message());
        }
        return;
    };

    if let Some(err) = &sim_view.error {
        theme::inline_error(ui, err.message());
    }

    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(simulation.score_label())
                .size(48.0)
                .strong()
                .color(theme::ACCENT_SOFT),
        );
        ui.label(RichText::new("Overall Date Score").color(theme::TEXT_MUTED));
    });
    ui.add_space(10.0);

    ui.label(
        RichText::new("Engagement Over Time")
            .strong()
            .color(theme::TEXT_MUTED),
    );
    let (response, painter) = EguiSurface::allocate(ui);
    let mut surface = EguiSurface::new(&painter, response.rect);
    render_engagement(&mut surface, &simulation.exchanges);
    ui.add_space(10.0);

    ui.label(RichText::new("Conversation").strong().color(theme::TEXT_MUTED));
    for (index, exchange) in simulation.exchanges.iter().enumerate() {
        chat_bubble(ui, index, exchange);
    }

    if let Some(summary) = simulation.summary() {
        ui.add_space(8.0);
        theme::card().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            theme::card_heading(ui, "Summary", theme::SUMMARY);
            ui.label(summary);
        });
    }

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(
                sim_view.can_run(),
                theme::secondary_button(sim_view.run_button_label(true)),
            )
            .clicked()
        {
            actions.push(ViewAction::RunSimulation);
        }
        rounds_picker(ui, sim_view, actions);
        if ui
            .add(theme::secondary_button("Start Over").fill(theme::ACCENT_STRONG))
            .clicked()
        {
            actions.push(ViewAction::Reset);
        }
    });
}

fn rounds_picker(ui: &mut egui::Ui, sim_view: &SimViewState, actions: &mut Vec<ViewAction>) {
    let mut rounds = sim_view.rounds;
    ui.label(RichText::new("Rounds").color(theme::TEXT_MUTED));
    let changed = ui
        .add_enabled(
            sim_view.can_run(),
            egui::DragValue::new(&mut rounds).range(1..=MAX_SIM_ROUNDS),
        )
        .changed();
    if changed {
        actions.push(ViewAction::SetRounds(rounds));
    }
}

/// Person A's turns sit on the left; so does every even turn.
pub fn is_left_bubble(index: usize, exchange: &Exchange) -> bool {
    exchange.speaker.contains('A') || index % 2 == 0
}

fn chat_bubble(ui: &mut egui::Ui, index: usize, exchange: &Exchange) {
    let left = is_left_bubble(index, exchange);
    let (border, tint) = if left {
        (theme::ACCENT, theme::ACCENT.gamma_multiply(0.1))
    } else {
        (theme::OTHER_SPEAKER, theme::OTHER_SPEAKER.gamma_multiply(0.1))
    };

    ui.horizontal(|ui| {
        if !left {
            ui.add_space(BUBBLE_INDENT);
        }
        let width = ui.available_width() - BUBBLE_INDENT;
        theme::outlined_card(border.gamma_multiply(0.3), tint)
            .stroke(egui::Stroke::new(1.0, border.gamma_multiply(0.3)))
            .show(ui, |ui| {
                ui.set_width(width - 28.0);
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(exchange.speaker.to_uppercase())
                            .small()
                            .strong()
                            .color(theme::TEXT_MUTED),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!(
                                "{} · {}/100",
                                exchange.mood, exchange.engagement_score
                            ))
                            .small()
                            .color(theme::TEXT_FAINT),
                        );
                    });
                });
                ui.label(&exchange.message);
            });
    });
}
