use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::RichText;
use serde::{Deserialize, Serialize};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiErrorCategory, UiEvent, ViewAction},
    orchestration::dispatch_backend_command,
    reducer::AppState,
    wizard::{Step, StepView},
};
use crate::ui::{panels, theme};

pub const SETTINGS_STORAGE_KEY: &str = "social_twin_trainer.settings";
pub const APP_TITLE: &str = "Social Twin Trainer";

/// Settings that survive restarts through eframe storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    pub sim_rounds: u32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            sim_rounds: shared::protocol::DEFAULT_SIM_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepBadge {
    Done,
    Current,
    Upcoming,
}

/// How the header marks `step` while `current` is shown.
pub fn step_badge(step: Step, current: Step) -> StepBadge {
    if step == current {
        StepBadge::Current
    } else if step.index() < current.index() {
        StepBadge::Done
    } else {
        StepBadge::Upcoming
    }
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Validation => "Request",
        UiErrorCategory::Unknown => "Error",
    }
}

pub struct TwinTrainerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: AppState,
    api_url: String,
    theme_applied: bool,
}

impl TwinTrainerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        api_url: String,
        persisted_settings: Option<PersistedSettings>,
    ) -> Self {
        let settings = persisted_settings.unwrap_or_default();
        let mut state = AppState::new();
        state.apply_action(ViewAction::SetRounds(settings.sim_rounds), &cmd_tx);
        state.apply_action(ViewAction::RefreshTwins, &cmd_tx);
        dispatch_backend_command(&cmd_tx, BackendCommand::CheckHealth, &mut state.status);

        Self {
            cmd_tx,
            ui_rx,
            state,
            api_url,
            theme_applied: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.state.apply_event(event, &self.cmd_tx);
        }
    }

    fn apply_actions(&mut self, actions: Vec<ViewAction>) {
        for action in actions {
            self.state.apply_action(action, &self.cmd_tx);
        }
    }

    fn show_header(&mut self, ctx: &egui::Context, actions: &mut Vec<ViewAction>) {
        let current = self.state.wizard.current_step();
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::NONE
                    .fill(theme::APP_BG)
                    .inner_margin(egui::Margin::symmetric(16, 12)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let title = ui.add(
                        egui::Label::new(
                            RichText::new(APP_TITLE)
                                .size(22.0)
                                .strong()
                                .color(theme::ACCENT_SOFT),
                        )
                        .sense(egui::Sense::click()),
                    );
                    if title.on_hover_text("Start over").clicked() {
                        actions.push(ViewAction::Reset);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        for step in Step::ALL.iter().rev() {
                            let (fill, text) = match step_badge(*step, current) {
                                StepBadge::Current => (theme::ACCENT, egui::Color32::WHITE),
                                StepBadge::Done => (theme::CARD_BORDER, theme::TEXT),
                                StepBadge::Upcoming => (theme::CARD_BG, theme::TEXT_FAINT),
                            };
                            egui::Frame::NONE
                                .fill(fill)
                                .corner_radius(egui::CornerRadius::same(10))
                                .inner_margin(egui::Margin::symmetric(10, 3))
                                .show(ui, |ui| {
                                    ui.label(RichText::new(step.label()).small().color(text));
                                });
                        }
                    });
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status")
            .frame(
                egui::Frame::NONE
                    .fill(theme::APP_BG)
                    .inner_margin(egui::Margin::symmetric(16, 4)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(&self.state.status)
                            .small()
                            .color(theme::TEXT_MUTED),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(&self.api_url).small().color(theme::TEXT_FAINT));
                    });
                });
            });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.state.banner.clone() {
            let (fill, stroke) = (
                egui::Color32::from_rgb(111, 53, 53),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
            );

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            RichText::new(format!(
                                "{}: {}",
                                err_label(banner.category()),
                                banner.message()
                            ))
                            .color(egui::Color32::WHITE),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.state.banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_step(&mut self, ui: &mut egui::Ui, actions: &mut Vec<ViewAction>) {
        let state = &mut self.state;
        match state.wizard.view() {
            StepView::Twins { selection } => {
                panels::twin_picker::show(ui, &state.twins, selection, &mut state.picker, actions)
            }
            StepView::Match {
                analysis,
                session_id,
            } => panels::match_result::show(ui, session_id, analysis, actions),
            StepView::Plan { session_id, plan } => {
                panels::planner::show(ui, session_id, plan, &state.planner, actions)
            }
            StepView::Sim {
                session_id,
                plan,
                simulation,
            } => panels::simulation::show(
                ui,
                session_id,
                plan,
                simulation,
                &state.sim_view,
                actions,
            ),
        }
    }
}

impl eframe::App for TwinTrainerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }

        let mut actions = Vec::new();
        self.show_header(ctx, &mut actions);
        self.show_status_bar(ctx);
        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(theme::PANEL_BG)
                    .inner_margin(egui::Margin::symmetric(24, 16)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.set_max_width(960.0);
                        self.show_status_banner(ui);
                        self.show_step(ui, &mut actions);
                    });
            });
        self.apply_actions(actions);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            sim_rounds: self.state.sim_view.rounds,
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
