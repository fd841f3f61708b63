//! Reducer-like state transitions: view actions queue commands, backend events
//! settle busy flags and advance the wizard.

use crossbeam_channel::Sender;
use shared::domain::{Twin, TWIN_PRESETS};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent, ViewAction},
    orchestration::dispatch_backend_command,
    view_state::{PlannerState, SimViewState, TwinPickerState},
    wizard::{Slot, TransitionError, WizardSession},
};

#[derive(Debug, Default)]
pub struct AppState {
    pub wizard: WizardSession,
    pub twins: Vec<Twin>,
    pub picker: TwinPickerState,
    pub planner: PlannerState,
    pub sim_view: SimViewState,
    pub status: String,
    /// Errors that belong to no particular view.
    pub banner: Option<UiError>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: "Starting".to_string(),
            ..Self::default()
        }
    }

    pub fn apply_action(&mut self, action: ViewAction, cmd_tx: &Sender<BackendCommand>) {
        match action {
            ViewAction::Reset => {
                self.wizard.reset();
                self.picker.form.clear();
                self.picker.error = None;
                self.planner = PlannerState::default();
                self.reset_sim_view();
                self.status = "Start over: pick two twins".to_string();
            }
            ViewAction::RefreshTwins => self.request_twin_list(cmd_tx),
            ViewAction::AddPreset(index) => {
                let Some(preset) = TWIN_PRESETS.get(index) else {
                    return;
                };
                if !self.picker.can_add_preset() {
                    return;
                }
                let cmd = BackendCommand::CreateTwin {
                    draft: preset.into(),
                };
                if dispatch_backend_command(cmd_tx, cmd, &mut self.status) {
                    self.picker.adding = true;
                    self.picker.clear_form_on_create = false;
                    self.picker.error = None;
                }
            }
            ViewAction::AddCustomTwin => {
                if !self.picker.can_add() {
                    return;
                }
                let cmd = BackendCommand::CreateTwin {
                    draft: self.picker.form.clone(),
                };
                if dispatch_backend_command(cmd_tx, cmd, &mut self.status) {
                    self.picker.adding = true;
                    self.picker.clear_form_on_create = true;
                    self.picker.error = None;
                }
            }
            ViewAction::ToggleTwin(twin_id) => {
                if let Err(err) = self.wizard.toggle_twin(&twin_id) {
                    self.note_rejected(err);
                }
            }
            ViewAction::DeleteTwin(twin_id) => {
                if !self.picker.can_delete() {
                    return;
                }
                let cmd = BackendCommand::DeleteTwin {
                    twin_id: twin_id.clone(),
                };
                if dispatch_backend_command(cmd_tx, cmd, &mut self.status) {
                    self.picker.deleting = Some(twin_id);
                    self.picker.error = None;
                }
            }
            ViewAction::RequestMatch => {
                if !self.picker.can_match(self.wizard.selection()) {
                    return;
                }
                match self.wizard.match_request() {
                    Ok((twin_a, twin_b)) => {
                        let cmd = BackendCommand::Match { twin_a, twin_b };
                        if dispatch_backend_command(cmd_tx, cmd, &mut self.status) {
                            self.picker.matching = true;
                            self.picker.error = None;
                        }
                    }
                    Err(err) => {
                        self.picker.error =
                            Some(UiError::from_message(UiErrorContext::Match, err.to_string()));
                    }
                }
            }
            ViewAction::ProceedToPlan => {
                if let Err(err) = self.wizard.proceed_to_plan() {
                    self.note_rejected(err);
                }
            }
            ViewAction::BackToTwins => {
                if let Err(err) = self.wizard.back_to_twins() {
                    self.note_rejected(err);
                }
            }
            ViewAction::SelectGoal(goal) => self.planner.select_preset(goal),
            ViewAction::EditCustomGoal(text) => self.planner.edit_custom(text),
            ViewAction::GeneratePlan => {
                if !self.planner.can_generate() {
                    return;
                }
                let Some(goal) = self.planner.effective_goal() else {
                    return;
                };
                match self.wizard.plan_request() {
                    Ok(session_id) => {
                        let cmd = BackendCommand::Plan { session_id, goal };
                        if dispatch_backend_command(cmd_tx, cmd, &mut self.status) {
                            self.planner.loading = true;
                            self.planner.error = None;
                        }
                    }
                    Err(err) => {
                        self.planner.error =
                            Some(UiError::from_message(UiErrorContext::Plan, err.to_string()));
                    }
                }
            }
            ViewAction::ProceedToSim => {
                let Some(plan) = self.planner.preview.clone() else {
                    self.note_rejected(TransitionError::MissingPlan);
                    return;
                };
                if let Err(err) = self.wizard.complete_plan(plan) {
                    self.note_rejected(err);
                }
            }
            ViewAction::BackToMatch => {
                if let Err(err) = self.wizard.back_to_match() {
                    self.note_rejected(err);
                }
            }
            ViewAction::SetRounds(rounds) => self.sim_view.set_rounds(rounds),
            ViewAction::RunSimulation => {
                if !self.sim_view.can_run() {
                    return;
                }
                match self.wizard.simulation_request() {
                    Ok(session_id) => {
                        let cmd = BackendCommand::Simulate {
                            session_id,
                            rounds: self.sim_view.rounds,
                        };
                        if dispatch_backend_command(cmd_tx, cmd, &mut self.status) {
                            self.sim_view.loading = true;
                            self.sim_view.error = None;
                        }
                    }
                    Err(err) => {
                        self.sim_view.error = Some(UiError::from_message(
                            UiErrorContext::Simulation,
                            err.to_string(),
                        ));
                    }
                }
            }
            ViewAction::BackToPlan => match self.wizard.back_to_plan() {
                Ok(()) => {
                    if self.planner.preview.is_none() {
                        self.planner.preview = self.wizard.plan().cloned();
                    }
                }
                Err(err) => self.note_rejected(err),
            },
        }
    }

    pub fn apply_event(&mut self, event: UiEvent, cmd_tx: &Sender<BackendCommand>) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::TwinsLoaded(twins) => {
                self.picker.loading_list = false;
                if std::mem::take(&mut self.picker.reload_pending) {
                    self.request_twin_list(cmd_tx);
                }
                let selection = self.wizard.selection();
                let stale: Vec<_> = [selection.get(Slot::A), selection.get(Slot::B)]
                    .into_iter()
                    .flatten()
                    .filter(|id| !twins.iter().any(|twin| &twin.id == *id))
                    .cloned()
                    .collect();
                for id in stale {
                    self.wizard.forget_twin(&id);
                }
                self.status = format!("Loaded {} twins", twins.len());
                self.twins = twins;
            }
            UiEvent::TwinCreated(created) => {
                self.picker.adding = false;
                if self.picker.clear_form_on_create {
                    self.picker.form.clear();
                    self.picker.clear_form_on_create = false;
                }
                self.status = format!("Created twin {}", created.name);
                self.request_twin_list(cmd_tx);
            }
            UiEvent::TwinDeleted(twin_id) => {
                if self.picker.deleting.as_ref() == Some(&twin_id) {
                    self.picker.deleting = None;
                }
                self.wizard.forget_twin(&twin_id);
                self.twins.retain(|twin| twin.id != twin_id);
                self.status = "Twin deleted".to_string();
                self.request_twin_list(cmd_tx);
            }
            UiEvent::MatchReady(response) => {
                self.picker.matching = false;
                match self
                    .wizard
                    .complete_match(response.session_id, response.analysis)
                {
                    Ok(()) => {
                        self.picker.error = None;
                        self.planner = PlannerState::default();
                        self.reset_sim_view();
                        self.status = "Compatibility analysis ready".to_string();
                    }
                    Err(err) => {
                        tracing::debug!("dropping match result: {err}");
                    }
                }
            }
            UiEvent::PlanReady { session_id, plan } => {
                if self.wizard.session_id() != Some(&session_id) {
                    tracing::debug!(session = %session_id, "dropping plan for stale session");
                    return;
                }
                self.planner.loading = false;
                self.planner.error = None;
                self.planner.preview = Some(plan);
                self.status = "Date plan ready".to_string();
            }
            UiEvent::SimulationReady {
                session_id,
                simulation,
            } => {
                if self.wizard.session_id() != Some(&session_id) {
                    tracing::debug!(session = %session_id, "dropping simulation for stale session");
                    return;
                }
                self.sim_view.loading = false;
                match self.wizard.record_simulation(&session_id, simulation) {
                    Ok(()) => {
                        self.sim_view.error = None;
                        self.status = "Simulation complete".to_string();
                    }
                    Err(err) => {
                        self.sim_view.error = Some(UiError::from_message(
                            UiErrorContext::Simulation,
                            err.to_string(),
                        ));
                    }
                }
            }
            UiEvent::SessionFailed { session_id, error } => {
                if self.wizard.session_id() != Some(&session_id) {
                    tracing::debug!(session = %session_id, "dropping failure for stale session");
                    return;
                }
                self.route_error(error);
            }
            UiEvent::Error(err) => self.route_error(err),
        }
    }

    fn route_error(&mut self, err: UiError) {
        tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
        match err.context() {
            UiErrorContext::LoadTwins => {
                self.picker.loading_list = false;
                self.picker.reload_pending = false;
                self.picker.error = Some(err);
            }
            UiErrorContext::CreateTwin => {
                self.picker.adding = false;
                self.picker.error = Some(err);
            }
            UiErrorContext::DeleteTwin => {
                self.picker.deleting = None;
                self.picker.error = Some(err);
            }
            UiErrorContext::Match => {
                self.picker.matching = false;
                self.picker.error = Some(err);
            }
            UiErrorContext::Plan => {
                self.planner.loading = false;
                self.planner.error = Some(err);
            }
            UiErrorContext::Simulation => {
                self.sim_view.loading = false;
                self.sim_view.error = Some(err);
            }
            UiErrorContext::BackendStartup | UiErrorContext::Health => {
                self.status = err.message().to_string();
                self.banner = Some(err);
            }
        }
    }

    /// One list request at a time; a reload asked for meanwhile runs once the
    /// outstanding one lands.
    fn request_twin_list(&mut self, cmd_tx: &Sender<BackendCommand>) {
        if self.picker.loading_list {
            self.picker.reload_pending = true;
            return;
        }
        if dispatch_backend_command(cmd_tx, BackendCommand::ListTwins, &mut self.status) {
            self.picker.loading_list = true;
        }
    }

    fn reset_sim_view(&mut self) {
        self.sim_view = SimViewState {
            rounds: self.sim_view.rounds,
            ..SimViewState::default()
        };
    }

    fn note_rejected(&mut self, err: TransitionError) {
        tracing::debug!("rejected wizard transition: {err}");
        self.status = err.to_string();
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
