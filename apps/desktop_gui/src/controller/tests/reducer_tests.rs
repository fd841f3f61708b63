use crossbeam_channel::{bounded, Receiver};
use shared::{
    domain::{SessionId, TwinId, DATE_GOALS},
    protocol::{MatchResponse, MatchResult, Plan, Score, Simulation, TwinCreated},
};

use super::*;
use crate::controller::{events::UiErrorCategory, wizard::Step};

fn twin(id: &str, name: &str) -> Twin {
    Twin {
        id: TwinId::from(id),
        name: name.to_string(),
        personality: String::new(),
        interests: String::new(),
        communication_style: String::new(),
        created_at: None,
    }
}

fn drain(rx: &Receiver<BackendCommand>) -> Vec<BackendCommand> {
    rx.try_iter().collect()
}

fn state_with_twins() -> (AppState, Sender<BackendCommand>, Receiver<BackendCommand>) {
    let (tx, rx) = bounded(16);
    let mut state = AppState::new();
    state.apply_event(
        UiEvent::TwinsLoaded(vec![twin("a", "Alex"), twin("b", "Jordan"), twin("c", "Sam")]),
        &tx,
    );
    (state, tx, rx)
}

fn matched_state() -> (AppState, Sender<BackendCommand>, Receiver<BackendCommand>) {
    let (mut state, tx, rx) = state_with_twins();
    state.apply_action(ViewAction::ToggleTwin(TwinId::from("a")), &tx);
    state.apply_action(ViewAction::ToggleTwin(TwinId::from("b")), &tx);
    state.apply_action(ViewAction::RequestMatch, &tx);
    state.apply_event(
        UiEvent::MatchReady(MatchResponse {
            session_id: SessionId::from("s1"),
            analysis: MatchResult {
                compatibility_score: Some(Score::Percent(74.0)),
                ..MatchResult::default()
            },
        }),
        &tx,
    );
    drain(&rx);
    (state, tx, rx)
}

#[test]
fn custom_twin_add_is_gated_on_name_and_busy_flag() {
    let (mut state, tx, rx) = state_with_twins();
    state.apply_action(ViewAction::AddCustomTwin, &tx);
    assert!(drain(&rx).is_empty());

    state.picker.form.name = "Casey".to_string();
    state.apply_action(ViewAction::AddCustomTwin, &tx);
    state.apply_action(ViewAction::AddCustomTwin, &tx);
    let queued = drain(&rx);
    assert_eq!(queued.len(), 1);
    assert!(matches!(&queued[0], BackendCommand::CreateTwin { draft } if draft.name == "Casey"));
    assert!(state.picker.adding);
    assert_eq!(state.picker.add_button_label(), "Adding...");

    state.apply_event(
        UiEvent::TwinCreated(TwinCreated {
            id: TwinId::from("d"),
            name: "Casey".to_string(),
        }),
        &tx,
    );
    assert!(!state.picker.adding);
    assert!(state.picker.form.name.is_empty());
    assert_eq!(drain(&rx), vec![BackendCommand::ListTwins]);
    assert!(state.picker.loading_list);
}

#[test]
fn preset_add_keeps_the_form_contents() {
    let (mut state, tx, rx) = state_with_twins();
    state.picker.form.name = "Draft".to_string();
    state.apply_action(ViewAction::AddPreset(1), &tx);
    let queued = drain(&rx);
    assert!(matches!(&queued[..], [BackendCommand::CreateTwin { draft }] if draft.name == "Jordan"));

    state.apply_event(
        UiEvent::TwinCreated(TwinCreated {
            id: TwinId::from("j"),
            name: "Jordan".to_string(),
        }),
        &tx,
    );
    assert_eq!(state.picker.form.name, "Draft");

    state.apply_action(ViewAction::AddPreset(99), &tx);
    assert_eq!(drain(&rx), vec![BackendCommand::ListTwins]);
}

#[test]
fn match_button_requires_both_slots() {
    let (mut state, tx, rx) = state_with_twins();
    state.apply_action(ViewAction::ToggleTwin(TwinId::from("a")), &tx);
    state.apply_action(ViewAction::RequestMatch, &tx);
    assert!(drain(&rx).is_empty());
    assert!(!state.picker.matching);

    state.apply_action(ViewAction::ToggleTwin(TwinId::from("b")), &tx);
    state.apply_action(ViewAction::RequestMatch, &tx);
    assert_eq!(
        drain(&rx),
        vec![BackendCommand::Match {
            twin_a: TwinId::from("a"),
            twin_b: TwinId::from("b"),
        }]
    );
    assert!(state.picker.matching);
    assert_eq!(state.picker.match_button_label(), "Analyzing compatibility...");
}

#[test]
fn match_failure_stays_on_twins_with_inline_error() {
    let (mut state, tx, rx) = state_with_twins();
    state.apply_action(ViewAction::ToggleTwin(TwinId::from("a")), &tx);
    state.apply_action(ViewAction::ToggleTwin(TwinId::from("b")), &tx);
    state.apply_action(ViewAction::RequestMatch, &tx);
    drain(&rx);

    state.apply_event(
        UiEvent::Error(UiError::from_message(
            UiErrorContext::Match,
            "GEMINI_API_KEY not set",
        )),
        &tx,
    );
    assert_eq!(state.wizard.current_step(), Step::Twins);
    assert!(!state.picker.matching);
    assert_eq!(
        state.picker.error.as_ref().map(UiError::message),
        Some("GEMINI_API_KEY not set")
    );
}

#[test]
fn match_success_moves_to_match_step() {
    let (state, _tx, _rx) = matched_state();
    assert_eq!(state.wizard.current_step(), Step::Match);
    assert_eq!(state.wizard.session_id(), Some(&SessionId::from("s1")));
    assert!(!state.picker.matching);
}

#[test]
fn deleting_a_selected_twin_clears_its_slot_and_reloads() {
    let (mut state, tx, rx) = state_with_twins();
    state.apply_action(ViewAction::ToggleTwin(TwinId::from("a")), &tx);
    state.apply_action(ViewAction::DeleteTwin(TwinId::from("a")), &tx);
    assert_eq!(
        drain(&rx),
        vec![BackendCommand::DeleteTwin {
            twin_id: TwinId::from("a")
        }]
    );
    assert!(!state.picker.can_delete());

    state.apply_event(UiEvent::TwinDeleted(TwinId::from("a")), &tx);
    assert!(state.wizard.selection().is_empty());
    assert!(state.twins.iter().all(|twin| twin.id.as_str() != "a"));
    assert!(state.picker.can_delete());
    assert_eq!(drain(&rx), vec![BackendCommand::ListTwins]);
}

#[test]
fn overlapping_reloads_are_coalesced_into_one_follow_up() {
    let (mut state, tx, rx) = state_with_twins();
    state.apply_action(ViewAction::AddPreset(0), &tx);
    state.apply_action(ViewAction::DeleteTwin(TwinId::from("a")), &tx);
    drain(&rx);

    state.apply_event(
        UiEvent::TwinCreated(TwinCreated {
            id: TwinId::from("d"),
            name: "Alex".to_string(),
        }),
        &tx,
    );
    state.apply_event(UiEvent::TwinDeleted(TwinId::from("a")), &tx);
    state.apply_action(ViewAction::RefreshTwins, &tx);
    assert_eq!(drain(&rx), vec![BackendCommand::ListTwins]);
    assert!(state.picker.reload_pending);

    // The first list predates the delete; a fresh one is requested after it.
    state.apply_event(
        UiEvent::TwinsLoaded(vec![twin("a", "Alex"), twin("d", "Alex")]),
        &tx,
    );
    assert_eq!(drain(&rx), vec![BackendCommand::ListTwins]);
    assert!(state.picker.loading_list);
    assert!(!state.picker.reload_pending);

    state.apply_event(UiEvent::TwinsLoaded(vec![twin("d", "Alex")]), &tx);
    assert!(drain(&rx).is_empty());
    assert!(!state.picker.loading_list);
    let ids: Vec<_> = state.twins.iter().map(|twin| twin.id.as_str()).collect();
    assert_eq!(ids, vec!["d"]);
}

#[test]
fn failed_reload_clears_the_pending_follow_up() {
    let (mut state, tx, rx) = state_with_twins();
    state.apply_action(ViewAction::RefreshTwins, &tx);
    state.apply_action(ViewAction::RefreshTwins, &tx);
    assert_eq!(drain(&rx), vec![BackendCommand::ListTwins]);

    state.apply_event(
        UiEvent::Error(UiError::from_message(
            UiErrorContext::LoadTwins,
            "connection refused",
        )),
        &tx,
    );
    assert!(!state.picker.loading_list);
    assert!(!state.picker.reload_pending);
    assert!(drain(&rx).is_empty());
    assert!(state.picker.error.is_some());
}

#[test]
fn reloaded_list_drops_vanished_selections() {
    let (mut state, tx, _rx) = state_with_twins();
    state.apply_action(ViewAction::ToggleTwin(TwinId::from("a")), &tx);
    state.apply_action(ViewAction::ToggleTwin(TwinId::from("c")), &tx);
    state.apply_event(UiEvent::TwinsLoaded(vec![twin("c", "Sam")]), &tx);
    assert_eq!(state.wizard.selection().len(), 1);
    assert!(state.wizard.selection().slot_of(&TwinId::from("c")).is_some());
}

#[test]
fn preset_goal_and_custom_goal_are_mutually_exclusive() {
    let (mut state, tx, _rx) = matched_state();
    state.apply_action(ViewAction::ProceedToPlan, &tx);

    state.apply_action(ViewAction::EditCustomGoal("Picnic".to_string()), &tx);
    assert_eq!(state.planner.custom_text(), "Picnic");
    state.apply_action(ViewAction::SelectGoal(DATE_GOALS[2]), &tx);
    assert_eq!(state.planner.selected_preset(), Some(DATE_GOALS[2]));
    assert_eq!(state.planner.custom_text(), "");

    state.apply_action(ViewAction::EditCustomGoal("Museum".to_string()), &tx);
    assert_eq!(state.planner.selected_preset(), None);
    assert_eq!(state.planner.effective_goal().as_deref(), Some("Museum"));

    state.apply_action(ViewAction::EditCustomGoal(String::new()), &tx);
    assert_eq!(state.planner.selected_preset(), None);
    assert_eq!(state.planner.effective_goal(), None);
    assert!(!state.planner.can_generate());
}

#[test]
fn plan_generation_previews_then_proceeds_to_sim() {
    let (mut state, tx, rx) = matched_state();
    state.apply_action(ViewAction::SelectGoal(DATE_GOALS[0]), &tx);
    state.apply_action(ViewAction::GeneratePlan, &tx);
    assert!(drain(&rx).is_empty(), "planning is only allowed on the plan step");
    assert!(state.planner.error.is_some());

    state.apply_action(ViewAction::ProceedToPlan, &tx);
    state.apply_action(ViewAction::GeneratePlan, &tx);
    assert_eq!(
        drain(&rx),
        vec![BackendCommand::Plan {
            session_id: SessionId::from("s1"),
            goal: DATE_GOALS[0].to_string(),
        }]
    );
    assert!(state.planner.loading);

    let plan = Plan {
        title: Some("Coffee & Chess".to_string()),
        ..Plan::default()
    };
    state.apply_event(
        UiEvent::PlanReady {
            session_id: SessionId::from("s1"),
            plan: plan.clone(),
        },
        &tx,
    );
    assert!(!state.planner.loading);
    assert_eq!(state.wizard.current_step(), Step::Plan);
    assert_eq!(state.planner.preview.as_ref(), Some(&plan));

    state.apply_action(ViewAction::ProceedToSim, &tx);
    assert_eq!(state.wizard.current_step(), Step::Sim);
    assert_eq!(state.wizard.plan(), Some(&plan));
}

#[test]
fn proceeding_to_sim_without_a_preview_is_rejected() {
    let (mut state, tx, _rx) = matched_state();
    state.apply_action(ViewAction::ProceedToPlan, &tx);
    state.apply_action(ViewAction::ProceedToSim, &tx);
    assert_eq!(state.wizard.current_step(), Step::Plan);
}

#[test]
fn plan_for_a_stale_session_is_dropped() {
    let (mut state, tx, _rx) = matched_state();
    state.apply_action(ViewAction::ProceedToPlan, &tx);
    state.apply_event(
        UiEvent::PlanReady {
            session_id: SessionId::from("old"),
            plan: Plan::default(),
        },
        &tx,
    );
    assert!(state.planner.preview.is_none());
}

fn sim_state() -> (AppState, Sender<BackendCommand>, Receiver<BackendCommand>) {
    let (mut state, tx, rx) = matched_state();
    state.apply_action(ViewAction::ProceedToPlan, &tx);
    state.apply_event(
        UiEvent::PlanReady {
            session_id: SessionId::from("s1"),
            plan: Plan::default(),
        },
        &tx,
    );
    state.apply_action(ViewAction::ProceedToSim, &tx);
    drain(&rx);
    (state, tx, rx)
}

#[test]
fn simulation_runs_with_default_rounds_and_records_result() {
    let (mut state, tx, rx) = sim_state();
    assert_eq!(state.sim_view.run_button_label(false), "Run Simulation");
    state.apply_action(ViewAction::RunSimulation, &tx);
    state.apply_action(ViewAction::RunSimulation, &tx);
    assert_eq!(
        drain(&rx),
        vec![BackendCommand::Simulate {
            session_id: SessionId::from("s1"),
            rounds: 6,
        }]
    );

    state.apply_event(
        UiEvent::SimulationReady {
            session_id: SessionId::from("s1"),
            simulation: Simulation {
                overall_score: Some(Score::Percent(81.0)),
                ..Simulation::default()
            },
        },
        &tx,
    );
    assert!(!state.sim_view.loading);
    assert!(state.wizard.simulation().is_some());
    assert_eq!(state.sim_view.run_button_label(true), "Re-run Simulation");
}

#[test]
fn failures_for_a_replaced_session_leave_the_new_request_pending() {
    let (mut state, tx, rx) = sim_state();
    state.apply_action(ViewAction::RunSimulation, &tx);
    drain(&rx);

    state.apply_event(
        UiEvent::SessionFailed {
            session_id: SessionId::from("old"),
            error: UiError::from_message(UiErrorContext::Simulation, "Session not found"),
        },
        &tx,
    );
    assert!(state.sim_view.loading);
    assert!(state.sim_view.error.is_none());
    assert!(!state.sim_view.can_run());

    state.apply_event(
        UiEvent::SessionFailed {
            session_id: SessionId::from("s1"),
            error: UiError::from_message(UiErrorContext::Simulation, "model timeout"),
        },
        &tx,
    );
    assert!(!state.sim_view.loading);
    assert_eq!(
        state.sim_view.error.as_ref().map(UiError::message),
        Some("model timeout")
    );
}

#[test]
fn plan_failure_for_a_replaced_session_is_dropped() {
    let (mut state, tx, rx) = matched_state();
    state.apply_action(ViewAction::ProceedToPlan, &tx);
    state.apply_action(ViewAction::SelectGoal(DATE_GOALS[1]), &tx);
    state.apply_action(ViewAction::GeneratePlan, &tx);
    assert_eq!(drain(&rx).len(), 1);

    state.apply_event(
        UiEvent::SessionFailed {
            session_id: SessionId::from("old"),
            error: UiError::from_message(UiErrorContext::Plan, "Session not found"),
        },
        &tx,
    );
    assert!(state.planner.loading);
    assert!(state.planner.error.is_none());
}

#[test]
fn simulation_rounds_are_clamped() {
    let (mut state, tx, rx) = sim_state();
    state.apply_action(ViewAction::SetRounds(0), &tx);
    assert_eq!(state.sim_view.rounds, 1);
    state.apply_action(ViewAction::SetRounds(40), &tx);
    assert_eq!(state.sim_view.rounds, 12);
    state.apply_action(ViewAction::SetRounds(4), &tx);
    state.apply_action(ViewAction::RunSimulation, &tx);
    assert!(matches!(
        &drain(&rx)[..],
        [BackendCommand::Simulate { rounds: 4, .. }]
    ));
}

#[test]
fn simulation_failure_keeps_step_and_shows_error() {
    let (mut state, tx, rx) = sim_state();
    state.apply_action(ViewAction::RunSimulation, &tx);
    drain(&rx);
    state.apply_event(
        UiEvent::Error(UiError::from_message(
            UiErrorContext::Simulation,
            "Session not found",
        )),
        &tx,
    );
    assert_eq!(state.wizard.current_step(), Step::Sim);
    assert!(!state.sim_view.loading);
    assert!(state.sim_view.error.is_some());
}

#[test]
fn back_to_plan_restores_the_plan_preview() {
    let (mut state, tx, _rx) = sim_state();
    state.planner.preview = None;
    state.apply_action(ViewAction::BackToPlan, &tx);
    assert_eq!(state.wizard.current_step(), Step::Plan);
    assert!(state.planner.preview.is_some());
}

#[test]
fn reset_returns_to_twins_and_clears_view_state() {
    let (mut state, tx, _rx) = sim_state();
    state.sim_view.rounds = 8;
    state.apply_action(ViewAction::Reset, &tx);
    assert_eq!(state.wizard.current_step(), Step::Twins);
    assert!(state.wizard.session_id().is_none());
    assert!(state.planner.preview.is_none());
    assert_eq!(state.sim_view.rounds, 8);
    assert_eq!(state.twins.len(), 3);
}

#[test]
fn full_queue_leaves_views_idle() {
    let (tx, rx) = bounded(1);
    let mut state = AppState::new();
    state.apply_action(ViewAction::RefreshTwins, &tx);
    state.picker.form.name = "Casey".to_string();
    state.apply_action(ViewAction::AddCustomTwin, &tx);
    assert!(!state.picker.adding);
    assert_eq!(state.status, "UI command queue is full; please retry");
    assert_eq!(drain(&rx), vec![BackendCommand::ListTwins]);
}

#[test]
fn disconnected_worker_is_reported() {
    let (tx, rx) = bounded(1);
    drop(rx);
    let mut state = AppState::new();
    state.apply_action(ViewAction::RefreshTwins, &tx);
    assert!(!state.picker.loading_list);
    assert!(state.status.contains("disconnected"));
}

#[test]
fn startup_errors_land_in_the_banner() {
    let (tx, _rx) = bounded(1);
    let mut state = AppState::new();
    state.apply_event(
        UiEvent::Error(UiError::from_message(
            UiErrorContext::Health,
            "Could not reach the backend: connection refused",
        )),
        &tx,
    );
    let banner = state.banner.as_ref().expect("banner");
    assert_eq!(banner.category(), UiErrorCategory::Transport);
}
