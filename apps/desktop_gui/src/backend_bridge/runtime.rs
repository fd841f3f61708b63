//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{TwinApi, TwinClient};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::SessionId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the backend worker thread. It owns a tokio runtime and the HTTP
/// client.
pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, api_url: String) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let api = TwinClient::new(api_url.clone());
        tracing::info!(api_url = %api_url, "backend worker ready");

        runtime.block_on(serve(&api, &cmd_rx, &ui_tx));
    });
}

/// Executes queued commands one at a time, so completion events reach the
/// UI in the order the commands were queued.
pub async fn serve(
    api: &dyn TwinApi,
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let event = execute(api, cmd).await;
        if ui_tx.try_send(event).is_err() {
            tracing::warn!("ui event queue full or closed; dropping event");
        }
    }
    tracing::info!("command queue closed; backend worker stopping");
}

/// Runs one command against the API and turns the outcome into a UI event.
pub async fn execute(api: &dyn TwinApi, cmd: BackendCommand) -> UiEvent {
    let name = cmd.name();
    tracing::debug!(command = name, "executing backend command");

    match cmd {
        BackendCommand::ListTwins => match api.list_twins().await {
            Ok(twins) => UiEvent::TwinsLoaded(twins),
            Err(err) => failure(UiErrorContext::LoadTwins, &err),
        },
        BackendCommand::CreateTwin { draft } => match api.create_twin(&draft).await {
            Ok(created) => UiEvent::TwinCreated(created),
            Err(err) => failure(UiErrorContext::CreateTwin, &err),
        },
        BackendCommand::DeleteTwin { twin_id } => match api.delete_twin(&twin_id).await {
            Ok(()) => UiEvent::TwinDeleted(twin_id),
            Err(err) => failure(UiErrorContext::DeleteTwin, &err),
        },
        BackendCommand::Match { twin_a, twin_b } => {
            match api.request_match(&twin_a, &twin_b).await {
                Ok(response) => UiEvent::MatchReady(response),
                Err(err) => failure(UiErrorContext::Match, &err),
            }
        }
        BackendCommand::Plan { session_id, goal } => {
            match api.request_plan(&session_id, &goal).await {
                Ok(plan) => UiEvent::PlanReady { session_id, plan },
                Err(err) => session_failure(session_id, UiErrorContext::Plan, &err),
            }
        }
        BackendCommand::Simulate { session_id, rounds } => {
            match api.request_simulation(&session_id, rounds).await {
                Ok(simulation) => UiEvent::SimulationReady {
                    session_id,
                    simulation,
                },
                Err(err) => session_failure(session_id, UiErrorContext::Simulation, &err),
            }
        }
        BackendCommand::CheckHealth => match api.health().await {
            Ok(health) => UiEvent::Info(format!("Backend status: {}", health.status)),
            Err(err) => failure(UiErrorContext::Health, &err),
        },
    }
}

fn failure(context: UiErrorContext, err: &client_core::RequestError) -> UiEvent {
    tracing::warn!(?context, "backend request failed: {err}");
    UiEvent::Error(UiError::from_request(context, err))
}

fn session_failure(
    session_id: SessionId,
    context: UiErrorContext,
    err: &client_core::RequestError,
) -> UiEvent {
    tracing::warn!(?context, session = %session_id, "backend request failed: {err}");
    UiEvent::SessionFailed {
        session_id,
        error: UiError::from_request(context, err),
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
