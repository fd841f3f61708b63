use std::{collections::VecDeque, sync::Mutex, time::Duration};

use async_trait::async_trait;
use client_core::{RequestError, RequestResult};
use crossbeam_channel::bounded;
use reqwest::StatusCode;
use shared::{
    domain::{SessionId, Twin, TwinDraft, TwinId},
    protocol::{
        Exchange, Figure, HealthResponse, MatchResponse, MatchResult, Plan, Score, Simulation,
        TwinCreated,
    },
};

use super::*;
use crate::controller::events::UiErrorCategory;

/// Records calls and answers from canned data; unknown sessions get a 404.
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<String>>,
    /// Per list call: how long to take and how many twins to return.
    list_script: Mutex<VecDeque<(Duration, usize)>>,
}

impl FakeApi {
    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn script_lists(&self, script: impl IntoIterator<Item = (Duration, usize)>) {
        self.list_script.lock().expect("script lock").extend(script);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

fn not_found(detail: &str) -> RequestError {
    let body = format!(r#"{{"detail":"{detail}"}}"#);
    RequestError::from_response_body(StatusCode::NOT_FOUND, body.as_bytes())
}

#[async_trait]
impl TwinApi for FakeApi {
    async fn list_twins(&self) -> RequestResult<Vec<Twin>> {
        self.record("list".to_string());
        let (delay, count) = self
            .list_script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or((Duration::ZERO, 1));
        tokio::time::sleep(delay).await;
        Ok((1..=count)
            .map(|n| Twin {
                id: TwinId(format!("t{n}")),
                name: "Alex".to_string(),
                personality: String::new(),
                interests: String::new(),
                communication_style: String::new(),
                created_at: None,
            })
            .collect())
    }

    async fn create_twin(&self, draft: &TwinDraft) -> RequestResult<TwinCreated> {
        self.record(format!("create {}", draft.name));
        Ok(TwinCreated {
            id: TwinId::from("t2"),
            name: draft.name.clone(),
        })
    }

    async fn delete_twin(&self, twin_id: &TwinId) -> RequestResult<()> {
        self.record(format!("delete {twin_id}"));
        if twin_id.as_str() == "missing" {
            return Err(not_found("Twin not found"));
        }
        Ok(())
    }

    async fn request_match(
        &self,
        twin_a: &TwinId,
        twin_b: &TwinId,
    ) -> RequestResult<MatchResponse> {
        self.record(format!("match {twin_a} {twin_b}"));
        Ok(MatchResponse {
            session_id: SessionId::from("s1"),
            analysis: MatchResult {
                compatibility_score: Some(Score::Percent(74.0)),
                ..MatchResult::default()
            },
        })
    }

    async fn request_plan(&self, session_id: &SessionId, goal: &str) -> RequestResult<Plan> {
        self.record(format!("plan {session_id} {goal}"));
        if session_id.as_str() != "s1" {
            return Err(not_found("Session not found"));
        }
        Ok(Plan {
            title: Some(goal.to_string()),
            ..Plan::default()
        })
    }

    async fn request_simulation(
        &self,
        session_id: &SessionId,
        rounds: u32,
    ) -> RequestResult<Simulation> {
        self.record(format!("sim {session_id} {rounds}"));
        if session_id.as_str() != "s1" {
            return Err(not_found("Session not found"));
        }
        Ok(Simulation {
            exchanges: (1..=rounds)
                .map(|round| Exchange {
                    round: Some(Figure::from(round)),
                    engagement_score: 50.0,
                    ..Exchange::default()
                })
                .collect(),
            ..Simulation::default()
        })
    }

    async fn health(&self) -> RequestResult<HealthResponse> {
        self.record("health".to_string());
        Ok(HealthResponse {
            status: "ok".to_string(),
            ts: None,
        })
    }
}

#[tokio::test]
async fn successful_commands_map_to_ready_events() {
    let api = FakeApi::default();

    assert!(matches!(
        execute(&api, BackendCommand::ListTwins).await,
        UiEvent::TwinsLoaded(twins) if twins.len() == 1
    ));
    assert!(matches!(
        execute(
            &api,
            BackendCommand::CreateTwin {
                draft: TwinDraft {
                    name: "Casey".to_string(),
                    ..TwinDraft::default()
                }
            }
        )
        .await,
        UiEvent::TwinCreated(created) if created.name == "Casey"
    ));
    assert!(matches!(
        execute(
            &api,
            BackendCommand::DeleteTwin {
                twin_id: TwinId::from("t1")
            }
        )
        .await,
        UiEvent::TwinDeleted(id) if id.as_str() == "t1"
    ));
    assert!(matches!(
        execute(
            &api,
            BackendCommand::Match {
                twin_a: TwinId::from("t1"),
                twin_b: TwinId::from("t2"),
            }
        )
        .await,
        UiEvent::MatchReady(response) if response.session_id.as_str() == "s1"
    ));
    assert!(matches!(
        execute(
            &api,
            BackendCommand::Plan {
                session_id: SessionId::from("s1"),
                goal: "First coffee date".to_string(),
            }
        )
        .await,
        UiEvent::PlanReady { session_id, plan }
            if session_id.as_str() == "s1" && plan.display_title() == "First coffee date"
    ));
    assert!(matches!(
        execute(
            &api,
            BackendCommand::Simulate {
                session_id: SessionId::from("s1"),
                rounds: 6,
            }
        )
        .await,
        UiEvent::SimulationReady { simulation, .. } if simulation.exchanges.len() == 6
    ));
    assert!(matches!(
        execute(&api, BackendCommand::CheckHealth).await,
        UiEvent::Info(message) if message == "Backend status: ok"
    ));

    assert_eq!(
        api.calls(),
        vec![
            "list",
            "create Casey",
            "delete t1",
            "match t1 t2",
            "plan s1 First coffee date",
            "sim s1 6",
            "health",
        ]
    );
}

#[tokio::test]
async fn failures_carry_the_initiating_view_and_detail() {
    let api = FakeApi::default();

    let UiEvent::SessionFailed {
        session_id,
        error: err,
    } = execute(
        &api,
        BackendCommand::Plan {
            session_id: SessionId::from("gone"),
            goal: "Picnic".to_string(),
        },
    )
    .await
    else {
        panic!("expected plan failure");
    };
    assert_eq!(session_id, SessionId::from("gone"));
    assert_eq!(err.context(), UiErrorContext::Plan);
    assert_eq!(err.category(), UiErrorCategory::Validation);
    assert_eq!(err.message(), "Session not found");

    let UiEvent::Error(err) = execute(
        &api,
        BackendCommand::DeleteTwin {
            twin_id: TwinId::from("missing"),
        },
    )
    .await
    else {
        panic!("expected delete failure");
    };
    assert_eq!(err.context(), UiErrorContext::DeleteTwin);
    assert_eq!(err.message(), "Twin not found");
}

#[tokio::test]
async fn queued_commands_complete_in_queue_order() {
    let api = FakeApi::default();
    api.script_lists([(Duration::from_millis(200), 2), (Duration::ZERO, 1)]);

    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = bounded(8);
    cmd_tx.send(BackendCommand::ListTwins).expect("queue first");
    cmd_tx.send(BackendCommand::ListTwins).expect("queue second");
    drop(cmd_tx);
    serve(&api, &cmd_rx, &ui_tx).await;

    let sizes: Vec<usize> = ui_rx
        .try_iter()
        .map(|event| match event {
            UiEvent::TwinsLoaded(twins) => twins.len(),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(sizes, vec![2, 1]);
}

#[tokio::test]
async fn simulation_failures_carry_their_session() {
    let api = FakeApi::default();
    let event = execute(
        &api,
        BackendCommand::Simulate {
            session_id: SessionId::from("gone"),
            rounds: 3,
        },
    )
    .await;
    assert!(matches!(
        event,
        UiEvent::SessionFailed { session_id, error }
            if session_id.as_str() == "gone" && error.context() == UiErrorContext::Simulation
    ));
}

#[test]
fn worker_reports_unreachable_backend_as_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let (cmd_tx, cmd_rx) = bounded(8);
    let (ui_tx, ui_rx) = bounded(8);
    launch(cmd_rx, ui_tx, format!("http://127.0.0.1:{port}"));
    cmd_tx
        .send(BackendCommand::CheckHealth)
        .expect("queue command");

    let mut saw_error = false;
    while let Ok(event) = ui_rx.recv_timeout(Duration::from_secs(10)) {
        if let UiEvent::Error(err) = event {
            assert_eq!(err.context(), UiErrorContext::Health);
            assert_eq!(err.category(), UiErrorCategory::Transport);
            assert!(err.message().starts_with("Could not reach the backend"));
            saw_error = true;
            break;
        }
    }
    assert!(saw_error, "worker never reported the failed health check");
}
