//! UI/backend events and error modeling for desktop GUI controller.

use client_core::RequestError;
use shared::{
    domain::{SessionId, Twin, TwinId},
    protocol::{MatchResponse, Plan, Simulation, TwinCreated},
};

/// Completion events posted by the backend worker.
#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    TwinsLoaded(Vec<Twin>),
    TwinCreated(TwinCreated),
    TwinDeleted(TwinId),
    MatchReady(MatchResponse),
    PlanReady {
        session_id: SessionId,
        plan: Plan,
    },
    SimulationReady {
        session_id: SessionId,
        simulation: Simulation,
    },
    /// A plan or simulation failure, tagged with the session it was for.
    SessionFailed {
        session_id: SessionId,
        error: UiError,
    },
    Error(UiError),
}

/// User intents reported by the views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    Reset,
    RefreshTwins,
    AddPreset(usize),
    AddCustomTwin,
    ToggleTwin(TwinId),
    DeleteTwin(TwinId),
    RequestMatch,
    ProceedToPlan,
    BackToTwins,
    SelectGoal(&'static str),
    EditCustomGoal(String),
    GeneratePlan,
    ProceedToSim,
    BackToMatch,
    SetRounds(u32),
    RunSimulation,
    BackToPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

/// Which view initiated the failed request; the error is shown there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Health,
    LoadTwins,
    CreateTwin,
    DeleteTwin,
    Match,
    Plan,
    Simulation,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_request(context: UiErrorContext, err: &RequestError) -> Self {
        let category = if err.is_transport() {
            UiErrorCategory::Transport
        } else if err.is_client_error() {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("select")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("unreachable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
