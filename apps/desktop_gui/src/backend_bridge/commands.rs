//! Backend commands queued from UI to backend worker.

use shared::domain::{SessionId, TwinDraft, TwinId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    ListTwins,
    CreateTwin {
        draft: TwinDraft,
    },
    DeleteTwin {
        twin_id: TwinId,
    },
    Match {
        twin_a: TwinId,
        twin_b: TwinId,
    },
    Plan {
        session_id: SessionId,
        goal: String,
    },
    Simulate {
        session_id: SessionId,
        rounds: u32,
    },
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListTwins => "list_twins",
            Self::CreateTwin { .. } => "create_twin",
            Self::DeleteTwin { .. } => "delete_twin",
            Self::Match { .. } => "match",
            Self::Plan { .. } => "plan",
            Self::Simulate { .. } => "simulate",
            Self::CheckHealth => "check_health",
        }
    }
}
