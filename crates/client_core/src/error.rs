use reqwest::StatusCode;
use serde_json::Value;
use shared::error::ApiErrorBody;
use thiserror::Error;

const GENERIC_FAILURE: &str = "Request failed";

/// Every failure collapses to one human-readable message via `Display`.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Could not reach the backend: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{detail}")]
    Api { status: StatusCode, detail: String },
    #[error("{status_text}")]
    Status {
        status: StatusCode,
        status_text: String,
    },
    #[error("Invalid {operation} response from backend: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl RequestError {
    /// Builds the failure for a non-success response from its raw body.
    /// A JSON body without a usable `detail` reads as the generic failure;
    /// a body that is not JSON at all falls back to the status text.
    pub fn from_response_body(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::Api {
                status,
                detail: serde_json::from_value::<ApiErrorBody>(value)
                    .ok()
                    .and_then(|body| body.detail_message())
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
            Err(_) => Self::Status {
                status,
                status_text: status
                    .canonical_reason()
                    .unwrap_or(GENERIC_FAILURE)
                    .to_string(),
            },
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport(err) | Self::Decode { source: err, .. } => err.status(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| status.is_client_error())
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}
