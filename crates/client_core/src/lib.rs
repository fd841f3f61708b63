use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{SessionId, Twin, TwinDraft, TwinId},
    protocol::{
        HealthResponse, MatchRequest, MatchResponse, Plan, PlanRequest, PlanResponse, SimRequest,
        SimResponse, Simulation, TwinCreated,
    },
};
use tracing::{info, warn};

pub mod config;
pub mod error;

pub use config::{load_settings, ClientSettings};
pub use error::RequestError;

pub type RequestResult<T> = std::result::Result<T, RequestError>;

/// The backend operations the front end needs, one request each.
#[async_trait]
pub trait TwinApi: Send + Sync {
    async fn list_twins(&self) -> RequestResult<Vec<Twin>>;
    async fn create_twin(&self, draft: &TwinDraft) -> RequestResult<TwinCreated>;
    async fn delete_twin(&self, twin_id: &TwinId) -> RequestResult<()>;
    async fn request_match(&self, twin_a: &TwinId, twin_b: &TwinId)
        -> RequestResult<MatchResponse>;
    async fn request_plan(&self, session_id: &SessionId, goal: &str) -> RequestResult<Plan>;
    async fn request_simulation(
        &self,
        session_id: &SessionId,
        rounds: u32,
    ) -> RequestResult<Simulation>;
    async fn health(&self) -> RequestResult<HealthResponse>;
}

/// HTTP implementation of [`TwinApi`]. No retries and no timeouts.
#[derive(Debug, Clone)]
pub struct TwinClient {
    http: Client,
    base_url: String,
}

impl TwinClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        Ok(Self::new(settings.resolved_api_url()?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn checked(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> RequestResult<reqwest::Response> {
        let response = request.send().await.map_err(|err| {
            warn!(operation, "backend unreachable: {err}");
            RequestError::Transport(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // An unreadable body is treated like an empty one.
        let body = response.bytes().await.unwrap_or_default();
        let err = RequestError::from_response_body(status, &body);
        warn!(operation, status = status.as_u16(), "backend request failed: {err}");
        Err(err)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> RequestResult<T> {
        self.checked(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|source| RequestError::Decode { operation, source })
    }
}

#[async_trait]
impl TwinApi for TwinClient {
    async fn list_twins(&self) -> RequestResult<Vec<Twin>> {
        info!("backend: list_twins");
        self.fetch("list twins", self.http.get(self.url("/twins")))
            .await
    }

    async fn create_twin(&self, draft: &TwinDraft) -> RequestResult<TwinCreated> {
        info!(name = %draft.name, "backend: create_twin");
        self.fetch("create twin", self.http.post(self.url("/twins")).json(draft))
            .await
    }

    async fn delete_twin(&self, twin_id: &TwinId) -> RequestResult<()> {
        info!(twin_id = %twin_id, "backend: delete_twin");
        self.checked(
            "delete twin",
            self.http.delete(self.url(&format!("/twins/{twin_id}"))),
        )
        .await?;
        Ok(())
    }

    async fn request_match(
        &self,
        twin_a: &TwinId,
        twin_b: &TwinId,
    ) -> RequestResult<MatchResponse> {
        info!(twin_a = %twin_a, twin_b = %twin_b, "backend: match");
        let body = MatchRequest {
            twin_a_id: twin_a.clone(),
            twin_b_id: twin_b.clone(),
        };
        self.fetch("match", self.http.post(self.url("/match")).json(&body))
            .await
    }

    async fn request_plan(&self, session_id: &SessionId, goal: &str) -> RequestResult<Plan> {
        info!(session_id = %session_id, goal, "backend: plan");
        let body = PlanRequest {
            session_id: session_id.clone(),
            goal: goal.to_string(),
        };
        let response: PlanResponse = self
            .fetch("plan", self.http.post(self.url("/plan")).json(&body))
            .await?;
        Ok(response.plan)
    }

    async fn request_simulation(
        &self,
        session_id: &SessionId,
        rounds: u32,
    ) -> RequestResult<Simulation> {
        info!(session_id = %session_id, rounds, "backend: simulate");
        let body = SimRequest {
            session_id: session_id.clone(),
            rounds,
        };
        let response: SimResponse = self
            .fetch("simulation", self.http.post(self.url("/sim")).json(&body))
            .await?;
        Ok(response.simulation)
    }

    async fn health(&self) -> RequestResult<HealthResponse> {
        self.fetch("health", self.http.get(self.url("/health")))
            .await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
