use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: &'static str,
}

impl HealthResponse {
    /// The backend and its storage are operational.
    pub fn ok() -> Self {
        Self { status: "ok" }
    }

    /// Storage is unreachable; mutations will fail until it returns.
    pub fn degraded() -> Self {
        Self { status: "degraded" }
    }
}
