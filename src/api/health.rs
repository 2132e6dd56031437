//! Health check endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

/// Health response; `checks` is only present on readiness
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Unavailable,
}

/// Individual component health check
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Service banner at `/`
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
}

pub async fn root() -> impl IntoResponse {
    Json(BannerResponse {
        message: "Sales Report API",
    })
}

/// Returns 200 while the process is serving requests
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Ok,
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness: the salesperson directory must answer
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let directory = match state.salesperson_service.list().await {
        Ok(_) => HealthCheck {
            name: "salesperson_directory".to_string(),
            status: HealthStatus::Ok,
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Salesperson directory unavailable");
            HealthCheck {
                name: "salesperson_directory".to_string(),
                status: HealthStatus::Unavailable,
                message: Some("Directory lookup failed".to_string()),
            }
        }
    };

    let status = directory.status;
    let response = HealthResponse {
        status,
        checks: Some(vec![directory]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let code = match status {
        HealthStatus::Ok => StatusCode::OK,
        HealthStatus::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    };

    (code, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
