// handlers/public/service.rs - GET / and GET /health

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Creations API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "ai": "/api/ai/* (protected - metered generation)",
                "user": "/api/user/* (protected - creations and likes)",
                "health": "/health (public)",
            }
        }
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub database: &'static str,
}

/// `{success: true, data: {status, timestamp, database}}`
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub data: HealthStatus,
}

/// GET /health - datastore ping
pub async fn health(State(state): State<AppState>) -> ApiResult<HealthReport> {
    if let Err(e) = state.gateway.ledger().ping().await {
        tracing::warn!(error = %e, "health check failed");
        return Err(ApiError::service_unavailable("Database unavailable"));
    }

    Ok(ApiResponse::success(HealthReport {
        data: HealthStatus {
            status: "ok",
            timestamp: Utc::now(),
            database: "ok",
        },
    }))
}
