//! Health Handler
//!
//! 存活探针，不访问上游

use axum::Json;
use chrono::{SecondsFormat, Utc};

use crate::infrastructure::http::dto::HealthResponse;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
