use std::time::{Duration, Instant};

use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::{Deserialize, Serialize};

use crate::response::{json_response, ApiResponse};

pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub timestamp: String,
    pub version: String,
    /// Elapsed time since start, e.g. `"12.345s"`.
    pub uptime: String,
    pub uptime_seconds: f64,
}

impl HealthStatus {
    pub fn since(started_at: Instant) -> Self {
        let uptime = started_at.elapsed();
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: API_VERSION.to_string(),
            uptime: format_uptime(uptime),
            uptime_seconds: uptime.as_secs_f64(),
        }
    }
}

pub fn format_uptime(uptime: Duration) -> String {
    format!("{:.3}s", uptime.as_secs_f64())
}

/// GET /health
pub async fn health_check(started_at: Instant) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::OK,
        &ApiResponse::ok("API is healthy", HealthStatus::since(started_at)),
    )
}
