//! # Health Check Handler
//!
//! Liveness endpoint for load balancers and orchestrators. It performs no
//! I/O, so it keeps answering while the database or other dependencies
//! are down.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::{debug, instrument};

use crate::models::{AppState, HealthReport};

/// Liveness probe.
///
/// GET /health
///
/// # Returns
///
/// Always `200 OK` with `{status: "healthy", timestamp, service}`.
#[instrument(skip_all)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    debug!("Health check endpoint accessed");
    Json(HealthReport::alive(&state.config.service_name))
}
