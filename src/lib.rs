//! # Health Reporter
//!
//! Liveness, detailed health and monitoring metrics endpoints for an API
//! server, backed by an injected database probe and an optional process
//! metrics provider.
//!
//! ## Modules
//!
//! - [`handlers`] - HTTP request handlers for the three endpoints
//! - [`models`] - Report types, status precedence and shared state
//! - [`services`] - Database and process-metrics collaborators
//! - [`utils`] - Constants, configuration and shutdown handling

pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{Router, routing::get};
use sqlx::PgPool;

use crate::handlers::{detailed_health_check, health_check, metrics_endpoint};
use crate::models::AppState;
use crate::services::database::{DatabaseProbe, PgProbe};
use crate::services::process_metrics::MetricsProvider;
use crate::utils::config::HealthConfig;

/// Creates an Axum router backed by a PostgreSQL pool.
///
/// The process-metrics provider is resolved once here, according to
/// `config.process_metrics_enabled` and platform support.
pub fn app(db_pool: PgPool, config: HealthConfig) -> Router {
    let probe = Arc::new(PgProbe::new(db_pool, config.database_timeout));
    let metrics = MetricsProvider::detect(config.process_metrics_enabled);
    app_with_collaborators(probe, metrics, config)
}

/// Creates an Axum router with explicitly injected collaborators.
///
/// # Arguments
///
/// * `database` - Probe used by `/health/detailed` and `/health/metrics`
/// * `metrics` - Process metrics provider, or [`MetricsProvider::Unavailable`]
/// * `config` - Service identifier and check thresholds
pub fn app_with_collaborators(
    database: Arc<dyn DatabaseProbe>,
    metrics: MetricsProvider,
    config: HealthConfig,
) -> Router {
    let state = Arc::new(AppState::new(database, metrics, config));

    Router::new()
        .route("/health", get(health_check))
        .route("/health/detailed", get(detailed_health_check))
        .route("/health/metrics", get(metrics_endpoint))
        .with_state(state)
}
