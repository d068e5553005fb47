//! # Metrics Handler
//!
//! Flat, dotted-key metrics for an external monitoring agent. Always answers
//! `200 OK`; partial failures show up as flag metrics.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::{error, instrument, warn};

use crate::models::{AppState, MetricsReport, now_unix};
use crate::services::process_metrics::MetricsProvider;

/// Monitoring metrics.
///
/// GET /health/metrics
///
/// Keys are prefixed with the service identifier, dashes turned into dots
/// (`vk-api` reports `vk.api.status`, `vk.api.memory.rss`, ...).
///
/// # Returns
///
/// Always `200 OK` with a flat [`MetricsReport`].
#[instrument(skip_all)]
pub async fn metrics_endpoint(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<MetricsReport>) {
    let mut report = MetricsReport::new(state.config.metric_prefix());
    report.insert("status", 1i64);
    report.insert("timestamp", now_unix());

    match &state.metrics {
        MetricsProvider::Unavailable => {
            report.insert("metrics.available", 0i64);
        }
        MetricsProvider::Available(provider) => {
            match provider.sample(state.config.cpu_sample_interval).await {
                Ok(sample) => {
                    let uptime = (now_unix() - sample.start_time as i64).max(0);

                    report.insert("memory.rss", sample.memory_bytes);
                    report.insert("memory.percent", sample.memory_percent);
                    report.insert("cpu.percent", sample.cpu_percent);
                    report.insert("connections.count", sample.connections);
                    report.insert("threads.count", sample.threads);
                    report.insert("uptime.seconds", uptime);

                    let database_status = match state.database.ping().await {
                        Ok(()) => 1i64,
                        Err(e) => {
                            warn!(error = %e, "Database unreachable while collecting metrics");
                            0
                        }
                    };
                    report.insert("database.status", database_status);
                }
                Err(e) => {
                    error!(error = %e, "Metrics endpoint failed");
                    report.insert("metrics.error", 1i64);
                }
            }
        }
    }

    (StatusCode::OK, Json(report))
}
