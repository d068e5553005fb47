//! # Detailed Health Handler
//!
//! Dependency- and resource-aware health report. Runs the database check
//! and, when a process-metrics provider is present, collects resource
//! metrics and applies the memory threshold. Each failure is folded into a
//! check value; the aggregate status follows `unhealthy > degraded > healthy`.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::{error, info, instrument};

use crate::error::MetricsError;
use crate::models::{
    AppState, Check, CheckOutcome, HealthReport, HealthStatus, MetricValue, round2,
};
use crate::services::database::database_check;
use crate::services::process_metrics::{MetricsProvider, ProcessSample};
use crate::utils::config::HealthConfig;
use crate::utils::constant::*;

/// Detailed health check.
///
/// GET /health/detailed
///
/// # Returns
///
/// - `200 OK` with a `healthy` or `degraded` [`HealthReport`]
/// - `503 Service Unavailable` with an `unhealthy` report (database check failed)
#[instrument(skip_all)]
pub async fn detailed_health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthReport>) {
    let mut checks = vec![Check::critical(
        "database",
        database_check(state.database.as_ref()).await,
    )];
    let mut metrics: BTreeMap<&'static str, MetricValue> = BTreeMap::new();

    match &state.metrics {
        MetricsProvider::Unavailable => {
            metrics.insert("note", METRICS_UNAVAILABLE_NOTE.into());
        }
        MetricsProvider::Available(provider) => {
            let provider = provider.as_ref();
            let collected = async {
                let sample = provider.sample(state.config.cpu_sample_interval).await?;
                checks.push(record_process(&sample, &state.config, &mut metrics));

                let disk_percent = provider.disk_usage_percent(DISK_USAGE_PATH).await?;
                metrics.insert("disk_percent", round2(disk_percent).into());
                Ok::<(), MetricsError>(())
            }
            .await;

            if let Err(e) = collected {
                error!(error = %e, "Metrics collection failed");
                checks.push(Check::informational(
                    "metrics",
                    CheckOutcome::Failed(e.to_string()),
                ));
            }
        }
    }

    let report = HealthReport::detailed(&state.config.service_name, &checks, metrics);
    let code = if report.status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    info!(status = ?report.status, %code, "Detailed health check completed");
    (code, Json(report))
}

/// Writes the process figures into `metrics` and returns the memory check.
fn record_process(
    sample: &ProcessSample,
    config: &HealthConfig,
    metrics: &mut BTreeMap<&'static str, MetricValue>,
) -> Check {
    let memory_mb = sample.memory_bytes as f64 / BYTES_PER_MB;

    metrics.insert("memory_mb", round2(memory_mb).into());
    metrics.insert("memory_percent", round2(sample.memory_percent).into());
    metrics.insert("cpu_percent", round2(sample.cpu_percent).into());
    metrics.insert("connections", sample.connections.into());
    metrics.insert("threads", sample.threads.into());

    let outcome = if memory_mb > config.memory_threshold_mb {
        CheckOutcome::Degraded(format!(
            "resident memory {memory_mb:.2} MB exceeds {} MB",
            config.memory_threshold_mb
        ))
    } else {
        CheckOutcome::Ok
    };

    Check::informational("memory", outcome)
}
