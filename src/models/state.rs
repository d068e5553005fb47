use std::sync::Arc;

use tracing::{debug, info};

use crate::services::{database::DatabaseProbe, process_metrics::MetricsProvider};
use crate::utils::config::HealthConfig;

/// Application state shared across requests. Needs to be thread-safe.
///
/// Holds only read-only collaborators; every report is built fresh per request.
pub struct AppState {
    /// Database connectivity probe.
    pub database: Arc<dyn DatabaseProbe>,
    /// Process metrics capability, resolved at startup.
    pub metrics: MetricsProvider,
    pub config: HealthConfig,
}

impl AppState {
    /// Creates a new application state with the provided collaborators.
    ///
    /// # Arguments
    ///
    /// * `database` - Probe used by the detailed and metrics endpoints
    /// * `metrics` - Process metrics provider, or [`MetricsProvider::Unavailable`]
    /// * `config` - Thresholds and service identifier
    pub fn new(
        database: Arc<dyn DatabaseProbe>,
        metrics: MetricsProvider,
        config: HealthConfig,
    ) -> Self {
        info!(service = %config.service_name, "Initializing application state");
        debug!(
            metrics_provider = ?metrics,
            memory_threshold_mb = config.memory_threshold_mb,
            "Health reporter collaborators configured"
        );

        Self {
            database,
            metrics,
            config,
        }
    }
}
