//! # Application Constants
//!
//! Default thresholds and timings for the health checks. Each one can be
//! overridden through the environment, see [`crate::utils::config`].

use std::time::Duration;

/// Service identifier reported in health bodies and used as the metric prefix.
pub const DEFAULT_SERVICE_NAME: &str = "vk-api";

/// Address the binary listens on when `BIND_ADDRESS` is unset.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8090";

/// Resident memory above which the detailed check reports `degraded`.
pub const DEFAULT_MEMORY_THRESHOLD_MB: f64 = 500.0;

/// Window over which process CPU usage is measured.
pub const DEFAULT_CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on the database validation round-trip.
pub const DEFAULT_DATABASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Filesystem whose usage is reported as `disk_percent`.
pub const DISK_USAGE_PATH: &str = "/";

/// Value of `metrics.note` when no process-metrics provider is present.
pub const METRICS_UNAVAILABLE_NOTE: &str = "metrics provider unavailable";

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
