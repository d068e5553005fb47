mod report;
mod state;

pub use report::{
    Check, CheckOutcome, HealthReport, HealthStatus, MetricValue, MetricsReport, derive_status,
    now_iso8601, now_unix, round2,
};
pub use state::AppState;
