use std::collections::BTreeMap;

use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Aggregate status of a health report.
///
/// Variants are ordered by severity so that folding checks is a `max`:
/// `unhealthy` beats `degraded`, which beats `healthy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Ok,
    /// A resource is over its threshold
    Degraded(String),
    Failed(String),
}

impl CheckOutcome {
    /// Value reported under `checks` in the response body.
    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::Ok => "ok",
            CheckOutcome::Degraded(_) => "high",
            CheckOutcome::Failed(_) => "failed",
        }
    }
}

impl Serialize for CheckOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A named check together with how much its failure matters.
#[derive(Debug, Clone)]
pub struct Check {
    pub name: &'static str,
    pub outcome: CheckOutcome,
    /// Failure of a critical check makes the service unhealthy; failure of
    /// a non-critical one is reported without affecting status.
    pub critical: bool,
}

impl Check {
    pub fn critical(name: &'static str, outcome: CheckOutcome) -> Self {
        Self {
            name,
            outcome,
            critical: true,
        }
    }

    pub fn informational(name: &'static str, outcome: CheckOutcome) -> Self {
        Self {
            name,
            outcome,
            critical: false,
        }
    }

    /// Status this check contributes to the aggregate.
    pub fn severity(&self) -> HealthStatus {
        match (&self.outcome, self.critical) {
            (CheckOutcome::Ok, _) => HealthStatus::Healthy,
            (CheckOutcome::Degraded(_), _) => HealthStatus::Degraded,
            (CheckOutcome::Failed(_), true) => HealthStatus::Unhealthy,
            (CheckOutcome::Failed(_), false) => HealthStatus::Healthy,
        }
    }
}

/// Folds check severities into an overall status, starting from healthy.
pub fn derive_status<'a, I>(checks: I) -> HealthStatus
where
    I: IntoIterator<Item = &'a Check>,
{
    checks
        .into_iter()
        .map(Check::severity)
        .fold(HealthStatus::Healthy, HealthStatus::max)
}

/// Value of a metric in either report shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Integer(value)
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

/// Body of `/health` and `/health/detailed`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<BTreeMap<&'static str, CheckOutcome>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<&'static str, MetricValue>>,
}

impl HealthReport {
    /// Liveness body: healthy, no checks, no metrics.
    pub fn alive(service: &str) -> Self {
        Self {
            status: HealthStatus::Healthy,
            timestamp: now_iso8601(),
            service: service.to_string(),
            checks: None,
            metrics: None,
        }
    }

    /// Detailed body built from the checks that ran and the collected metrics.
    pub fn detailed(
        service: &str,
        checks: &[Check],
        metrics: BTreeMap<&'static str, MetricValue>,
    ) -> Self {
        Self {
            status: derive_status(checks),
            timestamp: now_iso8601(),
            service: service.to_string(),
            checks: Some(
                checks
                    .iter()
                    .map(|check| (check.name, check.outcome.clone()))
                    .collect(),
            ),
            metrics: Some(metrics),
        }
    }
}

/// Flat body of `/health/metrics`, keyed by dotted metric name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MetricsReport {
    entries: BTreeMap<String, MetricValue>,
    #[serde(skip)]
    prefix: String,
}

impl MetricsReport {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            entries: BTreeMap::new(),
            prefix: prefix.into(),
        }
    }

    /// Records `<prefix>.<name>`.
    pub fn insert(&mut self, name: &str, value: impl Into<MetricValue>) {
        self.entries
            .insert(format!("{}.{}", self.prefix, name), value.into());
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Current UTC time in RFC 3339 form.
pub fn now_iso8601() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Current UTC time in Unix seconds.
pub fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
