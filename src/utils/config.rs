//! # Environment Configuration
//!
//! Reads the reporter's tunables from environment variables, falling back to
//! the defaults in [`crate::utils::constant`].
//!
//! ## Environment Variables
//!
//! - `SERVICE_NAME` - Service identifier (default `vk-api`)
//! - `HEALTH_MEMORY_THRESHOLD_MB` - Resident memory threshold in MB (default `500`)
//! - `HEALTH_CPU_SAMPLE_MS` - CPU sampling window in milliseconds (default `100`)
//! - `HEALTH_DB_TIMEOUT_SECS` - Database validation timeout in seconds (default `5`)
//! - `HEALTH_PROCESS_METRICS` - `off`, `false` or `0` disables process metrics

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::ConfigError;
use crate::utils::constant::*;

/// Tunables for the health handlers.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Reported as `service` in health bodies.
    pub service_name: String,
    pub memory_threshold_mb: f64,
    pub cpu_sample_interval: Duration,
    pub database_timeout: Duration,
    /// Whether the process-metrics provider should be resolved at startup.
    pub process_metrics_enabled: bool,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            memory_threshold_mb: DEFAULT_MEMORY_THRESHOLD_MB,
            cpu_sample_interval: DEFAULT_CPU_SAMPLE_INTERVAL,
            database_timeout: DEFAULT_DATABASE_TIMEOUT,
            process_metrics_enabled: true,
        }
    }
}

impl HealthConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let service_name = lookup("SERVICE_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.service_name);

        let memory_threshold_mb = parse_var(&lookup, "HEALTH_MEMORY_THRESHOLD_MB")?
            .unwrap_or(defaults.memory_threshold_mb);
        if !memory_threshold_mb.is_finite() || memory_threshold_mb < 0.0 {
            return Err(ConfigError::Invalid {
                name: "HEALTH_MEMORY_THRESHOLD_MB",
                value: memory_threshold_mb.to_string(),
            });
        }

        let cpu_sample_interval = parse_var::<u64, _>(&lookup, "HEALTH_CPU_SAMPLE_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.cpu_sample_interval);

        let database_timeout = parse_var::<u64, _>(&lookup, "HEALTH_DB_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.database_timeout);

        let process_metrics_enabled = match lookup("HEALTH_PROCESS_METRICS") {
            None => true,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "off" | "false" | "0" => false,
                "on" | "true" | "1" | "" => true,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HEALTH_PROCESS_METRICS",
                        value: raw,
                    });
                }
            },
        };

        let config = Self {
            service_name,
            memory_threshold_mb,
            cpu_sample_interval,
            database_timeout,
            process_metrics_enabled,
        };
        debug!(?config, "Loaded health configuration");
        Ok(config)
    }

    /// Prefix of every key in the metrics report, e.g. `vk-api` becomes `vk.api`.
    pub fn metric_prefix(&self) -> String {
        self.service_name.replace('-', ".")
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = HealthConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.service_name, "vk-api");
        assert_eq!(config.memory_threshold_mb, 500.0);
        assert_eq!(config.cpu_sample_interval, Duration::from_millis(100));
        assert_eq!(config.database_timeout, Duration::from_secs(5));
        assert!(config.process_metrics_enabled);
        assert_eq!(config.metric_prefix(), "vk.api");
    }

    #[test]
    fn overrides_are_parsed() {
        let config = HealthConfig::from_lookup(lookup_from(&[
            ("SERVICE_NAME", "billing-api-v2"),
            ("HEALTH_MEMORY_THRESHOLD_MB", "1024.5"),
            ("HEALTH_CPU_SAMPLE_MS", "250"),
            ("HEALTH_DB_TIMEOUT_SECS", "2"),
            ("HEALTH_PROCESS_METRICS", "off"),
        ]))
        .unwrap();

        assert_eq!(config.metric_prefix(), "billing.api.v2");
        assert_eq!(config.memory_threshold_mb, 1024.5);
        assert_eq!(config.cpu_sample_interval, Duration::from_millis(250));
        assert_eq!(config.database_timeout, Duration::from_secs(2));
        assert!(!config.process_metrics_enabled);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = HealthConfig::from_lookup(lookup_from(&[("HEALTH_CPU_SAMPLE_MS", "fast")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "HEALTH_CPU_SAMPLE_MS",
                ..
            }
        ));

        let err = HealthConfig::from_lookup(lookup_from(&[("HEALTH_MEMORY_THRESHOLD_MB", "-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
