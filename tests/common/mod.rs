#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use health_reporter::error::{MetricsError, ProbeError};
use health_reporter::services::database::DatabaseProbe;
use health_reporter::services::process_metrics::{MetricsProvider, ProcessMetrics, ProcessSample};
use health_reporter::utils::config::HealthConfig;
use tokio::net::TcpListener;

pub const MB: u64 = 1024 * 1024;

/// A scripted database probe that counts how often it was pinged.
#[derive(Debug, Default)]
pub struct MockDatabase {
    failing: AtomicBool,
    pings: AtomicUsize,
}

impl MockDatabase {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let db = Self::default();
        db.failing.store(true, Ordering::SeqCst);
        Arc::new(db)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn ping_count(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseProbe for MockDatabase {
    async fn ping(&self) -> Result<(), ProbeError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(ProbeError::Db(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

/// A process-metrics provider returning a fixed sample, or failing on demand.
#[derive(Debug)]
pub struct MockMetrics {
    pub sample: ProcessSample,
    pub disk_percent: f64,
    pub failing: bool,
    pub disk_failing: bool,
}

impl MockMetrics {
    pub fn with_memory_mb(memory_mb: u64) -> Self {
        Self {
            sample: ProcessSample {
                memory_bytes: memory_mb * MB,
                memory_percent: 3.25678,
                cpu_percent: 12.3456,
                connections: 4,
                threads: 8,
                start_time: unix_now() - 120,
            },
            disk_percent: 41.23456,
            failing: false,
            disk_failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::with_memory_mb(100)
        }
    }

    /// Process sampling works, only the disk lookup fails.
    pub fn failing_disk(memory_mb: u64) -> Self {
        Self {
            disk_failing: true,
            ..Self::with_memory_mb(memory_mb)
        }
    }

    pub fn provider(self) -> MetricsProvider {
        MetricsProvider::Available(Arc::new(self))
    }
}

#[async_trait]
impl ProcessMetrics for MockMetrics {
    async fn sample(&self, _interval: Duration) -> Result<ProcessSample, MetricsError> {
        if self.failing {
            return Err(MetricsError::ProcessNotFound);
        }
        Ok(self.sample.clone())
    }

    async fn disk_usage_percent(&self, path: &str) -> Result<f64, MetricsError> {
        if self.failing || self.disk_failing {
            return Err(MetricsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("statvfs {path}"),
            )));
        }
        Ok(self.disk_percent)
    }
}

pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn test_config() -> HealthConfig {
    HealthConfig {
        cpu_sample_interval: Duration::from_millis(1),
        ..HealthConfig::default()
    }
}

/// Spawns the application on a random port and returns its address.
pub async fn spawn_app(database: Arc<MockDatabase>, metrics: MetricsProvider) -> String {
    spawn_app_with_config(database, metrics, test_config()).await
}

pub async fn spawn_app_with_config(
    database: Arc<MockDatabase>,
    metrics: MetricsProvider,
    config: HealthConfig,
) -> String {
    // Randomly choose an available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");

    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let app = health_reporter::app_with_collaborators(database, metrics, config);
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}
