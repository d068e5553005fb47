//! # Database Probe
//!
//! Connectivity check used by the detailed health and metrics endpoints.
//! The trait lets the router run against a real PostgreSQL pool in
//! production and against a scripted probe in tests.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use crate::error::ProbeError;
use crate::models::CheckOutcome;

/// Trait for database connectivity checks
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Acquires a connection and runs a side-effect-free validation query.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if no connection can be obtained, the query
    /// fails, or the round-trip does not finish in time.
    async fn ping(&self) -> Result<(), ProbeError>;
}

/// PostgreSQL implementation backed by an sqlx pool.
pub struct PgProbe {
    pool: PgPool,
    timeout: Duration,
}

impl PgProbe {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl DatabaseProbe for PgProbe {
    #[instrument(skip_all)]
    async fn ping(&self) -> Result<(), ProbeError> {
        let round_trip = async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query("SELECT 1").execute(&mut *conn).await?;
            Ok::<(), ProbeError>(())
        };

        tokio::time::timeout(self.timeout, round_trip)
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))??;

        debug!("Database validation query succeeded");
        Ok(())
    }
}

/// Runs the probe once and records the result as a check outcome.
///
/// Errors are logged here and never propagated to the handler.
pub async fn database_check(probe: &dyn DatabaseProbe) -> CheckOutcome {
    match probe.ping().await {
        Ok(()) => CheckOutcome::Ok,
        Err(e) => {
            error!(error = %e, "Database health check failed");
            CheckOutcome::Failed(e.to_string())
        }
    }
}
