//! # Centralized Error Types
//!
//! Errors produced by the collaborators the health handlers depend on.
//! None of these ever reach a client: handlers fold each failure into a
//! check value or metric flag, so every endpoint still answers with
//! well-formed JSON.

use std::time::Duration;

use thiserror::Error;

/// Failure of the database validation query.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("validation query timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure while reading statistics for the current process.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("current process not found in process table")]
    ProcessNotFound,

    #[error("procfs error: {0}")]
    Proc(String),

    #[error("metrics task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("metrics unsupported: {0}")]
    Unsupported(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid startup configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{name}`: {value:?}")]
    Invalid { name: &'static str, value: String },
}
