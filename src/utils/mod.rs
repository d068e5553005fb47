//! # Utility Modules
//!
//! - **Constants** (`constant`) - Default thresholds and timings
//! - **Config** (`config`) - Environment-driven configuration
//! - **Shutdown** (`shutdown`) - Signal handling for graceful shutdown

pub mod config;
pub mod constant;
pub mod shutdown;
