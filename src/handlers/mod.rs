//! # HTTP Request Handlers
//!
//! ## Available Handlers
//!
//! - **Health Check** (`health_check`) - Liveness probe, no I/O
//! - **Detailed Health** (`detailed_health`) - Database and resource checks
//! - **Metrics** (`metrics`) - Flat metrics for a monitoring agent

mod detailed_health;
mod health_check;
mod metrics;

pub use detailed_health::*;
pub use health_check::*;
pub use metrics::*;
