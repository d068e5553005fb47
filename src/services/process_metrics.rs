//! # Process Metrics
//!
//! Resource statistics for the running process: resident memory, CPU usage,
//! open sockets, threads, uptime and root disk usage.
//!
//! The provider is optional. It is resolved once at startup into a
//! [`MetricsProvider`], so handlers branch on a variant instead of probing
//! for the capability on every request.
//!
//! ## Implementations
//!
//! - [`SysinfoMetrics`] - Production implementation using `sysinfo`, with
//!   `procfs` for socket counts on Linux and `fs2` for disk usage

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::task;
use tracing::{info, instrument, trace, warn};

use crate::error::MetricsError;

/// One reading of the current process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    /// Resident set size in bytes
    pub memory_bytes: u64,
    /// Resident memory as a percentage of total system memory
    pub memory_percent: f64,
    /// CPU usage over the sampling window; may exceed 100 on multi-core hosts
    pub cpu_percent: f64,
    /// Open TCP and UDP sockets, IPv4 and IPv6
    pub connections: u64,
    pub threads: u64,
    /// Process start time in Unix seconds
    pub start_time: u64,
}

/// Trait for process statistics providers
#[async_trait]
pub trait ProcessMetrics: Send + Sync {
    /// Samples the current process, measuring CPU usage over `interval`.
    async fn sample(&self, interval: Duration) -> Result<ProcessSample, MetricsError>;

    /// Used space of the filesystem holding `path`, in percent.
    async fn disk_usage_percent(&self, path: &str) -> Result<f64, MetricsError>;
}

/// Availability of the process-metrics capability, fixed at startup.
#[derive(Clone)]
pub enum MetricsProvider {
    Available(Arc<dyn ProcessMetrics>),
    Unavailable,
}

impl MetricsProvider {
    /// Resolves the provider for this platform.
    ///
    /// Falls back to [`MetricsProvider::Unavailable`] when disabled by
    /// configuration or when `sysinfo` does not support the host.
    pub fn detect(enabled: bool) -> Self {
        if !enabled {
            info!("Process metrics disabled by configuration");
            return Self::Unavailable;
        }
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            warn!("Process metrics are not supported on this platform");
            return Self::Unavailable;
        }
        match SysinfoMetrics::new() {
            Ok(metrics) => {
                info!(pid = %metrics.pid, "Process metrics provider available");
                Self::Available(Arc::new(metrics))
            }
            Err(e) => {
                warn!(error = %e, "Process metrics provider unavailable");
                Self::Unavailable
            }
        }
    }
}

impl std::fmt::Debug for MetricsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available"),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// `sysinfo`-backed statistics for the current process.
pub struct SysinfoMetrics {
    pid: Pid,
}

impl SysinfoMetrics {
    /// # Errors
    ///
    /// Returns [`MetricsError::Unsupported`] if the current PID cannot be determined.
    pub fn new() -> Result<Self, MetricsError> {
        let pid = sysinfo::get_current_pid().map_err(MetricsError::Unsupported)?;
        Ok(Self { pid })
    }
}

fn refresh_process(system: &mut System, pid: Pid) {
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::everything(),
    );
}

/// Second refresh after the CPU window, then reads every figure.
fn read_sample(mut system: System, pid: Pid) -> Result<ProcessSample, MetricsError> {
    refresh_process(&mut system, pid);

    let process = system.process(pid).ok_or(MetricsError::ProcessNotFound)?;

    let memory_bytes = process.memory();
    let total_memory = system.total_memory();
    let memory_percent = if total_memory == 0 {
        0.0
    } else {
        memory_bytes as f64 / total_memory as f64 * 100.0
    };

    Ok(ProcessSample {
        memory_bytes,
        memory_percent,
        cpu_percent: f64::from(process.cpu_usage()),
        connections: inet_connection_count()?,
        threads: process.tasks().map_or(1, |tasks| tasks.len() as u64),
        start_time: process.start_time(),
    })
}

#[async_trait]
impl ProcessMetrics for SysinfoMetrics {
    #[instrument(skip(self))]
    async fn sample(&self, interval: Duration) -> Result<ProcessSample, MetricsError> {
        let pid = self.pid;

        // CPU usage is the delta between two refreshes
        let system = task::spawn_blocking(move || {
            let mut system = System::new();
            system.refresh_memory();
            refresh_process(&mut system, pid);
            system
        })
        .await?;

        tokio::time::sleep(interval).await;

        let sample = task::spawn_blocking(move || read_sample(system, pid)).await??;
        trace!(?sample, "Sampled current process");
        Ok(sample)
    }

    #[instrument(skip(self))]
    async fn disk_usage_percent(&self, path: &str) -> Result<f64, MetricsError> {
        let path = PathBuf::from(path);
        task::spawn_blocking(move || -> Result<f64, MetricsError> {
            let total = fs2::total_space(&path)?;
            let free = fs2::free_space(&path)?;
            let available = fs2::available_space(&path)?;

            // blocks reserved for root count neither as used nor as available
            let used = total.saturating_sub(free);
            let usable = used + available;
            if usable == 0 {
                return Ok(0.0);
            }
            Ok(used as f64 / usable as f64 * 100.0)
        })
        .await?
    }
}

/// Number of TCP/UDP sockets (IPv4 and IPv6) held by this process.
#[cfg(target_os = "linux")]
fn inet_connection_count() -> Result<u64, MetricsError> {
    use std::collections::HashSet;

    use procfs::process::{FDTarget, Process};

    let proc_err = |e: procfs::ProcError| MetricsError::Proc(e.to_string());

    let mut inet_inodes = HashSet::new();
    match procfs::net::tcp() {
        Ok(entries) => inet_inodes.extend(entries.into_iter().map(|e| e.inode)),
        Err(e) => trace!(error = %e, "No tcp table"),
    }
    match procfs::net::tcp6() {
        Ok(entries) => inet_inodes.extend(entries.into_iter().map(|e| e.inode)),
        Err(e) => trace!(error = %e, "No tcp6 table"),
    }
    match procfs::net::udp() {
        Ok(entries) => inet_inodes.extend(entries.into_iter().map(|e| e.inode)),
        Err(e) => trace!(error = %e, "No udp table"),
    }
    match procfs::net::udp6() {
        Ok(entries) => inet_inodes.extend(entries.into_iter().map(|e| e.inode)),
        Err(e) => trace!(error = %e, "No udp6 table"),
    }

    let process = Process::myself().map_err(proc_err)?;
    let mut count = 0;
    for fd in process.fd().map_err(proc_err)? {
        // descriptors may close while being listed
        let Ok(fd) = fd else {
            continue;
        };
        if let FDTarget::Socket(inode) = fd.target {
            if inet_inodes.contains(&inode) {
                count += 1;
            }
        }
    }
    Ok(count)
}

#[cfg(not(target_os = "linux"))]
fn inet_connection_count() -> Result<u64, MetricsError> {
    Ok(0)
}
