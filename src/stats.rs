//! Pool statistics and health reporting
//!
//! Snapshots are serializable so a health endpoint can expose them as JSON.

use serde::Serialize;

/// Point-in-time connection pool statistics
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub total_connections: u32,
    pub idle_connections: u32,
    pub active_connections: u32,
    pub acquire_count: u64,
    pub acquire_errors: u64,
    pub uptime_secs: u64,
}

impl PoolStats {
    /// Acquisition error rate as a percentage
    pub fn error_rate(&self) -> f64 {
        if self.acquire_count > 0 {
            (self.acquire_errors as f64 / self.acquire_count as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Pool utilization as a percentage (active / total)
    pub fn utilization(&self) -> f64 {
        if self.total_connections > 0 {
            (self.active_connections as f64 / self.total_connections as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Outcome of a timed connectivity probe against the engine
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub reachable: bool,
    pub check_duration_ms: u64,
    pub error_rate: f64,
    pub stats: PoolStats,
}

impl HealthReport {
    /// A reachable database with a sub-second probe and a low acquisition
    /// error rate counts as healthy.
    pub fn is_healthy(&self) -> bool {
        self.reachable && self.check_duration_ms < 1000 && self.error_rate < 5.0
    }
}
