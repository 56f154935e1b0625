//! Pool statistics types

use serde::{Deserialize, Serialize};

/// Statistics about a connection pool's current state
///
/// At every observable point `total == idle + active`, and `active`
/// never exceeds `max_size`, the configured capacity the snapshot was
/// taken against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Total number of live connections (idle + active)
    total: usize,
    /// Number of idle connections available in the pool
    idle: usize,
    /// Number of connections currently leased out
    active: usize,
    /// Number of requests waiting for a connection
    waiting: usize,
    /// Configured maximum pool size
    max_size: usize,
}

impl PoolStats {
    /// Create new pool statistics
    pub fn new(total: usize, idle: usize, active: usize, waiting: usize, max_size: usize) -> Self {
        Self {
            total,
            idle,
            active,
            waiting,
            max_size,
        }
    }

    /// Get the total number of live connections
    pub fn total(&self) -> usize {
        self.total
    }

    /// Get the number of idle connections
    pub fn idle(&self) -> usize {
        self.idle
    }

    /// Get the number of active (leased) connections
    pub fn active(&self) -> usize {
        self.active
    }

    /// Get the number of waiting requests
    pub fn waiting(&self) -> usize {
        self.waiting
    }

    /// Get the configured maximum pool size
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Leased share of the configured capacity (0.0 to 1.0)
    ///
    /// Returns 0.0 if `max_size` is 0 to avoid division by zero.
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.active as f64 / self.max_size as f64
        }
    }

    /// Whether every slot of the configured capacity is leased out.
    ///
    /// A pool with no idle entries but room to grow is not full; the
    /// next acquire opens a new connection instead of waiting.
    pub fn is_full(&self) -> bool {
        self.max_size > 0 && self.active >= self.max_size
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new(0, 0, 0, 0, 0)
    }
}
