//! Timeout configuration for outbound requests.

use std::time::Duration;

/// Default total timeout for a request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Timeout configuration for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout, applied by the transport.
    pub connect: Duration,
    /// Total time for one attempt, including reading the body.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self {
            connect: connect.min(total),
            total,
        }
    }

    /// Create from a single total timeout; connecting gets a quarter of it.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: total / 4,
            total,
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::from_total(Duration::from_secs(secs))
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(DEFAULT_TIMEOUT)
    }
}
