use std::collections::BTreeSet;
use std::time::Duration;

/// Retry policy applied by the `http.*` step kinds to their own calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts including the first one. `1` disables retries.
    pub max_attempts: usize,
    pub retry_statuses: BTreeSet<u16>,
    pub base_delay: Duration,
    pub factor: f64,
    pub max_delay: Duration,
    /// Extra headers consulted after `Retry-After`, in order.
    pub vendor_headers: Vec<RetryAfterHeader>,
    /// POST and PATCH are sent once unless this is set, since a failed attempt may
    /// already have reached the upstream.
    pub retry_non_idempotent: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_statuses: [408u16, 429, 502, 503, 504].into_iter().collect(),
            base_delay: Duration::from_millis(200),
            factor: 2.0,
            max_delay: Duration::from_secs(10),
            vendor_headers: Vec::new(),
            retry_non_idempotent: false,
        }
    }
}

impl RetryConfig {
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAfterHeader {
    pub name: String,
    pub format: RetryAfterFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAfterFormat {
    DeltaSeconds,
    UnixSeconds,
    HttpDate,
}
