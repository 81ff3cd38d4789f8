use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use crate::retry::config::RetryConfig;
use crate::retry::headers::parse_retry_after;

/// What happened on the last attempt.
#[derive(Debug, Clone, Copy)]
pub enum AttemptOutcome<'a> {
    Status {
        status: u16,
        headers: &'a BTreeMap<String, String>,
    },
    NetworkFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter { delay: Duration, reason: RetryReason },
    Stop { reason: RetryReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    AttemptsExhausted,
    NetworkFailure,
    HttpStatus(u16),
    RetryAfterHeader,
}

/// Decide if the call should be retried and how long to wait first.
///
/// `attempt_no` is 1-based. Backoff is `base * factor^(attempt_no - 1)` capped at
/// `max_delay`, with full jitter drawn from `rand_u64`.
pub fn decide_retry(
    cfg: &RetryConfig,
    attempt_no: usize,
    outcome: AttemptOutcome<'_>,
    now: SystemTime,
    rand_u64: impl Fn() -> u64,
) -> RetryDecision {
    let status = match outcome {
        AttemptOutcome::Status { status, .. } => Some(status),
        AttemptOutcome::NetworkFailure => None,
    };

    if let Some(status) = status {
        if !cfg.retry_statuses.contains(&status) {
            return RetryDecision::Stop {
                reason: RetryReason::HttpStatus(status),
            };
        }
    }

    if attempt_no >= cfg.max_attempts {
        return RetryDecision::Stop {
            reason: RetryReason::AttemptsExhausted,
        };
    }

    if let AttemptOutcome::Status { headers, .. } = outcome {
        if let Some(delay) = parse_retry_after(headers, &cfg.vendor_headers, now) {
            return RetryDecision::RetryAfter {
                delay: delay.min(cfg.max_delay),
                reason: RetryReason::RetryAfterHeader,
            };
        }
    }

    let exp = attempt_no.saturating_sub(1) as i32;
    let raw = (cfg.base_delay.as_millis() as f64) * cfg.factor.powi(exp);
    let raw_ms = raw.min(cfg.max_delay.as_millis() as f64).max(0.0) as u64;

    let jitter_ms = if raw_ms == 0 { 0 } else { rand_u64() % (raw_ms + 1) };
    RetryDecision::RetryAfter {
        delay: Duration::from_millis(jitter_ms),
        reason: status
            .map(RetryReason::HttpStatus)
            .unwrap_or(RetryReason::NetworkFailure),
    }
}
