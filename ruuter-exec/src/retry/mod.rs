mod config;
mod decision;
mod headers;

pub use config::{RetryAfterFormat, RetryAfterHeader, RetryConfig};
pub use decision::{decide_retry, AttemptOutcome, RetryDecision, RetryReason};
pub use headers::parse_retry_after;
