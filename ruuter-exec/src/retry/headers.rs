use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use httpdate::parse_http_date;

use crate::retry::config::{RetryAfterFormat, RetryAfterHeader};

/// Delay requested by the server, if any. `Retry-After` wins over vendor headers.
pub fn parse_retry_after(
    headers: &BTreeMap<String, String>,
    vendor_headers: &[RetryAfterHeader],
    now: SystemTime,
) -> Option<Duration> {
    if let Some(v) = get_header_ci(headers, "retry-after") {
        let v = v.trim();
        let parsed = match v.parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => parse_value(v, RetryAfterFormat::HttpDate, now),
        };
        if parsed.is_some() {
            return parsed;
        }
    }

    vendor_headers.iter().find_map(|vh| {
        get_header_ci(headers, &vh.name).and_then(|v| parse_value(v.trim(), vh.format, now))
    })
}

fn parse_value(v: &str, format: RetryAfterFormat, now: SystemTime) -> Option<Duration> {
    match format {
        RetryAfterFormat::DeltaSeconds => v.parse::<u64>().ok().map(Duration::from_secs),
        RetryAfterFormat::UnixSeconds => {
            let ts = v.parse::<u64>().ok()?;
            (SystemTime::UNIX_EPOCH + Duration::from_secs(ts))
                .duration_since(now)
                .ok()
        }
        RetryAfterFormat::HttpDate => parse_http_date(v).ok()?.duration_since(now).ok(),
    }
}

fn get_header_ci<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
