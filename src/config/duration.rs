//! Duration strings.
//!
//! Accepts a sequence of `<number><unit>` pairs such as `300ms`, `5m`,
//! `1.5h` or `1h30m`. Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`
//! and `h`. A bare `0` is accepted; negative durations are not.

use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Poll interval used when none (or an unusable one) is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("negative duration {0:?}")]
    Negative(String),
    #[error("invalid number in duration {0:?}")]
    InvalidNumber(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("duration {0:?} is out of range")]
    Overflow(String),
}

/// Parse a duration string.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }

    let unsigned = match trimmed.strip_prefix('-') {
        Some("0") => return Ok(Duration::ZERO),
        Some(_) => return Err(DurationError::Negative(input.to_string())),
        None => trimmed.strip_prefix('+').unwrap_or(trimmed),
    };
    if unsigned == "0" {
        return Ok(Duration::ZERO);
    }

    let is_numeric = |c: char| c.is_ascii_digit() || c == '.';
    let mut rest = unsigned;
    let mut total_nanos = 0f64;

    while !rest.is_empty() {
        let number_end = rest.find(|c: char| !is_numeric(c)).unwrap_or(rest.len());
        let number: f64 = rest[..number_end]
            .parse()
            .map_err(|_| DurationError::InvalidNumber(input.to_string()))?;
        rest = &rest[number_end..];

        let unit_end = rest.find(is_numeric).unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        let nanos_per_unit = match unit {
            "" => return Err(DurationError::MissingUnit(input.to_string())),
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            other => {
                return Err(DurationError::UnknownUnit {
                    unit: other.to_string(),
                    input: input.to_string(),
                });
            }
        };
        total_nanos += number * nanos_per_unit;
        rest = &rest[unit_end..];
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(DurationError::Overflow(input.to_string()));
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

/// Resolve the configured poll interval.
///
/// Missing, unparseable or zero values are reported and replaced with
/// [`DEFAULT_POLL_INTERVAL`].
pub fn resolve_poll_interval(raw: Option<&str>) -> Duration {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        error!("poll_interval not provided in config, defaulting to 5 minutes");
        return DEFAULT_POLL_INTERVAL;
    };

    match parse_duration(raw) {
        Ok(interval) if interval.is_zero() => {
            error!(duration = %raw, "poll_interval must be positive, defaulting to 5 minutes");
            DEFAULT_POLL_INTERVAL
        }
        Ok(interval) => interval,
        Err(e) => {
            error!(duration = %raw, error = %e, "Error parsing poll_interval, defaulting to 5 minutes");
            DEFAULT_POLL_INTERVAL
        }
    }
}
