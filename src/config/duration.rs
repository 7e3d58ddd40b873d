//! Serde helper for duration strings such as "10s", "500ms" or "5m".

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Suffixes and their length in seconds. Longer suffixes come first so
/// "ms" is not read as minutes.
const UNITS: [(&str, f64); 6] = [
    ("ms", 1e-3),
    ("us", 1e-6),
    ("ns", 1e-9),
    ("s", 1.0),
    ("m", 60.0),
    ("h", 3600.0),
];

/// Missing or empty values deserialize to `Duration::ZERO` so callers can
/// substitute their own default.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse_duration(&s).map_err(serde::de::Error::custom))
        .unwrap_or(Ok(Duration::ZERO))
}

pub(crate) fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Duration::ZERO);
    }

    let (number, seconds_per_unit) = UNITS
        .iter()
        .find_map(|(suffix, secs)| raw.strip_suffix(suffix).map(|n| (n, *secs)))
        .unwrap_or((raw, 1.0));

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration {:?}", raw))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("invalid duration {:?}", raw));
    }

    Ok(Duration::from_secs_f64(value * seconds_per_unit))
}
