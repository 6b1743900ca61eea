//! Millisecond values for timeout and slow settings
//!
//! Snapshots carry these either as plain numbers or as duration strings:
//! - `2000` → 2000 milliseconds
//! - `"500ms"` → 500 milliseconds
//! - `"2s"` / `"1.5s"` → 2000 / 1500 milliseconds
//! - `"1m"` → 60000 milliseconds
//! - `"1h"`, `"1d"`, `"1w"`, `"1y"` → hours, days, weeks, years
//! - `"300"` → 300 milliseconds

use serde::{Deserialize, Serialize};

/// Largest timeout a runnable accepts (2^31 - 1)
pub const MAX_TIMEOUT_MS: u64 = i32::MAX as u64;

/// A millisecond setting as it appears in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MillisValue {
    Whole(u64),
    Number(f64),
    Text(String),
}

impl MillisValue {
    /// Resolve to whole milliseconds.
    ///
    /// Negative numbers clamp to zero and fractions are truncated.
    pub fn to_millis(&self) -> Result<u64, String> {
        let ms = match self {
            Self::Whole(ms) => return Ok(*ms),
            Self::Number(n) => *n,
            Self::Text(s) => parse_millis(s)?,
        };
        Ok(if ms <= 0.0 { 0 } else { ms as u64 })
    }
}

impl From<u64> for MillisValue {
    fn from(ms: u64) -> Self {
        Self::Whole(ms)
    }
}

impl From<&str> for MillisValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Parse a duration string into (possibly fractional) milliseconds
pub fn parse_millis(s: &str) -> Result<f64, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // "ms" before "s" and "m" since it is the longer suffix
    let (number, scale) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1.0)
    } else {
        match s.char_indices().last() {
            Some((i, unit)) if unit.is_ascii_alphabetic() => (&s[..i], unit_scale(unit, s)?),
            _ => (s, 1.0),
        }
    };

    let n: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {s} (use 500ms, 2s, 1m or a number)"))?;
    if !n.is_finite() {
        return Err(format!("invalid duration: {s}"));
    }
    Ok(n * scale)
}

/// Milliseconds per single-letter unit
fn unit_scale(unit: char, s: &str) -> Result<f64, String> {
    const SECOND: f64 = 1_000.0;
    const DAY: f64 = 86_400.0 * SECOND;
    Ok(match unit {
        's' => SECOND,
        'm' => 60.0 * SECOND,
        'h' => 3_600.0 * SECOND,
        'd' => DAY,
        'w' => 7.0 * DAY,
        'y' => 365.25 * DAY,
        _ => return Err(format!("invalid duration unit in {s} (use ms, s, m, h, d, w or y)")),
    })
}
