//! Parsing for CSS-like numeric tokens (`"3s"`, `"120%"`, `"400"`).
//!
//! Absence of a usable value is never an error: every tunable in the
//! system falls back to a documented default instead.

/// Parse a raw token into a positive finite number.
///
/// Trailing alphabetic or `%` unit suffixes are stripped before parsing
/// (`"3s"` -> 3.0, `"250%"` -> 250.0). Returns `None` — meaning "use the
/// default" — for empty input, non-numeric input, non-finite values, and
/// values `<= 0`.
pub fn parse_positive_scalar(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped = trimmed.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
    let value: f64 = stripped.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Like [`parse_positive_scalar`] but also accepts zero (crop insets may
/// legitimately be `0%`).
pub fn parse_non_negative_scalar(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped = trimmed.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
    let value: f64 = stripped.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse-or-default convenience for the positive policy.
pub fn parse_or(raw: &str, default: f64) -> f64 {
    parse_positive_scalar(raw).unwrap_or(default)
}

/// Convert a duration in seconds to whole milliseconds.
pub fn secs_to_millis(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/style/units.rs"]
mod tests;
