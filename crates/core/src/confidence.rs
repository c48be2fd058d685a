//! Parse-or-default handling for confidence scores.
//!
//! Confidence values arrive from classifiers as loosely typed JSON. They are
//! coerced here, once, so decision and restraint logic never sees a
//! non-finite or out-of-range score.

use serde_json::Value;

/// Substituted whenever a confidence value cannot be interpreted.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Coerce a raw JSON value into a confidence in `[0, 1]`.
///
/// Accepts numbers and numeric strings (`"0.85"`, `"85%"`). Only strings
/// with an explicit `%` are read as percentages; bare numbers are clamped, so
/// an over-range `1.2` means full confidence. Anything else, including
/// `null`, booleans, and NaN, yields [`DEFAULT_CONFIDENCE`].
pub fn coerce(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().map(sanitize).unwrap_or(DEFAULT_CONFIDENCE),
        Value::String(s) => parse_str(s),
        _ => DEFAULT_CONFIDENCE,
    }
}

/// Parse a confidence from text with the same rules as [`coerce`].
pub fn parse_str(s: &str) -> f64 {
    let trimmed = s.trim();
    if let Some(pct) = trimmed.strip_suffix('%') {
        return match pct.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => (v / 100.0).clamp(0.0, 1.0),
            _ => DEFAULT_CONFIDENCE,
        };
    }
    trimmed
        .parse::<f64>()
        .map(sanitize)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

/// Clamp an already-numeric confidence into `[0, 1]`.
pub fn sanitize(value: f64) -> f64 {
    if !value.is_finite() {
        return DEFAULT_CONFIDENCE;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce(&json!(0.85)), 0.85);
        assert_eq!(coerce(&json!(0)), 0.0);
        assert_eq!(coerce(&json!(1)), 1.0);
    }

    #[test]
    fn strings_parse() {
        assert_eq!(coerce(&json!("0.9")), 0.9);
        assert_eq!(coerce(&json!(" 85% ")), 0.85);
    }

    #[test]
    fn only_percent_strings_scale_down() {
        assert_eq!(coerce(&json!("85%")), 0.85);
        assert_eq!(coerce(&json!("250%")), 1.0);
        assert_eq!(coerce(&json!(85)), 1.0);
    }

    #[test]
    fn over_range_numbers_clamp_to_one() {
        assert_eq!(coerce(&json!(1.2)), 1.0);
        assert_eq!(coerce(&json!(1.05)), 1.0);
        assert_eq!(coerce(&json!("1.2")), 1.0);
        assert_eq!(sanitize(1.2), 1.0);
    }

    #[test]
    fn garbage_defaults() {
        assert_eq!(coerce(&json!("high")), DEFAULT_CONFIDENCE);
        assert_eq!(coerce(&json!(null)), DEFAULT_CONFIDENCE);
        assert_eq!(coerce(&json!(true)), DEFAULT_CONFIDENCE);
        assert_eq!(coerce(&json!({"score": 0.9})), DEFAULT_CONFIDENCE);
        assert_eq!(sanitize(f64::NAN), DEFAULT_CONFIDENCE);
        assert_eq!(sanitize(f64::INFINITY), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn negatives_clamp_to_zero() {
        assert_eq!(coerce(&json!(-0.3)), 0.0);
    }
}
