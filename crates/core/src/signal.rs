use serde::{Deserialize, Serialize};

/// A single infrastructure telemetry reading.
///
/// `value` is a percentage (e.g. `30.0` means 30%). `history` optionally
/// carries earlier readings of the same signal, oldest first, and is used
/// for baseline comparison by the trajectory analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub signal: String,
    pub value: f64,
    pub time_window: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<f64>,
}

impl SignalRecord {
    pub fn new(signal: impl Into<String>, value: f64, time_window: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            value,
            time_window: time_window.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<f64>) -> Self {
        self.history = history;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_without_history() {
        let s: SignalRecord = serde_json::from_str(
            r#"{"signal": "checkout_error_rate", "value": 30, "time_window": "1h"}"#,
        )
        .unwrap();
        assert_eq!(s.signal, "checkout_error_rate");
        assert_eq!(s.value, 30.0);
        assert!(s.history.is_empty());
    }
}
