//! Signal trajectory: turns one infrastructure reading (plus optional
//! history) into a trend label and a plain-language prediction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::SignalRecord;
use triage_rules::triage_policy::TrajectoryPolicy;

/// Direction of a signal relative to its thresholds and history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trajectory {
    /// No telemetry was supplied for this run.
    NoTelemetry,
    Stable,
    /// At or above the elevated threshold, or significantly above history.
    Rising,
    /// Above the critical threshold and not falling against history.
    Accelerating,
    /// Significantly below history, whatever the current level.
    Recovering,
}

impl Trajectory {
    pub fn label(&self) -> &'static str {
        match self {
            Trajectory::NoTelemetry => "No Telemetry",
            Trajectory::Stable => "Stable",
            Trajectory::Rising => "Rising",
            Trajectory::Accelerating => "Accelerating",
            Trajectory::Recovering => "Recovering",
        }
    }
}

impl std::fmt::Display for Trajectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Trend derived once per run from the signal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendInfo {
    pub trajectory: Trajectory,
    pub prediction: String,
    /// z-score of the current value against `history`, when computable.
    pub z_score: Option<f64>,
}

impl TrendInfo {
    fn no_telemetry() -> Self {
        Self {
            trajectory: Trajectory::NoTelemetry,
            prediction: "No infrastructure telemetry available; outlook is based on ticket volume only."
                .to_string(),
            z_score: None,
        }
    }
}

/// Classify a signal. An absent signal is a valid, neutral state.
pub fn analyze_signal_trend(signal: Option<&SignalRecord>, policy: &TrajectoryPolicy) -> TrendInfo {
    let Some(s) = signal else {
        return TrendInfo::no_telemetry();
    };

    let z = baseline_z_score(&s.history, s.value, policy.min_data_points);
    let significant_up = z.is_some_and(|z| z > policy.z_score_trigger);
    let significant_down = z.is_some_and(|z| z < -policy.z_score_trigger);

    // A falling signal is never labelled by its level alone.
    let trajectory = if significant_down {
        Trajectory::Recovering
    } else if s.value > policy.critical_threshold {
        Trajectory::Accelerating
    } else if s.value >= policy.elevated_threshold || significant_up {
        Trajectory::Rising
    } else {
        Trajectory::Stable
    };

    let prediction = match trajectory {
        Trajectory::Accelerating => format!(
            "{} at {}% over {} exceeds the {}% critical level; merchant-facing failures are likely to surface in tickets shortly.",
            s.signal, s.value, s.time_window, policy.critical_threshold
        ),
        Trajectory::Rising => format!(
            "{} at {}% over {} is elevated; expect related ticket volume to grow if the trend continues.",
            s.signal, s.value, s.time_window
        ),
        Trajectory::Recovering if s.value > policy.critical_threshold => format!(
            "{} at {}% over {} is falling against its recent baseline but still above the {}% critical level; keep monitoring until it settles.",
            s.signal, s.value, s.time_window, policy.critical_threshold
        ),
        Trajectory::Recovering => format!(
            "{} at {}% over {} is falling against its recent baseline; related ticket volume should taper off.",
            s.signal, s.value, s.time_window
        ),
        Trajectory::Stable | Trajectory::NoTelemetry => format!(
            "{} at {}% over {} is within normal range; no telemetry-driven escalation expected.",
            s.signal, s.value, s.time_window
        ),
    };

    debug!(
        signal = %s.signal,
        value = s.value,
        z_score = ?z,
        trajectory = %trajectory,
        "signal trajectory classified"
    );

    TrendInfo {
        trajectory,
        prediction,
        z_score: z,
    }
}

/// z-score of `value` against `history`, or `None` when the history is too
/// short or flat.
fn baseline_z_score(history: &[f64], value: f64, min_data_points: usize) -> Option<f64> {
    if history.len() < min_data_points.max(2) {
        return None;
    }
    let n = history.len() as f64;
    let mean = history.iter().sum::<f64>() / n;
    let variance = history.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    if stddev <= f64::EPSILON {
        return None;
    }
    Some((value - mean) / stddev)
}
