//! Structured validation for TriagePolicy documents.
//!
//! Errors block loading; warnings are logged and the policy is still used.

use serde::{Deserialize, Serialize};

use crate::triage_policy::TriagePolicyRule;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted location, e.g. `"spec.repro_pack.min_confidence"`.
    pub path: String,
    pub message: String,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// All error messages joined for a single log line or error value.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`TriagePolicyRule`].
pub fn validate_triage_policy(rule: &TriagePolicyRule) -> ValidationResult {
    let mut result = ValidationResult::new();

    if rule.api_version != "v1" {
        result.error(
            "apiVersion",
            format!("apiVersion must be 'v1', got '{}'", rule.api_version),
        );
    }
    if rule.kind != "TriagePolicy" {
        result.error(
            "kind",
            format!("kind must be 'TriagePolicy', got '{}'", rule.kind),
        );
    }
    if !is_kebab_case(&rule.metadata.id) {
        result.error(
            "metadata.id",
            format!(
                "id must be kebab-case (lowercase alphanumeric + hyphens), got '{}'",
                rule.metadata.id
            ),
        );
    }

    let spec = &rule.spec;
    for (path, value) in [
        ("spec.decision.high_min_confidence", spec.decision.high_min_confidence),
        ("spec.decision.medium_min_confidence", spec.decision.medium_min_confidence),
        (
            "spec.restraint.external_comms_min_confidence",
            spec.restraint.external_comms_min_confidence,
        ),
        ("spec.global_alert.min_confidence", spec.global_alert.min_confidence),
        ("spec.repro_pack.min_confidence", spec.repro_pack.min_confidence),
    ] {
        if !(0.0..=1.0).contains(&value) {
            result.error(path, format!("confidence threshold must be in [0, 1], got {value}"));
        }
    }

    // Risk must be monotonic in confidence.
    if spec.decision.medium_min_confidence > spec.decision.high_min_confidence {
        result.error(
            "spec.decision",
            format!(
                "medium_min_confidence ({}) must not exceed high_min_confidence ({})",
                spec.decision.medium_min_confidence, spec.decision.high_min_confidence
            ),
        );
    }

    let t = &spec.trajectory;
    if t.elevated_threshold > t.critical_threshold {
        result.error(
            "spec.trajectory",
            format!(
                "elevated_threshold ({}) must not exceed critical_threshold ({})",
                t.elevated_threshold, t.critical_threshold
            ),
        );
    }
    if t.min_data_points < 2 {
        result.warn(
            "spec.trajectory.min_data_points",
            "min_data_points should be at least 2 for meaningful standard deviation",
        );
    }

    if spec.proactive.monitored_signal.trim().is_empty() {
        result.error("spec.proactive.monitored_signal", "monitored_signal must not be empty");
    }
    if spec.proactive.coverage_keywords.is_empty() {
        result.warn(
            "spec.proactive.coverage_keywords",
            "no coverage keywords: every elevated signal will be reported as uncovered",
        );
    }
    for (i, kw) in spec.proactive.coverage_keywords.iter().enumerate() {
        if kw.is_empty() {
            result.error(
                format!("spec.proactive.coverage_keywords[{i}]"),
                "coverage keyword must not be empty",
            );
        } else if kw.to_lowercase() != *kw {
            result.warn(
                format!("spec.proactive.coverage_keywords[{i}]"),
                format!("keyword '{kw}' is matched case-insensitively; prefer lower case"),
            );
        }
    }

    if spec.global_alert.min_ticket_count == 0 {
        result.warn(
            "spec.global_alert.min_ticket_count",
            "min_ticket_count of 0 lets single-ticket clusters page on-call",
        );
    }
    if spec.counterfactual.max_alternatives == 0 {
        result.warn(
            "spec.counterfactual.max_alternatives",
            "max_alternatives of 0 disables counterfactual reporting",
        );
    }

    result
}

pub(crate) fn is_kebab_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('-') || s.ends_with('-') || s.contains("--") {
        return false;
    }
    s.chars()
        .all(|c| c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit())
}
