//! Closed vocabulary for incident stages and root causes.
//!
//! Analyzers must only emit labels from this module. Downstream gates match
//! on substrings of these labels (`LIVE_STAGE_MARKER`, `PLATFORM_MARKER`,
//! `PLATFORM_ISSUE_MARKER`), so renaming a label is a breaking change and
//! requires bumping [`VOCABULARY_VERSION`].

pub const VOCABULARY_VERSION: &str = "v1";

// ── Stages ────────────────────────────────────────────────────

pub const STAGE_PRE_LAUNCH: &str = "Stage 1 - Pre-Launch Setup";
pub const STAGE_INTEGRATION: &str = "Stage 2 - Integration / Migration";
pub const STAGE_LIVE: &str = "Stage 3 - Live Production";
pub const STAGE_UNKNOWN: &str = "Unknown Stage";

pub const STAGES: &[&str] = &[STAGE_PRE_LAUNCH, STAGE_INTEGRATION, STAGE_LIVE, STAGE_UNKNOWN];

/// Substring identifying a live-stage label.
pub const LIVE_STAGE_MARKER: &str = "Stage 3";

// ── Root causes ───────────────────────────────────────────────

pub const RC_API_TIMEOUT: &str = "Platform Issue - API Timeout";
pub const RC_CHECKOUT_FAILURE: &str = "Platform Issue - Checkout & Payment Failure";
pub const RC_WEBHOOK_DELIVERY: &str = "Platform Issue - Webhook Delivery";
pub const RC_PLATFORM_UNCLASSIFIED: &str = "Platform Issue - Unclassified";
pub const RC_MERCHANT_CONFIG: &str = "Merchant Configuration Error";
pub const RC_DOCUMENTATION_GAP: &str = "Documentation Gap";
pub const RC_THIRD_PARTY: &str = "Third-Party Integration Fault";
pub const RC_UNDETERMINED: &str = "Undetermined";

pub const ROOT_CAUSES: &[&str] = &[
    RC_API_TIMEOUT,
    RC_CHECKOUT_FAILURE,
    RC_WEBHOOK_DELIVERY,
    RC_PLATFORM_UNCLASSIFIED,
    RC_MERCHANT_CONFIG,
    RC_DOCUMENTATION_GAP,
    RC_THIRD_PARTY,
    RC_UNDETERMINED,
];

/// Substring identifying a platform-scoped root cause (global alert).
pub const PLATFORM_MARKER: &str = "Platform";

/// Substring identifying a platform-issue root cause (reproduction pack).
pub const PLATFORM_ISSUE_MARKER: &str = "Platform Issue";

pub fn is_live_stage(stage: &str) -> bool {
    stage.contains(LIVE_STAGE_MARKER)
}

pub fn is_platform_scoped(root_cause: &str) -> bool {
    root_cause.contains(PLATFORM_MARKER)
}

/// Map free text onto a known stage label.
///
/// Exact (case-insensitive) matches win, then "Stage N" prefixes. Anything
/// else becomes [`STAGE_UNKNOWN`].
pub fn normalize_stage(raw: &str) -> &'static str {
    let needle = raw.trim().to_lowercase();
    if let Some(s) = STAGES.iter().copied().find(|s| s.to_lowercase() == needle) {
        return s;
    }
    for (prefix, label) in [
        ("stage 3", STAGE_LIVE),
        ("stage 2", STAGE_INTEGRATION),
        ("stage 1", STAGE_PRE_LAUNCH),
    ] {
        if needle.starts_with(prefix) {
            return label;
        }
    }
    STAGE_UNKNOWN
}

/// Words that tie a root cause to checkout or payment failures. The
/// proactive correlator treats the same words as coverage of the checkout
/// signal, so normalisation must never drop them.
pub const CHECKOUT_KEYWORDS: &[&str] = &["checkout", "payment"];

/// Map free text onto a known root-cause label.
///
/// Exact (case-insensitive) matches win, then the longest label contained in
/// the input. Text naming checkout or payment maps to
/// [`RC_CHECKOUT_FAILURE`]. Other text saying "platform issue" is routed by
/// symptom keyword. A platform label is never inferred from anything else:
/// "Timeout" or "Platform degradation" become [`RC_UNDETERMINED`].
pub fn normalize_root_cause(raw: &str) -> &'static str {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return RC_UNDETERMINED;
    }
    if let Some(rc) = ROOT_CAUSES
        .iter()
        .copied()
        .find(|rc| rc.to_lowercase() == needle)
    {
        return rc;
    }
    if let Some(rc) = ROOT_CAUSES
        .iter()
        .copied()
        .filter(|rc| needle.contains(&rc.to_lowercase()))
        .max_by_key(|rc| rc.len())
    {
        return rc;
    }

    if CHECKOUT_KEYWORDS.iter().any(|k| needle.contains(k)) {
        return RC_CHECKOUT_FAILURE;
    }
    if needle.contains(&PLATFORM_ISSUE_MARKER.to_lowercase()) {
        return if needle.contains("timeout") || needle.contains("latency") {
            RC_API_TIMEOUT
        } else if needle.contains("webhook") {
            RC_WEBHOOK_DELIVERY
        } else {
            RC_PLATFORM_UNCLASSIFIED
        };
    }

    // Abbreviations of non-platform labels ("Documentation").
    let partial: Vec<&'static str> = ROOT_CAUSES
        .iter()
        .copied()
        .filter(|rc| !is_platform_scoped(rc))
        .filter(|rc| rc.to_lowercase().contains(&needle))
        .collect();
    match partial.as_slice() {
        [only] => *only,
        _ => RC_UNDETERMINED,
    }
}
