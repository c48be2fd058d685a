//! Keyword rulebook shared by the rule-based analyzer, evidence extraction
//! and the counterfactual generator.
//!
//! Rule order is significant: it breaks ties everywhere a best match is
//! chosen, so reordering entries changes results.

use triage_core::vocab;

/// Keywords that point at one root-cause label.
#[derive(Debug)]
pub struct RootCauseRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    /// Why this hypothesis loses when the tickets do not support it.
    pub rejection: &'static str,
}

/// Keywords that point at one lifecycle stage.
#[derive(Debug)]
pub struct StageRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

pub const ROOT_CAUSE_RULES: &[RootCauseRule] = &[
    RootCauseRule {
        label: vocab::RC_API_TIMEOUT,
        keywords: &["timeout", "timed out", "latency", "slow response", "504", "gateway time"],
        rejection: "no request timeouts or latency complaints are reported",
    },
    RootCauseRule {
        label: vocab::RC_CHECKOUT_FAILURE,
        keywords: &["checkout", "payment", "card declined", "charge failed", "transaction failed", "500 error"],
        rejection: "customers are not reporting failed checkouts or payments",
    },
    RootCauseRule {
        label: vocab::RC_WEBHOOK_DELIVERY,
        keywords: &["webhook", "callback", "event delivery", "not receiving events", "notification url"],
        rejection: "no missing or delayed webhook events are mentioned",
    },
    RootCauseRule {
        label: vocab::RC_MERCHANT_CONFIG,
        keywords: &["api key", "invalid key", "misconfigur", "wrong setting", "credentials", "permission denied", "401"],
        rejection: "the affected merchants show no common configuration mistake",
    },
    RootCauseRule {
        label: vocab::RC_DOCUMENTATION_GAP,
        keywords: &["documentation", "docs", "how do i", "how to", "unclear", "example"],
        rejection: "the tickets describe failures, not questions about usage",
    },
    RootCauseRule {
        label: vocab::RC_THIRD_PARTY,
        keywords: &["plugin", "shopify", "woocommerce", "third-party", "third party", "acquirer", "bank"],
        rejection: "no external provider or plugin is common to the tickets",
    },
];

pub const STAGE_RULES: &[StageRule] = &[
    StageRule {
        label: vocab::STAGE_LIVE,
        keywords: &["live", "production", "customers", "orders", "revenue", "outage", "down for"],
    },
    StageRule {
        label: vocab::STAGE_INTEGRATION,
        keywords: &["migrat", "integrat", "staging", "sandbox", "switching from", "test mode"],
    },
    StageRule {
        label: vocab::STAGE_PRE_LAUNCH,
        keywords: &["onboarding", "sign up", "signup", "setup", "set up", "verification", "kyc", "before launch"],
    },
];

/// Keywords from `keywords` that occur in `text_lower`, in list order.
pub fn keyword_hits(text_lower: &str, keywords: &[&'static str]) -> Vec<&'static str> {
    keywords
        .iter()
        .copied()
        .filter(|k| text_lower.contains(k))
        .collect()
}

/// The rule for a root-cause label, if it has one.
pub fn root_cause_rule(label: &str) -> Option<&'static RootCauseRule> {
    ROOT_CAUSE_RULES.iter().find(|r| r.label == label)
}

/// Best-supported root cause: most distinct keyword hits, ties by rule order.
pub fn best_root_cause(text_lower: &str) -> Option<(&'static RootCauseRule, Vec<&'static str>)> {
    best_by_hits(ROOT_CAUSE_RULES, text_lower, |r| r.keywords)
}

/// Best-supported stage: most distinct keyword hits, ties by rule order.
pub fn best_stage(text_lower: &str) -> Option<(&'static StageRule, Vec<&'static str>)> {
    best_by_hits(STAGE_RULES, text_lower, |r| r.keywords)
}

fn best_by_hits<R>(
    rules: &'static [R],
    text_lower: &str,
    keywords: impl Fn(&R) -> &'static [&'static str],
) -> Option<(&'static R, Vec<&'static str>)> {
    let mut best: Option<(&'static R, Vec<&'static str>)> = None;
    for rule in rules {
        let hits = keyword_hits(text_lower, keywords(rule));
        if hits.is_empty() {
            continue;
        }
        // Strictly greater keeps the earlier rule on ties.
        if best.as_ref().map_or(true, |(_, b)| hits.len() > b.len()) {
            best = Some((rule, hits));
        }
    }
    best
}
