//! Triage policy rules.
//!
//! This crate provides:
//! - The `TriagePolicy` YAML rule kind holding every decision threshold
//! - A filesystem loader with built-in defaults when no file is configured
//! - Structured validation with errors (block load) and warnings (advisory)

pub mod loader;
pub mod schema;
pub mod triage_policy;
pub mod validation;

pub use loader::{load_policy, load_policy_or_default, RuleError};
pub use triage_policy::{TriagePolicy, TriagePolicyRule};
