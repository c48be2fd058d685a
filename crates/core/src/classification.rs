use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::TriageError;

/// Raw output of a semantic classifier for one cluster's text.
///
/// `confidence` is kept as untyped JSON: classifiers routinely return
/// strings, percentages, or nothing at all. Consumers coerce it with
/// [`crate::confidence::coerce`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub confidence: serde_json::Value,
    #[serde(default)]
    pub reasoning: String,
}

/// A backend that classifies aggregated ticket text.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, TriageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_missing_and_odd_fields() {
        let c: Classification =
            serde_json::from_str(r#"{"root_cause": "Documentation Gap", "confidence": "high"}"#)
                .unwrap();
        assert_eq!(c.root_cause, "Documentation Gap");
        assert_eq!(c.stage, "");
        assert_eq!(c.confidence, serde_json::json!("high"));
        assert!(c.reasoning.is_empty());
    }
}
