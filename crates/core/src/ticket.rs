use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ticket identifier. Source systems emit either numeric or string ids,
/// both are normalised to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

impl<'de> Deserialize<'de> for TicketId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => TicketId(s),
            RawId::Int(n) => TicketId(n.to_string()),
            RawId::Float(f) => TicketId(f.to_string()),
        })
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        TicketId(s.to_string())
    }
}

impl From<String> for TicketId {
    fn from(s: String) -> Self {
        TicketId(s)
    }
}

/// A support ticket as ingested. Immutable once loaded; anything beyond
/// `id` and `message` is kept verbatim in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub message: String,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Ticket {
    pub fn new(id: impl Into<TicketId>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Look up a metadata field as a string (e.g. `merchant_id`).
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// Join the messages of a ticket group into one text block, one message per line.
pub fn aggregate_text(tickets: &[Ticket]) -> String {
    tickets
        .iter()
        .map(|t| t.message.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The read-only input of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub tickets: Vec<Ticket>,
    /// One vector per ticket, by position.
    pub embeddings: Vec<Vec<f32>>,
    pub signal: Option<crate::SignalRecord>,
}
