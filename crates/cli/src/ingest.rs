//! Loading tickets and the optional signal record from JSON files.

use std::path::Path;

use tracing::info;
use triage_core::{SignalRecord, Ticket, TriageError};

/// Read the ticket array. A missing file is fatal.
pub fn load_tickets(path: &Path) -> Result<Vec<Ticket>, TriageError> {
    if !path.exists() {
        return Err(TriageError::MissingDataset(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path)?;
    let tickets: Vec<Ticket> = serde_json::from_str(&text)?;
    info!(path = %path.display(), "Loaded {} tickets", tickets.len());
    Ok(tickets)
}

/// Read the signal record. A missing file means no telemetry, not an error.
pub fn load_signal(path: &Path) -> Result<Option<SignalRecord>, TriageError> {
    if !path.exists() {
        info!(path = %path.display(), "no signal file; running without telemetry");
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    let signal: SignalRecord = serde_json::from_str(&text)?;
    info!("Loaded system signal: {} ({}%)", signal.signal, signal.value);
    Ok(Some(signal))
}
