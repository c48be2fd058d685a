pub mod analysis;
pub mod classification;
pub mod confidence;
pub mod config;
pub mod error;
pub mod signal;
pub mod ticket;
pub mod vocab;

pub use analysis::*;
pub use classification::{Classification, Classifier};
pub use config::Config;
pub use error::*;
pub use signal::SignalRecord;
pub use ticket::*;
