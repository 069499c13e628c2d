//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid availability rule: {0}")]
    InvalidRule(String),

    #[error("Invalid booking: {0}")]
    InvalidBooking(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Slot {start}-{end} is no longer available")]
    SlotUnavailable { start: String, end: String },

    /// A storage collaborator failed. Never converted to an empty result.
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
