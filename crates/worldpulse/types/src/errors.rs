//! Error types for the WorldPulse types layer

use thiserror::Error;

/// Errors originating in the types layer.
///
/// The observation core itself degrades malformed world state to
/// ignored no-ops, so the only constructible error here is a rejected
/// configuration.
#[derive(Error, Debug)]
pub enum WorldPulseError {
    /// A configuration field holds an unusable value
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// The rejected field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type for types-layer operations.
pub type WorldPulseResult<T> = Result<T, WorldPulseError>;
