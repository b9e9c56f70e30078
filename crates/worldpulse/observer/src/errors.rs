//! Error types for WorldPulse observer operations

use thiserror::Error;
use worldpulse_types::WorldPulseError;

/// Errors that can occur in observer operations.
#[derive(Error, Debug)]
pub enum ObserverError {
    /// Error from the types layer
    #[error(transparent)]
    Types(#[from] WorldPulseError),

    /// The periodic producers are already running
    #[error("Observer already started")]
    AlreadyStarted,
}

/// Result type for observer operations.
pub type ObserverResult<T> = Result<T, ObserverError>;
