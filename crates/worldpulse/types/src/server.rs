//! The periodic world heartbeat payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time reference to the running server.
///
/// Published on the world channel every heartbeat interval so
/// subscribers always hold a recent view of the server even when
/// nothing else changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Server name
    pub name: String,

    /// Server software version
    pub version: String,

    /// When this status was observed
    pub observed_at: DateTime<Utc>,
}

impl ServerStatus {
    /// Create a status observed now.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            observed_at: Utc::now(),
        }
    }
}
