//! Player identities and the online-presence set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identity of a connected player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a player identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The set of currently-connected player identities.
///
/// Always rebuilt from the engine's authoritative online query, never
/// maintained incrementally. The ordered set gives duplicate-free,
/// deterministic published values.
pub type PresenceSet = BTreeSet<PlayerId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        assert_eq!(PlayerId::new("alex"), PlayerId::from("alex"));
        assert_ne!(PlayerId::new("alex"), PlayerId::new("steve"));
    }

    #[test]
    fn test_presence_set_deduplicates() {
        let mut online = PresenceSet::new();
        online.insert(PlayerId::new("alex"));
        online.insert(PlayerId::new("alex"));
        online.insert(PlayerId::new("steve"));

        assert_eq!(online.len(), 2);
    }

    #[test]
    fn test_presence_set_orders_deterministically() {
        let mut online = PresenceSet::new();
        online.insert(PlayerId::new("steve"));
        online.insert(PlayerId::new("alex"));

        let names: Vec<&str> = online.iter().map(PlayerId::as_str).collect();
        assert_eq!(names, vec!["alex", "steve"]);
    }
}
