//! The tracked-sign record
//!
//! A [`TrackedSign`] is one observed sign-controlled device: the sign
//! block carries the display name, and the control block below it
//! carries the redstone level that drives the active flag.

use crate::location::LocationKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed sign-controlled device.
///
/// Canonical instances live in the sign registry; the reconciler is the
/// only component that creates, mutates or removes them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSign {
    /// Display name, read from the sign's first authored line
    pub name: String,

    /// Whether the control block currently carries redstone power
    pub active: bool,

    /// Position of the sign block itself
    pub location: LocationKey,

    /// Position of the control block whose redstone level drives `active`
    pub control_block: LocationKey,

    /// When this sign was first observed
    pub observed_at: DateTime<Utc>,
}

impl TrackedSign {
    /// Build a sign from a sign-authoring event.
    ///
    /// The first authored line becomes the display name and the control
    /// block is the block directly below the sign. A sign authored with
    /// no lines at all is a malformed observation and yields `None`.
    /// Authored signs start inactive; a later redstone change activates
    /// them.
    pub fn authored(location: LocationKey, lines: &[String]) -> Option<Self> {
        let name = lines.first()?.clone();
        let control_block = location.below();
        Some(Self {
            name,
            active: false,
            location,
            control_block,
            observed_at: Utc::now(),
        })
    }

    /// Build a sign discovered through a redstone change at its control
    /// block.
    ///
    /// Discovery happens when a redstone event fires under a sign block
    /// that is not yet tracked; the caller supplies the name read from
    /// the sign and the activity implied by the new redstone level.
    pub fn discovered(
        location: LocationKey,
        name: impl Into<String>,
        active: bool,
        control_block: LocationKey,
    ) -> Self {
        Self {
            name: name.into(),
            active,
            location,
            control_block,
            observed_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for TrackedSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {} ({})",
            self.name,
            self.location,
            if self.active { "active" } else { "inactive" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_authored_uses_first_line() {
        let location = LocationKey::new("overworld", 0, 64, 0);
        let sign = TrackedSign::authored(location.clone(), &lines(&["Door", "ignored"])).unwrap();

        assert_eq!(sign.name, "Door");
        assert!(!sign.active);
        assert_eq!(sign.location, location);
    }

    #[test]
    fn test_authored_control_block_is_below() {
        let location = LocationKey::new("overworld", 0, 64, 0);
        let sign = TrackedSign::authored(location.clone(), &lines(&["Door"])).unwrap();

        assert_eq!(sign.control_block, location.below());
    }

    #[test]
    fn test_authored_without_lines_is_malformed() {
        let location = LocationKey::new("overworld", 0, 64, 0);
        assert!(TrackedSign::authored(location, &[]).is_none());
    }

    #[test]
    fn test_discovered_takes_given_state() {
        let control = LocationKey::new("overworld", 0, 63, 0);
        let sign = TrackedSign::discovered(control.above(), "Lamp", true, control.clone());

        assert_eq!(sign.name, "Lamp");
        assert!(sign.active);
        assert_eq!(sign.location, control.above());
        assert_eq!(sign.control_block, control);
    }

    #[test]
    fn test_display() {
        let location = LocationKey::new("overworld", 0, 64, 0);
        let sign = TrackedSign::authored(location, &lines(&["Door"])).unwrap();

        assert_eq!(sign.to_string(), "Door at overworld:(0, 64, 0) (inactive)");
    }
}
