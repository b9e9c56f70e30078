//! The location-keyed sign registry
//!
//! Single source of truth for which signs exist and their state. Every
//! key equals the `location` field of its value; no two entries share a
//! location. Snapshots come back in first-insertion order so published
//! values diff reproducibly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use worldpulse_types::{LocationKey, TrackedSign};

/// Registry of all tracked signs.
#[derive(Default)]
pub struct SignRegistry {
    /// Tracked signs by location
    signs: HashMap<LocationKey, TrackedSign>,
    /// First-insertion order of the keys in `signs`
    order: Vec<LocationKey>,
    /// Total locations ever inserted
    total_added: u64,
    /// Total entries ever removed
    total_removed: u64,
}

impl SignRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry at the sign's own location.
    ///
    /// Returns the previous entry when one existed. Replacement keeps
    /// the entry's original snapshot position; only a brand-new
    /// location appends to the order.
    pub fn put(&mut self, sign: TrackedSign) -> Option<TrackedSign> {
        let location = sign.location.clone();
        let previous = self.signs.insert(location.clone(), sign);
        if previous.is_none() {
            self.order.push(location);
            self.total_added += 1;
        }
        previous
    }

    /// Remove the entry at a location, if any.
    ///
    /// `None` means nothing was tracked there; that is an answer, not
    /// an error.
    pub fn remove_at(&mut self, location: &LocationKey) -> Option<TrackedSign> {
        let removed = self.signs.remove(location);
        if removed.is_some() {
            self.order.retain(|key| key != location);
            self.total_removed += 1;
        }
        removed
    }

    /// Get the entry at a location.
    pub fn get(&self, location: &LocationKey) -> Option<&TrackedSign> {
        self.signs.get(location)
    }

    /// Get the entry at a location for in-place mutation.
    pub(crate) fn get_mut(&mut self, location: &LocationKey) -> Option<&mut TrackedSign> {
        self.signs.get_mut(location)
    }

    /// Whether a location is tracked.
    pub fn contains(&self, location: &LocationKey) -> bool {
        self.signs.contains_key(location)
    }

    /// Point-in-time copy of all tracked signs, in first-insertion
    /// order.
    ///
    /// The copy is defensive: later registry mutation never changes a
    /// snapshot already taken.
    pub fn snapshot(&self) -> Vec<TrackedSign> {
        self.order
            .iter()
            .filter_map(|key| self.signs.get(key))
            .cloned()
            .collect()
    }

    /// Number of tracked signs.
    pub fn len(&self) -> usize {
        self.signs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    /// Get statistics.
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            tracked: self.signs.len() as u64,
            total_added: self.total_added,
            total_removed: self.total_removed,
        }
    }
}

/// Statistics about the sign registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Signs currently tracked
    pub tracked: u64,
    /// Locations ever inserted
    pub total_added: u64,
    /// Entries ever removed
    pub total_removed: u64,
}
