//! World-event reconciliation
//!
//! Translates raw world-mutation events into sign-registry mutations
//! and publishes a full snapshot on every effective change. The rules,
//! per location:
//!
//! - authoring a sign starts tracking it (inactive, control block one
//!   below); re-authoring replaces the entry wholesale
//! - a redstone change under an untracked sign block starts tracking it
//!   at the level's activity; under a tracked sign it flips the active
//!   flag, and an unchanged level is a debounced no-op
//! - destroying the sign block removes the entry; destroying the
//!   control block only forces the sign inactive. A sign without power
//!   still exists, so the two destruction paths stay asymmetric.
//!
//! Every transition runs inside one registry lock acquisition,
//! including the snapshot taken for publishing, so a published snapshot
//! never reflects a partially-applied transition.

use crate::broadcast::ChangeBroadcaster;
use crate::engine::GameEngine;
use crate::registry::{RegistryStats, SignRegistry};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use worldpulse_types::{LocationKey, TrackedSign};

/// Consumes world-mutation events and keeps the sign registry, and its
/// subscribers, consistent with the world.
pub struct WorldEventReconciler {
    engine: Arc<dyn GameEngine>,
    broadcaster: Arc<ChangeBroadcaster>,
    registry: Mutex<SignRegistry>,
}

impl WorldEventReconciler {
    /// Create a reconciler over an empty registry.
    pub fn new(engine: Arc<dyn GameEngine>, broadcaster: Arc<ChangeBroadcaster>) -> Self {
        Self {
            engine,
            broadcaster,
            registry: Mutex::new(SignRegistry::new()),
        }
    }

    /// Apply a sign-authoring event.
    ///
    /// Starts tracking the sign (inactive, control block one below), or
    /// replaces an already-tracked entry wholesale: authoring is a
    /// fresh declaration either way. A sign with no authored lines is a
    /// malformed observation and is ignored.
    pub fn sign_authored(&self, location: &LocationKey, lines: &[String]) {
        let Some(sign) = TrackedSign::authored(location.clone(), lines) else {
            debug!(%location, "ignoring sign authored without lines");
            return;
        };

        let mut registry = self.lock_registry();
        let replaced = registry.put(sign.clone());
        match replaced {
            Some(previous) => {
                info!(sign = %sign.name, previous = %previous.name, %location, "sign re-authored")
            }
            None => info!(sign = %sign.name, %location, "sign authored"),
        }
        self.publish_locked(&registry);
    }

    /// Apply a redstone-level change at a control block.
    ///
    /// The block directly above the changed block is the candidate
    /// sign. An untracked sign block there starts being tracked at the
    /// new level's activity; a tracked sign flips when the activity
    /// actually changed and debounces otherwise.
    pub fn redstone_changed(&self, location: &LocationKey, level: u8) {
        let sign_location = location.above();
        let new_active = level > 0;

        let mut registry = self.lock_registry();
        if let Some(sign) = registry.get_mut(&sign_location) {
            if sign.active == new_active {
                debug!(sign = %sign.name, level, "redstone level unchanged; debounced");
                return;
            }
            sign.active = new_active;
            info!(sign = %sign.name, active = new_active, "sign state updated");
            self.publish_locked(&registry);
            return;
        }

        if !self.engine.block_kind(&sign_location).is_sign() {
            debug!(%location, level, "redstone change without a sign above; ignored");
            return;
        }
        let Some(name) = self
            .engine
            .sign_lines(&sign_location)
            .and_then(|lines| lines.into_iter().next())
        else {
            debug!(%sign_location, "sign above has no readable lines; ignored");
            return;
        };

        let sign = TrackedSign::discovered(sign_location, name, new_active, location.clone());
        info!(sign = %sign.name, location = %sign.location, active = new_active, "found new sign");
        registry.put(sign);
        self.publish_locked(&registry);
    }

    /// Apply a block-destruction event.
    ///
    /// Destroying a tracked sign stops tracking it. Destroying the
    /// block under a tracked sign is a loss of its control block: the
    /// sign stays tracked but is forced inactive.
    pub fn block_destroyed(&self, location: &LocationKey) {
        let mut registry = self.lock_registry();
        if let Some(removed) = registry.remove_at(location) {
            info!(sign = %removed.name, %location, "tracked sign destroyed");
            self.publish_locked(&registry);
            return;
        }

        let sign_location = location.above();
        if let Some(sign) = registry.get_mut(&sign_location) {
            sign.active = false;
            info!(sign = %sign.name, control = %location, "control block destroyed; sign deactivated");
            self.publish_locked(&registry);
            return;
        }

        debug!(%location, "destroyed block is not tracked; ignored");
    }

    /// Point-in-time snapshot of all tracked signs.
    pub fn current_signs(&self) -> Vec<TrackedSign> {
        self.lock_registry().snapshot()
    }

    /// Registry statistics.
    pub fn stats(&self) -> RegistryStats {
        self.lock_registry().stats()
    }

    fn lock_registry(&self) -> MutexGuard<'_, SignRegistry> {
        self.registry.lock().expect("sign registry lock")
    }

    /// Publish the current snapshot while still holding the registry
    /// lock, so snapshots reach the channel in mutation order.
    fn publish_locked(&self, registry: &SignRegistry) {
        self.broadcaster.publish_signs(registry.snapshot());
    }
}
