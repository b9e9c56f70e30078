//! The online-player tracker
//!
//! Publishes the online set on every join/leave edge. The set is always
//! re-derived from the engine's authoritative query rather than
//! maintained locally, so a missed edge can never make the published
//! set drift from the world; the observer's periodic re-publish uses
//! the same path.

use crate::broadcast::ChangeBroadcaster;
use crate::engine::GameEngine;
use std::sync::Arc;
use tracing::debug;
use worldpulse_types::PlayerId;

/// Tracks and publishes the set of online players.
pub struct PresenceTracker {
    engine: Arc<dyn GameEngine>,
    broadcaster: Arc<ChangeBroadcaster>,
}

impl PresenceTracker {
    /// Create a tracker over the given engine.
    pub fn new(engine: Arc<dyn GameEngine>, broadcaster: Arc<ChangeBroadcaster>) -> Self {
        Self {
            engine,
            broadcaster,
        }
    }

    /// A player connected; publish the current online set.
    pub fn player_joined(&self, player: &PlayerId) {
        debug!(player = %player, "player joined");
        self.refresh();
    }

    /// A player disconnected; publish the current online set.
    pub fn player_left(&self, player: &PlayerId) {
        debug!(player = %player, "player left");
        self.refresh();
    }

    /// Query the engine's live online set and publish it
    /// unconditionally.
    pub fn refresh(&self) {
        let online = self.engine.online_players();
        debug!(online = online.len(), "publishing presence");
        self.broadcaster.publish_presence(online);
    }
}
