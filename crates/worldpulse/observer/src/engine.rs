//! The capability trait onto the game engine
//!
//! The engine is the source of truth for blocks, players and world
//! geometry. The observer consults it through this narrow query
//! surface and never holds engine state of its own.

use std::collections::HashMap;
use std::sync::Mutex;
use worldpulse_types::{BlockKind, LocationKey, PlayerId, PresenceSet, ServerStatus};

/// Narrow query interface onto the running game engine.
///
/// Queries are cheap, synchronous lookups against live world state;
/// the reconciler calls them while holding the registry lock. Answers
/// reflect the world as it is at call time, which can legitimately be
/// inconsistent mid-tick; callers treat surprising answers as "no
/// applicable transition", never as errors.
pub trait GameEngine: Send + Sync {
    /// Current server reference, published as the world heartbeat.
    fn server_status(&self) -> ServerStatus;

    /// The authoritative set of currently-online players.
    fn online_players(&self) -> PresenceSet;

    /// The material category of the block at a location.
    fn block_kind(&self, location: &LocationKey) -> BlockKind;

    /// The authored text lines of the sign at a location, top to
    /// bottom, or `None` when the block there is not a sign.
    fn sign_lines(&self, location: &LocationKey) -> Option<Vec<String>>;
}

/// In-memory [`GameEngine`] with settable world state.
///
/// Stands in for a live engine in tests and embedding demos: blocks,
/// sign text and the online set are plain maps behind a lock.
#[derive(Default)]
pub struct StaticEngine {
    state: Mutex<StaticEngineState>,
}

#[derive(Default)]
struct StaticEngineState {
    server_name: String,
    server_version: String,
    players: PresenceSet,
    blocks: HashMap<LocationKey, BlockKind>,
    signs: HashMap<LocationKey, Vec<String>>,
}

impl StaticEngine {
    /// Create an empty engine with the given server identity.
    pub fn new(server_name: impl Into<String>, server_version: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(StaticEngineState {
                server_name: server_name.into(),
                server_version: server_version.into(),
                ..StaticEngineState::default()
            }),
        }
    }

    /// Place a block of the given kind.
    pub fn set_block(&self, location: LocationKey, kind: BlockKind) {
        let mut state = self.state.lock().expect("engine lock");
        if kind != BlockKind::Sign {
            state.signs.remove(&location);
        }
        state.blocks.insert(location, kind);
    }

    /// Place a sign block with the given authored lines.
    pub fn set_sign(&self, location: LocationKey, lines: Vec<String>) {
        let mut state = self.state.lock().expect("engine lock");
        state.blocks.insert(location.clone(), BlockKind::Sign);
        state.signs.insert(location, lines);
    }

    /// Remove whatever block is at a location.
    pub fn clear_block(&self, location: &LocationKey) {
        let mut state = self.state.lock().expect("engine lock");
        state.blocks.remove(location);
        state.signs.remove(location);
    }

    /// Mark a player online.
    pub fn connect_player(&self, player: PlayerId) {
        self.state.lock().expect("engine lock").players.insert(player);
    }

    /// Mark a player offline.
    pub fn disconnect_player(&self, player: &PlayerId) {
        self.state.lock().expect("engine lock").players.remove(player);
    }
}

impl GameEngine for StaticEngine {
    fn server_status(&self) -> ServerStatus {
        let state = self.state.lock().expect("engine lock");
        ServerStatus::new(state.server_name.clone(), state.server_version.clone())
    }

    fn online_players(&self) -> PresenceSet {
        self.state.lock().expect("engine lock").players.clone()
    }

    fn block_kind(&self, location: &LocationKey) -> BlockKind {
        self.state
            .lock()
            .expect("engine lock")
            .blocks
            .get(location)
            .copied()
            .unwrap_or(BlockKind::Air)
    }

    fn sign_lines(&self, location: &LocationKey) -> Option<Vec<String>> {
        self.state
            .lock()
            .expect("engine lock")
            .signs
            .get(location)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_world_reads_as_air() {
        let engine = StaticEngine::new("test", "0.0");
        let location = LocationKey::new("overworld", 0, 64, 0);

        assert_eq!(engine.block_kind(&location), BlockKind::Air);
        assert!(engine.sign_lines(&location).is_none());
        assert!(engine.online_players().is_empty());
    }

    #[test]
    fn test_set_sign_answers_both_queries() {
        let engine = StaticEngine::new("test", "0.0");
        let location = LocationKey::new("overworld", 0, 64, 0);
        engine.set_sign(location.clone(), vec!["Door".to_string()]);

        assert_eq!(engine.block_kind(&location), BlockKind::Sign);
        assert_eq!(engine.sign_lines(&location), Some(vec!["Door".to_string()]));
    }

    #[test]
    fn test_overwriting_sign_with_other_block_drops_lines() {
        let engine = StaticEngine::new("test", "0.0");
        let location = LocationKey::new("overworld", 0, 64, 0);
        engine.set_sign(location.clone(), vec!["Door".to_string()]);
        engine.set_block(location.clone(), BlockKind::Other);

        assert_eq!(engine.block_kind(&location), BlockKind::Other);
        assert!(engine.sign_lines(&location).is_none());
    }

    #[test]
    fn test_player_connection_cycle() {
        let engine = StaticEngine::new("test", "0.0");
        let alex = PlayerId::new("alex");

        engine.connect_player(alex.clone());
        assert!(engine.online_players().contains(&alex));

        engine.disconnect_player(&alex);
        assert!(engine.online_players().is_empty());
    }
}
