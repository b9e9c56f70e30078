//! The inbound world-mutation event feed
//!
//! The game engine delivers each event at most once per physical
//! occurrence, in occurrence order for any single location. Events for
//! unrelated locations may interleave arbitrarily.

use crate::location::LocationKey;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// A raw world-mutation notification from the game engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A block was destroyed
    BlockDestroyed {
        /// Position of the destroyed block
        location: LocationKey,
    },

    /// A block's redstone power level changed
    RedstoneChanged {
        /// Position of the block whose level changed
        location: LocationKey,
        /// The new power level (0 = unpowered)
        level: u8,
    },

    /// A sign's text was authored or edited
    SignAuthored {
        /// Position of the sign block
        location: LocationKey,
        /// The authored text lines, top to bottom
        lines: Vec<String>,
    },

    /// A player connected
    PlayerJoined {
        /// The connecting player
        player: PlayerId,
    },

    /// A player disconnected
    PlayerLeft {
        /// The disconnecting player
        player: PlayerId,
    },
}

impl WorldEvent {
    /// Short name of the event kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BlockDestroyed { .. } => "block_destroyed",
            Self::RedstoneChanged { .. } => "redstone_changed",
            Self::SignAuthored { .. } => "sign_authored",
            Self::PlayerJoined { .. } => "player_joined",
            Self::PlayerLeft { .. } => "player_left",
        }
    }
}

/// The material category of a block, as answered by the engine's
/// block query.
///
/// The reconciler only ever distinguishes "is a sign" from "is not";
/// air is kept separate because an unloaded or removed block commonly
/// reads back as air mid-tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// A sign block bearing authored text
    Sign,
    /// No block at all
    Air,
    /// Any other material
    Other,
}

impl BlockKind {
    /// Whether this block can carry authored sign text.
    pub fn is_sign(self) -> bool {
        matches!(self, Self::Sign)
    }
}
