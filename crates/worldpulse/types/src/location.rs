//! Spatial keys for blocks within a named world
//!
//! A [`LocationKey`] identifies one block position. It is the key type of
//! the sign registry, so equality and hashing are structural: two keys
//! are equal iff world, x, y and z all match.

use serde::{Deserialize, Serialize};

/// Identifier for a block position within a named world.
///
/// Immutable once constructed. Coordinates are always integer block
/// coordinates; fractional input is floored at construction (see
/// [`LocationKey::floored`]), nowhere else.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationKey {
    world: String,
    x: i32,
    y: i32,
    z: i32,
}

impl LocationKey {
    /// Create a key from integer block coordinates.
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Create a key from fractional coordinates.
    ///
    /// This is the single flooring site: each coordinate is floored to
    /// the containing block, so `(0.7, 64.2, -0.3)` lands in block
    /// `(0, 64, -1)`.
    pub fn floored(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self::new(world, x.floor() as i32, y.floor() as i32, z.floor() as i32)
    }

    /// The name of the world this position belongs to.
    pub fn world(&self) -> &str {
        &self.world
    }

    /// The x block coordinate.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// The y block coordinate.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// The z block coordinate.
    pub fn z(&self) -> i32 {
        self.z
    }

    /// The position at a relative offset within the same world.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            world: self.world.clone(),
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// The position directly above this one.
    pub fn above(&self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The position directly below this one.
    pub fn below(&self) -> Self {
        self.offset(0, -1, 0)
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}
