//! Map metadata, as resolved by the embedder's map repository.

use serde::{Deserialize, Serialize};

/// A spawn location in map cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnPosition {
    pub x: i32,
    pub y: i32,
}

impl SpawnPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// What the lobby needs to know about a map.
///
/// Spawn points are numbered from 1 in the order of `spawn_points`;
/// spawn point 0 means "unset".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapMetadata {
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPosition>,
}

impl MapMetadata {
    pub fn spawn_point_count(&self) -> usize {
        self.spawn_points.len()
    }

    /// Position of a 1-based spawn point number.
    pub fn spawn_position(&self, point: u8) -> Option<SpawnPosition> {
        let index = usize::from(point).checked_sub(1)?;
        self.spawn_points.get(index).copied()
    }
}
