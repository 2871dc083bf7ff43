//! Spawn point occupancy: which client holds which spawn point.

use std::collections::BTreeMap;

use skirmish_model::{Client, ClientIndex, Session, UNSET_SPAWN};

/// Spawn points held by clients seated in open slots.
///
/// Spectators and clients in closed slots don't hold their spawn point
/// for the purpose of choosing one. Rebuilt from every accepted snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOccupancy {
    owners: BTreeMap<u8, ClientIndex>,
}

impl SpawnOccupancy {
    pub fn from_session(session: &Session) -> Self {
        let owners = session
            .clients()
            .filter(|c| c.spawn_point != UNSET_SPAWN)
            .filter(|c| session.slot_of(c).is_some_and(|slot| !slot.closed))
            .map(|c| (c.spawn_point, c.index))
            .collect();
        Self { owners }
    }

    /// The client holding `point`, if any.
    pub fn owner(&self, point: u8) -> Option<ClientIndex> {
        self.owners.get(&point).copied()
    }

    /// Returns `true` if someone other than `client` holds `point`.
    pub fn is_taken_by_other(&self, point: u8, client: ClientIndex) -> bool {
        self.owner(point).is_some_and(|owner| owner != client)
    }

    /// Spawn points `client` may pick on a map with `spawn_point_count`
    /// points: "unset" plus every point nobody else holds. The client's
    /// own current point stays in the list.
    pub fn choices_for(&self, client: &Client, spawn_point_count: usize) -> Vec<u8> {
        let last = u8::try_from(spawn_point_count).unwrap_or(u8::MAX);
        (UNSET_SPAWN..=last)
            .filter(|&point| point == UNSET_SPAWN || !self.is_taken_by_other(point, client.index))
            .collect()
    }

    /// Held points in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, ClientIndex)> + '_ {
        self.owners.iter().map(|(&point, &owner)| (point, owner))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
