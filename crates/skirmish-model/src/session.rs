//! Session values: the raw snapshot as delivered and the validated session.
//!
//! The transport hands over a [`SessionSnapshot`]. Turning it into a
//! [`Session`] checks the cross-value invariants:
//!
//! - slot keys are unique
//! - client indices are unique
//! - every client sits in an existing slot or is a spectator
//! - no slot holds two clients
//! - no two clients in open slots share a spawn point other than
//!   [`UNSET_SPAWN`]
//!
//! A `Session` is immutable. Accessors hand out borrows; a new snapshot
//! produces a new `Session`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Client, ClientIndex, GlobalSettings, ModelError, Slot, SlotKey, UNSET_SPAWN};

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// The session exactly as the authoritative server sent it.
///
/// Not yet validated. Slots keep the order the server sent them in;
/// that order is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub global: GlobalSettings,
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A validated, immutable lobby session.
///
/// Deserializing a `Session` runs the same validation as
/// [`Session::try_from`], so bytes that decode into a `Session` are
/// always consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionSnapshot", into = "SessionSnapshot")]
pub struct Session {
    global: GlobalSettings,
    slots: Vec<Slot>,
    clients: BTreeMap<ClientIndex, Client>,
}

impl Session {
    /// Validates the parts of a session and assembles it.
    pub fn new(
        global: GlobalSettings,
        slots: Vec<Slot>,
        clients: Vec<Client>,
    ) -> Result<Self, ModelError> {
        Self::try_from(SessionSnapshot {
            global,
            slots,
            clients,
        })
    }

    pub fn global(&self) -> &GlobalSettings {
        &self.global
    }

    /// Uid of the selected map.
    pub fn map_uid(&self) -> &str {
        &self.global.map
    }

    /// All slots, in server order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, key: &SlotKey) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.key == key)
    }

    /// All clients, ordered by index.
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn client(&self, index: ClientIndex) -> Option<&Client> {
        self.clients.get(&index)
    }

    /// The client sitting in the given slot, if any.
    pub fn client_in_slot(&self, key: &SlotKey) -> Option<&Client> {
        self.clients
            .values()
            .find(|c| c.slot.as_ref() == Some(key))
    }

    /// The slot a client sits in. `None` for spectators and unknown
    /// clients.
    pub fn slot_of(&self, client: &Client) -> Option<&Slot> {
        client.slot.as_ref().and_then(|key| self.slot(key))
    }

    /// Clients without a slot, ordered by index.
    pub fn spectators(&self) -> impl Iterator<Item = &Client> {
        self.clients.values().filter(|c| c.is_spectator())
    }

    /// The first open slot nobody sits in, in server order.
    pub fn first_empty_slot(&self) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|s| !s.closed && self.client_in_slot(&s.key).is_none())
    }
}

impl TryFrom<SessionSnapshot> for Session {
    type Error = ModelError;

    fn try_from(snapshot: SessionSnapshot) -> Result<Self, ModelError> {
        let SessionSnapshot {
            global,
            slots,
            clients: raw_clients,
        } = snapshot;

        let mut slot_positions: HashMap<&SlotKey, usize> = HashMap::new();
        for (position, slot) in slots.iter().enumerate() {
            if slot_positions.insert(&slot.key, position).is_some() {
                return Err(invalid(format!("duplicate slot key {}", slot.key)));
            }
        }

        let mut clients = BTreeMap::new();
        let mut seated: HashMap<SlotKey, ClientIndex> = HashMap::new();
        let mut spawns: HashMap<u8, ClientIndex> = HashMap::new();

        for client in raw_clients {
            if let Some(key) = &client.slot {
                let position = *slot_positions.get(key).ok_or_else(|| {
                    invalid(format!(
                        "client {} references unknown slot {key}",
                        client.index
                    ))
                })?;

                if let Some(other) = seated.insert(key.clone(), client.index) {
                    return Err(invalid(format!(
                        "slot {key} held by both client {other} and client {}",
                        client.index
                    )));
                }

                if client.spawn_point != UNSET_SPAWN && !slots[position].closed {
                    if let Some(other) = spawns.insert(client.spawn_point, client.index) {
                        return Err(invalid(format!(
                            "spawn point {} claimed by both client {other} and client {}",
                            client.spawn_point, client.index
                        )));
                    }
                }
            }

            let index = client.index;
            if clients.insert(index, client).is_some() {
                return Err(invalid(format!("duplicate client index {index}")));
            }
        }

        Ok(Self {
            global,
            slots,
            clients,
        })
    }
}

impl From<Session> for SessionSnapshot {
    fn from(session: Session) -> Self {
        Self {
            global: session.global,
            slots: session.slots,
            clients: session.clients.into_values().collect(),
        }
    }
}

fn invalid(reason: String) -> ModelError {
    ModelError::InvalidSnapshot(reason)
}
