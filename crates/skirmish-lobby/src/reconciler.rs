//! Snapshot reconciliation: the client's mirror of the server's session.
//!
//! ```text
//!   Idle ──(first valid snapshot)──→ Synced ──(snapshot)──→ Synced
//!    │                                  │
//!    └──────────(NotConnected)──────────┴──→ Disconnected (terminal)
//! ```
//!
//! Every accepted snapshot replaces the session wholesale and rebuilds the
//! spawn occupancy. A changed map uid triggers one lookup in the
//! [`MapRepository`]. A rejected snapshot changes nothing.

use serde::{Deserialize, Serialize};
use skirmish_model::{LocalIdentity, MapMetadata, Session, SessionSnapshot, SlotKey};
use skirmish_policy::{Projection, SpawnOccupancy};

use crate::{LobbyError, MapRepository};

/// Connection state reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    Connected,
    NotConnected,
}

/// Where the reconciler is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncState {
    /// No snapshot accepted yet.
    Idle,
    /// Holding a valid session.
    Synced,
    /// The connection is gone. Nothing is accepted any more.
    Disconnected,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Synced => write!(f, "Synced"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// What an accepted snapshot changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// This was the first snapshot accepted by this instance.
    pub first_sync: bool,
    /// New map metadata was resolved.
    pub map_changed: bool,
    /// The snapshot's map uid couldn't be resolved; the previous metadata
    /// is still in use.
    pub map_unavailable: Option<String>,
    /// The one-shot auto-bot assignment fired with this slot.
    pub bot_slot: Option<SlotKey>,
}

impl Reconciled {
    /// The non-fatal map lookup failure, as an error value.
    pub fn map_error(&self) -> Option<LobbyError> {
        self.map_unavailable.clone().map(LobbyError::MapUnavailable)
    }
}

/// Holds the last good session and everything derived from it.
pub struct Reconciler<M: MapRepository> {
    state: SyncState,
    maps: M,
    session: Option<Session>,
    identity: Option<LocalIdentity>,
    map: Option<MapMetadata>,
    /// Uid `map` was resolved for.
    map_uid: Option<String>,
    map_unavailable: bool,
    occupancy: SpawnOccupancy,
    /// Consumed by the first accepted snapshot.
    auto_bot_armed: bool,
}

impl<M: MapRepository> Reconciler<M> {
    /// Creates an idle reconciler. `auto_bot` arms the one-shot empty-slot
    /// lookup.
    pub fn new(maps: M, auto_bot: bool) -> Self {
        Self {
            state: SyncState::Idle,
            maps,
            session: None,
            identity: None,
            map: None,
            map_uid: None,
            map_unavailable: false,
            occupancy: SpawnOccupancy::default(),
            auto_bot_armed: auto_bot,
        }
    }

    /// Applies one snapshot from the transport.
    ///
    /// # Errors
    /// - [`LobbyError::Disconnected`] — the connection is gone
    /// - [`LobbyError::InvalidSnapshot`] — the snapshot was discarded and
    ///   the previous session kept
    pub fn apply(
        &mut self,
        snapshot: SessionSnapshot,
        identity: LocalIdentity,
    ) -> Result<Reconciled, LobbyError> {
        if self.state == SyncState::Disconnected {
            tracing::debug!("snapshot after disconnect, ignoring");
            return Err(LobbyError::Disconnected);
        }

        let session = Session::try_from(snapshot).map_err(|e| {
            tracing::warn!(error = %e, state = %self.state, "discarding invalid snapshot");
            LobbyError::InvalidSnapshot(e)
        })?;

        let first_sync = self.state == SyncState::Idle;
        let (map_changed, map_unavailable) = self.refresh_map(session.map_uid());

        self.occupancy = SpawnOccupancy::from_session(&session);

        let bot_slot = if std::mem::take(&mut self.auto_bot_armed) {
            session.first_empty_slot().map(|slot| slot.key.clone())
        } else {
            None
        };

        if first_sync {
            tracing::info!(
                client = %identity.client_index,
                host = identity.is_host,
                slots = session.slots().len(),
                "lobby synced"
            );
        }

        self.session = Some(session);
        self.identity = Some(identity);
        self.state = SyncState::Synced;

        Ok(Reconciled {
            first_sync,
            map_changed,
            map_unavailable,
            bot_slot,
        })
    }

    /// Resolves `uid` unless it is the map already held.
    fn refresh_map(&mut self, uid: &str) -> (bool, Option<String>) {
        if self.map_uid.as_deref() == Some(uid) {
            self.map_unavailable = false;
            return (false, None);
        }

        match self.maps.resolve(uid) {
            Some(metadata) => {
                tracing::info!(map = uid, title = %metadata.title, "map changed");
                self.map = Some(metadata);
                self.map_uid = Some(uid.to_string());
                self.map_unavailable = false;
                (true, None)
            }
            None => {
                tracing::warn!(map = uid, "map lookup failed, keeping previous map");
                self.map_unavailable = true;
                (false, Some(uid.to_string()))
            }
        }
    }

    /// Reacts to the transport's connection state. Returns `true` if this
    /// call moved the reconciler into [`SyncState::Disconnected`].
    pub fn on_connection_state(&mut self, connection: ConnectionState) -> bool {
        match (connection, self.state) {
            (ConnectionState::NotConnected, SyncState::Idle | SyncState::Synced) => {
                tracing::info!(from = %self.state, "connection lost, lobby disconnected");
                self.state = SyncState::Disconnected;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_disconnected(&self) -> bool {
        self.state == SyncState::Disconnected
    }

    /// The last accepted session.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The identity delivered with the last accepted session.
    pub fn identity(&self) -> Option<&LocalIdentity> {
        self.identity.as_ref()
    }

    /// Session and identity together, once synced.
    pub fn synced(&self) -> Option<(&Session, &LocalIdentity)> {
        self.session.as_ref().zip(self.identity.as_ref())
    }

    /// Metadata of the current map, or of the last one that resolved.
    pub fn map(&self) -> Option<&MapMetadata> {
        self.map.as_ref()
    }

    pub fn map_unavailable(&self) -> bool {
        self.map_unavailable
    }

    pub fn occupancy(&self) -> &SpawnOccupancy {
        &self.occupancy
    }

    /// Inputs for the view projector, once synced.
    pub fn projection(&self, game_starting: bool, team_chat: bool) -> Option<Projection<'_>> {
        let (session, identity) = self.synced()?;
        Some(Projection {
            session,
            identity,
            map: self.map.as_ref(),
            map_unavailable: self.map_unavailable,
            occupancy: &self.occupancy,
            game_starting,
            team_chat,
        })
    }
}
