//! Who may change what.
//!
//! The server enforces nothing on our behalf before the command arrives,
//! so the client must never offer an edit the server would refuse. The
//! rules, in evaluation order:
//!
//! 1. A Ready local client may only un-ready itself.
//! 2. Bots are edited by the host; humans only by themselves.
//! 3. Slot lock flags deny Color/Faction/Team/Spawn even to the owner.
//!    The host may still move a bot's Team and Spawn.
//! 4. Name has no lock flag.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use skirmish_model::{Client, ClientIndex, LocalIdentity, Session, SlotKey};

/// An editable per-client field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Field {
    Name,
    Color,
    Faction,
    Team,
    Spawn,
    ReadyState,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Color,
        Field::Faction,
        Field::Team,
        Field::Spawn,
        Field::ReadyState,
    ];
}

/// Returns `true` if `client` is under the local actor's control: the
/// host controls every bot, everyone controls their own client.
pub fn owns(identity: &LocalIdentity, client: &Client) -> bool {
    if client.is_bot() {
        identity.is_host
    } else {
        client.index == identity.client_index
    }
}

/// Decides whether the local actor may edit `field` of client `target`.
///
/// Total and side-effect free. Unknown clients (local or target) are never
/// editable.
pub fn can_edit(
    session: &Session,
    identity: &LocalIdentity,
    target: ClientIndex,
    field: Field,
) -> bool {
    let Some(local) = session.client(identity.client_index) else {
        return false;
    };
    if local.is_ready() && field != Field::ReadyState {
        return false;
    }

    let Some(client) = session.client(target) else {
        return false;
    };
    if !owns(identity, client) {
        return false;
    }

    // `ready` carries no client index: only the local human can toggle it.
    if field == Field::ReadyState {
        return !client.is_bot();
    }

    let Some(slot) = session.slot_of(client) else {
        // Faction, team and spawn belong to a seat.
        return matches!(field, Field::Name | Field::Color);
    };

    let host_moves_bot = identity.is_host && client.is_bot();
    match field {
        Field::Name | Field::ReadyState => true,
        Field::Color => !slot.lock_color,
        Field::Faction => !slot.lock_faction,
        Field::Team => !slot.lock_team || host_moves_bot,
        Field::Spawn => !slot.lock_spawn || host_moves_bot,
    }
}

// ---------------------------------------------------------------------------
// EditableFields
// ---------------------------------------------------------------------------

/// The set of fields of one client the local actor may edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableFields(BTreeSet<Field>);

impl EditableFields {
    /// Evaluates [`can_edit`] for every field of `target`.
    pub fn compute(session: &Session, identity: &LocalIdentity, target: ClientIndex) -> Self {
        Self(
            Field::ALL
                .into_iter()
                .filter(|&field| can_edit(session, identity, target, field))
                .collect(),
        )
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Field> for EditableFields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A lobby action that isn't an edit of a client field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Sit down in an empty, open slot.
    JoinSlot(SlotKey),
    /// Open, close, or put a bot into a slot that no human occupies.
    ManageSlot(SlotKey),
    /// Remove another client from the lobby.
    Kick(ClientIndex),
    /// Leave the current slot to watch.
    Spectate,
    /// Claim a spawn point by clicking it on the map preview.
    ClaimSpawn(u8),
    ToggleCheats,
    StartGame,
    ChangeMap,
}

/// Decides whether the local actor may perform `action` right now.
///
/// `game_starting` is the local "start already requested" flag.
pub fn can_perform(
    session: &Session,
    identity: &LocalIdentity,
    action: &Action,
    game_starting: bool,
) -> bool {
    let Some(local) = session.client(identity.client_index) else {
        return false;
    };
    let ready = local.is_ready();

    match action {
        Action::JoinSlot(key) => {
            !ready
                && session.slot(key).is_some_and(|slot| !slot.closed)
                && session.client_in_slot(key).is_none()
        }
        Action::ManageSlot(key) => {
            identity.is_host
                && !ready
                && session.slot(key).is_some()
                && session.client_in_slot(key).is_none_or(Client::is_bot)
        }
        Action::Kick(target) => {
            identity.is_host
                && !ready
                && *target != identity.client_index
                && session.client(*target).is_some()
        }
        Action::Spectate => !ready && !local.is_spectator(),
        Action::ClaimSpawn(point) => {
            !ready && (*point == 0 || session.clients().all(|c| c.spawn_point != *point))
        }
        Action::ToggleCheats => identity.is_host && !game_starting && !ready,
        Action::StartGame => identity.is_host && !game_starting,
        Action::ChangeMap => identity.is_host,
    }
}
