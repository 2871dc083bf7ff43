//! The lobby view: a display-ready, read-only projection of the session.
//!
//! The rendering layer gets one [`LobbyView`] per accepted snapshot. Each
//! slot becomes a tagged [`SlotRow`]; each spectator a [`SpectatorRow`].
//! Rows carry everything a widget needs: values, which fields are
//! editable, which buttons are visible and enabled. The renderer makes no
//! decisions of its own.

use serde::Serialize;
use skirmish_model::{
    Client, ClientIndex, ColorRamp, LocalIdentity, MapMetadata, RampPoint, Session, SlotKey,
    SpawnPosition, UNASSIGNED_TEAM, UNSET_SPAWN,
};

use crate::{Action, EditableFields, Field, SpawnOccupancy, can_perform, owns};

/// Visibility and enabled state of a button or toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ControlState {
    pub visible: bool,
    pub enabled: bool,
}

impl ControlState {
    pub const HIDDEN: Self = Self {
        visible: false,
        enabled: false,
    };

    pub fn shown(enabled: bool) -> Self {
        Self {
            visible: true,
            enabled,
        }
    }

    /// Visible only when `visible`; enabled only when also `enabled`.
    pub fn when(visible: bool, enabled: bool) -> Self {
        if visible {
            Self::shown(enabled)
        } else {
            Self::HIDDEN
        }
    }
}

/// The display values of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerFields {
    pub index: ClientIndex,
    pub name: String,
    pub color: ColorRamp,
    pub faction: String,
    /// `None` when not on a team.
    pub team: Option<u8>,
    /// `None` when no spawn point is picked.
    pub spawn_point: Option<u8>,
    pub ready: bool,
    pub bot: Option<String>,
    /// Whether the ready/bot status marker is shown.
    pub status_marker: bool,
}

impl PlayerFields {
    fn of(client: &Client) -> Self {
        Self {
            index: client.index,
            name: client.name.clone(),
            color: client.color,
            faction: client.faction.clone(),
            team: (client.team != UNASSIGNED_TEAM).then_some(client.team),
            spawn_point: (client.spawn_point != UNSET_SPAWN).then_some(client.spawn_point),
            ready: client.is_ready(),
            bot: client.bot.clone(),
            status_marker: client.is_bot() || client.is_ready(),
        }
    }
}

/// Row for a slot nobody sits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptySlotRow {
    pub slot: SlotKey,
    pub closed: bool,
    pub join: ControlState,
    /// The host's open/close/add-bot menu.
    pub manage: ControlState,
}

/// Row for an occupied slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRow {
    pub slot: SlotKey,
    pub player: PlayerFields,
    pub editable: EditableFields,
    /// Spawn points offered in the spawn picker. Empty unless the spawn
    /// field is editable and the map is known.
    pub spawn_choices: Vec<u8>,
    pub kick: ControlState,
    /// The host's menu for a bot's slot.
    pub manage: ControlState,
}

/// What kind of row a slot renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowKind {
    Empty,
    EditablePlayer,
    ReadOnlyPlayer,
}

/// One slot, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "row")]
pub enum SlotRow {
    Empty(EmptySlotRow),
    EditablePlayer(PlayerRow),
    ReadOnlyPlayer(PlayerRow),
}

impl SlotRow {
    pub fn kind(&self) -> RowKind {
        match self {
            Self::Empty(_) => RowKind::Empty,
            Self::EditablePlayer(_) => RowKind::EditablePlayer,
            Self::ReadOnlyPlayer(_) => RowKind::ReadOnlyPlayer,
        }
    }

    pub fn slot(&self) -> &SlotKey {
        match self {
            Self::Empty(row) => &row.slot,
            Self::EditablePlayer(row) | Self::ReadOnlyPlayer(row) => &row.slot,
        }
    }

    /// The occupant's display values, if the slot is occupied.
    pub fn player(&self) -> Option<&PlayerFields> {
        match self {
            Self::Empty(_) => None,
            Self::EditablePlayer(row) | Self::ReadOnlyPlayer(row) => Some(&row.player),
        }
    }
}

/// Row for a client without a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpectatorRow {
    pub player: PlayerFields,
    /// `true` for the local client's own row.
    pub own: bool,
    pub editable: EditableFields,
    pub kick: ControlState,
}

/// A held spawn point on the map preview, tinted with its holder's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpawnMarker {
    pub point: u8,
    pub position: SpawnPosition,
    pub client: ClientIndex,
    pub color: RampPoint,
}

/// Everything the rendering layer draws for the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbyView {
    /// Window title: the server name.
    pub title: String,
    pub map_title: Option<String>,
    /// The current map uid couldn't be resolved; `map_title` and the
    /// spawn markers describe the previous map, if any.
    pub map_unavailable: bool,
    pub slots: Vec<SlotRow>,
    pub spectators: Vec<SpectatorRow>,
    /// The "move to spectators" button.
    pub spectate: ControlState,
    pub allow_cheats: bool,
    pub cheats_toggle: ControlState,
    pub start_game: ControlState,
    pub change_map: ControlState,
    pub spawn_markers: Vec<SpawnMarker>,
    pub team_chat: bool,
    pub game_starting: bool,
}

/// Inputs of [`project`].
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    pub session: &'a Session,
    pub identity: &'a LocalIdentity,
    pub map: Option<&'a MapMetadata>,
    pub map_unavailable: bool,
    pub occupancy: &'a SpawnOccupancy,
    pub game_starting: bool,
    pub team_chat: bool,
}

impl Projection<'_> {
    fn allowed(&self, action: Action) -> bool {
        can_perform(self.session, self.identity, &action, self.game_starting)
    }

    fn kick_for(&self, client: &Client) -> ControlState {
        ControlState::when(
            self.identity.is_host && client.index != self.identity.client_index,
            self.allowed(Action::Kick(client.index)),
        )
    }

    fn player_row(&self, slot: &SlotKey, client: &Client) -> SlotRow {
        let player = PlayerFields::of(client);
        let editable = EditableFields::compute(self.session, self.identity, client.index);

        if owns(self.identity, client) {
            let spawn_choices = match self.map {
                Some(map) if editable.contains(Field::Spawn) => self
                    .occupancy
                    .choices_for(client, map.spawn_point_count()),
                _ => Vec::new(),
            };
            let manage = ControlState::when(
                client.is_bot(),
                self.allowed(Action::ManageSlot(slot.clone())),
            );
            SlotRow::EditablePlayer(PlayerRow {
                slot: slot.clone(),
                player,
                editable,
                spawn_choices,
                kick: ControlState::HIDDEN,
                manage,
            })
        } else {
            SlotRow::ReadOnlyPlayer(PlayerRow {
                slot: slot.clone(),
                player,
                editable,
                spawn_choices: Vec::new(),
                kick: self.kick_for(client),
                manage: ControlState::HIDDEN,
            })
        }
    }

    fn empty_row(&self, slot: &SlotKey, closed: bool) -> SlotRow {
        SlotRow::Empty(EmptySlotRow {
            slot: slot.clone(),
            closed,
            join: ControlState::when(!closed, self.allowed(Action::JoinSlot(slot.clone()))),
            manage: ControlState::when(
                self.identity.is_host,
                self.allowed(Action::ManageSlot(slot.clone())),
            ),
        })
    }

    fn spectator_row(&self, client: &Client) -> SpectatorRow {
        let own = client.index == self.identity.client_index;
        SpectatorRow {
            player: PlayerFields::of(client),
            own,
            editable: EditableFields::compute(self.session, self.identity, client.index),
            kick: if own {
                ControlState::HIDDEN
            } else {
                self.kick_for(client)
            },
        }
    }

    fn spawn_markers(&self) -> Vec<SpawnMarker> {
        let Some(map) = self.map else {
            return Vec::new();
        };
        (1..=u8::try_from(map.spawn_point_count()).unwrap_or(u8::MAX))
            .filter_map(|point| {
                let position = map.spawn_position(point)?;
                let holder = self.session.clients().find(|c| c.spawn_point == point)?;
                Some(SpawnMarker {
                    point,
                    position,
                    client: holder.index,
                    color: holder.color.primary,
                })
            })
            .collect()
    }
}

/// Builds the lobby view for the local actor.
pub fn project(p: &Projection<'_>) -> LobbyView {
    let session = p.session;

    let slots: Vec<SlotRow> = session
        .slots()
        .iter()
        .map(|slot| match session.client_in_slot(&slot.key) {
            Some(client) => p.player_row(&slot.key, client),
            None => p.empty_row(&slot.key, slot.closed),
        })
        .collect();

    let spectators: Vec<SpectatorRow> = session
        .spectators()
        .map(|client| p.spectator_row(client))
        .collect();

    let seated = session
        .client(p.identity.client_index)
        .is_some_and(|c| !c.is_spectator());

    tracing::trace!(
        slots = slots.len(),
        spectators = spectators.len(),
        "lobby view projected"
    );

    LobbyView {
        title: session.global().server_name.clone(),
        map_title: p.map.map(|m| m.title.clone()),
        map_unavailable: p.map_unavailable,
        slots,
        spectators,
        spectate: ControlState::when(seated, p.allowed(Action::Spectate)),
        allow_cheats: session.global().allow_cheats,
        cheats_toggle: ControlState::shown(p.allowed(Action::ToggleCheats)),
        start_game: ControlState::when(p.identity.is_host, p.allowed(Action::StartGame)),
        change_map: ControlState::when(p.identity.is_host, p.allowed(Action::ChangeMap)),
        spawn_markers: p.spawn_markers(),
        team_chat: p.team_chat,
        game_starting: p.game_starting,
    }
}
