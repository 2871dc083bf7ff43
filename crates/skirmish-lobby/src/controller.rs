//! The lobby controller: single writer for one lobby session.
//!
//! Every input goes through `&mut self`, so there is exactly one mutator of
//! the session mirror and the local flags. Intents are checked against the
//! editability policy before anything reaches the [`CommandSink`]; a
//! rejected intent sends nothing.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use skirmish_command::{Command, CommandSink, Order};
use skirmish_model::{
    ClientIndex, ColorRamp, LocalIdentity, RampPoint, Session, SessionSnapshot, SlotKey,
    UNSET_SPAWN,
};
use skirmish_policy::{Action, Field, LobbyView, can_edit, can_perform, project};

use crate::{
    ConnectionState, LobbyConfig, LobbyError, MapRepository, Reconciled, Reconciler,
    SettingsStore,
};

/// One line of lobby chat, as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub from: String,
    /// Sender's color, for tinting the name.
    pub color: RampPoint,
    pub text: String,
}

/// Something the local user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Sit down in an empty slot.
    JoinSlot(SlotKey),
    /// Leave the current slot to watch.
    Spectate,
    /// Flip the local client's readiness.
    ToggleReady,
    /// Rename the local client.
    SetName(String),
    SetColor { client: ClientIndex, color: ColorRamp },
    SetFaction { client: ClientIndex, faction: String },
    SetTeam { client: ClientIndex, team: u8 },
    SetSpawn { client: ClientIndex, point: u8 },
    /// Pick a spawn point for the local client from the map preview.
    ClaimSpawn(u8),
    Kick(ClientIndex),
    AddBot { slot: SlotKey, bot: String },
    CloseSlot(SlotKey),
    OpenSlot(SlotKey),
    ToggleCheats,
    StartGame,
    /// Select a different map by uid.
    ChangeMap(String),
    /// Say something. Goes to the team when team chat is on.
    Chat(String),
    /// Switch between team and all chat. Local only.
    ToggleTeamChat,
}

/// Drives one lobby session: reconciles snapshots, authorizes intents,
/// and keeps the derived [`LobbyView`] current.
pub struct LobbyController<M: MapRepository, S: CommandSink, T: SettingsStore> {
    reconciler: Reconciler<M>,
    sink: S,
    settings: T,
    config: LobbyConfig,
    team_chat: bool,
    game_starting: bool,
    chat: VecDeque<ChatLine>,
    view: Option<LobbyView>,
}

impl<M: MapRepository, S: CommandSink, T: SettingsStore> LobbyController<M, S, T> {
    pub fn new(config: LobbyConfig, maps: M, sink: S, settings: T) -> Self {
        Self {
            reconciler: Reconciler::new(maps, config.add_bots),
            sink,
            settings,
            config,
            team_chat: false,
            game_starting: false,
            chat: VecDeque::new(),
            view: None,
        }
    }

    // =====================================================================
    // Transport inputs
    // =====================================================================

    /// Applies a snapshot and regenerates the view.
    ///
    /// A rejected snapshot leaves the view untouched. A map lookup failure
    /// is not an error here; it shows up in [`Reconciled::map_unavailable`]
    /// and in the view.
    ///
    /// # Errors
    /// - [`LobbyError::Disconnected`]
    /// - [`LobbyError::InvalidSnapshot`]
    pub fn apply_snapshot(
        &mut self,
        snapshot: SessionSnapshot,
        identity: LocalIdentity,
    ) -> Result<Reconciled, LobbyError> {
        let reconciled = self.reconciler.apply(snapshot, identity)?;

        if let Some(slot) = &reconciled.bot_slot {
            match &self.config.default_bot {
                Some(bot) => {
                    tracing::info!(%slot, bot = %bot, "adding bot to first empty slot");
                    self.emit(Command::SlotBot {
                        slot: slot.clone(),
                        bot: bot.clone(),
                    });
                }
                None => tracing::debug!(%slot, "no default bot configured, skipping"),
            }
        }

        self.refresh_view();
        Ok(reconciled)
    }

    /// Reacts to the transport's connection state. Losing the connection
    /// is terminal: every later intent fails with
    /// [`LobbyError::Disconnected`].
    pub fn on_connection_state(&mut self, connection: ConnectionState) {
        self.reconciler.on_connection_state(connection);
    }

    /// Appends an incoming chat line, dropping the oldest beyond
    /// `chat_history`.
    pub fn on_chat_line(&mut self, line: ChatLine) {
        if self.config.chat_history == 0 {
            return;
        }
        while self.chat.len() >= self.config.chat_history {
            self.chat.pop_front();
        }
        self.chat.push_back(line);
    }

    // =====================================================================
    // User intents
    // =====================================================================

    /// Authorizes `intent` and hands the resulting order to the sink.
    ///
    /// Nothing is awaited: the effect shows up in a later snapshot, or
    /// doesn't if the server disagrees.
    ///
    /// # Errors
    /// - [`LobbyError::Disconnected`] — the connection is gone
    /// - [`LobbyError::CommandRejectedLocally`] — the local actor may not
    ///   do this right now; nothing was sent
    pub fn issue(&mut self, intent: Intent) -> Result<(), LobbyError> {
        if self.reconciler.is_disconnected() {
            tracing::debug!(?intent, "lobby disconnected, dropping intent");
            return Err(LobbyError::Disconnected);
        }

        match intent {
            Intent::ToggleTeamChat => {
                self.team_chat = !self.team_chat;
                self.refresh_view();
                return Ok(());
            }
            Intent::Chat(text) => {
                if !text.is_empty() {
                    let team = self.team_chat;
                    self.sink.send(Order::Chat { team, text });
                }
                return Ok(());
            }
            _ => {}
        }

        let Some((session, identity)) = self.reconciler.synced() else {
            tracing::debug!(?intent, "no session yet, rejecting intent");
            return Err(LobbyError::rejected(intent, "lobby not synced"));
        };

        let command = match self.authorize(session, identity, &intent) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(()),
            Err(reason) => {
                tracing::debug!(?intent, reason, "intent rejected locally");
                return Err(LobbyError::rejected(intent, reason));
            }
        };

        self.write_through(&intent);
        if matches!(intent, Intent::StartGame) {
            self.game_starting = true;
            self.refresh_view();
        }
        self.emit(command);
        Ok(())
    }

    /// Maps an intent to its command. `Ok(None)` means there is nothing to
    /// send.
    fn authorize(
        &self,
        session: &Session,
        identity: &LocalIdentity,
        intent: &Intent,
    ) -> Result<Option<Command>, &'static str> {
        let local = identity.client_index;
        let allowed = |action: Action| can_perform(session, identity, &action, self.game_starting);
        let editable = |client: ClientIndex, field: Field| can_edit(session, identity, client, field);

        let command = match intent {
            Intent::JoinSlot(slot) => {
                require(allowed(Action::JoinSlot(slot.clone())), "slot can't be joined")?;
                Command::Slot { slot: slot.clone() }
            }
            Intent::Spectate => {
                require(allowed(Action::Spectate), "can't spectate")?;
                Command::Spectate
            }
            Intent::ToggleReady => {
                require(editable(local, Field::ReadyState), "readiness not editable")?;
                Command::Ready
            }
            Intent::SetName(name) => {
                require(editable(local, Field::Name), "name not editable")?;
                let name = name.trim();
                require(!name.is_empty(), "name is empty")?;
                if session.client(local).is_some_and(|c| c.name == name) {
                    return Ok(None);
                }
                Command::Name { name: name.to_string() }
            }
            Intent::SetColor { client, color } => {
                require(editable(*client, Field::Color), "color not editable")?;
                Command::Color { client: *client, color: *color }
            }
            Intent::SetFaction { client, faction } => {
                require(editable(*client, Field::Faction), "faction not editable")?;
                Command::Race { client: *client, faction: faction.clone() }
            }
            Intent::SetTeam { client, team } => {
                require(editable(*client, Field::Team), "team not editable")?;
                Command::Team { client: *client, team: *team }
            }
            Intent::SetSpawn { client, point } => {
                require(editable(*client, Field::Spawn), "spawn not editable")?;
                self.check_spawn(*point)?;
                require(
                    !self.reconciler.occupancy().is_taken_by_other(*point, *client),
                    "spawn point taken",
                )?;
                Command::Spawn { client: *client, point: *point }
            }
            Intent::ClaimSpawn(point) => {
                require(allowed(Action::ClaimSpawn(*point)), "spawn point taken")?;
                self.check_spawn(*point)?;
                Command::Spawn { client: local, point: *point }
            }
            Intent::Kick(client) => {
                require(allowed(Action::Kick(*client)), "can't kick")?;
                Command::Kick { client: *client }
            }
            Intent::AddBot { slot, bot } => {
                require(allowed(Action::ManageSlot(slot.clone())), "slot not manageable")?;
                Command::SlotBot { slot: slot.clone(), bot: bot.clone() }
            }
            Intent::CloseSlot(slot) => {
                require(allowed(Action::ManageSlot(slot.clone())), "slot not manageable")?;
                Command::SlotClose { slot: slot.clone() }
            }
            Intent::OpenSlot(slot) => {
                require(allowed(Action::ManageSlot(slot.clone())), "slot not manageable")?;
                Command::SlotOpen { slot: slot.clone() }
            }
            Intent::ToggleCheats => {
                require(allowed(Action::ToggleCheats), "cheats not toggleable")?;
                Command::AllowCheats { allow: !session.global().allow_cheats }
            }
            Intent::StartGame => {
                require(allowed(Action::StartGame), "can't start game")?;
                Command::StartGame
            }
            Intent::ChangeMap(uid) => {
                require(allowed(Action::ChangeMap), "can't change map")?;
                Command::Map { uid: uid.clone() }
            }
            Intent::Chat(_) | Intent::ToggleTeamChat => return Ok(None),
        };
        Ok(Some(command))
    }

    /// Point 0 is always valid; others must exist on the current map.
    fn check_spawn(&self, point: u8) -> Result<(), &'static str> {
        if point == UNSET_SPAWN {
            return Ok(());
        }
        let Some(map) = self.reconciler.map() else {
            return Err("map metadata unknown");
        };
        require(
            usize::from(point) <= map.spawn_point_count(),
            "no such spawn point",
        )
    }

    /// Preference changes the embedder remembers for the next session.
    fn write_through(&mut self, intent: &Intent) {
        match intent {
            Intent::SetColor { client, color } => {
                let human = self
                    .reconciler
                    .session()
                    .and_then(|s| s.client(*client))
                    .is_some_and(|c| !c.is_bot());
                if human {
                    self.settings.save_player_color(*color);
                }
            }
            Intent::ChangeMap(uid) => self.settings.save_server_map(uid),
            _ => {}
        }
    }

    fn emit(&mut self, command: Command) {
        tracing::debug!(command = %command, "sending command");
        self.sink.send(Order::Command(command));
    }

    fn refresh_view(&mut self) {
        self.view = self
            .reconciler
            .projection(self.game_starting, self.team_chat)
            .map(|p| project(&p));
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// The current view, once the first snapshot was accepted.
    pub fn view(&self) -> Option<&LobbyView> {
        self.view.as_ref()
    }

    /// Chat lines, oldest first.
    pub fn chat_log(&self) -> impl Iterator<Item = &ChatLine> {
        self.chat.iter()
    }

    pub fn team_chat(&self) -> bool {
        self.team_chat
    }

    pub fn game_starting(&self) -> bool {
        self.game_starting
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    pub fn reconciler(&self) -> &Reconciler<M> {
        &self.reconciler
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn settings(&self) -> &T {
        &self.settings
    }
}

fn require(condition: bool, reason: &'static str) -> Result<(), &'static str> {
    if condition { Ok(()) } else { Err(reason) }
}
