//! Controller flows with in-memory collaborators.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use skirmish_command::Order;
use skirmish_lobby::{
    ConnectionState, Intent, LobbyConfig, LobbyController, LobbyError, MapRepository,
    SettingsStore, SyncState,
};
use skirmish_model::{
    Client, ClientIndex, ColorRamp, GlobalSettings, LocalIdentity, MapMetadata, RampPoint,
    SessionSnapshot, Slot, SlotKey, SpawnPosition,
};
use skirmish_policy::{RowKind, SlotRow};

// =========================================================================
// Test doubles
// =========================================================================

/// Map repository that counts lookups.
#[derive(Clone, Default)]
struct CountingMaps {
    maps: HashMap<String, MapMetadata>,
    lookups: Arc<AtomicUsize>,
}

impl CountingMaps {
    fn with(uids: &[&str]) -> Self {
        let maps = uids
            .iter()
            .map(|uid| {
                let meta = MapMetadata {
                    uid: uid.to_string(),
                    title: format!("Map {uid}"),
                    spawn_points: vec![SpawnPosition::new(4, 4), SpawnPosition::new(60, 60)],
                };
                (uid.to_string(), meta)
            })
            .collect();
        Self {
            maps,
            lookups: Arc::default(),
        }
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl MapRepository for CountingMaps {
    fn resolve(&self, uid: &str) -> Option<MapMetadata> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.maps.get(uid).cloned()
    }
}

#[derive(Default)]
struct RecordingSettings {
    colors: Vec<ColorRamp>,
    maps: Vec<String>,
}

impl SettingsStore for RecordingSettings {
    fn save_player_color(&mut self, color: ColorRamp) {
        self.colors.push(color);
    }

    fn save_server_map(&mut self, uid: &str) {
        self.maps.push(uid.to_string());
    }
}

type Controller = LobbyController<CountingMaps, Vec<Order>, RecordingSettings>;

// =========================================================================
// Helpers
// =========================================================================

const HOST: ClientIndex = ClientIndex(0);
const BOT: ClientIndex = ClientIndex(5);

fn snapshot(map: &str) -> SessionSnapshot {
    SessionSnapshot {
        global: GlobalSettings {
            map: map.into(),
            server_name: "Skirmish".into(),
            allow_cheats: false,
        },
        slots: vec![Slot::open("Multi0"), Slot::open("Multi1"), Slot::open("Multi2")],
        clients: vec![
            Client {
                slot: Some(SlotKey::from("Multi0")),
                ..Client::new(HOST, "host")
            },
            Client {
                slot: Some(SlotKey::from("Multi1")),
                bot: Some("HardAI".into()),
                ..Client::new(BOT, "HardAI")
            },
        ],
    }
}

fn controller(maps: CountingMaps, config: LobbyConfig) -> Controller {
    LobbyController::new(config, maps, Vec::new(), RecordingSettings::default())
}

fn encoded(c: &Controller) -> Vec<String> {
    c.sink()
        .iter()
        .filter_map(|o| match o {
            Order::Command(cmd) => Some(cmd.encode()),
            Order::Chat { .. } => None,
        })
        .collect()
}

fn red() -> ColorRamp {
    ColorRamp::new(RampPoint::new(0, 255, 128), RampPoint::new(0, 200, 64))
}

// =========================================================================
// Map resolution
// =========================================================================

#[test]
fn test_unchanged_map_is_resolved_once() {
    let maps = CountingMaps::with(&["desert-1"]);
    let mut c = controller(maps.clone(), LobbyConfig::default());
    let host = LocalIdentity::host(HOST);

    c.apply_snapshot(snapshot("desert-1"), host).unwrap();
    c.apply_snapshot(snapshot("desert-1"), host).unwrap();

    assert_eq!(maps.lookups(), 1);
}

#[test]
fn test_map_change_is_resolved_again() {
    let maps = CountingMaps::with(&["desert-1", "jungle-2"]);
    let mut c = controller(maps.clone(), LobbyConfig::default());
    let host = LocalIdentity::host(HOST);

    c.apply_snapshot(snapshot("desert-1"), host).unwrap();
    let out = c.apply_snapshot(snapshot("jungle-2"), host).unwrap();

    assert!(out.map_changed);
    assert_eq!(maps.lookups(), 2);
    assert_eq!(c.view().unwrap().map_title.as_deref(), Some("Map jungle-2"));
}

#[test]
fn test_unavailable_map_is_retried_and_flagged() {
    let maps = CountingMaps::with(&["desert-1"]);
    let mut c = controller(maps.clone(), LobbyConfig::default());
    let host = LocalIdentity::host(HOST);

    c.apply_snapshot(snapshot("desert-1"), host).unwrap();
    let out = c.apply_snapshot(snapshot("ocean-9"), host).unwrap();
    assert!(matches!(out.map_error(), Some(LobbyError::MapUnavailable(_))));
    c.apply_snapshot(snapshot("ocean-9"), host).unwrap();

    assert_eq!(maps.lookups(), 3);
    let view = c.view().unwrap();
    assert!(view.map_unavailable);
    assert_eq!(view.map_title.as_deref(), Some("Map desert-1"));
    assert_eq!(c.reconciler().state(), SyncState::Synced);
}

#[test]
fn test_returning_to_resolved_map_clears_unavailable() {
    let maps = CountingMaps::with(&["desert-1"]);
    let mut c = controller(maps.clone(), LobbyConfig::default());
    let host = LocalIdentity::host(HOST);

    c.apply_snapshot(snapshot("desert-1"), host).unwrap();
    c.apply_snapshot(snapshot("ocean-9"), host).unwrap();
    assert!(c.view().unwrap().map_unavailable);

    let out = c.apply_snapshot(snapshot("desert-1"), host).unwrap();
    assert_eq!(out.map_unavailable, None);
    assert!(!out.map_changed);
    assert!(!c.reconciler().map_unavailable());
    assert!(!c.view().unwrap().map_unavailable);
    assert_eq!(c.view().unwrap().map_title.as_deref(), Some("Map desert-1"));
    assert_eq!(maps.lookups(), 2);
}

// =========================================================================
// Snapshot handling
// =========================================================================

#[test]
fn test_invalid_snapshot_keeps_view() {
    let mut c = controller(CountingMaps::with(&["desert-1"]), LobbyConfig::default());
    let host = LocalIdentity::host(HOST);
    c.apply_snapshot(snapshot("desert-1"), host).unwrap();
    let before = c.view().cloned();

    let mut bad = snapshot("desert-1");
    bad.clients[0].spawn_point = 1;
    bad.clients[1].spawn_point = 1;
    let err = c.apply_snapshot(bad, host).unwrap_err();

    assert!(matches!(err, LobbyError::InvalidSnapshot(_)));
    assert_eq!(c.view().cloned(), before);
}

#[test]
fn test_auto_bot_fires_once_across_snapshots() {
    let config = LobbyConfig {
        add_bots: true,
        default_bot: Some("EasyAI".into()),
        ..LobbyConfig::default()
    };
    let mut c = controller(CountingMaps::with(&["desert-1"]), config);
    let host = LocalIdentity::host(HOST);

    c.apply_snapshot(snapshot("desert-1"), host).unwrap();
    c.apply_snapshot(snapshot("desert-1"), host).unwrap();

    assert_eq!(encoded(&c), vec!["slot_bot Multi2 EasyAI"]);
}

#[test]
fn test_host_view_rows() {
    let mut c = controller(CountingMaps::with(&["desert-1"]), LobbyConfig::default());
    c.apply_snapshot(snapshot("desert-1"), LocalIdentity::host(HOST)).unwrap();

    let kinds: Vec<RowKind> = c.view().unwrap().slots.iter().map(SlotRow::kind).collect();
    assert_eq!(
        kinds,
        vec![RowKind::EditablePlayer, RowKind::EditablePlayer, RowKind::Empty]
    );
}

// =========================================================================
// Settings write-through
// =========================================================================

#[test]
fn test_own_color_is_saved_bot_color_is_not() {
    let mut c = controller(CountingMaps::with(&["desert-1"]), LobbyConfig::default());
    c.apply_snapshot(snapshot("desert-1"), LocalIdentity::host(HOST)).unwrap();

    c.issue(Intent::SetColor { client: BOT, color: red() }).unwrap();
    assert!(c.settings().colors.is_empty());

    c.issue(Intent::SetColor { client: HOST, color: red() }).unwrap();
    assert_eq!(c.settings().colors, vec![red()]);
    assert_eq!(
        encoded(&c),
        vec!["color 5 0,255,128,0,200,64", "color 0 0,255,128,0,200,64"]
    );
}

#[test]
fn test_map_is_saved_name_is_not() {
    let mut c = controller(CountingMaps::with(&["desert-1"]), LobbyConfig::default());
    c.apply_snapshot(snapshot("desert-1"), LocalIdentity::host(HOST)).unwrap();

    c.issue(Intent::ChangeMap("jungle-2".into())).unwrap();
    c.issue(Intent::SetName("Commander".into())).unwrap();

    assert_eq!(c.settings().maps, vec!["jungle-2"]);
    assert!(c.settings().colors.is_empty());
    assert_eq!(encoded(&c), vec!["map jungle-2", "name Commander"]);
}

#[test]
fn test_rejected_intent_saves_nothing() {
    let mut c = controller(CountingMaps::with(&["desert-1"]), LobbyConfig::default());
    c.apply_snapshot(snapshot("desert-1"), LocalIdentity::guest(HOST)).unwrap();

    let err = c.issue(Intent::ChangeMap("jungle-2".into())).unwrap_err();
    assert!(matches!(err, LobbyError::CommandRejectedLocally { .. }));
    assert!(c.settings().maps.is_empty());
    assert!(c.sink().is_empty());
}

// =========================================================================
// Host controls over bots
// =========================================================================

#[test]
fn test_host_edits_bot_team_and_spawn() {
    let mut c = controller(CountingMaps::with(&["desert-1"]), LobbyConfig::default());
    c.apply_snapshot(snapshot("desert-1"), LocalIdentity::host(HOST)).unwrap();

    c.issue(Intent::SetTeam { client: BOT, team: 2 }).unwrap();
    c.issue(Intent::SetSpawn { client: BOT, point: 2 }).unwrap();
    c.issue(Intent::SetFaction { client: BOT, faction: "nod".into() }).unwrap();
    c.issue(Intent::Kick(BOT)).unwrap();

    assert_eq!(
        encoded(&c),
        vec!["team 5 2", "spawn 5 2", "race 5 nod", "kick 5"]
    );
}

#[test]
fn test_host_cannot_kick_self() {
    let mut c = controller(CountingMaps::with(&["desert-1"]), LobbyConfig::default());
    c.apply_snapshot(snapshot("desert-1"), LocalIdentity::host(HOST)).unwrap();
    assert!(c.issue(Intent::Kick(HOST)).is_err());
}

#[test]
fn test_disconnect_stops_snapshots_and_commands() {
    let mut c = controller(CountingMaps::with(&["desert-1"]), LobbyConfig::default());
    let host = LocalIdentity::host(HOST);
    c.apply_snapshot(snapshot("desert-1"), host).unwrap();
    c.on_connection_state(ConnectionState::NotConnected);

    assert!(matches!(
        c.apply_snapshot(snapshot("desert-1"), host),
        Err(LobbyError::Disconnected)
    ));
    assert!(matches!(
        c.issue(Intent::JoinSlot(SlotKey::from("Multi2"))),
        Err(LobbyError::Disconnected)
    ));
    assert_eq!(c.reconciler().state(), SyncState::Disconnected);
}
