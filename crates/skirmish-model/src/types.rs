//! Core lobby types replicated by the authoritative server.
//!
//! Every type here is plain data. Invariants that span several values
//! (slot references, spawn point uniqueness) are checked when a
//! [`Session`](crate::Session) is built, not here.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Spawn point value meaning "no spawn point picked yet".
///
/// Any number of clients may hold it at the same time.
pub const UNSET_SPAWN: u8 = 0;

/// Team value meaning "not on a team".
pub const UNASSIGNED_TEAM: u8 = 0;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The server-assigned index of a connected client.
///
/// Stable for the lifetime of a connection and unique within a session.
/// Bots get an index too. Displays as the bare number because that is
/// how the command vocabulary refers to clients.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClientIndex(pub u32);

impl fmt::Display for ClientIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The key of a seat in the lobby (e.g. `"Multi0"`).
///
/// Keys come from the map and are treated as opaque tokens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotKey(pub String);

impl SlotKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlotKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One end of a player color ramp, in hue/saturation/luminance bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RampPoint {
    pub hue: u8,
    pub saturation: u8,
    pub luminance: u8,
}

impl RampPoint {
    pub const fn new(hue: u8, saturation: u8, luminance: u8) -> Self {
        Self {
            hue,
            saturation,
            luminance,
        }
    }
}

/// A player color: an ordered pair of palette ramp points.
///
/// `primary` is the color shown in swatches and chat; the palette is
/// remapped along the ramp from `primary` to `secondary`.
///
/// Displays as six comma-separated bytes with no whitespace
/// (`"h,s,l,h,s,l"`) so it travels as a single command token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColorRamp {
    pub primary: RampPoint,
    pub secondary: RampPoint,
}

impl ColorRamp {
    pub const fn new(primary: RampPoint, secondary: RampPoint) -> Self {
        Self { primary, secondary }
    }
}

impl fmt::Display for ColorRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = (self.primary, self.secondary);
        write!(
            f,
            "{},{},{},{},{},{}",
            a.hue, a.saturation, a.luminance, b.hue, b.saturation, b.luminance
        )
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// A seat in the lobby.
///
/// The four lock flags are set by map or server policy. They are advisory:
/// the model never enforces them, the editability policy honors them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub key: SlotKey,
    /// A closed slot can't be joined and its occupant's spawn point
    /// doesn't count as taken.
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub lock_color: bool,
    #[serde(default)]
    pub lock_faction: bool,
    #[serde(default)]
    pub lock_team: bool,
    #[serde(default)]
    pub lock_spawn: bool,
}

impl Slot {
    /// An open slot with no locks.
    pub fn open(key: impl Into<String>) -> Self {
        Self {
            key: SlotKey(key.into()),
            closed: false,
            lock_color: false,
            lock_faction: false,
            lock_team: false,
            lock_spawn: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Whether a client has declared itself ready to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadyState {
    #[default]
    NotReady,
    Ready,
}

impl ReadyState {
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// A participant of the lobby, human or bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub index: ClientIndex,
    pub name: String,
    pub color: ColorRamp,
    /// Faction (country) identifier, `"random"` when the server picks.
    pub faction: String,
    /// [`UNASSIGNED_TEAM`] when not on a team.
    #[serde(default)]
    pub team: u8,
    /// [`UNSET_SPAWN`] when no spawn point is picked.
    #[serde(default)]
    pub spawn_point: u8,
    #[serde(default)]
    pub state: ReadyState,
    /// Bot type name. `Some` only for AI-controlled clients.
    #[serde(default)]
    pub bot: Option<String>,
    /// The slot this client sits in. `None` means spectator.
    #[serde(default)]
    pub slot: Option<SlotKey>,
}

impl Client {
    /// A human spectator with default preferences.
    pub fn new(index: ClientIndex, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            color: ColorRamp::default(),
            faction: "random".to_string(),
            team: UNASSIGNED_TEAM,
            spawn_point: UNSET_SPAWN,
            state: ReadyState::NotReady,
            bot: None,
            slot: None,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.bot.is_some()
    }

    pub fn is_spectator(&self) -> bool {
        self.slot.is_none()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }
}

// ---------------------------------------------------------------------------
// Global settings and local identity
// ---------------------------------------------------------------------------

/// Session-wide settings chosen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Uid of the selected map.
    pub map: String,
    pub server_name: String,
    #[serde(default)]
    pub allow_cheats: bool,
}

/// Who the local actor is.
///
/// Owned by the transport layer and delivered alongside each snapshot.
/// Read-only for everything in Skirmish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalIdentity {
    pub client_index: ClientIndex,
    pub is_host: bool,
}

impl LocalIdentity {
    pub fn host(client_index: ClientIndex) -> Self {
        Self {
            client_index,
            is_host: true,
        }
    }

    pub fn guest(client_index: ClientIndex) -> Self {
        Self {
            client_index,
            is_host: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_index_displays_bare_number() {
        assert_eq!(ClientIndex(3).to_string(), "3");
    }

    #[test]
    fn test_client_index_serializes_as_plain_number() {
        let json = serde_json::to_string(&ClientIndex(12)).unwrap();
        assert_eq!(json, "12");
    }

    #[test]
    fn test_slot_key_serializes_as_plain_string() {
        let json = serde_json::to_string(&SlotKey::from("Multi0")).unwrap();
        assert_eq!(json, "\"Multi0\"");
    }

    #[test]
    fn test_color_ramp_display_has_no_whitespace() {
        let ramp = ColorRamp::new(RampPoint::new(10, 200, 90), RampPoint::new(12, 180, 40));
        let text = ramp.to_string();
        assert_eq!(text, "10,200,90,12,180,40");
        assert!(!text.contains(char::is_whitespace));
    }

    #[test]
    fn test_ready_state_defaults_to_not_ready() {
        assert_eq!(ReadyState::default(), ReadyState::NotReady);
        assert!(!ReadyState::NotReady.is_ready());
        assert!(ReadyState::Ready.is_ready());
    }

    #[test]
    fn test_slot_lock_flags_default_when_missing() {
        let slot: Slot = serde_json::from_str(r#"{"key": "Multi1"}"#).unwrap();
        assert_eq!(slot, Slot::open("Multi1"));
    }

    #[test]
    fn test_client_optional_fields_default_when_missing() {
        let json = r#"{
            "index": 4,
            "name": "Nod",
            "color": {
                "primary": { "hue": 1, "saturation": 2, "luminance": 3 },
                "secondary": { "hue": 4, "saturation": 5, "luminance": 6 }
            },
            "faction": "random"
        }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.team, UNASSIGNED_TEAM);
        assert_eq!(client.spawn_point, UNSET_SPAWN);
        assert_eq!(client.state, ReadyState::NotReady);
        assert!(!client.is_bot());
        assert!(client.is_spectator());
    }

    #[test]
    fn test_local_identity_constructors() {
        assert!(LocalIdentity::host(ClientIndex(0)).is_host);
        assert!(!LocalIdentity::guest(ClientIndex(1)).is_host);
    }
}
