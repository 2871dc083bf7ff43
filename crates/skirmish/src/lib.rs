//! # Skirmish
//!
//! Client-side lobby engine for server-authoritative skirmish games.
//!
//! The server owns the lobby. Skirmish keeps a mirror of it from the
//! snapshots the transport delivers, works out what the local player may
//! change, turns their intents into the server's command strings, and
//! projects everything into a view the UI draws as-is.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use skirmish::prelude::*;
//!
//! # fn main() -> Result<(), SkirmishError> {
//! let snapshot = JsonCodec.decode(br#"{
//!     "global": { "map": "desert-1", "server_name": "Friday Skirmish" },
//!     "slots": [{ "key": "Multi0" }, { "key": "Multi1" }],
//!     "clients": [
//!         { "index": 0, "name": "host", "color": {
//!             "primary": { "hue": 0, "saturation": 255, "luminance": 128 },
//!             "secondary": { "hue": 0, "saturation": 200, "luminance": 64 } },
//!           "faction": "gdi", "slot": "Multi0" }
//!     ]
//! }"#)?;
//!
//! let maps: HashMap<String, MapMetadata> = HashMap::new();
//! let mut lobby = LobbyController::new(LobbyConfig::default(), maps, Vec::new(), DiscardSettings);
//! lobby.apply_snapshot(snapshot, LocalIdentity::host(ClientIndex(0)))?;
//! lobby.issue(Intent::JoinSlot(SlotKey::from("Multi1")))?;
//!
//! assert_eq!(lobby.view().map(|v| v.title.as_str()), Some("Friday Skirmish"));
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;

pub use error::SkirmishError;
pub use logging::init_tracing;

pub use skirmish_command as command;
pub use skirmish_lobby as lobby;
pub use skirmish_model as model;
pub use skirmish_policy as policy;

/// The types most embedders need.
pub mod prelude {
    pub use crate::{SkirmishError, init_tracing};

    pub use skirmish_command::{Command, CommandSink, Order};
    pub use skirmish_lobby::{
        ChatLine, ConnectionState, DiscardSettings, Intent, LobbyConfig, LobbyController,
        LobbyError, LobbyHandle, MapRepository, SettingsStore, SyncState, spawn_lobby,
    };
    pub use skirmish_model::{
        Client, ClientIndex, Codec, ColorRamp, JsonCodec, LocalIdentity, MapMetadata, ModelError,
        RampPoint, ReadyState, SessionSnapshot, Slot, SlotKey,
    };
    pub use skirmish_policy::{ControlState, Field, LobbyView, RowKind, SlotRow};
}
