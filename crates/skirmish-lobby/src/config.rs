//! Lobby configuration.

use serde::{Deserialize, Serialize};

/// Settings for one lobby session instance.
///
/// Embedders override the defaults with struct update syntax:
///
/// ```rust
/// use skirmish_lobby::LobbyConfig;
///
/// let config = LobbyConfig {
///     add_bots: true,
///     default_bot: Some("HardAI".into()),
///     ..LobbyConfig::default()
/// };
/// assert_eq!(config.chat_history, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// Put a bot into the first empty slot once, when the first snapshot
    /// is accepted.
    pub add_bots: bool,

    /// Bot type used for that assignment. Without one, nothing is sent.
    pub default_bot: Option<String>,

    /// Maximum number of chat lines kept.
    pub chat_history: usize,

    /// Capacity of the lobby actor's event queue. Producers wait when
    /// it's full.
    pub channel_size: usize,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            add_bots: false,
            default_bot: None,
            chat_history: 200,
            channel_size: 64,
        }
    }
}
