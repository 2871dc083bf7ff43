//! Error types for the lobby layer.

use skirmish_model::ModelError;

use crate::Intent;

/// Errors surfaced by the lobby layer.
///
/// None of these are fatal. Snapshot and map problems leave the last good
/// state in place; rejected intents are simply not sent.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The snapshot was malformed or broke a session invariant. It was
    /// discarded and the previous session kept.
    #[error("snapshot discarded: {0}")]
    InvalidSnapshot(#[from] ModelError),

    /// The map repository doesn't know the selected map. The previous map
    /// metadata stays in use.
    #[error("map {0} is unavailable")]
    MapUnavailable(String),

    /// The local actor isn't allowed to do this right now. Nothing was sent.
    #[error("intent rejected locally ({reason}): {intent:?}")]
    CommandRejectedLocally {
        intent: Intent,
        reason: &'static str,
    },

    /// The transport reported the connection as lost. This lobby instance
    /// is finished; rejoining needs a new one.
    #[error("lobby is disconnected")]
    Disconnected,

    /// The lobby actor has been closed or its queue is gone.
    #[error("lobby is closed")]
    Unavailable,
}

impl LobbyError {
    pub(crate) fn rejected(intent: Intent, reason: &'static str) -> Self {
        Self::CommandRejectedLocally { intent, reason }
    }
}
