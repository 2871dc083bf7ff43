//! Unified error type for Skirmish.

use skirmish_lobby::LobbyError;
use skirmish_model::ModelError;

/// Top-level error that wraps every layer's error.
///
/// `#[from]` on each variant lets `?` convert layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SkirmishError {
    /// Snapshot bytes or contents were bad.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The lobby refused a snapshot or an intent, or is gone.
    #[error(transparent)]
    Lobby(#[from] LobbyError),
}
