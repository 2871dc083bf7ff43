//! Collaborators the embedder plugs into the lobby.
//!
//! Skirmish doesn't load maps or persist preferences. It asks for map
//! metadata through [`MapRepository`] and reports preference changes
//! through [`SettingsStore`]. Both are called synchronously from the
//! single lobby writer and must not block.

use std::collections::HashMap;

use skirmish_model::{ColorRamp, MapMetadata};

/// Looks up map metadata by uid.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use skirmish_lobby::MapRepository;
/// use skirmish_model::MapMetadata;
///
/// let mut maps = HashMap::new();
/// maps.insert(
///     "desert-1".to_string(),
///     MapMetadata { uid: "desert-1".into(), title: "Desert".into(), spawn_points: vec![] },
/// );
/// assert_eq!(maps.resolve("desert-1").unwrap().title, "Desert");
/// assert!(maps.resolve("jungle-2").is_none());
/// ```
pub trait MapRepository: Send + 'static {
    /// Returns the metadata of the map, or `None` if it isn't available
    /// locally.
    fn resolve(&self, uid: &str) -> Option<MapMetadata>;
}

impl MapRepository for HashMap<String, MapMetadata> {
    fn resolve(&self, uid: &str) -> Option<MapMetadata> {
        self.get(uid).cloned()
    }
}

/// Write-through sink for the local user's preferences.
///
/// Fire-and-forget: the lobby doesn't wait for or check the write.
pub trait SettingsStore: Send + 'static {
    /// The local user picked a new color for themselves.
    fn save_player_color(&mut self, color: ColorRamp);

    /// The host picked a map; remember it for the next hosted game.
    fn save_server_map(&mut self, uid: &str);
}

/// A [`SettingsStore`] that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSettings;

impl SettingsStore for DiscardSettings {
    fn save_player_color(&mut self, _color: ColorRamp) {}

    fn save_server_map(&mut self, _uid: &str) {}
}
