//! Codec trait and implementations for snapshot bytes.
//!
//! The transport delivers snapshots as bytes. A [`Codec`] turns those
//! bytes into a [`SessionSnapshot`] (unvalidated, so the lobby layer can
//! decide what to do with a bad one) and back.
//!
//! [`JsonCodec`] is the only implementation for now. A binary codec can
//! be added later without touching the lobby layer.

use crate::{ModelError, SessionSnapshot};

/// Converts snapshots to and from bytes.
///
/// `Send + Sync + 'static` so a codec can live inside the lobby actor
/// task alongside everything else it owns.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a snapshot.
    ///
    /// # Errors
    /// Returns `ModelError::Encode` if serialization fails.
    fn encode(&self, snapshot: &SessionSnapshot) -> Result<Vec<u8>, ModelError>;

    /// Deserializes a snapshot. Performs no invariant checks.
    ///
    /// # Errors
    /// Returns `ModelError::Decode` if the bytes are malformed or don't
    /// have the shape of a snapshot.
    fn decode(&self, data: &[u8]) -> Result<SessionSnapshot, ModelError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use skirmish_model::{Codec, JsonCodec, Session};
///
/// let bytes = br#"{
///     "global": { "map": "desert-1", "server_name": "Skirmish" },
///     "slots": [{ "key": "Multi0" }]
/// }"#;
///
/// let snapshot = JsonCodec.decode(bytes).unwrap();
/// let session = Session::try_from(snapshot).unwrap();
/// assert!(session.first_empty_slot().is_some());
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, snapshot: &SessionSnapshot) -> Result<Vec<u8>, ModelError> {
        serde_json::to_vec(snapshot).map_err(ModelError::Encode)
    }

    fn decode(&self, data: &[u8]) -> Result<SessionSnapshot, ModelError> {
        serde_json::from_slice(data).map_err(ModelError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Client, ClientIndex, GlobalSettings, Slot, SlotKey};

    #[test]
    fn test_decode_garbage_returns_decode_error() {
        let result = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ModelError::Decode(_))));
    }

    #[test]
    fn test_decode_does_not_validate() {
        // A dangling slot reference decodes fine; rejecting it is the
        // caller's decision.
        let snapshot = SessionSnapshot {
            global: GlobalSettings::default(),
            slots: vec![],
            clients: vec![Client {
                slot: Some(SlotKey::from("Multi9")),
                ..Client::new(ClientIndex(0), "ghost")
            }],
        };
        let bytes = JsonCodec.encode(&snapshot).unwrap();
        let decoded = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let decoded = JsonCodec
            .decode(br#"{ "global": { "map": "m", "server_name": "s" } }"#)
            .unwrap();
        assert!(decoded.slots.is_empty());
        assert!(decoded.clients.is_empty());
    }

    #[test]
    fn test_slot_order_is_preserved() {
        let snapshot = SessionSnapshot {
            global: GlobalSettings::default(),
            slots: vec![Slot::open("Multi2"), Slot::open("Multi0"), Slot::open("Multi1")],
            clients: vec![],
        };
        let decoded = JsonCodec.decode(&JsonCodec.encode(&snapshot).unwrap()).unwrap();
        let keys: Vec<_> = decoded.slots.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["Multi2", "Multi0", "Multi1"]);
    }
}
