//! Error types for the model layer.

/// Errors that can occur while building a [`Session`](crate::Session)
/// from replicated data.
///
/// None of these are fatal. The lobby layer logs them, discards the
/// offending snapshot and keeps the last good session.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The snapshot violates a session invariant: a client points at a
    /// slot that doesn't exist, two clients share a slot or an index, or
    /// two clients in open slots claim the same spawn point.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Serializing a snapshot failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The bytes delivered by the transport are not a snapshot.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
