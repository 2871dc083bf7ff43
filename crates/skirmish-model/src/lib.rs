//! Replicated lobby session model for Skirmish.
//!
//! This crate holds the data the authoritative server replicates to every
//! participant of a lobby:
//!
//! - **Types** ([`Slot`], [`Client`], [`ColorRamp`], [`GlobalSettings`],
//!   [`LocalIdentity`], [`MapMetadata`]) — the pieces of a session.
//! - **Session** ([`SessionSnapshot`], [`Session`]) — the raw wire form of
//!   a snapshot and its validated, immutable counterpart.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how snapshots are turned
//!   into bytes and back.
//! - **Errors** ([`ModelError`]) — what can be wrong with a snapshot.
//!
//! # How it fits in the stack
//!
//! ```text
//! Lobby Layer (above)   ← reconciles snapshots, issues commands
//!     ↕
//! Policy Layer          ← decides what the local actor may edit
//!     ↕
//! Model Layer (this crate)  ← what the server says the session looks like
//! ```
//!
//! Nothing in this crate mutates a [`Session`] after construction. A new
//! snapshot always produces a new value.

mod codec;
mod error;
mod map;
mod session;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ModelError;
pub use map::{MapMetadata, SpawnPosition};
pub use session::{Session, SessionSnapshot};
pub use types::{
    Client, ClientIndex, ColorRamp, GlobalSettings, LocalIdentity, RampPoint,
    ReadyState, Slot, SlotKey, UNASSIGNED_TEAM, UNSET_SPAWN,
};
