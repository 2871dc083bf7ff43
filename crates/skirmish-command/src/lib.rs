//! Lobby command vocabulary for Skirmish.
//!
//! The authoritative server understands a small set of space-separated
//! textual commands (`spawn 3 2`, `slot Multi0`, `startgame`, ...). This
//! crate turns typed intents into those exact strings and defines the
//! boundary to the transport that carries them:
//!
//! - [`Command`] — one typed intent, encoded with [`Command::encode`]
//! - [`Order`] — what the transport sends: a command or a chat line
//! - [`CommandSink`] — where orders go (fire-and-forget)
//!
//! Encoding never checks whether a command is *allowed*. That is the
//! editability policy's job and happens before anything is encoded.

mod command;
mod sink;

pub use command::{Command, Order};
pub use sink::CommandSink;
