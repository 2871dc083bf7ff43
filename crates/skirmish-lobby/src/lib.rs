//! Lobby session reconciliation and command issuance for Skirmish.
//!
//! This crate is the single writer of everything the client knows about a
//! lobby. Snapshots, connection changes, chat lines and user intents all
//! flow through it, one at a time, in arrival order.
//!
//! # Key types
//!
//! - [`Reconciler`] — applies snapshots, keeps the last good session,
//!   tracks map metadata and the connection state machine
//! - [`LobbyController`] — authorizes intents, encodes them into commands,
//!   regenerates the [`LobbyView`](skirmish_policy::LobbyView)
//! - [`LobbyHandle`] — talk to a controller running as a Tokio task
//! - [`MapRepository`], [`SettingsStore`] — collaborators the embedder
//!   provides
//! - [`LobbyConfig`] — per-session settings

mod actor;
mod collab;
mod config;
mod controller;
mod error;
mod reconciler;

pub use actor::{LobbyHandle, spawn_lobby};
pub use collab::{DiscardSettings, MapRepository, SettingsStore};
pub use config::LobbyConfig;
pub use controller::{ChatLine, Intent, LobbyController};
pub use error::LobbyError;
pub use reconciler::{ConnectionState, Reconciled, Reconciler, SyncState};
