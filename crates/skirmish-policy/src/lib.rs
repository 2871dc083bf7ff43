//! Editability policy and lobby view projection for Skirmish.
//!
//! Given a [`Session`](skirmish_model::Session) and the
//! [`LocalIdentity`](skirmish_model::LocalIdentity) of the local actor,
//! this crate answers two questions:
//!
//! 1. **What may the local actor change right now?** — [`can_edit`] for
//!    per-client fields, [`can_perform`] for lobby actions (join, kick,
//!    start, ...).
//! 2. **What should the lobby look like?** — [`project`] builds a
//!    read-only [`LobbyView`] of tagged rows the rendering layer draws
//!    without any further logic.
//!
//! Everything here is a pure function of its inputs. Same session, same
//! identity, same answer.

mod occupancy;
mod policy;
mod view;

pub use occupancy::SpawnOccupancy;
pub use policy::{Action, EditableFields, Field, can_edit, can_perform, owns};
pub use view::{
    ControlState, EmptySlotRow, LobbyView, PlayerFields, PlayerRow, Projection,
    RowKind, SlotRow, SpawnMarker, SpectatorRow, project,
};
