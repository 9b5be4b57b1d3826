//! Identity-indexed model collections.
//!
//! This module provides [`ModelArray`] and the pieces it is composed of:
//! - [`identity`]: identity keys and the id → cid → value resolution order
//! - [`index`]: the key → position index and the [`Locate`] lookup trait
//! - [`cast`]: raw JSON → member casting through an optional [`MemberType`]
//! - [`emitter`]: named change events with a one-shot silent flag
//! - [`model_array`]: the collection and its structural mutations
//! - `reconcile`: `reconcile` / `reset`
//! - `serialize`: `Serialize` and `to_json`

pub mod cast;
pub mod emitter;
pub mod identity;
pub mod index;
mod invariants;
pub mod member;
pub mod model_array;
mod reconcile;
mod serialize;

pub use cast::{Input, MemberType};
pub use emitter::{Emitter, EventKind, Listener, ListenerId};
pub use identity::{Identify, Identity, IdentityKind, Key, Probe, resolve_identity};
pub use index::{IdentityIndex, Locate};
pub use member::Member;
pub use model_array::{ModelArray, Options};
