//! # model-array
//!
//! model-array is an in-memory, order-preserving collection of domain models
//! with set semantics on model identity. It behaves like a mutable sequence
//! and adds:
//!
//! - An identity index resolving primary ids, client ids or primitive values
//!   to members in O(1)
//! - Deduplication of every insertion against existing identities
//! - Named change events (`add`, `remove`, `sort`, `reset`) with a one-shot
//!   silent flag
//! - `reconcile`, which brings the collection in line with a target list
//!   while emitting only the minimal `remove` / `add` batches
//!
//! ## Usage
//!
//! ```rust
//! use model_array::prelude::*;
//! use serde_json::json;
//!
//! let mut users: ModelArray<serde_json::Value> = ModelArray::from_members([
//!     json!({"id": 3, "name": "pg"}),
//!     json!({"id": 2, "name": "mehdi"}),
//! ]);
//! users.reconcile([json!({"id": 3, "name": "Pierre-Guillaume"})]).unwrap();
//! assert_eq!(users.len(), 1);
//! assert_eq!(users.get_key(3).unwrap()["name"], "Pierre-Guillaume");
//! ```
//!
//! ## Invariant checking
//!
//! Every mutation validates the index against the sequence in debug builds.
//! Enable the `check-invariants` or `strict-invariants` feature to keep the
//! checks in release builds.
//!
//! Collections are single-threaded: listeners are `Rc` closures and run
//! synchronously with a shared borrow of the collection.

pub mod array_error;
pub mod collection;
pub mod debug_invariants;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::array_error::{CastError, ModelArrayError};
    pub use crate::collection::{
        EventKind, Identify, Input, Key, ListenerId, Member, MemberType, ModelArray, Options, Probe,
    };
    pub use crate::debug_invariants::DebugInvariants;
}
