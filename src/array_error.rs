//! ModelArrayError: Unified error type for model-array public APIs
//!
//! Lookups never fail (a miss is `None`); errors come from casting raw input,
//! serializing members, parsing event names, and invariant validation.

use thiserror::Error;

use crate::collection::identity::Key;

/// Failure raised while turning raw input into a member.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CastError {
    /// The declared member type refused the raw value.
    #[error("member type `{member_type}` rejected input: {reason}")]
    Rejected {
        member_type: String,
        reason: String,
    },
    /// Raw input reached a collection with no member type, and the member
    /// type cannot be built from raw JSON on its own.
    #[error("no member type declared and `{0}` cannot be built from raw input")]
    Untyped(&'static str),
    /// Raw JSON could not be deserialized into the member type.
    #[error("invalid raw member: {0}")]
    Json(String),
}

impl From<serde_json::Error> for CastError {
    fn from(err: serde_json::Error) -> Self {
        CastError::Json(err.to_string())
    }
}

/// Unified error type for model-array operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelArrayError {
    /// Casting an input failed; the collection was left untouched.
    #[error(transparent)]
    Cast(#[from] CastError),
    /// An event name other than `add`, `remove`, `sort` or `reset`.
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    /// A member's `Serialize` impl failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// The identity index points at a position whose member does not carry the key.
    #[error("identity index out of sync: key `{key}` -> position {position}")]
    IndexOutOfSync { key: Key, position: usize },
    /// A member's identity key is missing from the index.
    #[error("member at position {position} is not indexed under `{key}`")]
    MissingIndexEntry { key: Key, position: usize },
    /// Two members resolve to the same identity.
    #[error("identity `{key}` is held by positions {first} and {second}")]
    DuplicateIdentity {
        key: Key,
        first: usize,
        second: usize,
    },
}

/// Crate-wide result alias.
pub type Result<T, E = ModelArrayError> = std::result::Result<T, E>;
