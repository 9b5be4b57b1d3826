//! Identity keys and the identity resolution strategy.
//!
//! Every member resolves to at most one [`Identity`], picked in fixed
//! priority order: primary id, then client id, then the member's own
//! primitive value. Members holding none of these (plain objects without
//! ids) have no identity and are only found by structural equality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hashable identity key.
///
/// Primary ids, client ids and value identities share one key space, so the
/// integer `3` and the string `"3"` are distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Key {
    /// Builds a key from a JSON scalar. Arrays, objects and `null` carry no key.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Some(Key::Bool(*b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Key::Int(i),
                None => Key::Str(n.to_string()),
            }),
            Value::String(s) => Some(Key::Str(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{b}"),
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<u64> for Key {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Key::Int(i),
            Err(_) => Key::Str(n.to_string()),
        }
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Key::from(n as u64)
    }
}

macro_rules! key_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Key {
            fn from(n: $t) -> Self {
                Key::Int(i64::from(n))
            }
        })*
    };
}

key_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// Which strategy produced an identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    /// Stable, externally assigned `id`.
    Primary,
    /// Local `cid` of a member without a primary id.
    Client,
    /// The member's own primitive value.
    Value,
}

/// A resolved identity: the winning strategy and its key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    pub kind: IdentityKind,
    pub key: Key,
}

/// Exposes the identity keys of a value.
///
/// All methods default to `None`; implement the ones the type carries.
pub trait Identify {
    /// Primary identity.
    fn id(&self) -> Option<Key> {
        None
    }

    /// Client identity.
    fn cid(&self) -> Option<Key> {
        None
    }

    /// Primitive value identity. Only consulted when `id` and `cid` are both
    /// absent; non-primitive values must return `None`.
    fn value_key(&self) -> Option<Key> {
        None
    }
}

/// Resolves the single identity of `item` by priority: id, cid, value.
pub fn resolve_identity<T: Identify + ?Sized>(item: &T) -> Option<Identity> {
    if let Some(key) = item.id() {
        return Some(Identity {
            kind: IdentityKind::Primary,
            key,
        });
    }
    if let Some(key) = item.cid() {
        return Some(Identity {
            kind: IdentityKind::Client,
            key,
        });
    }
    item.value_key().map(|key| Identity {
        kind: IdentityKind::Value,
        key,
    })
}

/// Every key `item` is registered under in an identity index: both id and
/// cid when present, the value key only when neither is.
pub fn index_keys<T: Identify + ?Sized>(item: &T) -> impl Iterator<Item = Key> {
    let id = item.id();
    let cid = item.cid();
    let value = if id.is_none() && cid.is_none() {
        item.value_key()
    } else {
        None
    };
    id.into_iter().chain(cid).chain(value)
}

/// A partial object used purely for lookups, carrying an id and/or a cid.
///
/// Build it with the id's own type: `Probe::by_id(3)` does not find a member
/// whose id is the string `"3"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Probe {
    id: Option<Key>,
    cid: Option<Key>,
}

impl Probe {
    pub fn by_id(id: impl Into<Key>) -> Self {
        Probe {
            id: Some(id.into()),
            cid: None,
        }
    }

    pub fn by_cid(cid: impl Into<Key>) -> Self {
        Probe {
            id: None,
            cid: Some(cid.into()),
        }
    }

    /// Adds a client id to a probe built with [`Probe::by_id`].
    pub fn with_cid(mut self, cid: impl Into<Key>) -> Self {
        self.cid = Some(cid.into());
        self
    }
}

impl Identify for Probe {
    fn id(&self) -> Option<Key> {
        self.id.clone()
    }

    fn cid(&self) -> Option<Key> {
        self.cid.clone()
    }
}
