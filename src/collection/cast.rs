//! Casting layer: raw input → member.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::member::Member;
use crate::array_error::CastError;

/// An input to a mutating operation: either a ready member or raw JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum Input<M> {
    Member(M),
    Raw(Value),
}

impl<M> Input<M> {
    pub fn raw(value: impl Into<Value>) -> Self {
        Input::Raw(value.into())
    }

    /// `null` raw values and null members are skipped on insertion.
    pub fn is_null(&self) -> bool
    where
        M: Member,
    {
        match self {
            Input::Member(m) => m.is_null(),
            Input::Raw(v) => v.is_null(),
        }
    }
}

impl<M> From<M> for Input<M> {
    fn from(member: M) -> Self {
        Input::Member(member)
    }
}

type Factory<M> = Rc<dyn Fn(Value) -> Result<M, CastError>>;

/// Declared member type of a collection: a named factory from raw JSON.
pub struct MemberType<M> {
    name: Cow<'static, str>,
    factory: Factory<M>,
}

impl<M> MemberType<M> {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, factory: F) -> Self
    where
        F: Fn(Value) -> Result<M, CastError> + 'static,
    {
        Self {
            name: name.into(),
            factory: Rc::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the factory on `raw`.
    pub fn build(&self, raw: Value) -> Result<M, CastError> {
        (self.factory)(raw)
    }
}

impl<M: DeserializeOwned + 'static> MemberType<M> {
    /// Member type that deserializes raw JSON with serde.
    pub fn deserialize() -> Self {
        let name = std::any::type_name::<M>();
        Self::new(name, move |raw| {
            serde_json::from_value(raw).map_err(|err| CastError::Rejected {
                member_type: name.to_owned(),
                reason: err.to_string(),
            })
        })
    }
}

impl<M> Clone for MemberType<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            factory: Rc::clone(&self.factory),
        }
    }
}

impl<M> fmt::Debug for MemberType<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberType").field("name", &self.name).finish()
    }
}

/// Casts `input` to a member.
///
/// Members pass through untouched. Raw values go through the declared member
/// type, or [`Member::from_raw`] when there is none.
pub fn cast<M: Member>(member_type: Option<&MemberType<M>>, input: Input<M>) -> Result<M, CastError> {
    match input {
        Input::Member(member) => Ok(member),
        Input::Raw(raw) => {
            let result = match member_type {
                Some(ty) => ty.build(raw),
                None => M::from_raw(raw),
            };
            if let Err(err) = &result {
                log::warn!("cast failed: {err}");
            }
            result
        }
    }
}
