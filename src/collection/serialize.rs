//! JSON form of a collection: each member's own `Serialize` output, in order.

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::model_array::ModelArray;
use crate::array_error::{ModelArrayError, Result};

impl<M: Serialize> Serialize for ModelArray<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.members)
    }
}

impl<M: Serialize> ModelArray<M> {
    /// Plain JSON array of the members' serialized forms.
    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|err| ModelArrayError::Serialization(err.to_string()))
    }
}
