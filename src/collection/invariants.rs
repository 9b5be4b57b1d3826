//! Consistency checks between the backing sequence and the identity index.

use hashbrown::HashMap;

use super::identity::{Key, index_keys};
use super::member::Member;
use super::model_array::ModelArray;
use crate::array_error::ModelArrayError;
use crate::debug_invariants::DebugInvariants;

impl<M: Member> DebugInvariants for ModelArray<M> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "ModelArray invalid");
    }

    fn validate_invariants(&self) -> Result<(), ModelArrayError> {
        // 1) no key is held by two positions
        let mut holders: HashMap<Key, usize> = HashMap::with_capacity(self.index.len());
        for (pos, member) in self.members.iter().enumerate() {
            for key in index_keys(member) {
                if let Some(&first) = holders.get(&key) {
                    if first != pos {
                        return Err(ModelArrayError::DuplicateIdentity {
                            key,
                            first,
                            second: pos,
                        });
                    }
                }
                holders.insert(key, pos);
            }
        }

        // 2) every member key is indexed at its position
        for (key, &pos) in &holders {
            if self.index.lookup(key) != Some(pos) {
                return Err(ModelArrayError::MissingIndexEntry {
                    key: key.clone(),
                    position: pos,
                });
            }
        }

        // 3) no stale entries
        if let Some((key, pos)) = self
            .index
            .iter()
            .find(|(key, pos)| holders.get(*key) != Some(pos))
        {
            return Err(ModelArrayError::IndexOutOfSync {
                key: key.clone(),
                position: pos,
            });
        }
        Ok(())
    }
}
