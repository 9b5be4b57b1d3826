//! Identity index: identity key → position in the backing sequence.
//!
//! Positions shift whenever members are inserted or removed ahead of them,
//! so every structural change ends with [`IdentityIndex::reindex_from`] over
//! the affected tail.

use hashbrown::HashMap;

use super::identity::{Identify, Key, Probe, index_keys};
use super::member::Member;

#[derive(Clone, Debug, Default)]
pub struct IdentityIndex {
    by_key: HashMap<Key, usize>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_key: HashMap::with_capacity(capacity),
        }
    }

    /// Registers `member` at `position` under every key it resolves to.
    pub fn index<T: Identify + ?Sized>(&mut self, member: &T, position: usize) {
        for key in index_keys(member) {
            self.by_key.insert(key, position);
        }
    }

    /// Drops every registration of `member`'s keys.
    pub fn unindex<T: Identify + ?Sized>(&mut self, member: &T) {
        for key in index_keys(member) {
            self.by_key.remove(&key);
        }
    }

    /// Re-registers `members[start..]` at their current positions.
    pub fn reindex_from<T: Identify>(&mut self, members: &[T], start: usize) {
        for (offset, member) in members.iter().skip(start).enumerate() {
            self.index(member, start + offset);
        }
    }

    pub fn remove_key(&mut self, key: &Key) -> Option<usize> {
        self.by_key.remove(key)
    }

    #[inline]
    pub fn lookup(&self, key: &Key) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// First indexed position among `probe`'s keys, tried id, cid, value.
    pub fn lookup_any<T: Identify + ?Sized>(&self, probe: &T) -> Option<usize> {
        index_keys(probe).find_map(|key| self.lookup(&key))
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, usize)> + '_ {
        self.by_key.iter().map(|(k, &pos)| (k, pos))
    }
}

/// Anything that can be resolved to a position in a collection of `M`.
pub trait Locate<M> {
    fn locate(&self, index: &IdentityIndex, members: &[M]) -> Option<usize>;
}

/// Members are found through their keys, or by structural equality when
/// they carry none.
impl<M: Member> Locate<M> for M {
    fn locate(&self, index: &IdentityIndex, members: &[M]) -> Option<usize> {
        let mut keyed = false;
        for key in index_keys(self) {
            keyed = true;
            if let Some(pos) = index.lookup(&key) {
                return Some(pos);
            }
        }
        if keyed {
            None
        } else {
            members.iter().position(|m| m == self)
        }
    }
}

impl<M> Locate<M> for Key {
    fn locate(&self, index: &IdentityIndex, _members: &[M]) -> Option<usize> {
        index.lookup(self)
    }
}

impl<M> Locate<M> for Probe {
    fn locate(&self, index: &IdentityIndex, _members: &[M]) -> Option<usize> {
        index.lookup_any(self)
    }
}
