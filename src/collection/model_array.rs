//! [`ModelArray`]: an ordered, identity-indexed collection of members.
//!
//! Every structural mutation follows the same pattern: cast the inputs,
//! filter them against current identities, apply the change to the backing
//! `Vec`, refresh the [`IdentityIndex`] from the first touched position, and
//! emit a change event through the embedded [`Emitter`].
//!
//! ```rust
//! use model_array::prelude::*;
//!
//! let mut tags: ModelArray<String> = ModelArray::from_members(["a".to_string()]);
//! tags.append(["b".to_string(), "a".to_string()]).unwrap();
//! assert_eq!(tags.len(), 2);
//! assert!(tags.get_key("b").is_some());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use hashbrown::HashSet;

use super::cast::{Input, MemberType, cast};
use super::emitter::{Emitter, EventKind, Listener, ListenerId};
use super::identity::{Key, index_keys};
use super::index::{IdentityIndex, Locate};
use super::member::Member;
use crate::array_error::{ModelArrayError, Result};
use crate::debug_invariants::DebugInvariants;

/// Construction options for a [`ModelArray`].
pub struct Options<M> {
    pub(crate) member_type: Option<MemberType<M>>,
    pub(crate) capacity: usize,
}

impl<M> Default for Options<M> {
    fn default() -> Self {
        Self {
            member_type: None,
            capacity: 0,
        }
    }
}

impl<M> Options<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the member type used to cast raw input.
    pub fn member_type(mut self, member_type: MemberType<M>) -> Self {
        self.member_type = Some(member_type);
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// An order-preserving collection with set semantics on member identity.
pub struct ModelArray<M> {
    pub(crate) members: Vec<M>,
    pub(crate) index: IdentityIndex,
    pub(crate) member_type: Option<MemberType<M>>,
    pub(crate) emitter: Emitter<M>,
}

/// Members accepted so far in one insertion batch.
struct Batch<M> {
    members: Vec<M>,
    keys: HashSet<Key>,
}

impl<M: Member> Batch<M> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            keys: HashSet::with_capacity(capacity),
        }
    }

    /// Members without any key cannot be told apart and are always admitted.
    fn admit(&mut self, member: M) {
        let keys: Vec<Key> = index_keys(&member).collect();
        if keys.iter().any(|k| self.keys.contains(k)) {
            return;
        }
        self.keys.extend(keys);
        self.members.push(member);
    }
}

impl<M: Member> Default for ModelArray<M> {
    fn default() -> Self {
        Self::with_options(Options::default())
    }
}

impl<M: Member> ModelArray<M> {
    /// Empty, untyped collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options<M>) -> Self {
        Self {
            members: Vec::with_capacity(options.capacity),
            index: IdentityIndex::with_capacity(options.capacity),
            member_type: options.member_type,
            emitter: Emitter::new(),
        }
    }

    /// Empty collection casting raw input through `member_type`.
    pub fn typed(member_type: MemberType<M>) -> Self {
        Self::with_options(Options::new().member_type(member_type))
    }

    /// Collection holding `members`, duplicates dropped.
    pub fn from_members<I: IntoIterator<Item = M>>(members: I) -> Self {
        let mut array = Self::new();
        let fresh = array.filter_fresh(members);
        array.insert_silently(fresh);
        array
    }

    /// Builds a collection from raw or ready inputs. Emits nothing.
    pub fn build<I>(initial: I, options: Options<M>) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Input<M>>,
    {
        let mut array = Self::with_options(options);
        array.silent().append(initial)?;
        Ok(array)
    }

    fn insert_silently(&mut self, fresh: Vec<M>) {
        self.emitter.set_silent(true);
        let at = self.members.len();
        self.insert_and_notify(at, fresh);
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn as_slice(&self) -> &[M] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.members.iter()
    }

    pub fn first(&self) -> Option<&M> {
        self.members.first()
    }

    pub fn last(&self) -> Option<&M> {
        self.members.last()
    }

    /// Member at `position`.
    pub fn at(&self, position: usize) -> Option<&M> {
        self.members.get(position)
    }

    pub fn into_vec(self) -> Vec<M> {
        self.members
    }

    pub fn member_type(&self) -> Option<&MemberType<M>> {
        self.member_type.as_ref()
    }

    pub fn identity_index(&self) -> &IdentityIndex {
        &self.index
    }

    /// Looks up a member by key, probe, or another member.
    pub fn get<Q: Locate<M> + ?Sized>(&self, probe: &Q) -> Option<&M> {
        self.position(probe).map(|pos| &self.members[pos])
    }

    /// Looks up by a single key. Keys are typed: pass an integer id as an
    /// integer, since `3` and `"3"` are different keys.
    pub fn get_key(&self, key: impl Into<Key>) -> Option<&M> {
        self.get(&key.into())
    }

    pub fn position<Q: Locate<M> + ?Sized>(&self, probe: &Q) -> Option<usize> {
        probe.locate(&self.index, &self.members)
    }

    pub fn contains<Q: Locate<M> + ?Sized>(&self, probe: &Q) -> bool {
        self.position(probe).is_some()
    }

    /// Casts `input` with this collection's member type.
    pub fn cast(&self, input: impl Into<Input<M>>) -> Result<M> {
        Ok(cast(self.member_type.as_ref(), input.into())?)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&[M], &ModelArray<M>) + 'static,
    {
        self.emitter.on(kind, listener)
    }

    /// Subscribes by event name (`add`, `remove`, `sort`, `reset`).
    pub fn on_named<F>(&mut self, name: &str, listener: F) -> Result<ListenerId>
    where
        F: Fn(&[M], &ModelArray<M>) + 'static,
    {
        let kind = name.parse()?;
        Ok(self.emitter.on(kind, listener))
    }

    pub fn off(&mut self, kind: EventKind, id: Option<ListenerId>) -> usize {
        self.emitter.off(kind, id)
    }

    pub fn off_all(&mut self) {
        self.emitter.off_all();
    }

    /// Suppresses the next emitted event.
    pub fn silent(&mut self) -> &mut Self {
        self.set_silent(true)
    }

    pub fn set_silent(&mut self, silent: bool) -> &mut Self {
        self.emitter.set_silent(silent);
        self
    }

    pub fn is_silent(&self) -> bool {
        self.emitter.is_silent()
    }

    fn fire(&self, listeners: &[Listener<M>], payload: &[M]) {
        for listener in listeners {
            listener(payload, self);
        }
    }

    pub(crate) fn notify_removed(&mut self, removed: &[M]) {
        if removed.is_empty() {
            self.emitter.set_silent(false);
            return;
        }
        if let Some(listeners) = self.emitter.dispatch(EventKind::Remove) {
            self.fire(&listeners, removed);
        }
    }

    /// Fires `kind` regardless of the silent flag, leaving the flag as is.
    pub(crate) fn notify_always(&self, kind: EventKind) {
        let listeners = self.emitter.listeners_for(kind);
        self.fire(&listeners, &self.members);
    }

    // ------------------------------------------------------------------
    // Uniqueness filter
    // ------------------------------------------------------------------

    /// Casts every non-null input. Fails on the first cast error before the
    /// collection is touched.
    pub(crate) fn cast_all<I>(&self, inputs: I) -> Result<Vec<M>>
    where
        I: IntoIterator,
        I::Item: Into<Input<M>>,
    {
        inputs
            .into_iter()
            .map(Into::into)
            .filter(|input: &Input<M>| !input.is_null())
            .map(|input| cast(self.member_type.as_ref(), input).map_err(ModelArrayError::from))
            .collect()
    }

    /// Drops nulls, members already present, and repeats within the batch.
    pub(crate) fn filter_fresh<I: IntoIterator<Item = M>>(&self, members: I) -> Vec<M> {
        let members = members.into_iter();
        let mut batch = Batch::with_capacity(members.size_hint().0);
        for member in members {
            if member.is_null() || self.contains(&member) {
                continue;
            }
            batch.admit(member);
        }
        batch.members
    }

    /// Casts and filters `inputs` into the members an insertion would add.
    ///
    /// Raw inputs whose JSON `id`, `cid` or scalar value is already indexed
    /// are skipped before casting, so they never reach the member type.
    pub fn dedupe<I>(&self, inputs: I) -> Result<Vec<M>>
    where
        I: IntoIterator,
        I::Item: Into<Input<M>>,
    {
        let mut casted = Vec::new();
        for input in inputs.into_iter().map(Into::into) {
            if input.is_null() || self.holds_raw(&input) {
                continue;
            }
            casted.push(cast(self.member_type.as_ref(), input)?);
        }
        Ok(self.filter_fresh(casted))
    }

    fn holds_raw(&self, input: &Input<M>) -> bool {
        match input {
            Input::Raw(raw) => self.index.lookup_any(raw).is_some(),
            Input::Member(_) => false,
        }
    }

    // ------------------------------------------------------------------
    // Structural mutation
    // ------------------------------------------------------------------

    /// Inserts already filtered members at `at` and emits `add`.
    pub(crate) fn insert_and_notify(&mut self, at: usize, fresh: Vec<M>) -> usize {
        let count = fresh.len();
        if count == 0 {
            self.emitter.set_silent(false);
            return 0;
        }
        self.members.splice(at..at, fresh);
        self.index.reindex_from(&self.members, at);
        log::trace!("inserted {count} member(s) at {at}");
        crate::debug_invariants!(self.validate_invariants(), "ModelArray insert");

        if let Some(listeners) = self.emitter.dispatch(EventKind::Add) {
            self.fire(&listeners, &self.members[at..at + count]);
        }
        count
    }

    /// Appends the new members of `items` at the tail; returns how many.
    pub fn append<I>(&mut self, items: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Input<M>>,
    {
        let fresh = self.dedupe(items)?;
        let at = self.members.len();
        Ok(self.insert_and_notify(at, fresh))
    }

    /// Appends a single item.
    pub fn add(&mut self, item: impl Into<Input<M>>) -> Result<usize> {
        self.append(std::iter::once(item.into()))
    }

    /// Inserts the new members of `items` at the head, keeping their order.
    pub fn prepend<I>(&mut self, items: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Input<M>>,
    {
        let fresh = self.dedupe(items)?;
        Ok(self.insert_and_notify(0, fresh))
    }

    pub fn remove_last(&mut self) -> Option<M> {
        let Some(member) = self.members.pop() else {
            self.emitter.set_silent(false);
            return None;
        };
        self.index.unindex(&member);
        crate::debug_invariants!(self.validate_invariants(), "ModelArray remove_last");
        self.notify_removed(std::slice::from_ref(&member));
        Some(member)
    }

    pub fn remove_first(&mut self) -> Option<M> {
        if self.members.is_empty() {
            self.emitter.set_silent(false);
            return None;
        }
        let member = self.members.remove(0);
        self.index.unindex(&member);
        self.index.reindex_from(&self.members, 0);
        crate::debug_invariants!(self.validate_invariants(), "ModelArray remove_first");
        self.notify_removed(std::slice::from_ref(&member));
        Some(member)
    }

    /// Removes every member `items` resolves to and emits one `remove` with
    /// them, in argument order. Misses are ignored.
    pub fn remove<'q, Q, I>(&mut self, items: I) -> Vec<M>
    where
        Q: Locate<M> + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        let mut removed = Vec::new();
        for item in items {
            let Some(pos) = self.position(item) else {
                continue;
            };
            let member = self.members.remove(pos);
            self.index.unindex(&member);
            self.index.reindex_from(&self.members, pos);
            removed.push(member);
        }
        log::trace!("removed {} member(s)", removed.len());
        crate::debug_invariants!(self.validate_invariants(), "ModelArray remove");
        self.notify_removed(&removed);
        removed
    }

    /// Takes out the members at `positions`, returned in sequence order.
    /// Emits nothing.
    pub(crate) fn take_positions(&mut self, mut positions: Vec<usize>) -> Vec<M> {
        positions.sort_unstable();
        positions.dedup();
        let Some(&lowest) = positions.first() else {
            return Vec::new();
        };
        for &pos in &positions {
            self.unindex_at(pos);
        }
        let mut removed = Vec::with_capacity(positions.len());
        let mut kept = Vec::with_capacity(self.members.len().saturating_sub(positions.len()));
        let mut targets = positions.iter().peekable();
        for (pos, member) in std::mem::take(&mut self.members).into_iter().enumerate() {
            if targets.next_if_eq(&&pos).is_some() {
                removed.push(member);
            } else {
                kept.push(member);
            }
        }
        self.members = kept;
        self.index.reindex_from(&self.members, lowest);
        removed
    }

    /// Drops the index entries that still point at `pos`. Keys another
    /// member has taken over are left alone.
    pub(crate) fn unindex_at(&mut self, pos: usize) {
        let keys: Vec<Key> = index_keys(&self.members[pos]).collect();
        for key in &keys {
            if self.index.lookup(key) == Some(pos) {
                self.index.remove_key(key);
            }
        }
    }

    /// Removes `delete_count` members from `start`, then inserts the new
    /// members of `items` there. `start` and `delete_count` are clamped to
    /// the collection.
    ///
    /// Emits `remove` then `add`. When the silent flag is armed on entry,
    /// both emissions are suppressed.
    pub fn splice<I>(&mut self, start: usize, delete_count: usize, items: I) -> Result<Vec<M>>
    where
        I: IntoIterator,
        I::Item: Into<Input<M>>,
    {
        let silent = self.emitter.is_silent();
        let casted = self.cast_all(items)?;

        let start = start.min(self.members.len());
        let end = start.saturating_add(delete_count).min(self.members.len());
        let removed: Vec<M> = self.members.drain(start..end).collect();
        for member in &removed {
            self.index.unindex(member);
        }
        self.index.reindex_from(&self.members, start);

        let fresh = self.filter_fresh(casted);
        let count = fresh.len();
        self.members.splice(start..start, fresh);
        self.index.reindex_from(&self.members, start);
        log::trace!(
            "splice at {start}: removed {}, inserted {count}",
            removed.len()
        );
        crate::debug_invariants!(self.validate_invariants(), "ModelArray splice");

        if !removed.is_empty() {
            self.emitter.set_silent(silent);
            if let Some(listeners) = self.emitter.dispatch(EventKind::Remove) {
                self.fire(&listeners, &removed);
            }
        }
        if count > 0 {
            self.emitter.set_silent(silent);
            if let Some(listeners) = self.emitter.dispatch(EventKind::Add) {
                self.fire(&listeners, &self.members[start..start + count]);
            }
        }
        self.emitter.set_silent(false);
        Ok(removed)
    }

    /// Sorts by [`Member::compare`] and emits `sort`.
    pub fn sort(&mut self) -> &mut Self {
        self.sort_by(M::compare)
    }

    /// Stable sort by `compare`. Always emits `sort`; the silent flag is
    /// neither honoured nor consumed.
    pub fn sort_by<F>(&mut self, compare: F) -> &mut Self
    where
        F: FnMut(&M, &M) -> Ordering,
    {
        self.members.sort_by(compare);
        self.index.reindex_from(&self.members, 0);
        crate::debug_invariants!(self.validate_invariants(), "ModelArray sort");
        self.notify_always(EventKind::Sort);
        self
    }
}

impl<M> Index<usize> for ModelArray<M> {
    type Output = M;

    fn index(&self, position: usize) -> &M {
        &self.members[position]
    }
}

impl<'a, M> IntoIterator for &'a ModelArray<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl<M: fmt::Debug> fmt::Debug for ModelArray<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArray")
            .field("members", &self.members)
            .field("member_type", &self.member_type)
            .field("emitter", &self.emitter)
            .finish()
    }
}
