//! Reconciliation (`reconcile`) and wholesale replacement (`reset`).

use super::cast::Input;
use super::emitter::EventKind;
use super::identity::{Key, index_keys};
use super::member::Member;
use super::model_array::ModelArray;
use crate::array_error::Result;
use crate::debug_invariants::DebugInvariants;

impl<M: Member> ModelArray<M> {
    /// Makes the collection hold exactly `targets` (by identity).
    ///
    /// Matched members are updated in place through [`Member::update`], or
    /// replaced at their position when the member type does not support it.
    /// When an updated member takes a key another member holds, the other
    /// member is removed.
    /// Unmatched members are removed, then unmatched targets are appended in
    /// the order given. Emits at most one `remove` and one `add`; an armed
    /// silent flag suppresses both.
    ///
    /// Casting happens up front: a cast error leaves the collection as it was.
    pub fn reconcile<I>(&mut self, targets: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Input<M>>,
    {
        let silent = self.emitter.is_silent();
        let casted = self.cast_all(targets)?;

        let mut kept = vec![false; self.members.len()];
        let mut to_add = Vec::new();
        for target in casted {
            let Some(pos) = self.claim(&target, &kept) else {
                to_add.push(target);
                continue;
            };
            kept[pos] = true;
            self.update_at(pos, target, &mut kept);
        }

        let to_remove: Vec<usize> = kept
            .iter()
            .enumerate()
            .filter_map(|(pos, &keep)| (!keep).then_some(pos))
            .collect();
        log::debug!(
            "reconcile: {} kept, {} to remove, {} to add",
            kept.len() - to_remove.len(),
            to_remove.len(),
            to_add.len()
        );

        if !to_remove.is_empty() {
            self.emitter.set_silent(silent);
            let removed = self.take_positions(to_remove);
            crate::debug_invariants!(self.validate_invariants(), "ModelArray reconcile");
            self.notify_removed(&removed);
        }
        if !to_add.is_empty() {
            self.emitter.set_silent(silent);
            let fresh = self.filter_fresh(to_add);
            let at = self.members.len();
            self.insert_and_notify(at, fresh);
        }
        self.emitter.set_silent(false);
        Ok(self)
    }

    /// Position `target` reconciles onto. Keyless targets claim the first
    /// equal member no earlier target has claimed.
    fn claim(&self, target: &M, kept: &[bool]) -> Option<usize> {
        if index_keys(target).next().is_some() {
            return self.position(target);
        }
        self.members
            .iter()
            .zip(kept)
            .position(|(member, &claimed)| !claimed && member == target)
    }

    /// Applies `newer` to the member at `pos`, keeping the index in step
    /// even if the update changed the member's keys.
    ///
    /// A member elsewhere holding one of the updated member's keys is
    /// unindexed and left unkept, so it is removed with the other strays.
    fn update_at(&mut self, pos: usize, newer: M, kept: &mut [bool]) {
        self.unindex_at(pos);
        if let Some(replacement) = self.members[pos].update(newer) {
            self.members[pos] = replacement;
        }
        let keys: Vec<Key> = index_keys(&self.members[pos]).collect();
        for key in &keys {
            if let Some(other) = self.index.lookup(key).filter(|&other| other != pos) {
                log::debug!("reconcile: `{key}` moves from position {other} to {pos}");
                self.unindex_at(other);
                kept[other] = false;
            }
        }
        self.index.index(&self.members[pos], pos);
    }

    /// Replaces the whole contents with `items` and emits `reset`.
    ///
    /// Repopulation goes through the append path silently; the trailing
    /// `reset` always fires, whatever the silent flag was before the call.
    pub fn reset<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Input<M>>,
    {
        let casted = self.cast_all(items)?;
        self.members.clear();
        self.index.clear();

        let fresh = self.filter_fresh(casted);
        self.emitter.set_silent(true);
        self.insert_and_notify(0, fresh);
        self.emitter.set_silent(false);
        log::trace!("reset to {} member(s)", self.members.len());

        self.notify_always(EventKind::Reset);
        Ok(())
    }

    /// Empties the collection and emits `reset` with no members.
    pub fn clear(&mut self) {
        self.members.clear();
        self.index.clear();
        self.emitter.set_silent(false);
        self.notify_always(EventKind::Reset);
    }
}
