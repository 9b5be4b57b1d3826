//! Named-event observer with a one-shot silent flag.
//!
//! The emitter only stores listeners and the flag. [`Emitter::dispatch`]
//! decides whether an emission goes through and hands back the listeners to
//! call; the owning collection invokes them with itself as context, which
//! keeps the collection borrowable by listeners during emission.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::array_error::ModelArrayError;

use super::model_array::ModelArray;

/// Change notifications emitted by a [`ModelArray`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Add,
    Remove,
    Sort,
    Reset,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Add,
        EventKind::Remove,
        EventKind::Sort,
        EventKind::Reset,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Add => "add",
            EventKind::Remove => "remove",
            EventKind::Sort => "sort",
            EventKind::Reset => "reset",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ModelArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelArrayError::UnknownEvent(s.to_owned()))
    }
}

/// Handle returned by [`Emitter::on`], used to unsubscribe one listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A listener receives the changed members and the collection.
pub type Listener<M> = Rc<dyn Fn(&[M], &ModelArray<M>)>;

pub struct Emitter<M> {
    listeners: Vec<(EventKind, ListenerId, Listener<M>)>,
    next_id: u64,
    silent: bool,
}

impl<M> Default for Emitter<M> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            silent: false,
        }
    }
}

impl<M> Emitter<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&[M], &ModelArray<M>) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((kind, id, Rc::new(listener)));
        id
    }

    /// Removes one listener of `kind`, or all of them when `id` is `None`.
    /// Returns how many were removed.
    pub fn off(&mut self, kind: EventKind, id: Option<ListenerId>) -> usize {
        let before = self.listeners.len();
        self.listeners
            .retain(|(k, lid, _)| !(*k == kind && id.is_none_or(|id| id == *lid)));
        before - self.listeners.len()
    }

    pub fn off_all(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(k, _, _)| *k == kind).count()
    }

    /// Sets the one-shot silent flag.
    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Consumes the silent flag: when armed, disarms it and returns `None`;
    /// otherwise returns the listeners of `kind` in registration order.
    pub fn dispatch(&mut self, kind: EventKind) -> Option<Vec<Listener<M>>> {
        if std::mem::take(&mut self.silent) {
            log::debug!("`{kind}` event suppressed by silent flag");
            return None;
        }
        Some(self.listeners_for(kind))
    }

    /// Listeners of `kind`, ignoring the silent flag.
    pub fn listeners_for(&self, kind: EventKind) -> Vec<Listener<M>> {
        self.listeners
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, _, l)| Rc::clone(l))
            .collect()
    }
}

impl<M> fmt::Debug for Emitter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .field("silent", &self.silent)
            .finish()
    }
}
