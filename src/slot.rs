//! Type-erased per-event listener lists shared by both emitter builds.

extern crate alloc;
use alloc::vec::Vec;
use core::any::Any;

use crate::{EventError, EventPayload, Listener, ListenerId};

/// Operations on a listener list that do not need its payload type.
///
/// Listeners that used up their call budget are invisible: they are not counted by `len`, not
/// reported by `contains_id`, and a list holding only such listeners is empty. They stay
/// stored until `prune_spent` drops them.
pub(crate) trait ListenerSlot: Any {
    fn name(&self) -> &'static str;

    /// Number of listeners that may still be called.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the registration with `id` is present and may still be called.
    fn contains_id(&self, id: ListenerId) -> bool;

    /// Removes the registration with `id`, returning whether it was present.
    fn remove_id(&mut self, id: ListenerId) -> bool;

    /// Drops listeners whose call budget is used up, returning how many were dropped.
    fn prune_spent(&mut self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Ordered listeners of one event. Index order is subscription order.
pub(crate) struct Listeners<T> {
    name: &'static str,
    entries: Vec<Listener<T>>,
}

impl<T: 'static> Listeners<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self { name, entries: Vec::new() }
    }

    pub(crate) fn push(&mut self, listener: Listener<T>) {
        self.entries.push(listener);
    }

    /// Copy of the current listeners, taken before any of them runs.
    pub(crate) fn snapshot(&self) -> Vec<Listener<T>> {
        self.entries.clone()
    }

    /// Removes every listener matching `predicate`, keeping the order of the rest.
    pub(crate) fn remove_where(&mut self, mut predicate: impl FnMut(&Listener<T>) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|listener| !predicate(listener));
        before - self.entries.len()
    }

    pub(crate) fn drain(&mut self) -> Vec<Listener<T>> {
        self.entries.drain(..).collect()
    }

    pub(crate) fn downcast(slot: &dyn ListenerSlot) -> Option<&Self> {
        slot.as_any().downcast_ref()
    }

    pub(crate) fn downcast_mut(slot: &mut dyn ListenerSlot) -> Option<&mut Self> {
        slot.as_any_mut().downcast_mut()
    }
}

impl<T: 'static> ListenerSlot for Listeners<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|listener| !listener.at_limit()).count()
    }

    fn contains_id(&self, id: ListenerId) -> bool {
        self.entries
            .iter()
            .any(|listener| listener.id() == id && !listener.at_limit())
    }

    fn remove_id(&mut self, id: ListenerId) -> bool {
        self.remove_where(|listener| listener.id() == id) > 0
    }

    fn prune_spent(&mut self) -> usize {
        self.remove_where(Listener::at_limit)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Calls `listeners` in order with `payload`, stopping at the first failure.
pub(crate) fn deliver<T>(
    event: &'static str,
    listeners: &[Listener<T>],
    payload: &EventPayload<T>,
) -> Result<(), EventError> {
    for listener in listeners {
        listener.call(payload).map_err(|source| {
            tracing::debug!(event, listener = %listener.id(), error = %source, "listener failed");
            EventError::Listener { event, source }
        })?;
    }
    Ok(())
}

/// Runs a closure when dropped, including while unwinding from a listener panic.
pub(crate) struct OnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> OnDrop<F> {
    pub(crate) fn new(f: F) -> Self {
        Self(Some(f))
    }
}

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}
