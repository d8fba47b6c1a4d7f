extern crate alloc;
use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::{BoxError, Callback, EventPayload, TryCallback};

/// Identifier of one registration, unique within the emitter that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Raw numeric value of the identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The callable behind a listener.
pub(crate) enum Handler<T> {
    Infallible(Callback<T>),
    Fallible(TryCallback<T>),
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        match self {
            Handler::Infallible(callback) => Handler::Infallible(Arc::clone(callback)),
            Handler::Fallible(callback) => Handler::Fallible(Arc::clone(callback)),
        }
    }
}

/// One registration of a callback to an event.
///
/// `Listener<T>` pairs a callback with the id of its registration and an optional lifetime
/// counter, allowing for one-shot, limited, or unlimited listeners. Clones share the lifetime
/// counter, so a listener copied out of the registry for an emission still spends the budget
/// of the registered one.
pub struct Listener<T> {
    id: ListenerId,
    handler: Handler<T>,
    lifetime: Option<Arc<AtomicU64>>,
}

impl<T> Listener<T> {
    pub(crate) fn new(id: ListenerId, handler: Handler<T>, lifetime: Option<u64>) -> Self {
        match lifetime {
            Some(0) | None => Self { id, handler, lifetime: None },
            Some(limit) => Self { id, handler, lifetime: Some(Arc::new(AtomicU64::new(limit))) },
        }
    }

    /// The registration id of this listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns the remaining number of calls, or `None` for an unlimited listener.
    pub fn lifetime(&self) -> Option<u64> {
        self.lifetime.as_ref().map(|l| l.load(Ordering::SeqCst))
    }

    /// Returns whether the listener has used up its call budget.
    #[inline]
    pub fn at_limit(&self) -> bool {
        match self.lifetime {
            None => false,
            Some(ref lifetime) => lifetime.load(Ordering::SeqCst) == 0,
        }
    }

    /// Whether this listener was registered with exactly this callback allocation.
    pub fn is_callback(&self, callback: &Callback<T>) -> bool {
        matches!(&self.handler, Handler::Infallible(own) if Arc::ptr_eq(own, callback))
    }

    /// Whether this listener was registered with exactly this fallible callback allocation.
    pub fn is_fallible_callback(&self, callback: &TryCallback<T>) -> bool {
        matches!(&self.handler, Handler::Fallible(own) if Arc::ptr_eq(own, callback))
    }

    /// Synchronously invoke the callback with the given payload.
    ///
    /// A budgeted listener spends one call first; once the budget is gone the callback is
    /// skipped. Panics raised by the callback are not caught.
    #[inline]
    pub(crate) fn call(&self, payload: &EventPayload<T>) -> Result<(), BoxError> {
        if let Some(ref lifetime) = self.lifetime {
            if lifetime
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |x| x.checked_sub(1))
                .is_err()
            {
                return Ok(());
            }
        }
        match &self.handler {
            Handler::Infallible(callback) => {
                callback(payload);
                Ok(())
            }
            Handler::Fallible(callback) => callback(payload),
        }
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: self.handler.clone(),
            lifetime: self.lifetime.as_ref().map(Arc::clone),
        }
    }
}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("fallible", &matches!(self.handler, Handler::Fallible(_)))
            .field("lifetime", &self.lifetime())
            .finish()
    }
}

impl<T> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T> Eq for Listener<T> {}
