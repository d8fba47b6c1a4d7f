extern crate alloc;
use alloc::rc::Weak;
use core::any::TypeId;
use core::cell::RefCell;
use core::fmt;

use super::event_emitter::Registry;
use crate::ListenerId;

/// Handle returned by every registration; removes that one registration.
///
/// Holds a weak reference, so it never keeps the emitter alive. Dropping a `Subscription`
/// leaves the listener registered.
#[derive(Clone)]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    event: TypeId,
    name: &'static str,
    id: ListenerId,
}

impl Subscription {
    pub(crate) fn new(
        registry: Weak<RefCell<Registry>>,
        event: TypeId,
        name: &'static str,
        id: ListenerId,
    ) -> Self {
        Self { registry, event, name, id }
    }

    /// The registration this handle controls.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Name of the event the listener is registered to.
    pub fn event_name(&self) -> &'static str {
        self.name
    }

    /// Whether the registration is still in place.
    ///
    /// # Example
    /// ```
    /// extern crate alloc;
    /// use alloc::sync::Arc;
    /// use rs_typed_events::{event_map, EventEmitter, EventHandler};
    ///
    /// event_map! { pub enum Sensor { Reading => u32 } }
    ///
    /// let emitter = EventEmitter::<Sensor>::new();
    /// let subscription = emitter.once::<Reading>(Arc::new(|_| {}));
    /// assert!(subscription.is_active());
    /// emitter.emit::<Reading>(7).unwrap();
    /// assert!(!subscription.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let active = registry.borrow().contains(self.event, self.id);
        active
    }

    /// Removes the registration. Calling it again, or after the emitter is gone, does nothing.
    ///
    /// # Returns
    /// `true` if this call removed the listener.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = registry.borrow_mut().remove_id(self.event, self.id);
        if removed {
            tracing::debug!(event = self.name, listener = %self.id, "listener unsubscribed");
        }
        removed
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.name)
            .field("id", &self.id)
            .finish()
    }
}
