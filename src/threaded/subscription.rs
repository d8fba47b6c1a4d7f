use std::any::TypeId;
use std::fmt;
use std::sync::Weak;

use super::event_emitter::Registry;
use crate::ListenerId;

/// Handle returned by every registration; removes that one registration.
///
/// Holds a weak reference, so it never keeps the emitter alive. Dropping a `Subscription`
/// leaves the listener registered. The handle is `Send + Sync` and may unsubscribe from any
/// thread.
#[derive(Clone)]
pub struct Subscription {
    registry: Weak<Registry>,
    event: TypeId,
    name: &'static str,
    id: ListenerId,
}

impl Subscription {
    pub(crate) fn new(registry: Weak<Registry>, event: TypeId, name: &'static str, id: ListenerId) -> Self {
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
    /// use std::sync::Arc;
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
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.event, self.id))
    }

    /// Removes the registration. Calling it again, or after the emitter is gone, does nothing.
    ///
    /// # Returns
    /// `true` if this call removed the listener.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use rs_typed_events::{event_map, EventEmitter, EventHandler};
    ///
    /// event_map! { pub enum Sensor { Reading => u32 } }
    ///
    /// let emitter = EventEmitter::<Sensor>::new();
    /// let subscription = emitter.on::<Reading>(Arc::new(|_| {}));
    /// assert!(subscription.unsubscribe());
    /// assert!(!subscription.unsubscribe());
    /// ```
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = registry.remove_id(self.event, self.id);
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
