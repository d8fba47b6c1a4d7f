extern crate alloc;
use alloc::{
    boxed::Box,
    collections::BTreeMap,
    rc::Rc,
    vec::Vec,
};
use core::any::TypeId;
use core::cell::RefCell;
use core::fmt;
use core::marker::PhantomData;

use super::Subscription;
use crate::listener::Handler;
use crate::slot::{deliver, ListenerSlot, Listeners, OnDrop};
use crate::{
    Callback, Event, EventError, EventHandler, EventMap, EventPayload, Listener, ListenerId,
    TryCallback,
};

/// Listener storage of one emitter: event type → ordered listeners.
///
/// An event is present only while it has at least one listener.
#[derive(Default)]
pub(crate) struct Registry {
    events: BTreeMap<TypeId, Box<dyn ListenerSlot>>,
    next_id: u64,
}

impl Registry {
    fn insert<T: 'static>(
        &mut self,
        event: TypeId,
        name: &'static str,
        handler: Handler<T>,
        lifetime: Option<u64>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let slot = self
            .events
            .entry(event)
            .or_insert_with(|| Box::new(Listeners::<T>::new(name)));
        if let Some(listeners) = Listeners::<T>::downcast_mut(slot.as_mut()) {
            listeners.push(Listener::new(id, handler, lifetime));
        }
        id
    }

    fn listeners<T: 'static>(&self, event: TypeId) -> Option<&Listeners<T>> {
        self.events.get(&event).and_then(|slot| Listeners::downcast(slot.as_ref()))
    }

    /// Applies `f` to the listeners of `event`, then drops the entry if it became empty.
    fn update<R>(&mut self, event: TypeId, f: impl FnOnce(&mut dyn ListenerSlot) -> R) -> Option<R> {
        let slot = self.events.get_mut(&event)?;
        let result = f(slot.as_mut());
        if slot.is_empty() {
            self.events.remove(&event);
        }
        Some(result)
    }

    pub(crate) fn contains(&self, event: TypeId, id: ListenerId) -> bool {
        self.events.get(&event).is_some_and(|slot| slot.contains_id(id))
    }

    pub(crate) fn remove_id(&mut self, event: TypeId, id: ListenerId) -> bool {
        self.update(event, |slot| slot.remove_id(id)).unwrap_or(false)
    }
}

/// An event emitter for the events of the map `M`.
///
/// Single-threaded build for `no_std + alloc` targets. The registry lives behind an
/// `Rc<RefCell<..>>` that is never borrowed while a listener runs, so listeners may call back
/// into the emitter.
///
/// `Clone` yields another handle to the same emitter. Use [`EventEmitter::new`] for an
/// independent one. A listener that captures a handle to its own emitter keeps it alive.
///
/// # Type Parameters
/// * `M` - The [`EventMap`] fixing which events exist and their payload types.
pub struct EventEmitter<M: EventMap> {
    registry: Rc<RefCell<Registry>>,
    _map: PhantomData<fn() -> M>,
}

impl<M: EventMap> EventEmitter<M> {
    /// Creates a new emitter with no listeners.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_typed_events::{event_map, EventEmitter, EventHandler};
    ///
    /// event_map! { pub enum Sensor { Reading => u32 } }
    ///
    /// let emitter = EventEmitter::<Sensor>::new();
    /// assert!(emitter.event_names().is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            _map: PhantomData,
        }
    }

    fn register<E: Event<M>>(&self, handler: Handler<E::Payload>, lifetime: Option<u64>) -> Subscription {
        let event = TypeId::of::<E>();
        let id = self
            .registry
            .borrow_mut()
            .insert::<E::Payload>(event, E::NAME, handler, lifetime);
        tracing::debug!(event = E::NAME, listener = %id, ?lifetime, "listener registered");
        Subscription::new(Rc::downgrade(&self.registry), event, E::NAME, id)
    }

    fn remove_where<E: Event<M>>(&self, predicate: impl FnMut(&Listener<E::Payload>) -> bool) -> usize {
        let removed = self
            .registry
            .borrow_mut()
            .update(TypeId::of::<E>(), |slot| {
                Listeners::<E::Payload>::downcast_mut(slot).map_or(0, |listeners| listeners.remove_where(predicate))
            })
            .unwrap_or(0);
        if removed > 0 {
            tracing::debug!(event = E::NAME, removed, "listeners removed");
        }
        removed
    }
}

impl<M: EventMap> EventHandler<M> for EventEmitter<M> {
    /// Adds a listener to `E` for every future emission.
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
    /// let subscription = emitter.on::<Reading>(Arc::new(|_| {}));
    /// assert_eq!(emitter.listener_count::<Reading>(), 1);
    ///
    /// subscription.unsubscribe();
    /// assert_eq!(emitter.listener_count::<Reading>(), 0);
    /// ```
    fn on<E: Event<M>>(&self, callback: Callback<E::Payload>) -> Subscription {
        self.register::<E>(Handler::Infallible(callback), None)
    }

    /// Adds a listener to `E` that is removed after `limit` calls.
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
    /// emitter.on_limited::<Reading>(Arc::new(|_| {}), 2);
    /// emitter.emit::<Reading>(1).unwrap();
    /// assert_eq!(emitter.listener_count::<Reading>(), 1);
    /// emitter.emit::<Reading>(2).unwrap();
    /// assert_eq!(emitter.listener_count::<Reading>(), 0);
    /// ```
    fn on_limited<E: Event<M>>(&self, callback: Callback<E::Payload>, limit: u64) -> Subscription {
        self.register::<E>(Handler::Infallible(callback), Some(limit))
    }

    fn on_fallible<E: Event<M>>(&self, callback: TryCallback<E::Payload>) -> Subscription {
        self.register::<E>(Handler::Fallible(callback), None)
    }

    /// Removes every registration of `callback` from `E`.
    ///
    /// # Example
    /// ```
    /// extern crate alloc;
    /// use alloc::sync::Arc;
    /// use rs_typed_events::{event_map, Callback, EventEmitter, EventHandler};
    ///
    /// event_map! { pub enum Sensor { Reading => u32 } }
    ///
    /// let emitter = EventEmitter::<Sensor>::new();
    /// let callback: Callback<u32> = Arc::new(|_| {});
    /// emitter.on::<Reading>(callback.clone());
    /// emitter.on::<Reading>(callback.clone());
    ///
    /// assert_eq!(emitter.off::<Reading>(&callback), 2);
    /// assert_eq!(emitter.off::<Reading>(&callback), 0);
    /// ```
    fn off<E: Event<M>>(&self, callback: &Callback<E::Payload>) -> usize {
        self.remove_where::<E>(|listener| listener.is_callback(callback))
    }

    fn off_fallible<E: Event<M>>(&self, callback: &TryCallback<E::Payload>) -> usize {
        self.remove_where::<E>(|listener| listener.is_fallible_callback(callback))
    }

    fn off_all<E: Event<M>>(&self) -> Vec<Listener<E::Payload>> {
        let removed = self
            .registry
            .borrow_mut()
            .update(TypeId::of::<E>(), |slot| {
                Listeners::<E::Payload>::downcast_mut(slot).map(Listeners::drain).unwrap_or_default()
            })
            .unwrap_or_default();
        tracing::debug!(event = E::NAME, removed = removed.len(), "all listeners removed");
        removed
    }

    fn clear(&self) {
        let mut registry = self.registry.borrow_mut();
        tracing::debug!(events = registry.events.len(), "emitter cleared");
        registry.events.clear();
    }

    fn listener_count<E: Event<M>>(&self) -> usize {
        self.registry
            .borrow()
            .events
            .get(&TypeId::of::<E>())
            .map_or(0, |slot| slot.len())
    }

    /// Gets the names of events that currently have one or more listeners.
    ///
    /// # Example
    /// ```
    /// extern crate alloc;
    /// use alloc::sync::Arc;
    /// use rs_typed_events::{event_map, EventEmitter, EventHandler};
    ///
    /// event_map! {
    ///     pub enum Ui {
    ///         Click = "click" => (i32, i32),
    ///         Message = "message" => String,
    ///     }
    /// }
    ///
    /// let emitter = EventEmitter::<Ui>::new();
    /// emitter.on::<Click>(Arc::new(|_| {}));
    /// assert_eq!(emitter.event_names(), vec!["click"]);
    /// ```
    fn event_names(&self) -> Vec<&'static str> {
        self.registry
            .borrow()
            .events
            .values()
            .filter(|slot| !slot.is_empty())
            .map(|slot| slot.name())
            .collect()
    }

    /// Emits `E` synchronously, calling its listeners in subscription order.
    ///
    /// # Example
    /// ```
    /// extern crate alloc;
    /// use alloc::{string::String, sync::Arc};
    /// use rs_typed_events::{event_map, EventEmitter, EventHandler, EventPayload};
    ///
    /// event_map! { pub enum Chat { Message => String } }
    ///
    /// let emitter = EventEmitter::<Chat>::new();
    /// emitter.on::<Message>(Arc::new(|payload: &EventPayload<String>| {
    ///     assert_eq!(payload.as_str(), "hello");
    /// }));
    /// emitter.emit::<Message>(String::from("hello")).unwrap();
    /// ```
    fn emit<E: Event<M>>(&self, payload: impl Into<EventPayload<E::Payload>>) -> Result<(), EventError> {
        let event = TypeId::of::<E>();
        let payload = payload.into();
        let snapshot = match self.registry.borrow().listeners::<E::Payload>(event) {
            Some(listeners) => listeners.snapshot(),
            None => {
                tracing::trace!(event = E::NAME, "emitted with no listeners");
                return Ok(());
            }
        };
        tracing::trace!(event = E::NAME, listeners = snapshot.len(), "emitting");

        let _prune = OnDrop::new(|| {
            if !snapshot.iter().any(Listener::at_limit) {
                return;
            }
            // Runs during unwinding too, where a second panic would abort.
            if let Ok(mut registry) = self.registry.try_borrow_mut() {
                registry.update(event, |slot| slot.prune_spent());
            }
        });
        deliver(E::NAME, &snapshot, &payload)
    }
}

impl<M: EventMap> Clone for EventEmitter<M> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
            _map: PhantomData,
        }
    }
}

impl<M: EventMap> Default for EventEmitter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: EventMap> fmt::Debug for EventEmitter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("events", &self.event_names())
            .finish()
    }
}
