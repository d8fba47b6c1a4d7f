use dashmap::DashMap;
use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::Subscription;
use crate::listener::Handler;
use crate::slot::{deliver, ListenerSlot, Listeners, OnDrop};
use crate::{
    Callback, Event, EventError, EventHandler, EventMap, EventPayload, Listener, ListenerId,
    TryCallback,
};

/// Listener storage of one emitter: event type → ordered listeners.
///
/// An event is present only while it has at least one listener. A shard guard is never held
/// while a listener runs.
#[derive(Default)]
pub(crate) struct Registry {
    events: DashMap<TypeId, Box<dyn ListenerSlot + Send + Sync>>,
    next_id: AtomicU64,
}

impl Registry {
    fn insert<T: 'static>(
        &self,
        event: TypeId,
        name: &'static str,
        handler: Handler<T>,
        lifetime: Option<u64>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut slot = self
            .events
            .entry(event)
            .or_insert_with(|| Box::new(Listeners::<T>::new(name)));
        if let Some(listeners) = Listeners::<T>::downcast_mut(&mut **slot) {
            listeners.push(Listener::new(id, handler, lifetime));
        }
        id
    }

    /// Copies the listeners of `event` and releases the shard before returning.
    fn snapshot<T: 'static>(&self, event: TypeId) -> Option<Vec<Listener<T>>> {
        let slot = self.events.get(&event)?;
        Listeners::<T>::downcast(&**slot).map(Listeners::snapshot)
    }

    /// Applies `f` to the listeners of `event`, then drops the entry if it became empty.
    fn update<R>(&self, event: TypeId, f: impl FnOnce(&mut dyn ListenerSlot) -> R) -> Option<R> {
        let result = {
            let mut slot = self.events.get_mut(&event)?;
            f(&mut **slot)
        };
        self.events.remove_if(&event, |_, slot| slot.is_empty());
        Some(result)
    }

    pub(crate) fn contains(&self, event: TypeId, id: ListenerId) -> bool {
        self.events
            .get(&event)
            .is_some_and(|slot| slot.contains_id(id))
    }

    pub(crate) fn remove_id(&self, event: TypeId, id: ListenerId) -> bool {
        self.update(event, |slot| slot.remove_id(id)).unwrap_or(false)
    }
}

/// An event emitter for the events of the map `M`.
///
/// Thread-safe build. Listeners are stored in a `DashMap`; an emission copies the listener
/// list under the shard lock, releases it, then calls the listeners on the emitting thread.
/// Listeners may therefore register, unregister or emit on the same emitter, and other
/// threads may do so concurrently.
///
/// `Clone` yields another handle to the same emitter. Use [`EventEmitter::new`] for an
/// independent one.
///
/// # Type Parameters
/// * `M` - The [`EventMap`] fixing which events exist and their payload types.
pub struct EventEmitter<M: EventMap> {
    registry: Arc<Registry>,
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
            registry: Arc::new(Registry::default()),
            _map: PhantomData,
        }
    }

    fn register<E: Event<M>>(&self, handler: Handler<E::Payload>, lifetime: Option<u64>) -> Subscription {
        let event = TypeId::of::<E>();
        let id = self.registry.insert::<E::Payload>(event, E::NAME, handler, lifetime);
        tracing::debug!(event = E::NAME, listener = %id, ?lifetime, "listener registered");
        Subscription::new(Arc::downgrade(&self.registry), event, E::NAME, id)
    }

    fn remove_where<E: Event<M>>(&self, predicate: impl FnMut(&Listener<E::Payload>) -> bool) -> usize {
        let removed = self
            .registry
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
    /// use std::sync::Arc;
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
    /// use std::sync::Arc;
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

    /// Adds a listener to `E` that may fail.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use rs_typed_events::{event_map, EventEmitter, EventHandler, EventPayload};
    ///
    /// event_map! { pub enum Sensor { Reading = "reading" => u32 } }
    ///
    /// let emitter = EventEmitter::<Sensor>::new();
    /// emitter.on_fallible::<Reading>(Arc::new(|value: &EventPayload<u32>| {
    ///     if **value > 100 {
    ///         return Err("out of range".into());
    ///     }
    ///     Ok(())
    /// }));
    ///
    /// assert!(emitter.emit::<Reading>(7).is_ok());
    /// let err = emitter.emit::<Reading>(700).unwrap_err();
    /// assert_eq!(err.event(), "reading");
    /// ```
    fn on_fallible<E: Event<M>>(&self, callback: TryCallback<E::Payload>) -> Subscription {
        self.register::<E>(Handler::Fallible(callback), None)
    }

    /// Removes every registration of `callback` from `E`.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
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
            .update(TypeId::of::<E>(), |slot| {
                Listeners::<E::Payload>::downcast_mut(slot).map(Listeners::drain).unwrap_or_default()
            })
            .unwrap_or_default();
        tracing::debug!(event = E::NAME, removed = removed.len(), "all listeners removed");
        removed
    }

    fn clear(&self) {
        tracing::debug!(events = self.registry.events.len(), "emitter cleared");
        self.registry.events.clear();
    }

    fn listener_count<E: Event<M>>(&self) -> usize {
        self.registry
            .events
            .get(&TypeId::of::<E>())
            .map_or(0, |slot| slot.len())
    }

    /// Gets the names of events that currently have one or more listeners, in no particular
    /// order.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
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
    /// emitter.on::<Message>(Arc::new(|_| {}));
    ///
    /// let mut names = emitter.event_names();
    /// names.sort();
    /// assert_eq!(names, vec!["click", "message"]);
    /// ```
    fn event_names(&self) -> Vec<&'static str> {
        self.registry
            .events
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.value().name())
            .collect()
    }

    /// Emits `E` synchronously, calling its listeners in subscription order on this thread.
    ///
    /// # Example
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use rs_typed_events::{event_map, EventEmitter, EventHandler, EventPayload};
    ///
    /// event_map! { pub enum Chat { Message => String } }
    ///
    /// let received = Arc::new(Mutex::new(Vec::new()));
    /// let emitter = EventEmitter::<Chat>::new();
    /// let sink = Arc::clone(&received);
    /// emitter.on::<Message>(Arc::new(move |payload: &EventPayload<String>| {
    ///     sink.lock().unwrap().push(payload.to_string());
    /// }));
    ///
    /// emitter.emit::<Message>("hello".to_string()).unwrap();
    /// assert_eq!(*received.lock().unwrap(), vec!["hello".to_string()]);
    /// ```
    fn emit<E: Event<M>>(&self, payload: impl Into<EventPayload<E::Payload>>) -> Result<(), EventError> {
        let event = TypeId::of::<E>();
        let payload = payload.into();
        let Some(snapshot) = self.registry.snapshot::<E::Payload>(event) else {
            tracing::trace!(event = E::NAME, "emitted with no listeners");
            return Ok(());
        };
        tracing::trace!(event = E::NAME, listeners = snapshot.len(), "emitting");

        let _prune = OnDrop::new(|| {
            if snapshot.iter().any(Listener::at_limit) {
                self.registry.update(event, |slot| slot.prune_spent());
            }
        });
        deliver(E::NAME, &snapshot, &payload)
    }
}

impl<M: EventMap> Clone for EventEmitter<M> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
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
