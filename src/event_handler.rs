extern crate alloc;
use alloc::vec::Vec;

use crate::{Callback, Event, EventError, EventMap, EventPayload, Listener, Subscription, TryCallback};

/// Defines the contract for event-driven types that manage listeners and emit events of the
/// map `M`.
///
/// Every method is generic over the event marker `E`, so the payload a listener accepts and
/// the payload an emission carries are both fixed by `E::Payload`.
///
/// Methods take `&self`: listeners may hold a handle to the emitter and register, unregister
/// or emit from inside a callback.
pub trait EventHandler<M: EventMap> {
    /// Adds a listener to `E` for every future emission.
    ///
    /// The listener is appended after those already registered. Registering the same callback
    /// again adds a second, independent entry.
    ///
    /// # Returns
    /// A [`Subscription`] removing exactly this registration.
    fn on<E: Event<M>>(&self, callback: Callback<E::Payload>) -> Subscription;

    /// Adds a listener to `E` that is called at most `limit` times, then removed.
    ///
    /// A `limit` of `0` means unlimited.
    fn on_limited<E: Event<M>>(&self, callback: Callback<E::Payload>, limit: u64) -> Subscription;

    /// Adds a listener to `E` that is called for the next emission only.
    fn once<E: Event<M>>(&self, callback: Callback<E::Payload>) -> Subscription {
        self.on_limited::<E>(callback, 1)
    }

    /// Adds a listener to `E` that may fail.
    ///
    /// An `Err` ends the emission that produced it: later listeners are skipped and
    /// [`emit`](Self::emit) returns [`EventError::Listener`].
    fn on_fallible<E: Event<M>>(&self, callback: TryCallback<E::Payload>) -> Subscription;

    /// Removes every registration of `callback` from `E`.
    ///
    /// Matching is by `Arc` identity. Unknown events and callbacks are ignored.
    ///
    /// # Returns
    /// The number of registrations removed.
    fn off<E: Event<M>>(&self, callback: &Callback<E::Payload>) -> usize;

    /// Removes every registration of the fallible `callback` from `E`.
    fn off_fallible<E: Event<M>>(&self, callback: &TryCallback<E::Payload>) -> usize;

    /// Removes all listeners of `E`, returning them in subscription order.
    fn off_all<E: Event<M>>(&self) -> Vec<Listener<E::Payload>>;

    /// Removes all listeners of every event.
    fn clear(&self);

    /// Gets the number of listeners currently registered to `E`.
    fn listener_count<E: Event<M>>(&self) -> usize;

    /// Returns `true` if `E` has at least one listener.
    fn has_listeners<E: Event<M>>(&self) -> bool {
        self.listener_count::<E>() > 0
    }

    /// Gets the names of events that currently have one or more listeners.
    fn event_names(&self) -> Vec<&'static str>;

    /// Emits `E` synchronously, calling its listeners in subscription order.
    ///
    /// The listeners called are those registered when the emission starts. Listeners added
    /// by a callback wait for the next emission; listeners removed by a callback still receive
    /// the current one.
    ///
    /// # Returns
    /// * `Ok(())` once every listener ran, including when `E` has no listeners.
    /// * `Err(EventError::Listener)` if a fallible listener failed; the remaining listeners
    ///   were not called.
    ///
    /// # Panics
    /// A panicking listener is not caught: the panic leaves `emit` and the remaining listeners
    /// are not called.
    fn emit<E: Event<M>>(&self, payload: impl Into<EventPayload<E::Payload>>) -> Result<(), EventError>;
}
