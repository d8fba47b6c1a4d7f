extern crate alloc;
use alloc::{boxed::Box, sync::Arc};

/// Shared pointer to an emitted payload.
///
/// Every listener of one emission receives a reference to the same allocation.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use rs_typed_events::EventPayload;
///
/// let payload: EventPayload<String> = Arc::new(String::from("Emitting value"));
/// ```
pub type EventPayload<T> = Arc<T>;

/// Error returned by a fallible listener.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// Listener callable for payloads of type `T`.
///
/// Identity is the `Arc` allocation: keep a clone to unregister it later.
///
/// # Example (embedded/no_std)
/// ```
/// use std::sync::Arc;
/// use rs_typed_events::{Callback, EventPayload};
///
/// let callback: Callback<String> = Arc::new(move |payload: &EventPayload<String>| {
///     let _ = payload.len();
/// });
/// ```
#[cfg(not(feature = "threaded"))]
pub type Callback<T> = Arc<dyn Fn(&EventPayload<T>)>;

/// Listener callable for payloads of type `T`.
///
/// - Requires `Send + Sync` for thread safety.
///
/// # Example (threaded)
/// ```
/// use std::sync::Arc;
/// use rs_typed_events::{Callback, EventPayload};
///
/// let callback: Callback<String> = Arc::new(move |payload: &EventPayload<String>| {
///     println!("Received event: {}", payload);
/// });
/// ```
#[cfg(feature = "threaded")]
pub type Callback<T> = Arc<dyn Fn(&EventPayload<T>) + Send + Sync>;

/// Listener callable that may fail.
///
/// An `Err` stops the emission it occurred in and is handed back to the emitter's caller.
#[cfg(not(feature = "threaded"))]
pub type TryCallback<T> = Arc<dyn Fn(&EventPayload<T>) -> Result<(), BoxError>>;

/// Listener callable that may fail.
///
/// An `Err` stops the emission it occurred in and is handed back to the emitter's caller.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use rs_typed_events::{EventPayload, TryCallback};
///
/// let callback: TryCallback<u32> = Arc::new(|payload: &EventPayload<u32>| {
///     if **payload > 100 {
///         return Err("reading out of range".into());
///     }
///     Ok(())
/// });
/// ```
#[cfg(feature = "threaded")]
pub type TryCallback<T> = Arc<dyn Fn(&EventPayload<T>) -> Result<(), BoxError> + Send + Sync>;
