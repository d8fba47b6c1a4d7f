#![cfg_attr(not(feature = "threaded"), no_std)]

//! # Typed Events
//!
//! A synchronous, in-process event emitter whose event names are bound to payload types at
//! compile time.
//!
//! - **EventMap / Event**: the closed set of events an emitter accepts and the payload type of
//!   each, usually declared with [`event_map!`].
//! - **EventEmitter**: owns the listener registry; register, unregister and emit.
//! - **EventHandler**: trait defining the emitter API.
//! - **Subscription**: handle returned by a registration that removes it again.
//!
//! Emission calls every listener registered at the moment it starts, in subscription order,
//! on the calling thread. Nothing is queued or deferred.
//!
//! By default, the crate uses the `threaded` implementation (`Send + Sync`, backed by
//! `DashMap`). Without the feature the crate is `no_std + alloc` and exports the
//! single-threaded `RefCell` emitter under the same names.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use rs_typed_events::{event_map, Callback, EventEmitter, EventHandler, EventPayload};
//!
//! #[derive(Debug, PartialEq)]
//! pub struct Point { pub x: i32, pub y: i32 }
//!
//! event_map! {
//!     pub enum UiEvents {
//!         Click = "click" => Point,
//!         Message = "message" => String,
//!     }
//! }
//!
//! let emitter = EventEmitter::<UiEvents>::new();
//! let on_click: Callback<Point> = Arc::new(|point: &EventPayload<Point>| {
//!     assert_eq!(**point, Point { x: 1, y: 2 });
//! });
//! let subscription = emitter.on::<Click>(on_click.clone());
//!
//! emitter.emit::<Click>(Point { x: 1, y: 2 }).unwrap();
//! emitter.emit::<Message>("ignored by click listeners".to_string()).unwrap();
//!
//! subscription.unsubscribe();
//! assert!(!emitter.has_listeners::<Click>());
//! ```

mod constants;
mod error;
mod event_handler;
mod event_map;
mod listener;
mod slot;

#[cfg(not(feature = "threaded"))]
mod base;
#[cfg(feature = "threaded")]
mod threaded;

pub use constants::{BoxError, Callback, EventPayload, TryCallback};
pub use error::EventError;
pub use event_handler::EventHandler;
pub use event_map::{Event, EventMap};
pub use listener::{Listener, ListenerId};

#[cfg(not(feature = "threaded"))]
pub use base::{EventEmitter, Subscription};
#[cfg(feature = "threaded")]
pub use threaded::{EventEmitter, Subscription};

#[cfg(test)]
mod tests;
