//! Compile-time contract between event names and payload types.
//!
//! An [`EventMap`] is a closed set of events. Each event is a marker type implementing
//! [`Event`] for exactly one map, carrying its payload type and its name. An
//! [`EventEmitter<M>`](crate::EventEmitter) only accepts events of `M`, and only with the
//! payload type that event declares:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use rs_typed_events::{event_map, EventEmitter, EventHandler};
//!
//! event_map! {
//!     pub enum Chat {
//!         Message => String,
//!     }
//! }
//!
//! let emitter = EventEmitter::<Chat>::new();
//! emitter.emit::<Message>(42u32).unwrap();
//! ```
//!
//! Events of another map are rejected as well:
//!
//! ```compile_fail
//! use rs_typed_events::{event_map, EventEmitter, EventHandler};
//!
//! event_map! {
//!     pub enum Chat {
//!         Message => String,
//!     }
//! }
//! event_map! {
//!     pub enum Sensors {
//!         Reading => u32,
//!     }
//! }
//!
//! let emitter = EventEmitter::<Chat>::new();
//! emitter.emit::<Reading>(42u32).unwrap();
//! ```

/// A closed set of events.
///
/// Implemented by a type that only exists at the type level, usually an empty enum produced by
/// [`event_map!`](crate::event_map).
pub trait EventMap: 'static {}

/// One event of the map `M`.
#[cfg(not(feature = "threaded"))]
pub trait Event<M: EventMap>: 'static {
    /// The value delivered to listeners of this event. Use `()` for events without data.
    type Payload: 'static;

    /// Human readable event name, used by [`event_names`](crate::EventHandler::event_names)
    /// and in logs.
    const NAME: &'static str;
}

/// One event of the map `M`.
#[cfg(feature = "threaded")]
pub trait Event<M: EventMap>: 'static {
    /// The value delivered to listeners of this event. Use `()` for events without data.
    type Payload: Send + Sync + 'static;

    /// Human readable event name, used by [`event_names`](crate::EventHandler::event_names)
    /// and in logs.
    const NAME: &'static str;
}

/// Declares an [`EventMap`] together with one marker type per event.
///
/// Every entry is `Marker => Payload`, or `Marker = "name" => Payload` to override the name
/// reported for the event (it defaults to the marker's identifier).
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use rs_typed_events::{event_map, Event, EventEmitter, EventHandler, EventPayload};
///
/// #[derive(Debug, PartialEq)]
/// pub struct Point { pub x: i32, pub y: i32 }
///
/// event_map! {
///     /// Events raised by the UI layer.
///     pub enum UiEvents {
///         Click = "click" => Point,
///         Message = "message" => String,
///         Ready => (),
///     }
/// }
///
/// assert_eq!(<Click as Event<UiEvents>>::NAME, "click");
/// assert_eq!(<Ready as Event<UiEvents>>::NAME, "Ready");
///
/// let emitter = EventEmitter::<UiEvents>::new();
/// emitter.on::<Click>(Arc::new(|point: &EventPayload<Point>| {
///     assert_eq!(**point, Point { x: 1, y: 2 });
/// }));
/// emitter.emit::<Click>(Point { x: 1, y: 2 }).unwrap();
/// emitter.emit::<Ready>(()).unwrap();
/// ```
#[macro_export]
macro_rules! event_map {
    (@name $event:ident) => {
        ::core::stringify!($event)
    };
    (@name $event:ident $name:literal) => {
        $name
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $map:ident {
            $(
                $(#[$event_meta:meta])*
                $event:ident $(= $name:literal)? => $payload:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $map {}

        impl $crate::EventMap for $map {}

        $(
            $(#[$event_meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct $event;

            impl $crate::Event<$map> for $event {
                type Payload = $payload;
                const NAME: &'static str = $crate::event_map!(@name $event $($name)?);
            }
        )*
    };
}
