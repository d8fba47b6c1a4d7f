extern crate alloc;
use alloc::string::ToString;

use crate::BoxError;

/// Errors that can surface from an emission.
///
/// Registering and unregistering never fail, and emitting an event with no listeners is not an
/// error. The only failure is a fallible listener returning `Err`, which stops the emission.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Emitting Event:
    /// - A listener registered with `on_fallible` returned an error. Listeners after it in
    ///   subscription order were not called.
    #[error("listener for event `{event}` failed: {source}")]
    Listener {
        /// Name of the event being emitted.
        event: &'static str,
        /// The error returned by the listener.
        #[source]
        source: BoxError,
    },
}

impl EventError {
    /// Name of the event whose emission failed.
    pub fn event(&self) -> &'static str {
        match self {
            EventError::Listener { event, .. } => event,
        }
    }
}

impl PartialEq for EventError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                EventError::Listener { event: a, source: a_source },
                EventError::Listener { event: b, source: b_source },
            ) => a == b && a_source.to_string() == b_source.to_string(),
        }
    }
}
impl Eq for EventError {}
