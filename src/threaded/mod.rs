//! Thread-safe emitter backed by `DashMap`.

mod event_emitter;
mod subscription;

pub use event_emitter::EventEmitter;
pub use subscription::Subscription;
