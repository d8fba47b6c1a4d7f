//! Single-threaded emitter for `no_std + alloc` builds.

mod event_emitter;
mod subscription;

pub use event_emitter::EventEmitter;
pub use subscription::Subscription;
