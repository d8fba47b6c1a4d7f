//! Example: Embedded sensor event handler
//!
//! Builds with or without the `threaded` feature; without it the emitter is the
//! `no_std + alloc` one.
use rs_typed_events::{event_map, EventEmitter, EventHandler, EventPayload};
use std::sync::Arc;

const THRESHOLD: u32 = 100;

event_map! {
    pub enum SensorEvents {
        Triggered = "sensor_triggered" => u32,
        Calibrated = "sensor_calibrated" => (),
    }
}

fn main() {
    let emitter = EventEmitter::<SensorEvents>::default();

    emitter.once::<Calibrated>(Arc::new(|_| println!("Sensor calibrated")));
    emitter.on_fallible::<Triggered>(Arc::new(|value: &EventPayload<u32>| {
        if **value > THRESHOLD {
            return Err(format!("reading {} above threshold", value).into());
        }
        // In real embedded, replace with a hardware action
        println!("Reading: {}", value);
        Ok(())
    }));

    emitter.emit::<Calibrated>(()).unwrap();
    for value in [42, 97, 250] {
        if let Err(err) = emitter.emit::<Triggered>(value) {
            println!("Sensor fault: {}", err);
        }
    }
}
