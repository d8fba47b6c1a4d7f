//! Example: GUI button click event
use rs_typed_events::{event_map, Callback, EventEmitter, EventHandler, EventPayload};
use std::sync::Arc;

event_map! {
    pub enum ButtonEvents {
        Click = "button_click" => String,
        Hover = "button_hover" => (i32, i32),
    }
}

fn main() {
    let emitter = EventEmitter::<ButtonEvents>::default();

    let on_click: Callback<String> = Arc::new(|label: &EventPayload<String>| {
        println!("Button clicked: {}", label);
    });
    emitter.on::<Click>(on_click.clone());
    let hover = emitter.on::<Hover>(Arc::new(|position: &EventPayload<(i32, i32)>| {
        let (x, y) = **position;
        println!("Hovering at ({}, {})", x, y);
    }));

    // Simulate user input
    emitter.emit::<Hover>((10, 4)).unwrap();
    emitter.emit::<Click>("OK".to_string()).unwrap();

    hover.unsubscribe();
    emitter.off::<Click>(&on_click);
    emitter.emit::<Click>("ignored".to_string()).unwrap();
    println!("Events with listeners: {:?}", emitter.event_names());
}
