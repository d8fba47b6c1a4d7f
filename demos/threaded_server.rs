//! Example: Threaded event-driven server (std)
use rs_typed_events::{event_map, EventEmitter, EventHandler, EventPayload};
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
pub struct ChatMessage {
    pub from: String,
    pub body: String,
}

event_map! {
    pub enum ServerEvents {
        ClientConnected = "client_connected" => String,
        MessageReceived = "message_received" => ChatMessage,
        Shutdown = "shutdown" => (),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let emitter = EventEmitter::<ServerEvents>::new();
    emitter.on::<ClientConnected>(Arc::new(|name: &EventPayload<String>| {
        println!("Client connected: {}", name);
    }));
    emitter.on::<MessageReceived>(Arc::new(|message: &EventPayload<ChatMessage>| {
        println!("Message from {}: {}", message.from, message.body);
    }));
    emitter.once::<Shutdown>(Arc::new(|_| println!("Server shutting down")));

    // Simulate one connection per worker thread
    thread::scope(|scope| {
        for name in ["Alice", "Bob"] {
            let emitter = emitter.clone();
            scope.spawn(move || {
                emitter.emit::<ClientConnected>(name.to_string()).unwrap();
                emitter
                    .emit::<MessageReceived>(ChatMessage {
                        from: name.to_string(),
                        body: format!("Hello from {}", name),
                    })
                    .unwrap();
            });
        }
    });

    emitter.emit::<Shutdown>(()).unwrap();
    emitter.emit::<Shutdown>(()).unwrap();
}
