extern crate alloc;
use alloc::{rc::Rc, string::String, string::ToString, sync::Arc, vec, vec::Vec};
use core::cell::{Cell, RefCell};

use crate::{event_map, Callback, EventEmitter, EventHandler, EventPayload};

#[derive(PartialEq, Eq, Debug, Clone)]
struct TestCustomPayload {
    message: String,
    option: bool,
    val: u32,
}

event_map! {
    enum Payloads {
        Int => u32,
        Flag => bool,
        Binary => Vec<u8>,
        Custom => TestCustomPayload,
        Nothing => (),
    }
}

/// Single-threaded listeners may capture `Rc` state
#[test]
fn u32_emit_with_rc_state() {
    let called = Rc::new(Cell::new(0u32));
    let called2 = Rc::clone(&called);
    let cb: Callback<u32> = Arc::new(move |payload: &EventPayload<u32>| {
        assert_eq!(**payload, 42);
        called2.set(called2.get() + 1);
    });

    let emitter = EventEmitter::<Payloads>::default();
    emitter.on::<Int>(cb);
    emitter.emit::<Int>(42).unwrap();
    assert_eq!(called.get(), 1);
}

#[test]
fn bool_and_unit_emit_successful() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen2 = Rc::clone(&seen);
    let emitter = EventEmitter::<Payloads>::default();
    emitter.on::<Flag>(Arc::new(move |payload: &EventPayload<bool>| seen2.borrow_mut().push(**payload)));
    let nothing = Rc::new(Cell::new(false));
    let nothing2 = Rc::clone(&nothing);
    emitter.on::<Nothing>(Arc::new(move |_: &EventPayload<()>| nothing2.set(true)));

    emitter.emit::<Flag>(true).unwrap();
    emitter.emit::<Flag>(false).unwrap();
    emitter.emit::<Nothing>(()).unwrap();
    assert_eq!(*seen.borrow(), vec![true, false]);
    assert!(nothing.get());
}

#[test]
fn binary_emit_successful() {
    let called = Rc::new(Cell::new(0u32));
    let called2 = Rc::clone(&called);
    let cb: Callback<Vec<u8>> = Arc::new(move |payload: &EventPayload<Vec<u8>>| {
        assert_eq!(payload.as_slice(), b"Test");
        called2.set(called2.get() + 1);
    });

    let emitter = EventEmitter::<Payloads>::default();
    emitter.on::<Binary>(cb);
    for _ in 0..10 {
        emitter.emit::<Binary>(b"Test".to_vec()).unwrap();
    }
    assert_eq!(called.get(), 10);
}

#[test]
fn custom_emit_successful() {
    let received = Rc::new(RefCell::new(Vec::new()));
    let received2 = Rc::clone(&received);
    let cb: Callback<TestCustomPayload> = Arc::new(move |payload: &EventPayload<TestCustomPayload>| {
        received2.borrow_mut().push(payload.as_ref().clone());
    });

    let emitter = EventEmitter::<Payloads>::default();
    emitter.on::<Custom>(cb);
    for val in 0..10u32 {
        let payload = TestCustomPayload {
            message: "custom".to_string(),
            option: val % 4 == 0,
            val,
        };
        emitter.emit::<Custom>(payload).unwrap();
    }

    let received = received.borrow();
    assert_eq!(received.len(), 10);
    assert!(received.iter().all(|p| p.message == "custom" && p.option == (p.val % 4 == 0)));
    assert_eq!(received.iter().map(|p| p.val).collect::<Vec<_>>(), (0..10u32).collect::<Vec<_>>());
}
