//! Broadcast lane: validation, channel selection, and envelope contents.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use roomcast_core::protocol::hot::{decode_broadcast, BroadcastFlags};
use roomcast_core::protocol::{PacketType, ReservedEvent};
use roomcast_emitter::{Emitter, EmitterMetrics, EmitterOptions, ErrorKind, MemoryPublisher, Value};

fn setup() -> (Arc<MemoryPublisher>, Emitter) {
    // RUST_LOG=roomcast_emitter=debug shows every publish.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let bus = Arc::new(MemoryPublisher::new());
    let emitter = Emitter::new(bus.clone(), EmitterOptions::default());
    (bus, emitter)
}

#[tokio::test]
async fn reserved_events_never_reach_the_bus() {
    let (bus, emitter) = setup();
    for r in ReservedEvent::ALL {
        let err = emitter.emit(r.as_str(), vec![]).await.expect_err("must be rejected");
        assert_eq!(err.kind().as_str(), "RESERVED_EVENT");
        assert_eq!(err.to_string(), format!("{} is a reserved event name", r.as_str()));

        let err = emitter.to(["room"]).volatile().emit(r.as_str(), vec![]).await.expect_err("must be rejected");
        assert_eq!(err.kind().as_str(), "RESERVED_EVENT");
    }
    assert_eq!(bus.count(), 0);
}

#[tokio::test]
async fn emit_envelope_reconstructs_inputs() {
    let (bus, emitter) = setup();
    emitter
        .of("/chat")
        .emit("message", vec![Value::from("hi"), Value::from(7u8), Value::Binary(vec![1, 2, 3])])
        .await
        .unwrap();

    let sent = bus.last().unwrap();
    assert_eq!(sent.channel, "socket.io#/chat#");

    let msg = decode_broadcast(&sent.payload).unwrap();
    assert_eq!(msg.uid(), "emitter");
    assert_eq!(msg.packet().packet_type, PacketType::Event);
    assert_eq!(msg.packet().nsp, "/chat");
    assert_eq!(
        msg.packet().data,
        vec![Value::from("message"), Value::from("hi"), Value::from(7u8), Value::Binary(vec![1, 2, 3])]
    );
    assert!(msg.opts().rooms.is_empty());
    assert!(msg.opts().except.is_empty());
    assert_eq!(msg.opts().flags, BroadcastFlags { volatile: false, compress: false });
}

#[tokio::test]
async fn single_room_uses_fast_path_channel() {
    let (bus, emitter) = setup();

    emitter.to(["r1"]).emit("e", vec![]).await.unwrap();
    assert_eq!(bus.last().unwrap().channel, "socket.io#/#r1#");

    emitter.to(["r1", "r2"]).emit("e", vec![]).await.unwrap();
    assert_eq!(bus.last().unwrap().channel, "socket.io#/#");

    emitter.emit("e", vec![]).await.unwrap();
    assert_eq!(bus.last().unwrap().channel, "socket.io#/#");

    // duplicates collapse, so this is still a single room
    emitter.to(["r1"]).in_rooms(["r1"]).emit("e", vec![]).await.unwrap();
    assert_eq!(bus.last().unwrap().channel, "socket.io#/#r1#");

    assert_eq!(bus.on_channel("socket.io#/#r1#").len(), 2);
    assert_eq!(bus.on_channel("socket.io#/#").len(), 2);
}

#[tokio::test]
async fn rooms_and_except_accumulate_without_duplicates() {
    let (bus, emitter) = setup();
    let op = emitter.to(["r1"]).to(["r1"]).except(["x", "x"]).except(["y"]);
    assert_eq!(op.rooms().len(), 1);
    assert_eq!(op.except_rooms().len(), 2);
    op.emit("e", vec![]).await.unwrap();

    let msg = decode_broadcast(&bus.last().unwrap().payload).unwrap();
    assert_eq!(msg.opts().rooms.iter().collect::<Vec<_>>(), vec!["r1"]);
    assert_eq!(msg.opts().except.iter().collect::<Vec<_>>(), vec!["x", "y"]);
}

#[tokio::test]
async fn flags_are_carried() {
    let (bus, emitter) = setup();
    emitter.volatile().compress(true).emit("e", vec![]).await.unwrap();
    let msg = decode_broadcast(&bus.last().unwrap().payload).unwrap();
    assert_eq!(msg.opts().flags, BroadcastFlags { volatile: true, compress: true });

    emitter.compress(true).compress(false).emit("e", vec![]).await.unwrap();
    let msg = decode_broadcast(&bus.last().unwrap().payload).unwrap();
    assert_eq!(msg.opts().flags, BroadcastFlags { volatile: false, compress: false });
}

#[tokio::test]
async fn chains_do_not_share_state() {
    let (bus, emitter) = setup();
    let a = emitter.to(["a"]).volatile();
    let b = emitter.except(["b"]);
    assert!(b.rooms().is_empty());
    assert!(!b.flags().volatile);

    a.emit("e", vec![]).await.unwrap();
    b.emit("e", vec![]).await.unwrap();
    emitter.emit("e", vec![]).await.unwrap();

    let last = decode_broadcast(&bus.last().unwrap().payload).unwrap();
    assert!(last.opts().rooms.is_empty());
    assert!(last.opts().except.is_empty());
    assert!(!last.opts().flags.volatile);
}

#[tokio::test]
async fn transport_failure_is_surfaced() {
    let (bus, emitter) = setup();
    let metrics = Arc::new(EmitterMetrics::new());
    let emitter = emitter.with_metrics(metrics.clone());

    bus.set_failing(true);
    let err = emitter.to(["r1"]).emit("e", vec![]).await.expect_err("bus is down");
    assert_eq!(err.kind().as_str(), "TRANSPORT");
    assert_eq!(bus.count(), 0);
    assert_eq!(metrics.publishes.get(&[("lane", "broadcast"), ("outcome", "error")]), 1);

    bus.set_failing(false);
    emitter.emit("e", vec![]).await.unwrap();
    emitter.emit("connect", vec![]).await.expect_err("reserved");
    assert_eq!(metrics.publishes.get(&[("lane", "broadcast"), ("outcome", "ok")]), 1);
    assert_eq!(metrics.rejected.get(&[("reason", "reserved_event")]), 1);
}

#[tokio::test]
async fn serializable_args_keep_structure() {
    #[derive(serde::Serialize)]
    struct Move {
        x: i32,
        y: i32,
    }

    let (bus, emitter) = setup();
    let arg = roomcast_emitter::to_arg(&Move { x: 1, y: -2 }).unwrap();
    emitter.emit("move", vec![arg.clone()]).await.unwrap();

    let msg = decode_broadcast(&bus.last().unwrap().payload).unwrap();
    assert_eq!(msg.packet().data[1], arg);
    assert!(msg.packet().data[1].is_map());
}

#[tokio::test]
async fn unencodable_argument_aborts_before_publish() {
    struct Unencodable;

    impl serde::Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot encode this value"))
        }
    }

    let (bus, emitter) = setup();
    let op = emitter.to(["r1"]).volatile();

    let err = roomcast_emitter::to_arg(&Unencodable).expect_err("must not encode");
    assert_eq!(err.kind(), ErrorKind::Encode);

    // The chain is dropped without a terminal call: nothing reaches the bus.
    drop(op);
    assert_eq!(bus.count(), 0);
}
