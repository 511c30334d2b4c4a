//! Text Lane request envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use roomcast_core::protocol::text::Request;
use roomcast_core::protocol::RequestType;


#[test]
fn request_vectors() {
    let files = [
        "remote_join.json",
        "remote_leave.json",
        "remote_disconnect.json",
        "server_side_emit.json",
    ];

    for f in files {
        let v = vector_loader::load(f);
        let req = v.request.build();
        let bytes = req.encode().expect("encode");
        let got: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(got, v.expect, "vector={}", v.description);

        let back = Request::decode(&bytes).expect("decode");
        assert_eq!(back, req, "vector={}", v.description);
    }
}

#[test]
fn empty_selector_serializes_as_arrays() {
    let req = Request::RemoteJoin {
        selector: Default::default(),
        rooms: vec![],
    };
    let got: serde_json::Value = serde_json::from_slice(&req.encode().unwrap()).unwrap();
    assert_eq!(got["opts"]["rooms"], serde_json::json!([]));
    assert_eq!(got["opts"]["except"], serde_json::json!([]));
    assert_eq!(got["rooms"], serde_json::json!([]));
}

#[test]
fn decode_rejects_request_kinds_the_emitter_never_sends() {
    let err = Request::decode(br#"{"type":0}"#).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "ENCODE");

    let err = Request::decode(br#"{"type":99}"#).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "ENCODE");
}

#[test]
fn request_type_matches_variant() {
    let req = Request::RemoteDisconnect {
        selector: Default::default(),
        close: false,
    };
    assert_eq!(req.request_type(), RequestType::RemoteDisconnect);
}

#[test]
fn decode_accepts_null_room_lists() {
    let raw = br#"{"type":2,"opts":{"rooms":null,"except":null},"rooms":["a"]}"#;
    let req = Request::decode(raw).expect("null rooms must decode");
    assert_eq!(
        req,
        Request::RemoteJoin {
            selector: Default::default(),
            rooms: vec!["a".to_string()],
        }
    );

    let raw = br#"{"type":4,"opts":{"rooms":["r"],"except":null},"close":true}"#;
    match Request::decode(raw).expect("null except must decode") {
        Request::RemoteDisconnect { selector, close } => {
            assert_eq!(selector.rooms.iter().collect::<Vec<_>>(), vec!["r"]);
            assert!(selector.except.is_empty());
            assert!(close);
        }
        other => panic!("unexpected request: {other:?}"),
    }

    let raw = br#"{"uid":"emitter","type":6,"data":null}"#;
    let req = Request::decode(raw).expect("null data must decode");
    assert_eq!(
        req,
        Request::ServerSideEmit {
            uid: "emitter".into(),
            data: vec![],
        }
    );
}
