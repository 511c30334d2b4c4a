//! Hot Lane broadcast envelope (MessagePack).
//!
//! Wire shape: a 3-element array `[uid, packet, opts]` where
//! `packet = {type, data: [event, ...args], nsp}` and
//! `opts = {rooms: [..], flags: {volatile, compress}, except: [..]}`.
//!
//! Structs are written as string-keyed maps (`rmp_serde::to_vec_named`);
//! receivers look fields up by name.

use std::collections::BTreeSet;

use bytes::Bytes;
use rmpv::Value;
use serde::{Deserialize, Serialize};

use crate::error::{EmitterError, Result};
use crate::protocol::types::PacketType;

/// Delivery hints honored by receivers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastFlags {
    /// Receivers may drop the message under backpressure.
    pub volatile: bool,
    /// Receivers should compress the frame sent to clients.
    pub compress: bool,
}

/// Application event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    #[serde(rename = "type")]
    pub packet_type: PacketType,
    /// Event name followed by its arguments.
    pub data: Vec<Value>,
    pub nsp: String,
}

impl Packet {
    /// Build an `Event` packet. The event name is not validated here.
    pub fn event(nsp: &str, event: &str, args: Vec<Value>) -> Self {
        let mut data = Vec::with_capacity(args.len() + 1);
        data.push(Value::from(event));
        data.extend(args);
        Self {
            packet_type: PacketType::Event,
            data,
            nsp: nsp.to_string(),
        }
    }

    /// Event name, if `data[0]` is a string.
    pub fn event_name(&self) -> Option<&str> {
        self.data.first().and_then(Value::as_str)
    }
}

/// Room filter and flags; the namespace is implied by the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastOpts {
    pub rooms: BTreeSet<String>,
    pub flags: BroadcastFlags,
    pub except: BTreeSet<String>,
}

/// Decoded `[uid, packet, opts]` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage(pub String, pub Packet, pub BroadcastOpts);

impl BroadcastMessage {
    pub fn uid(&self) -> &str {
        &self.0
    }

    pub fn packet(&self) -> &Packet {
        &self.1
    }

    pub fn opts(&self) -> &BroadcastOpts {
        &self.2
    }
}

/// Encode a broadcast envelope.
pub fn encode_broadcast(uid: &str, packet: &Packet, opts: &BroadcastOpts) -> Result<Bytes> {
    rmp_serde::to_vec_named(&(uid, packet, opts))
        .map(Bytes::from)
        .map_err(|e| EmitterError::Encode(format!("msgpack encode failed: {e}")))
}

/// Decode a broadcast envelope (tooling / tests; the emitter never reads the bus).
pub fn decode_broadcast(buf: &[u8]) -> Result<BroadcastMessage> {
    rmp_serde::from_slice(buf)
        .map_err(|e| EmitterError::Encode(format!("msgpack decode failed: {e}")))
}

/// Convert any serializable value into an event argument.
///
/// Goes through the named encoder so structs keep their field names.
pub fn to_arg<T: Serialize + ?Sized>(v: &T) -> Result<Value> {
    let buf = rmp_serde::to_vec_named(v)
        .map_err(|e| EmitterError::Encode(format!("argument not encodable: {e}")))?;
    rmpv::decode::read_value(&mut buf.as_slice())
        .map_err(|e| EmitterError::Encode(format!("argument not encodable: {e}")))
}
