//! Closed enumerations shared with the receiving servers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EmitterError, Result};

/// Packet kind carried in a broadcast envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    Connect = 0,
    Disconnect = 1,
    Event = 2,
    Ack = 3,
    ConnectError = 4,
    BinaryEvent = 5,
    BinaryAck = 6,
}

impl PacketType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for PacketType {
    type Error = EmitterError;

    fn try_from(v: u8) -> Result<Self> {
        Ok(match v {
            0 => PacketType::Connect,
            1 => PacketType::Disconnect,
            2 => PacketType::Event,
            3 => PacketType::Ack,
            4 => PacketType::ConnectError,
            5 => PacketType::BinaryEvent,
            6 => PacketType::BinaryAck,
            other => return Err(EmitterError::Encode(format!("unknown packet type: {other}"))),
        })
    }
}

/// Request kind carried in a request envelope (`type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RequestType {
    Sockets = 0,
    AllRooms = 1,
    RemoteJoin = 2,
    RemoteLeave = 3,
    RemoteDisconnect = 4,
    RemoteFetch = 5,
    ServerSideEmit = 6,
}

impl RequestType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RequestType {
    type Error = EmitterError;

    fn try_from(v: u8) -> Result<Self> {
        Ok(match v {
            0 => RequestType::Sockets,
            1 => RequestType::AllRooms,
            2 => RequestType::RemoteJoin,
            3 => RequestType::RemoteLeave,
            4 => RequestType::RemoteDisconnect,
            5 => RequestType::RemoteFetch,
            6 => RequestType::ServerSideEmit,
            other => return Err(EmitterError::Encode(format!("unknown request type: {other}"))),
        })
    }
}

// Both enums travel as bare integers on the wire.
macro_rules! integer_wire_repr {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_u8(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
                let v = u8::deserialize(d)?;
                <$ty>::try_from(v).map_err(serde::de::Error::custom)
            }
        }
    };
}

integer_wire_repr!(PacketType);
integer_wire_repr!(RequestType);

/// Event names the receiving servers reserve for their own lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedEvent {
    Connect,
    ConnectError,
    Disconnect,
    Disconnecting,
    NewListener,
    RemoveListener,
}

impl ReservedEvent {
    pub const ALL: [ReservedEvent; 6] = [
        ReservedEvent::Connect,
        ReservedEvent::ConnectError,
        ReservedEvent::Disconnect,
        ReservedEvent::Disconnecting,
        ReservedEvent::NewListener,
        ReservedEvent::RemoveListener,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReservedEvent::Connect => "connect",
            ReservedEvent::ConnectError => "connect_error",
            ReservedEvent::Disconnect => "disconnect",
            ReservedEvent::Disconnecting => "disconnecting",
            ReservedEvent::NewListener => "newListener",
            ReservedEvent::RemoveListener => "removeListener",
        }
    }

    /// Case-sensitive lookup; `"Connect"` is an ordinary event.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

/// Reject reserved event names before anything is serialized.
pub fn check_event_name(event: &str) -> Result<()> {
    match ReservedEvent::from_name(event) {
        Some(r) => Err(EmitterError::ReservedEvent(r.as_str().to_string())),
        None => Ok(()),
    }
}
