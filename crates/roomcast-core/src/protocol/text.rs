//! Text Lane request envelopes (JSON).
//!
//! One flat JSON object per request, discriminated by the integer `type`
//! field. `opts` selects which already-connected sockets the request applies
//! to; it reuses the `rooms`/`except` field names of the broadcast lane.

use std::collections::BTreeSet;

use bytes::Bytes;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{EmitterError, Result};
use crate::protocol::types::RequestType;

/// Which sockets an administrative request applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketSelector {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rooms: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub except: BTreeSet<String>,
}

// Older emitters send empty room lists as `null`.
fn null_as_empty<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Administrative request published on the request channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Matching sockets join `rooms`.
    RemoteJoin { selector: SocketSelector, rooms: Vec<String> },
    /// Matching sockets leave `rooms`.
    RemoteLeave { selector: SocketSelector, rooms: Vec<String> },
    /// Matching sockets are disconnected; `close` also closes the transport.
    RemoteDisconnect { selector: SocketSelector, close: bool },
    /// Relayed to every server; `uid` lets receivers drop their own echoes.
    ServerSideEmit { uid: String, data: Vec<Value> },
}

impl Request {
    pub fn request_type(&self) -> RequestType {
        match self {
            Request::RemoteJoin { .. } => RequestType::RemoteJoin,
            Request::RemoteLeave { .. } => RequestType::RemoteLeave,
            Request::RemoteDisconnect { .. } => RequestType::RemoteDisconnect,
            Request::ServerSideEmit { .. } => RequestType::ServerSideEmit,
        }
    }

    /// Serialize to the JSON bytes published on the bus.
    pub fn encode(&self) -> Result<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| EmitterError::Encode(format!("json encode failed: {e}")))
    }

    /// Parse a request envelope. Request kinds the emitter never produces are rejected.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let raw: RawRequest = serde_json::from_slice(buf)
            .map_err(|e| EmitterError::Encode(format!("invalid request json: {e}")))?;

        let selector = || {
            raw.opts
                .clone()
                .ok_or_else(|| EmitterError::Encode("request missing opts".into()))
        };

        match raw.request_type {
            RequestType::RemoteJoin => Ok(Request::RemoteJoin { selector: selector()?, rooms: raw.rooms.clone() }),
            RequestType::RemoteLeave => Ok(Request::RemoteLeave { selector: selector()?, rooms: raw.rooms.clone() }),
            RequestType::RemoteDisconnect => Ok(Request::RemoteDisconnect {
                selector: selector()?,
                close: raw.close.unwrap_or(false),
            }),
            RequestType::ServerSideEmit => Ok(Request::ServerSideEmit {
                uid: raw
                    .uid
                    .clone()
                    .ok_or_else(|| EmitterError::Encode("server-side emit missing uid".into()))?,
                data: raw.data.clone(),
            }),
            other => Err(EmitterError::Encode(format!(
                "unsupported request type: {}",
                other.code()
            ))),
        }
    }
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Request::RemoteJoin { selector, rooms } | Request::RemoteLeave { selector, rooms } => {
                let mut m = s.serialize_map(Some(3))?;
                m.serialize_entry("type", &self.request_type())?;
                m.serialize_entry("opts", selector)?;
                m.serialize_entry("rooms", rooms)?;
                m.end()
            }
            Request::RemoteDisconnect { selector, close } => {
                let mut m = s.serialize_map(Some(3))?;
                m.serialize_entry("type", &self.request_type())?;
                m.serialize_entry("opts", selector)?;
                m.serialize_entry("close", close)?;
                m.end()
            }
            Request::ServerSideEmit { uid, data } => {
                let mut m = s.serialize_map(Some(3))?;
                m.serialize_entry("uid", uid)?;
                m.serialize_entry("type", &self.request_type())?;
                m.serialize_entry("data", data)?;
                m.end()
            }
        }
    }
}

// Union of every field a request may carry.
#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(rename = "type")]
    request_type: RequestType,
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    opts: Option<SocketSelector>,
    #[serde(default, deserialize_with = "null_as_empty")]
    rooms: Vec<String>,
    #[serde(default)]
    close: Option<bool>,
    #[serde(default, deserialize_with = "null_as_empty")]
    data: Vec<Value>,
}
