//! Broadcast target builder.
//!
//! A `BroadcastOperator` accumulates room targeting and flags for exactly one
//! terminal call. Targeting methods take and return `self`, terminal methods
//! consume it, so one chain can never leak state into another.
//!
//! The target/except sets mean different things depending on the terminal:
//! for `emit` they pick the rooms that receive the event; for the
//! `sockets_*`/`disconnect_sockets` requests they select which connected
//! sockets the request applies to.

use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use rmpv::Value;
use tracing::{debug, warn};

use roomcast_core::error::Result;
use roomcast_core::protocol::hot::{encode_broadcast, BroadcastFlags, BroadcastOpts, Packet};
use roomcast_core::protocol::text::{Request, SocketSelector};
use roomcast_core::protocol::types::check_event_name;
use roomcast_core::protocol::NamespaceChannels;
use roomcast_core::EMITTER_UID;

use crate::obs::EmitterMetrics;
use crate::publish::Publisher;

/// Which lane a publish went out on (log field / metric label).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lane {
    Broadcast,
    Request,
}

impl Lane {
    fn as_str(self) -> &'static str {
        match self {
            Lane::Broadcast => "broadcast",
            Lane::Request => "request",
        }
    }
}

/// Shared, read-only handles every builder of one session lineage uses.
#[derive(Clone)]
pub(crate) struct Outlet {
    pub(crate) publisher: Arc<dyn Publisher>,
    pub(crate) channels: Arc<NamespaceChannels>,
    pub(crate) metrics: Option<Arc<EmitterMetrics>>,
}

impl Outlet {
    async fn publish(&self, lane: Lane, channel: &str, payload: Bytes) -> Result<()> {
        let bytes = payload.len();
        let res = self.publisher.publish(channel, payload).await;
        let outcome = match &res {
            Ok(()) => {
                debug!(channel, lane = lane.as_str(), bytes, "published");
                "ok"
            }
            Err(e) => {
                warn!(channel, lane = lane.as_str(), error = %e, "publish failed");
                "error"
            }
        };
        if let Some(m) = &self.metrics {
            m.publishes.inc(&[("lane", lane.as_str()), ("outcome", outcome)]);
        }
        res
    }
}

/// Per-call room targeting and flags.
#[must_use = "a BroadcastOperator does nothing until a terminal method is awaited"]
pub struct BroadcastOperator {
    outlet: Outlet,
    rooms: BTreeSet<String>,
    except: BTreeSet<String>,
    flags: BroadcastFlags,
}

impl BroadcastOperator {
    pub(crate) fn new(outlet: Outlet) -> Self {
        Self {
            outlet,
            rooms: BTreeSet::new(),
            except: BTreeSet::new(),
            flags: BroadcastFlags::default(),
        }
    }

    /// Target rooms. Duplicates collapse.
    pub fn to<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rooms.extend(rooms.into_iter().map(Into::into));
        self
    }

    /// Synonym of [`to`](Self::to).
    pub fn in_rooms<I, S>(self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to(rooms)
    }

    /// Exclude rooms. Duplicates collapse.
    pub fn except<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except.extend(rooms.into_iter().map(Into::into));
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.flags.compress = compress;
        self
    }

    /// Receivers may drop the event for clients that are not ready. Cannot be unset.
    pub fn volatile(mut self) -> Self {
        self.flags.volatile = true;
        self
    }

    pub fn rooms(&self) -> &BTreeSet<String> {
        &self.rooms
    }

    pub fn except_rooms(&self) -> &BTreeSet<String> {
        &self.except
    }

    pub fn flags(&self) -> BroadcastFlags {
        self.flags
    }

    /// Channel an `emit` from the current state would be published on.
    pub fn broadcast_channel(&self) -> String {
        let channels = &self.outlet.channels;
        match self.single_room() {
            Some(room) => channels.room(room),
            None => channels.broadcast().to_string(),
        }
    }

    fn single_room(&self) -> Option<&str> {
        if self.rooms.len() == 1 {
            self.rooms.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    fn selector(&self) -> SocketSelector {
        SocketSelector {
            rooms: self.rooms.clone(),
            except: self.except.clone(),
        }
    }

    /// Emit an event to every client matching the current targeting.
    ///
    /// Reserved event names are rejected before anything is encoded or published.
    pub async fn emit<I>(self, event: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        if let Err(e) = check_event_name(event) {
            debug!(event, "rejected reserved event name");
            if let Some(m) = &self.outlet.metrics {
                m.rejected.inc(&[("reason", "reserved_event")]);
            }
            return Err(e);
        }

        let packet = Packet::event(self.outlet.channels.nsp(), event, args.into_iter().collect());
        let channel = self.broadcast_channel();
        let opts = BroadcastOpts {
            rooms: self.rooms,
            flags: self.flags,
            except: self.except,
        };

        let payload = encode_broadcast(EMITTER_UID, &packet, &opts)?;
        self.outlet.publish(Lane::Broadcast, &channel, payload).await
    }

    /// Make the selected sockets join `rooms`.
    pub async fn sockets_join<I, S>(self, rooms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let req = Request::RemoteJoin {
            selector: self.selector(),
            rooms: rooms.into_iter().map(Into::into).collect(),
        };
        self.request(req).await
    }

    /// Make the selected sockets leave `rooms`.
    pub async fn sockets_leave<I, S>(self, rooms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let req = Request::RemoteLeave {
            selector: self.selector(),
            rooms: rooms.into_iter().map(Into::into).collect(),
        };
        self.request(req).await
    }

    /// Disconnect the selected sockets; `close` also closes the underlying connection.
    pub async fn disconnect_sockets(self, close: bool) -> Result<()> {
        let req = Request::RemoteDisconnect {
            selector: self.selector(),
            close,
        };
        self.request(req).await
    }

    /// Relay `args` to every server in the cluster. Room targeting is ignored.
    pub async fn server_side_emit<I>(self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        let req = Request::ServerSideEmit {
            uid: EMITTER_UID.to_string(),
            data: args.into_iter().collect(),
        };
        self.request(req).await
    }

    async fn request(self, req: Request) -> Result<()> {
        let payload = req.encode()?;
        let channel = self.outlet.channels.request();
        self.outlet.publish(Lane::Request, channel, payload).await
    }
}
