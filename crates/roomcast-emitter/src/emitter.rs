//! Namespace-scoped session.
//!
//! An `Emitter` holds the transport handle and the channel names of one
//! namespace. Every targeting or terminal method starts a fresh
//! `BroadcastOperator`, so the emitter itself carries no per-call state and
//! can be cloned and shared freely.

use std::sync::Arc;

use rmpv::Value;

use roomcast_core::error::Result;
use roomcast_core::protocol::NamespaceChannels;

use crate::broadcast::{BroadcastOperator, Outlet};
use crate::config::{EmitterConfig, EmitterOptions};
use crate::obs::EmitterMetrics;
use crate::publish::Publisher;

#[derive(Clone)]
pub struct Emitter {
    outlet: Outlet,
}

impl Emitter {
    pub fn new(publisher: Arc<dyn Publisher>, opts: EmitterOptions) -> Self {
        let channels = NamespaceChannels::new(&opts.key, &opts.nsp);
        tracing::debug!(
            broadcast = channels.broadcast(),
            request = channels.request(),
            "emitter ready"
        );
        Self {
            outlet: Outlet {
                publisher,
                channels: Arc::new(channels),
                metrics: None,
            },
        }
    }

    pub fn from_config(publisher: Arc<dyn Publisher>, cfg: &EmitterConfig) -> Self {
        Self::new(publisher, cfg.emitter_options())
    }

    /// Connect to Redis using `cfg.redis` and bind to `cfg`'s key and namespace.
    #[cfg(feature = "redis")]
    pub async fn connect(cfg: &EmitterConfig) -> Result<Self> {
        let publisher = crate::publish::RedisPublisher::connect(&cfg.redis).await?;
        Ok(Self::from_config(Arc::new(publisher), cfg))
    }

    /// Report publish outcomes to `metrics` (inherited by `of`).
    pub fn with_metrics(mut self, metrics: Arc<EmitterMetrics>) -> Self {
        self.outlet.metrics = Some(metrics);
        self
    }

    /// A new emitter for namespace `nsp` sharing this one's transport and metrics.
    pub fn of(&self, nsp: &str) -> Emitter {
        Emitter {
            outlet: Outlet {
                publisher: Arc::clone(&self.outlet.publisher),
                channels: Arc::new(self.outlet.channels.with_nsp(nsp)),
                metrics: self.outlet.metrics.clone(),
            },
        }
    }

    pub fn key(&self) -> &str {
        self.outlet.channels.key()
    }

    pub fn nsp(&self) -> &str {
        self.outlet.channels.nsp()
    }

    pub fn broadcast_channel(&self) -> &str {
        self.outlet.channels.broadcast()
    }

    pub fn request_channel(&self) -> &str {
        self.outlet.channels.request()
    }

    fn operator(&self) -> BroadcastOperator {
        BroadcastOperator::new(self.outlet.clone())
    }

    /// Emit to every client of the namespace.
    pub async fn emit<I>(&self, event: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        self.operator().emit(event, args).await
    }

    pub fn to<I, S>(&self, rooms: I) -> BroadcastOperator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operator().to(rooms)
    }

    pub fn in_rooms<I, S>(&self, rooms: I) -> BroadcastOperator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operator().in_rooms(rooms)
    }

    pub fn except<I, S>(&self, rooms: I) -> BroadcastOperator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operator().except(rooms)
    }

    pub fn volatile(&self) -> BroadcastOperator {
        self.operator().volatile()
    }

    pub fn compress(&self, compress: bool) -> BroadcastOperator {
        self.operator().compress(compress)
    }

    /// Make every socket of the namespace join `rooms`.
    pub async fn sockets_join<I, S>(&self, rooms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operator().sockets_join(rooms).await
    }

    /// Make every socket of the namespace leave `rooms`.
    pub async fn sockets_leave<I, S>(&self, rooms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operator().sockets_leave(rooms).await
    }

    pub async fn disconnect_sockets(&self, close: bool) -> Result<()> {
        self.operator().disconnect_sockets(close).await
    }

    pub async fn server_side_emit<I>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        self.operator().server_side_emit(args).await
    }
}
