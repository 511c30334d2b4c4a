//! roomcast emitter library entry.
//!
//! Publishes events and administrative requests for a cluster of realtime
//! servers without holding any client connections. `Emitter` scopes calls to
//! a namespace, `BroadcastOperator` carries per-call targeting, and
//! `Publisher` is the seam to the pub/sub transport.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod broadcast;
pub mod config;
pub mod emitter;
pub mod obs;
pub mod publish;

pub use broadcast::BroadcastOperator;
pub use config::{EmitterConfig, EmitterOptions};
pub use emitter::Emitter;
pub use obs::EmitterMetrics;
pub use publish::{MemoryPublisher, Published, Publisher};
#[cfg(feature = "redis")]
pub use publish::RedisPublisher;

pub use roomcast_core::protocol::hot::to_arg;
pub use roomcast_core::{EmitterError, ErrorKind, Result};
/// Event argument value (MessagePack data model).
pub use rmpv::Value;
