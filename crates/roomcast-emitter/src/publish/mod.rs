//! Transport seam: where encoded envelopes leave the process.
//!
//! The emitter only needs `publish(channel, bytes)`. Connection pooling,
//! TLS, retries and timeouts belong to the implementation behind the trait.

mod memory;
#[cfg(feature = "redis")]
mod redis_bus;

use async_trait::async_trait;
use bytes::Bytes;

use roomcast_core::Result;

pub use memory::{MemoryPublisher, Published};
#[cfg(feature = "redis")]
pub use redis_bus::{connection_info, RedisPublisher};

/// Pub/sub client the emitter publishes through.
///
/// Implementations must be safe to share between concurrent publishes and
/// should report failures as `EmitterError::Transport`; the emitter passes
/// the error to its caller unchanged.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, channel: &str, payload: Bytes) -> Result<()>;
}
