//! Redis pub/sub transport.
//!
//! Holds `pool_size` multiplexed connections and publishes round-robin across
//! them. `read_timeout_secs` bounds both connecting and each `PUBLISH`
//! round-trip; `0` disables the timeout.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::MultiplexedConnection;
use redis::{Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError};

use roomcast_core::{EmitterError, Result};

use super::Publisher;
use crate::config::RedisSection;

fn transport(e: RedisError) -> EmitterError {
    EmitterError::Transport(e.to_string())
}

/// `host:port` plus optional password, as the redis client expects it.
pub fn connection_info(cfg: &RedisSection) -> Result<ConnectionInfo> {
    let (host, port) = cfg
        .address
        .rsplit_once(':')
        .ok_or_else(|| EmitterError::BadConfig(format!("redis.address must be host:port, got {}", cfg.address)))?;
    let port: u16 = port
        .parse()
        .map_err(|e| EmitterError::BadConfig(format!("redis.address has invalid port: {e}")))?;
    if host.is_empty() {
        return Err(EmitterError::BadConfig("redis.address is missing a host".into()));
    }

    Ok(ConnectionInfo {
        addr: ConnectionAddr::Tcp(host.to_string(), port),
        redis: RedisConnectionInfo {
            password: cfg.password.clone(),
            ..Default::default()
        },
    })
}

pub struct RedisPublisher {
    pool: Vec<MultiplexedConnection>,
    next: AtomicUsize,
}

impl RedisPublisher {
    /// Open the connection pool described by `cfg`.
    pub async fn connect(cfg: &RedisSection) -> Result<Self> {
        cfg.validate()?;
        let client = Client::open(connection_info(cfg)?).map_err(transport)?;

        let mut pool = Vec::with_capacity(cfg.pool_size as usize);
        for _ in 0..cfg.pool_size {
            let conn = if cfg.read_timeout_secs == 0 {
                client.get_multiplexed_async_connection().await
            } else {
                let timeout = Duration::from_secs(cfg.read_timeout_secs);
                client
                    .get_multiplexed_async_connection_with_timeouts(timeout, timeout)
                    .await
            };
            pool.push(conn.map_err(transport)?);
        }

        tracing::info!(address = %cfg.address, pool_size = cfg.pool_size, "redis publisher connected");
        Ok(Self {
            pool,
            next: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Publisher for RedisPublisher {
    async fn publish(&self, channel: &str, payload: Bytes) -> Result<()> {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.pool.len().max(1);
        let mut conn = self
            .pool
            .get(idx)
            .cloned()
            .ok_or_else(|| EmitterError::Transport("redis pool is empty".into()))?;

        // Reply is the number of subscribers that received the message.
        let _receivers: i64 = redis::cmd("PUBLISH")
            .arg(channel)
            .arg(&payload[..])
            .query_async(&mut conn)
            .await
            .map_err(transport)?;
        Ok(())
    }
}
