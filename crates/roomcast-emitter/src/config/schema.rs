use serde::Deserialize;

use roomcast_core::error::{EmitterError, Result};
use roomcast_core::protocol::channel::{normalize_nsp, DEFAULT_KEY, DEFAULT_NSP};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitterConfig {
    pub version: u32,

    #[serde(default = "default_key")]
    pub key: String,

    #[serde(default = "default_nsp")]
    pub nsp: String,

    /// Handed to whoever builds the `Publisher`; the emitter never reads it.
    #[serde(default)]
    pub redis: RedisSection,
}

impl EmitterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(EmitterError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        validate_key(&self.key)?;
        self.redis.validate()?;
        Ok(())
    }

    pub fn emitter_options(&self) -> EmitterOptions {
        EmitterOptions {
            key: self.key.clone(),
            nsp: normalize_nsp(&self.nsp),
        }
    }
}

// `#` separates channel segments.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(EmitterError::BadConfig("key must not be empty".into()));
    }
    if key.contains('#') {
        return Err(EmitterError::BadConfig("key must not contain '#'".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisSection {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for RedisSection {
    fn default() -> Self {
        Self {
            address: default_address(),
            password: None,
            read_timeout_secs: default_read_timeout_secs(),
            pool_size: default_pool_size(),
        }
    }
}

impl RedisSection {
    pub fn validate(&self) -> Result<()> {
        if self.address.is_empty() {
            return Err(EmitterError::BadConfig("redis.address must not be empty".into()));
        }
        if self.pool_size == 0 {
            return Err(EmitterError::BadConfig("redis.pool_size must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_key() -> String {
    DEFAULT_KEY.into()
}
fn default_nsp() -> String {
    DEFAULT_NSP.into()
}
fn default_address() -> String {
    "127.0.0.1:6379".into()
}
fn default_read_timeout_secs() -> u64 {
    3
}
fn default_pool_size() -> u32 {
    10
}

/// In-code emitter options: application key and namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterOptions {
    pub key: String,
    pub nsp: String,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            key: default_key(),
            nsp: default_nsp(),
        }
    }
}
