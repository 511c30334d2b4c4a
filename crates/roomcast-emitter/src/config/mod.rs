//! Emitter config loader (strict parsing).

pub mod schema;

use std::fs;

use roomcast_core::error::{EmitterError, Result};

pub use schema::{EmitterConfig, EmitterOptions, RedisSection};

pub fn load_from_file(path: &str) -> Result<EmitterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| EmitterError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<EmitterConfig> {
    let cfg: EmitterConfig = serde_yaml::from_str(s)
        .map_err(|e| EmitterError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
