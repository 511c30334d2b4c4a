//! Channel naming for one namespace of one application key.
//!
//! - broadcast: `{key}#{nsp}#`
//! - single room: `{key}#{nsp}#{room}#`
//! - requests: `{key}-request#{nsp}#`

/// Default application key shared with the receiving servers.
pub const DEFAULT_KEY: &str = "socket.io";
/// Default (root) namespace.
pub const DEFAULT_NSP: &str = "/";

/// Prefix `/` unless already present.
pub fn normalize_nsp(nsp: &str) -> String {
    if nsp.starts_with('/') {
        nsp.to_string()
    } else {
        format!("/{nsp}")
    }
}

/// Immutable channel names derived from a key and a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceChannels {
    key: String,
    nsp: String,
    broadcast: String,
    request: String,
}

impl NamespaceChannels {
    pub fn new(key: &str, nsp: &str) -> Self {
        let nsp = normalize_nsp(nsp);
        Self {
            broadcast: format!("{key}#{nsp}#"),
            request: format!("{key}-request#{nsp}#"),
            key: key.to_string(),
            nsp,
        }
    }

    /// Same key, different namespace. `self` is left untouched.
    pub fn with_nsp(&self, nsp: &str) -> Self {
        Self::new(&self.key, nsp)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn nsp(&self) -> &str {
        &self.nsp
    }

    pub fn broadcast(&self) -> &str {
        &self.broadcast
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    /// Fast-path channel for a broadcast targeting exactly one room.
    pub fn room(&self, room: &str) -> String {
        format!("{}{room}#", self.broadcast)
    }
}

impl Default for NamespaceChannels {
    fn default() -> Self {
        Self::new(DEFAULT_KEY, DEFAULT_NSP)
    }
}
