//! roomcast core: wire contracts for emitting into a cluster of realtime servers.
//!
//! This crate defines the channel naming rules, the binary broadcast envelope,
//! the JSON request envelopes, and the error surface shared by the emitter and
//! any tooling that needs to produce or inspect bus traffic. It carries no
//! transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `EmitterError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{EmitterError, ErrorKind, Result};

/// Sender identifier stamped on every message produced by an emitter.
///
/// Receivers compare it against their own id to ignore self-originated
/// server-side emits.
pub const EMITTER_UID: &str = "emitter";
