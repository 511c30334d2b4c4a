//! Protocol modules (channel naming + Hot/Text lanes).
//!
//! This module hosts the two wire formats published onto the bus:
//! - Hot Lane: MessagePack broadcast envelopes carrying application events.
//! - Text Lane: JSON request envelopes carrying administrative commands.
//!
//! Both lanes are consumed byte-for-byte by unmodified receiving servers, so
//! field names, type codes, and channel names are fixed contracts.

pub mod channel;
pub mod hot;
pub mod text;
pub mod types;

pub use channel::NamespaceChannels;
pub use types::{PacketType, RequestType, ReservedEvent};
