//! Messenger-agnostic inbound/outbound shapes and the outbound port.

pub mod port;
pub mod types;
