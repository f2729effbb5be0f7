//! Live notification delivery.
//!
//! The [`AlertRelay`] subscribes to the event bus and forwards every breach
//! to connected WebSocket clients.

pub mod relay;

pub use relay::AlertRelay;
