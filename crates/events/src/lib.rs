//! Tripwire notification bus.
//!
//! - [`EventBus`] -- in-process fan-out of stored [`AlertEvent`]s to live
//!   subscribers, backed by `tokio::sync::broadcast`.
//! - [`BusMessage`] -- the envelope subscribers forward to clients.
//!
//! [`AlertEvent`]: tripwire_core::alert::AlertEvent

pub mod bus;

pub use bus::{BusMessage, EventBus, DEFAULT_CAPACITY};
