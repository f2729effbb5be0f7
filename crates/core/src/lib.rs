//! Domain types and the threshold evaluation engine.
//!
//! Nothing in this crate touches a database or the network. Storage and
//! notification plug in through the traits in [`evaluation::store`].

pub mod alert;
pub mod comparator;
pub mod cooldown;
pub mod error;
pub mod evaluation;
pub mod pagination;
pub mod sample;
pub mod types;
pub mod validation;
