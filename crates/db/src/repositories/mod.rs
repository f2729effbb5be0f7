//! Repository layer: one zero-sized struct per table with async query functions.

pub mod alert_event_repo;
pub mod alert_repo;

pub use alert_event_repo::AlertEventRepo;
pub use alert_repo::AlertRepo;
