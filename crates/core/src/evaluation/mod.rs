//! The metric evaluation engine.
//!
//! [`Evaluator`] takes one [`MetricSample`](crate::sample::MetricSample),
//! looks up the rules watching its metric, applies the cooldown gate and
//! comparator to each, and for every breach appends an event, records the
//! trigger time, and publishes the event.

pub mod engine;
pub mod error;
mod locks;
pub mod memory;
pub mod store;

pub use engine::{EvaluationReport, Evaluator, EvaluatorConfig, RuleOutcome};
pub use error::{EvaluationError, PublishError, StoreError};
pub use store::{EventLog, EventPublisher, RuleStore};
