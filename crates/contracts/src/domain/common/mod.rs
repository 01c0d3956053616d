//! Common types shared by all aggregates

pub mod action_result;
pub mod aggregate_id;
pub mod validation;

// Re-exports
pub use action_result::ActionResult;
pub use aggregate_id::AggregateId;
pub use validation::ValidationErrors;
