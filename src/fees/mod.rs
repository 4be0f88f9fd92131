//! Fee Rule Engine Module
//!
//! Decides which merchant-defined fees apply to a cart:
//! - Rule, condition and output models
//! - Comparison utilities and typed predicates
//! - Condition evaluation and AND/OR folding
//! - Fee amount calculation and the resolution pipeline
//! - Rule set summaries and listing order
//! - REST API handlers for rule authoring
//!
//! Everything except `handlers` is pure and synchronous.

pub mod calculator;
pub mod compare;
pub mod condition;
pub mod evaluator;
pub mod handlers;
pub mod models;
pub mod stats;

// Re-export commonly used types and functions
pub use calculator::{applicable_fees, calculate_fee_amount};
pub use evaluator::{evaluate, evaluate_group, evaluate_rule};
pub use handlers::routes;
pub use models::{ApplicableFee, Condition, ConditionGroup, FeeRule};
