//! Alert checkers for coop readings.
//!
//! Each [`Checker`] maps the current readings to zero or more alert
//! messages. Built-in checkers cover the environment (temperature,
//! humidity, ammonia), supply levels (water, food) and device status
//! (lights, exhaust fan). The [`evaluator::Evaluator`] runs a set of
//! checkers in order; the resulting messages are merged into an
//! [`log::AlertLog`], which deduplicates by exact message text.

pub mod evaluator;
pub mod log;
pub mod rules;


use coopwatch_common::types::ReadingSource;

/// A stateless rule set that turns readings into alert messages.
///
/// Evaluation must be pure: calling [`Checker::evaluate`] twice with the
/// same readings yields the same messages in the same order. Missing or
/// unparsable readings skip the affected rules and never fail the call.
pub trait Checker: Send + Sync {
    /// Checker name used in diagnostics (e.g., `"environment"`).
    fn name(&self) -> &str;

    /// Evaluates all rules of this checker against `readings`.
    fn evaluate(&self, readings: &dyn ReadingSource) -> Vec<String>;
}
