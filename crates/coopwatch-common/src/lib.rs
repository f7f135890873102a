//! Shared reading model for the coopwatch agent.
//!
//! Sensor and device values are carried as [`types::ReadingValue`]s inside a
//! [`types::Readings`] snapshot. Checkers only see readings through the
//! [`types::ReadingSource`] trait, so any adapter (HTTP payload, scraped
//! dashboard text, test double) can feed them.

pub mod types;
