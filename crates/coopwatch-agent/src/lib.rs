//! Coop monitoring agent: polls the dashboard readings, evaluates them and
//! keeps the alert log, with an optional control API.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod provider;
pub mod scheduler;
pub mod state;
