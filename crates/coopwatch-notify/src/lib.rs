//! Alert log ownership and delivery.
//!
//! The [`engine::AlertEngine`] owns the deduplicated alert log: it merges
//! newly produced messages, persists through a
//! [`coopwatch_storage::NotificationStore`], hands a [`render::RenderView`]
//! to a [`render::Renderer`] and forwards the full log to a
//! [`NotificationSink`] on a fire-and-forget task.

pub mod engine;
pub mod error;
pub mod render;
pub mod sinks;
pub mod utils;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use error::Result;

/// Outcome of one sink delivery, kept for logging.
#[derive(Debug, Clone, Default)]
pub struct SinkResponse {
    pub http_status: Option<u16>,
    pub response_body: Option<String>,
}

/// A remote receiver of the full alert log.
///
/// Delivery is best-effort and at-most-once per call: implementations must
/// not retry, and the engine never awaits the result in the caller's path.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sends the complete current log.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    async fn send(&self, notifications: &[String]) -> Result<SinkResponse>;

    /// Returns the sink type name (e.g., `"webhook"`).
    fn sink_name(&self) -> &str;
}
