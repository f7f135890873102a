use coopwatch_alert::log::AlertLog;
use serde::Serialize;

/// Number of entries in the compact summary.
pub const DEFAULT_SUMMARY_LIMIT: usize = 3;

/// What a display needs from the alert log.
///
/// `entries` is the full log in arrival order, `recent` the newest
/// `summary_limit` entries newest first, `count` the total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderView {
    pub entries: Vec<String>,
    pub recent: Vec<String>,
    pub count: usize,
}

impl RenderView {
    pub fn project(log: &AlertLog, summary_limit: usize) -> Self {
        Self {
            entries: log.entries().to_vec(),
            recent: log.recent(summary_limit),
            count: log.len(),
        }
    }
}

/// Render callback invoked after every change of the alert log.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &RenderView);
}

/// Writes the summary to the log output.
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&self, view: &RenderView) {
        if view.count == 0 {
            tracing::info!("No new notifications");
            return;
        }
        tracing::info!(
            count = view.count,
            recent = ?view.recent,
            "Notifications updated"
        );
    }
}
