use crate::render::{RenderView, Renderer, DEFAULT_SUMMARY_LIMIT};
use crate::NotificationSink;
use coopwatch_alert::log::AlertLog;
use coopwatch_storage::NotificationStore;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Result of [`AlertEngine::record`].
#[derive(Debug, Default)]
pub struct RecordOutcome {
    /// Messages that were not yet in the log, in arrival order.
    pub added: Vec<String>,
    /// Whether the log was written to the store.
    pub persisted: bool,
    /// The detached sink delivery, if one was started. Delivery only follows
    /// a successful write to the store.
    pub dispatch: Option<JoinHandle<()>>,
}

/// Owner of the alert log.
///
/// All mutation goes through [`load`](Self::load), [`record`](Self::record)
/// and [`mark_read`](Self::mark_read). Every mutation is written through to
/// the store before it is rendered. Callers sharing an engine between tasks
/// must serialize access (the agent keeps it behind a mutex).
pub struct AlertEngine {
    log: AlertLog,
    /// Whether the persisted log has been read successfully.
    synced: bool,
    /// The last write to the store failed; the next mutation rewrites the log.
    dirty: bool,
    /// Messages were added that the sink has not been sent yet.
    undelivered: bool,
    store: Arc<dyn NotificationStore>,
    renderer: Arc<dyn Renderer>,
    sink: Option<Arc<dyn NotificationSink>>,
    summary_limit: usize,
}

impl AlertEngine {
    pub fn new(store: Arc<dyn NotificationStore>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            log: AlertLog::new(),
            synced: false,
            dirty: false,
            undelivered: false,
            store,
            renderer,
            sink: None,
            summary_limit: DEFAULT_SUMMARY_LIMIT,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_summary_limit(mut self, limit: usize) -> Self {
        self.summary_limit = limit;
        self
    }

    pub fn log(&self) -> &AlertLog {
        &self.log
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Whether a failed write is waiting to be retried.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn view(&self) -> RenderView {
        RenderView::project(&self.log, self.summary_limit)
    }

    /// Reads the persisted log and renders it. Nothing is sent to the sink.
    ///
    /// If the store is unavailable the log starts empty; later mutations
    /// retry the store before applying their change.
    pub fn load(&mut self) {
        match self.store.load() {
            Ok(entries) => {
                self.log = AlertLog::from_entries(entries);
                self.synced = true;
                tracing::info!(count = self.log.len(), "Notifications loaded");
            }
            Err(e) => {
                self.log = AlertLog::new();
                self.synced = false;
                tracing::warn!(error = %e, "Notification store unavailable, starting with empty log");
            }
        }
        self.render();
    }

    /// Appends every message not already in the log, persists, renders and
    /// forwards the full log to the sink.
    ///
    /// An empty delta is a no-op: nothing is persisted, rendered or sent,
    /// unless earlier work is pending. A changed log from store
    /// reconciliation, or a write that failed earlier, is persisted and
    /// rendered. Messages added while the store was failing are sent once a
    /// write succeeds.
    pub fn record<I>(&mut self, messages: I) -> RecordOutcome
    where
        I: IntoIterator<Item = String>,
    {
        let reconciled = self.reconcile();
        let added = self.log.merge(messages);

        if added.is_empty() && !reconciled && !self.dirty && !self.undelivered {
            return RecordOutcome::default();
        }

        if !added.is_empty() {
            tracing::info!(added = added.len(), total = self.log.len(), "New notifications recorded");
            self.undelivered = true;
        }

        let persisted = self.persist();
        self.render();

        let dispatch = if persisted && self.undelivered {
            self.undelivered = false;
            self.dispatch()
        } else {
            None
        };

        RecordOutcome {
            added,
            persisted,
            dispatch,
        }
    }

    /// Removes every entry equal to `message`, persists and re-renders.
    /// Returns the number of entries removed.
    pub fn mark_read(&mut self, message: &str) -> usize {
        self.reconcile();
        let removed = self.log.remove(message);
        tracing::debug!(removed, "Notification marked as read");
        self.persist();
        self.render();
        removed
    }

    /// Retries the store while unsynced. Persisted entries come first,
    /// followed by in-memory entries the store did not have. Returns whether
    /// the log changed.
    fn reconcile(&mut self) -> bool {
        if self.synced {
            return false;
        }
        match self.store.load() {
            Ok(entries) => {
                let mut merged = AlertLog::from_entries(entries);
                merged.merge(self.log.entries().iter().cloned());
                let changed = merged != self.log;
                self.log = merged;
                self.synced = true;
                tracing::info!(count = self.log.len(), "Notification store reconciled");
                changed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Notification store still unavailable");
                false
            }
        }
    }

    fn persist(&mut self) -> bool {
        match self.store.save(self.log.entries()) {
            Ok(()) => {
                if self.dirty {
                    tracing::info!(count = self.log.len(), "Pending notifications persisted");
                }
                self.dirty = false;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist notifications, retrying on next change");
                self.dirty = true;
                false
            }
        }
    }

    fn render(&self) {
        self.renderer.render(&self.view());
    }

    /// Starts a detached delivery of the full log. The outcome is only
    /// logged; it never feeds back into the engine.
    fn dispatch(&self) -> Option<JoinHandle<()>> {
        let sink = self.sink.clone()?;

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(sink = sink.sink_name(), "No async runtime, notification dispatch skipped");
                return None;
            }
        };

        let notifications = self.log.entries().to_vec();
        Some(handle.spawn(async move {
            match sink.send(&notifications).await {
                Ok(resp) => tracing::info!(
                    sink = sink.sink_name(),
                    count = notifications.len(),
                    status = ?resp.http_status,
                    body = resp.response_body.as_deref().unwrap_or(""),
                    "Notifications sent"
                ),
                Err(e) => tracing::error!(
                    sink = sink.sink_name(),
                    error = %e,
                    "Failed to send notifications"
                ),
            }
        }))
    }
}
