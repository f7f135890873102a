use crate::provider::ReadingsProvider;
use coopwatch_alert::evaluator::Evaluator;
use coopwatch_notify::engine::AlertEngine;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::time::{interval, Duration, MissedTickBehavior};

/// What a single monitoring cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// Another cycle was still in flight.
    Skipped,
    /// Readings could not be fetched; nothing was recorded.
    ProviderFailed,
    /// The record task did not complete.
    RecordFailed,
    /// Readings were evaluated and recorded.
    Completed { alerts: usize, added: usize },
}

/// Periodically fetches readings, evaluates them and records the alerts.
pub struct MonitorScheduler {
    provider: Arc<dyn ReadingsProvider>,
    evaluator: Arc<Evaluator>,
    engine: Arc<Mutex<AlertEngine>>,
    interval_ms: u64,
    cycle_guard: tokio::sync::Mutex<()>,
}

impl MonitorScheduler {
    pub fn new(
        provider: Arc<dyn ReadingsProvider>,
        evaluator: Arc<Evaluator>,
        engine: Arc<Mutex<AlertEngine>>,
        interval_ms: u64,
    ) -> Self {
        Self {
            provider,
            evaluator,
            engine,
            interval_ms,
            cycle_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Runs a cycle on every tick until `shutdown` resolves. The first cycle
    /// runs immediately.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            interval_ms = self.interval_ms,
            provider = self.provider.name(),
            checkers = self.evaluator.checkers().len(),
            "Monitor scheduler started"
        );

        let mut tick = interval(Duration::from_millis(self.interval_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.run_cycle().await;
                }
                _ = &mut shutdown => {
                    tracing::info!("Monitor scheduler stopped");
                    break;
                }
            }
        }
    }

    /// Fetch, evaluate and record once. Overlapping calls are skipped.
    pub async fn run_cycle(&self) -> CycleReport {
        let Ok(_guard) = self.cycle_guard.try_lock() else {
            tracing::warn!("Previous check cycle still running, skipping");
            return CycleReport::Skipped;
        };

        let readings = match self.provider.fetch().await {
            Ok(readings) => readings,
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Failed to fetch readings");
                return CycleReport::ProviderFailed;
            }
        };
        tracing::debug!(count = readings.len(), "Readings fetched");

        let alerts = self.evaluator.evaluate(&readings);
        let alert_count = alerts.len();

        // record writes through to SQLite
        let engine = self.engine.clone();
        let outcome = match tokio::task::spawn_blocking(move || {
            let mut engine = engine
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            engine.record(alerts)
        })
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Record task failed");
                return CycleReport::RecordFailed;
            }
        };

        tracing::debug!(
            alerts = alert_count,
            added = outcome.added.len(),
            "Check cycle completed"
        );

        CycleReport::Completed {
            alerts: alert_count,
            added: outcome.added.len(),
        }
    }
}
