use crate::engine::AlertEngine;
use crate::error::{NotifyError, Result};
use crate::render::{RenderView, Renderer};
use crate::sinks::webhook::WebhookSink;
use crate::utils::truncate_string;
use crate::{NotificationSink, SinkResponse};
use async_trait::async_trait;
use coopwatch_alert::log::AlertLog;
use coopwatch_storage::{MemoryNotificationStore, NotificationStore, StorageError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingRenderer {
    views: Mutex<Vec<RenderView>>,
}

impl RecordingRenderer {
    fn count(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    fn last(&self) -> RenderView {
        self.views.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, view: &RenderView) {
        self.views.lock().unwrap().push(view.clone());
    }
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl RecordingSink {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<Vec<String>> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, notifications: &[String]) -> Result<SinkResponse> {
        self.sent.lock().unwrap().push(notifications.to_vec());
        if self.fail {
            return Err(NotifyError::ApiError {
                service: "test".into(),
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(SinkResponse::default())
    }

    fn sink_name(&self) -> &str {
        "recording"
    }
}

/// Store whose availability can be toggled.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryNotificationStore,
    down: AtomicBool,
}

impl FlakyStore {
    fn down(entries: Vec<String>) -> Self {
        Self {
            inner: MemoryNotificationStore::with_entries(entries),
            down: AtomicBool::new(true),
        }
    }

    fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> coopwatch_storage::Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("store offline")));
        }
        Ok(())
    }
}

impl NotificationStore for FlakyStore {
    fn load(&self) -> coopwatch_storage::Result<Vec<String>> {
        self.check()?;
        self.inner.load()
    }

    fn save(&self, entries: &[String]) -> coopwatch_storage::Result<()> {
        self.check()?;
        self.inner.save(entries)
    }
}

fn s(items: &[&str]) -> Vec<String> {
    items.iter().map(|m| m.to_string()).collect()
}

struct Harness {
    store: Arc<MemoryNotificationStore>,
    renderer: Arc<RecordingRenderer>,
    sink: Arc<RecordingSink>,
    engine: AlertEngine,
}

fn harness(persisted: &[&str]) -> Harness {
    let store = Arc::new(MemoryNotificationStore::with_entries(s(persisted)));
    let renderer = Arc::new(RecordingRenderer::default());
    let sink = Arc::new(RecordingSink::default());
    let mut engine = AlertEngine::new(store.clone(), renderer.clone()).with_sink(sink.clone());
    engine.load();
    Harness {
        store,
        renderer,
        sink,
        engine,
    }
}

const FOOD_LOW: &str = "Food level is low. Consider refilling soon.";
const LIGHT_ON: &str = "Light 1 is turned ON.";

#[tokio::test]
async fn load_renders_without_dispatch() {
    let h = harness(&["a", "b", "a"]);
    assert_eq!(h.engine.log().entries(), ["a", "b"]);
    assert_eq!(h.renderer.count(), 1);
    assert_eq!(h.renderer.last().count, 2);
    tokio::task::yield_now().await;
    assert!(h.sink.sent().is_empty());
}

#[tokio::test]
async fn record_persists_renders_and_dispatches_full_log() {
    let mut h = harness(&["old"]);
    let outcome = h.engine.record(s(&["new", "old"]));

    assert_eq!(outcome.added, s(&["new"]));
    assert!(outcome.persisted);
    outcome.dispatch.expect("dispatch started").await.unwrap();

    assert_eq!(h.store.snapshot(), s(&["old", "new"]));
    assert_eq!(h.renderer.last().entries, s(&["old", "new"]));
    assert_eq!(h.sink.sent(), vec![s(&["old", "new"])]);
}

#[tokio::test]
async fn record_empty_delta_is_noop() {
    let mut h = harness(&["a"]);
    let renders = h.renderer.count();

    let outcome = h.engine.record(Vec::<String>::new());
    assert!(outcome.added.is_empty());
    assert!(outcome.dispatch.is_none());

    let outcome = h.engine.record(s(&["a"]));
    assert!(outcome.dispatch.is_none());
    assert!(!outcome.persisted);

    assert_eq!(h.renderer.count(), renders);
    assert!(h.sink.sent().is_empty());
}

#[tokio::test]
async fn same_message_across_cycles_is_kept_once() {
    let mut h = harness(&[]);
    h.engine.record(s(&[LIGHT_ON]));
    let second = h.engine.record(s(&[LIGHT_ON]));

    assert!(second.added.is_empty());
    assert_eq!(h.engine.log().entries(), [LIGHT_ON]);
    assert_eq!(h.store.snapshot(), s(&[LIGHT_ON]));
}

#[tokio::test]
async fn mark_read_removes_and_shrinks_summary() {
    let mut h = harness(&["a", FOOD_LOW, "b"]);
    assert_eq!(h.engine.view().count, 3);

    let removed = h.engine.mark_read(FOOD_LOW);
    assert_eq!(removed, 1);
    assert!(!h.engine.log().contains(FOOD_LOW));
    assert_eq!(h.store.snapshot(), s(&["a", "b"]));

    let view = h.renderer.last();
    assert_eq!(view.count, 2);
    assert_eq!(view.recent, s(&["b", "a"]));
    tokio::task::yield_now().await;
    assert!(h.sink.sent().is_empty());
}

#[tokio::test]
async fn mark_read_then_record_readds() {
    let mut h = harness(&[FOOD_LOW]);
    h.engine.mark_read(FOOD_LOW);
    let outcome = h.engine.record(s(&[FOOD_LOW]));
    assert_eq!(outcome.added, s(&[FOOD_LOW]));
    assert_eq!(h.engine.log().entries(), [FOOD_LOW]);
}

#[tokio::test]
async fn sink_failure_does_not_affect_log() {
    let store = Arc::new(MemoryNotificationStore::new());
    let renderer = Arc::new(RecordingRenderer::default());
    let sink = Arc::new(RecordingSink::failing());
    let mut engine = AlertEngine::new(store.clone(), renderer).with_sink(sink.clone());
    engine.load();

    engine.record(s(&["x"])).dispatch.unwrap().await.unwrap();
    engine.record(s(&["y"])).dispatch.unwrap().await.unwrap();

    assert_eq!(sink.sent().len(), 2);
    assert_eq!(store.snapshot(), s(&["x", "y"]));
}

#[test]
fn record_without_runtime_skips_dispatch() {
    let mut h = harness(&[]);
    let outcome = h.engine.record(s(&["x"]));
    assert!(outcome.dispatch.is_none());
    assert!(outcome.persisted);
    assert!(h.sink.sent().is_empty());
}

#[test]
fn unavailable_store_starts_empty_then_reconciles() {
    let store = Arc::new(FlakyStore::down(s(&["persisted"])));
    let renderer = Arc::new(RecordingRenderer::default());
    let mut engine = AlertEngine::new(store.clone(), renderer.clone());

    engine.load();
    assert!(engine.log().is_empty());
    assert!(!engine.is_synced());

    let outcome = engine.record(s(&["fresh"]));
    assert!(!outcome.persisted);
    assert_eq!(engine.log().entries(), ["fresh"]);

    store.set_down(false);
    let outcome = engine.record(s(&["later"]));
    assert!(outcome.persisted);
    assert!(engine.is_synced());
    assert_eq!(engine.log().entries(), ["persisted", "fresh", "later"]);
    assert_eq!(store.inner.snapshot(), s(&["persisted", "fresh", "later"]));
    assert_eq!(renderer.last().count, 3);
}

#[test]
fn reconcile_without_delta_persists_and_renders() {
    let store = Arc::new(FlakyStore::down(s(&["persisted"])));
    let renderer = Arc::new(RecordingRenderer::default());
    let mut engine = AlertEngine::new(store.clone(), renderer.clone());
    engine.load();
    let renders = renderer.count();

    store.set_down(false);
    let outcome = engine.record(Vec::<String>::new());
    assert!(outcome.added.is_empty());
    assert!(outcome.persisted);
    assert_eq!(renderer.count(), renders + 1);
    assert_eq!(engine.log().entries(), ["persisted"]);
}

#[test]
fn save_failure_keeps_in_memory_log() {
    let store = Arc::new(FlakyStore::default());
    let renderer = Arc::new(RecordingRenderer::default());
    let mut engine = AlertEngine::new(store.clone(), renderer);
    engine.load();
    assert!(engine.is_synced());

    store.set_down(true);
    let outcome = engine.record(s(&["a"]));
    assert!(!outcome.persisted);
    assert_eq!(engine.log().entries(), ["a"]);

    store.set_down(false);
    engine.record(s(&["b"]));
    assert_eq!(store.inner.snapshot(), s(&["a", "b"]));
}

#[tokio::test]
async fn failed_save_is_retried_when_same_alerts_repeat() {
    let store = Arc::new(FlakyStore::default());
    let sink = Arc::new(RecordingSink::default());
    let mut engine = AlertEngine::new(store.clone(), Arc::new(RecordingRenderer::default()))
        .with_sink(sink.clone());
    engine.load();

    store.set_down(true);
    let first = engine.record(s(&["a"]));
    assert_eq!(first.added, s(&["a"]));
    assert!(!first.persisted);
    assert!(first.dispatch.is_none());
    assert!(engine.is_dirty());

    store.set_down(false);
    let second = engine.record(s(&["a"]));
    assert!(second.added.is_empty());
    assert!(second.persisted);
    assert!(!engine.is_dirty());
    second.dispatch.expect("pending dispatch").await.unwrap();
    assert_eq!(store.inner.snapshot(), s(&["a"]));
    assert_eq!(sink.sent(), vec![s(&["a"])]);

    let third = engine.record(s(&["a"]));
    assert!(!third.persisted);
    assert!(third.dispatch.is_none());
    assert_eq!(sink.sent().len(), 1);
}

#[test]
fn failed_save_is_retried_by_mark_read() {
    let store = Arc::new(FlakyStore::default());
    let mut engine = AlertEngine::new(store.clone(), Arc::new(RecordingRenderer::default()));
    engine.load();

    store.set_down(true);
    engine.record(s(&["a", "b"]));
    assert!(engine.is_dirty());

    store.set_down(false);
    assert_eq!(engine.mark_read("a"), 1);
    assert!(!engine.is_dirty());
    assert_eq!(store.inner.snapshot(), s(&["b"]));
}

#[test]
fn summary_limit_caps_recent_view() {
    let log = AlertLog::from_entries(s(&["1", "2", "3", "4"]));
    let view = RenderView::project(&log, 3);
    assert_eq!(view.recent, s(&["4", "3", "2"]));
    assert_eq!(view.entries.len(), 4);
    assert_eq!(view.count, 4);

    let store = Arc::new(MemoryNotificationStore::with_entries(s(&["1", "2"])));
    let mut engine =
        AlertEngine::new(store, Arc::new(RecordingRenderer::default())).with_summary_limit(1);
    engine.load();
    assert_eq!(engine.view().recent, s(&["2"]));
}

#[test]
fn truncate_respects_char_boundaries() {
    assert_eq!(truncate_string("short", 10), "short");
    assert_eq!(truncate_string("°°°", 3), "°... [truncated]");
}

#[test]
fn webhook_rejects_empty_url() {
    let err = WebhookSink::new("  ", Duration::from_secs(1)).err().unwrap();
    assert!(matches!(err, NotifyError::InvalidConfig(_)));
}

#[tokio::test]
async fn webhook_posts_notifications_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/notifications")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "notifications": [LIGHT_ON, FOOD_LOW]
        })))
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let sink = WebhookSink::new(
        &format!("{}/api/notifications", server.url()),
        Duration::from_secs(5),
    )
    .unwrap();
    let resp = sink.send(&s(&[LIGHT_ON, FOOD_LOW])).await.unwrap();

    assert_eq!(resp.http_status, Some(200));
    assert_eq!(resp.response_body.as_deref(), Some(r#"{"status":"ok"}"#));
    mock.assert_async().await;
}

#[tokio::test]
async fn webhook_non_success_is_error_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(503)
        .with_body("unavailable")
        .expect(1)
        .create_async()
        .await;

    let sink = WebhookSink::new(&server.url(), Duration::from_secs(5)).unwrap();
    let err = sink.send(&s(&["x"])).await.unwrap_err();

    match err {
        NotifyError::ApiError { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
    mock.assert_async().await;
}
