#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use coopwatch_agent::app;
use coopwatch_agent::provider::ReadingsProvider;
use coopwatch_agent::state::AppState;
use coopwatch_common::types::Readings;
use coopwatch_notify::engine::AlertEngine;
use coopwatch_notify::render::LogRenderer;
use coopwatch_storage::sqlite::SqliteNotificationStore;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestContext {
    pub temp_dir: TempDir,
    pub store: Arc<SqliteNotificationStore>,
    pub engine: Arc<Mutex<AlertEngine>>,
    pub app: axum::Router,
}

pub fn build_test_context(persisted: &[&str]) -> Result<TestContext> {
    let temp_dir = tempfile::tempdir()?;
    let store = Arc::new(SqliteNotificationStore::open(
        temp_dir.path().join("notifications.db"),
    )?);
    if !persisted.is_empty() {
        let entries: Vec<String> = persisted.iter().map(|m| m.to_string()).collect();
        coopwatch_storage::NotificationStore::save(store.as_ref(), &entries)?;
    }

    let mut engine = AlertEngine::new(store.clone(), Arc::new(LogRenderer));
    engine.load();
    let engine = Arc::new(Mutex::new(engine));
    let app = app::build_http_app(AppState::new(engine.clone()));

    Ok(TestContext {
        temp_dir,
        store,
        engine,
        app,
    })
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.unwrap_or(Value::Null).to_string()))
        .expect("request should build");
    send(app, req).await
}

pub async fn request_raw(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: &str,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, req).await
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, req).await
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
}

/// Provider replaying a queue of snapshots; `None` entries fail the fetch.
/// The last snapshot repeats once the queue is drained.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Option<Readings>>>,
    last: Mutex<Option<Readings>>,
    delay: Duration,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Option<Readings>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ReadingsProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self) -> Result<Readings> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        let snapshot = match next {
            Some(step) => {
                *self.last.lock().unwrap() = step.clone();
                step
            }
            None => self.last.lock().unwrap().clone(),
        };
        snapshot.ok_or_else(|| anyhow::anyhow!("sensor feed offline"))
    }
}
