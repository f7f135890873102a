use coopwatch_notify::engine::AlertEngine;
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<AlertEngine>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<Mutex<AlertEngine>>) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }
}
