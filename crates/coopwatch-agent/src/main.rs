use anyhow::Result;
use coopwatch_agent::app;
use coopwatch_agent::config::AgentConfig;
use coopwatch_agent::provider::HttpReadingsProvider;
use coopwatch_agent::scheduler::MonitorScheduler;
use coopwatch_agent::state::AppState;
use coopwatch_alert::evaluator::Evaluator;
use coopwatch_notify::engine::AlertEngine;
use coopwatch_notify::render::LogRenderer;
use coopwatch_notify::sinks::webhook::WebhookSink;
use coopwatch_storage::sqlite::SqliteNotificationStore;
use coopwatch_storage::NotificationStore;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  coopwatch-agent [config.toml]          Start monitoring");
    eprintln!("  coopwatch-agent list <config.toml>     Print the persisted alert log");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("coopwatch=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("list") => {
            let config_path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("list requires <config.toml> argument")
            })?;
            run_list(config_path)
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config_path = args
                .get(1)
                .map(|s| s.as_str())
                .unwrap_or("config/agent.toml");
            run_agent(config_path).await
        }
    }
}

#[allow(clippy::print_stdout)]
fn run_list(config_path: &str) -> Result<()> {
    let config = AgentConfig::load(config_path)?;
    let store = SqliteNotificationStore::open(&config.store_path)?;
    let entries = store.load()?;
    if entries.is_empty() {
        println!("No new notifications");
    }
    for entry in entries {
        println!("{entry}");
    }
    Ok(())
}

async fn run_agent(config_path: &str) -> Result<()> {
    let config = AgentConfig::load(config_path)?;
    tracing::info!(
        readings_url = %config.readings_url,
        store = %config.store_path,
        "coopwatch-agent starting"
    );

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let store = Arc::new(SqliteNotificationStore::new(&config.store_path));
    let mut engine = AlertEngine::new(store, Arc::new(LogRenderer))
        .with_summary_limit(config.summary_limit);
    match &config.sink_url {
        Some(url) => {
            let sink = WebhookSink::new(url, timeout)?;
            tracing::info!(url = %sink.url(), "Webhook sink enabled");
            engine = engine.with_sink(Arc::new(sink));
        }
        None => tracing::info!("No sink configured, notifications stay local"),
    }
    engine.load();
    let engine = Arc::new(Mutex::new(engine));

    let evaluator = Arc::new(Evaluator::standard(
        &config.environment,
        &config.supply,
        config.devices.clone(),
    ));
    let provider = Arc::new(HttpReadingsProvider::new(&config.readings_url, timeout)?);
    let scheduler = MonitorScheduler::new(
        provider,
        evaluator,
        engine.clone(),
        config.check_interval_ms,
    );

    let scheduler_handle = tokio::spawn(async move {
        scheduler
            .run(async {
                signal::ctrl_c().await.ok();
            })
            .await;
    });

    match config.http_port {
        Some(port) => {
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(http = %addr, "Control API listening");
            let router = app::build_http_app(AppState::new(engine.clone()));
            let http_server = axum::serve(listener, router);

            tokio::select! {
                result = http_server.with_graceful_shutdown(async { signal::ctrl_c().await.ok(); }) => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "HTTP server error");
                    }
                }
                _ = signal::ctrl_c() => {
                    tracing::info!("Shutting down gracefully");
                }
            }
        }
        None => {
            signal::ctrl_c().await?;
            tracing::info!("Shutting down gracefully");
        }
    }

    scheduler_handle.abort();
    tracing::info!("coopwatch-agent stopped");
    Ok(())
}
