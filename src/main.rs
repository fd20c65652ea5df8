// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::dashboard_service::DashboardService;
use crate::application::record_source::replay_into;
use crate::application::streaming_service::StreamingTimelineService;
use crate::application::timeline_service::TimelineService;
use crate::domain::utilization::WARM_DOWN_TICK_MS;
use crate::infrastructure::config::load_timeline_config;
use crate::infrastructure::dump_source::FileDumpSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, highlight_overlay, ingest_events, stream_timeline, timeline_summary,
    utilization_series,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_timeline_config()?;

    // Create services (application layer)
    let timeline = Arc::new(TimelineService::new(config.utilization.ceiling));
    let dashboard = DashboardService::new(timeline.clone(), config.sampling.resolution);
    let streaming = StreamingTimelineService::new(dashboard.clone());

    // The utilization graph cools toward idle between bursts of events;
    // the ticker drives that decay.
    let warm_down_timeline = timeline.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(WARM_DOWN_TICK_MS));
        loop {
            ticker.tick().await;
            warm_down_timeline.warm_down_tick();
        }
    });

    // Optionally replay a saved capture dump into the timeline
    if let Some(dump_path) = config.replay.dump_path {
        let replay_timeline = timeline.clone();
        tokio::spawn(async move {
            match FileDumpSource::open(&dump_path).await {
                Ok(source) => match replay_into(source, &replay_timeline).await {
                    Ok(count) => tracing::info!(count, %dump_path, "replayed capture dump"),
                    Err(e) => tracing::error!(%dump_path, "dump replay failed: {e:#}"),
                },
                Err(e) => tracing::error!(%dump_path, "could not open dump: {e:#}"),
            }
        });
    }

    // Create application state
    let state = Arc::new(AppState {
        timeline,
        dashboard,
        streaming,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/events", post(ingest_events))
        .route("/timeline/utilization", get(utilization_series))
        .route("/timeline/highlights", get(highlight_overlay))
        .route("/timeline/summary", get(timeline_summary))
        .route("/timeline/stream", get(stream_timeline))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;
    tracing::info!("starting timeline-telemetry service on {addr}");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
