// HTTP request handlers
use crate::infrastructure::ndjson_stream::stream_from_receiver;
use crate::infrastructure::record_mapper::{to_trace_event, EventRecord};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ResolutionQuery {
    pub resolution: Option<f64>,
}

#[derive(Deserialize)]
pub struct OverlayQuery {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub delta: Option<f64>,
}

#[derive(Deserialize)]
pub struct StreamQuery {
    pub interval_ms: Option<u64>,
}

/// A single record or a batch; clients post both shapes.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(EventRecord),
    Many(Vec<EventRecord>),
}

#[derive(Serialize)]
pub struct IngestOutcome {
    pub accepted: usize,
    pub rejected: usize,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Ingest posted event records into the timeline
pub async fn ingest_events(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OneOrMany>,
) -> Json<IngestOutcome> {
    let records = match payload {
        OneOrMany::One(record) => vec![record],
        OneOrMany::Many(records) => records,
    };

    let mut accepted = 0;
    let mut rejected = 0;
    for record in &records {
        match to_trace_event(record) {
            Ok(event) => {
                state.timeline.ingest(event);
                accepted += 1;
            }
            Err(e) => {
                tracing::warn!(kind = record.kind, time = record.time, "rejected record: {e}");
                rejected += 1;
            }
        }
    }

    Json(IngestOutcome { accepted, rejected })
}

/// Sampled UI-thread utilization series
pub async fn utilization_series(
    Query(query): Query<ResolutionQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.dashboard.utilization_series(query.resolution))
}

/// Worst-severity-per-bucket highlight overlay
pub async fn highlight_overlay(
    Query(query): Query<OverlayQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.dashboard.overlay(query.start, query.end, query.delta))
}

/// Aggregate timeline summary
pub async fn timeline_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.summary())
}

/// Stream dashboard snapshots as NDJSON (progressive loading)
pub async fn stream_timeline(
    Query(query): Query<StreamQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let interval_ms = query.interval_ms.unwrap_or(1000).max(100);
    let rx = state.streaming.stream_snapshots(interval_ms);
    stream_from_receiver(rx)
}
