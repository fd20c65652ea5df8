// Timeline service - the intake pipeline feeding the timeline models
use crate::domain::MIN_DATA_RESOLUTION;
use crate::domain::data::ModelData;
use crate::domain::event::{EventKind, TraceEvent};
use crate::domain::graph::{Axis, GraphModel};
use crate::domain::highlight::{HighlightEntry, HighlightModel};
use crate::domain::snapshot::{KindSelfTime, SeriesPoint, SeriesSnapshot, TimelineSummary};
use crate::domain::utilization::ThreadUtilization;
use crate::domain::visitor::{annotate_self_time, annotate_user_logs};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Owns the timeline models and applies the annotation passes to incoming
/// event trees. All model mutation happens on one logical timeline behind
/// a single lock; every operation is short and synchronous.
pub struct TimelineService {
    state: Mutex<TimelineState>,
}

struct TimelineState {
    utilization: ThreadUtilization,
    highlights: HighlightModel,
    events: Vec<TraceEvent>,
    self_time_by_kind: HashMap<EventKind, f64>,
}

impl TimelineService {
    pub fn new(utilization_ceiling: f64) -> Self {
        let graph = GraphModel::regular(
            ModelData::new(),
            Axis::new("Time", "ms"),
            Axis::new("UI thread utilization", "%"),
            MIN_DATA_RESOLUTION,
        );
        Self {
            state: Mutex::new(TimelineState {
                utilization: ThreadUtilization::new(graph, utilization_ceiling),
                highlights: HighlightModel::new(),
                events: Vec::new(),
                self_time_by_kind: HashMap::new(),
            }),
        }
    }

    /// Intake callback for one event-tree root: runs the self-time and
    /// user-log annotation passes, drives the utilization model with the
    /// root's blocking interval, records hint severities on the highlight
    /// overlay, and retains the annotated tree.
    pub fn ingest(&self, mut event: TraceEvent) {
        let mut state = self.lock();

        let durations = annotate_self_time(&mut event);
        annotate_user_logs(&mut event);
        for (kind, self_time) in durations {
            *state.self_time_by_kind.entry(kind).or_insert(0.0) += self_time;
        }

        state.utilization.enter_blocking(event.time);
        state.utilization.release_blocking(event.end_time());

        for hint in &event.hints {
            state.highlights.add_data(hint.time, hint.severity);
        }

        tracing::debug!(
            kind = event.kind.code(),
            time = event.time,
            duration = event.duration,
            "ingested event tree"
        );
        state.events.push(event);
    }

    /// Forwarded to the utilization model under the intake lock, so ticks
    /// are never reordered relative to pending enter/release calls.
    pub fn warm_down_tick(&self) -> bool {
        self.lock().utilization.warm_down_tick()
    }

    /// Samples the utilization graph across its domain at `resolution`.
    pub fn utilization_snapshot(&self, resolution: f64) -> SeriesSnapshot {
        let state = self.lock();
        let graph = state.utilization.graph();

        let mut points = Vec::new();
        if !graph.is_empty() {
            let mut x = graph.min_x();
            let max_x = graph.max_x();
            while x <= max_x {
                points.push(SeriesPoint::new(x, graph.range_value_sampled(x, resolution)));
                x += resolution;
            }
        }

        SeriesSnapshot {
            x_label: graph.x_axis().label.clone(),
            x_unit: graph.x_axis().unit.clone(),
            y_label: graph.y_axis().label.clone(),
            y_unit: graph.y_axis().unit.clone(),
            max_encountered_value: graph.max_encountered_value(),
            points,
        }
    }

    pub fn highlight_overlay(&self, start: f64, end: f64, delta: f64) -> Vec<HighlightEntry> {
        self.lock().highlights.range_values(start, end, delta).collect()
    }

    pub fn summary(&self) -> TimelineSummary {
        let state = self.lock();
        let graph = state.utilization.graph();
        let mut self_time_by_kind: Vec<KindSelfTime> = state
            .self_time_by_kind
            .iter()
            .map(|(kind, self_time)| KindSelfTime {
                kind: kind.code(),
                self_time: *self_time,
            })
            .collect();
        self_time_by_kind.sort_by_key(|entry| entry.kind);

        TimelineSummary {
            event_count: state.events.len(),
            min_x: (!graph.is_empty()).then(|| graph.min_x()),
            max_x: (!graph.is_empty()).then(|| graph.max_x()),
            self_time_by_kind,
        }
    }

    /// Domain span of the utilization graph, for defaulting query ranges.
    pub fn domain_bounds(&self) -> Option<(f64, f64)> {
        let state = self.lock();
        let graph = state.utilization.graph();
        (!graph.is_empty()).then(|| (graph.min_x(), graph.max_x()))
    }

    fn lock(&self) -> MutexGuard<'_, TimelineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
