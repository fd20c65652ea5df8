// Dashboard service - builds renderable snapshots from the timeline models
use crate::application::timeline_service::TimelineService;
use crate::domain::MIN_DATA_RESOLUTION;
use crate::domain::snapshot::{OverlayEntry, SeriesSnapshot, TimelineSummary};
use serde::Serialize;
use std::sync::Arc;

// Ceiling on points per sampled series; wide domains get a coarser
// resolution instead of an unbounded payload.
const MAX_POINTS_PER_SERIES: usize = 150;

/// One self-contained frame of everything the view layer paints.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub utilization: SeriesSnapshot,
    pub overlay: Vec<OverlayEntry>,
    pub summary: TimelineSummary,
}

#[derive(Clone)]
pub struct DashboardService {
    timeline: Arc<TimelineService>,
    default_resolution: f64,
}

impl DashboardService {
    pub fn new(timeline: Arc<TimelineService>, default_resolution: f64) -> Self {
        Self {
            timeline,
            default_resolution,
        }
    }

    /// Utilization series sampled at the requested resolution (clamped so
    /// the series stays under `MAX_POINTS_PER_SERIES`).
    pub fn utilization_series(&self, resolution: Option<f64>) -> SeriesSnapshot {
        self.timeline
            .utilization_snapshot(self.effective_resolution(resolution))
    }

    /// Worst-severity-per-bucket overlay entries over `[start, end)`.
    /// Bounds default to everything recorded, the delta to the resolution.
    pub fn overlay(&self, start: Option<f64>, end: Option<f64>, delta: Option<f64>) -> Vec<OverlayEntry> {
        let start = start.unwrap_or(0.0);
        let end = end.unwrap_or(f64::MAX);
        let delta = delta
            .filter(|d| *d > 0.0)
            .unwrap_or(self.default_resolution);

        self.timeline
            .highlight_overlay(start, end, delta)
            .into_iter()
            .map(|entry| OverlayEntry {
                x: entry.x,
                severity: entry.value as u8,
            })
            .collect()
    }

    pub fn summary(&self) -> TimelineSummary {
        self.timeline.summary()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            utilization: self.utilization_series(None),
            overlay: self.overlay(None, None, None),
            summary: self.summary(),
        }
    }

    fn effective_resolution(&self, requested: Option<f64>) -> f64 {
        let requested = requested
            .filter(|r| *r > 0.0)
            .unwrap_or(self.default_resolution)
            .max(MIN_DATA_RESOLUTION);
        match self.timeline.domain_bounds() {
            Some((min_x, max_x)) => requested.max((max_x - min_x) / MAX_POINTS_PER_SERIES as f64),
            None => requested,
        }
    }
}
