// Renderable snapshot models pulled by the view layer
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
}

impl SeriesPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A sampled series ready to paint, with its axis metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSnapshot {
    pub x_label: String,
    pub x_unit: String,
    pub y_label: String,
    pub y_unit: String,
    pub max_encountered_value: f64,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayEntry {
    pub x: f64,
    pub severity: u8,
}

/// Aggregate stats over everything ingested so far.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineSummary {
    pub event_count: usize,
    pub min_x: Option<f64>,
    pub max_x: Option<f64>,
    /// Total self time per event kind code, ms.
    pub self_time_by_kind: Vec<KindSelfTime>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KindSelfTime {
    pub kind: i32,
    pub self_time: f64,
}
