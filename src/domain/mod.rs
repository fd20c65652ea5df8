// Domain layer - timeline models and event-tree computation
pub mod data;
pub mod event;
pub mod graph;
pub mod highlight;
pub mod snapshot;
pub mod utilization;
pub mod visitor;

/// Minimum spacing between plotted samples in ms. Regular graph models
/// default to this interval, and the utilization window slides by it.
pub const MIN_DATA_RESOLUTION: f64 = 35.0;
