// Streaming service - periodic dashboard snapshots for live viewers
use crate::application::dashboard_service::{DashboardService, DashboardSnapshot};
use std::time::Duration;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 16;

/// Publishes dashboard snapshots at a fixed cadence until the receiver is
/// dropped (i.e. the client went away).
#[derive(Clone)]
pub struct StreamingTimelineService {
    dashboard: DashboardService,
}

impl StreamingTimelineService {
    pub fn new(dashboard: DashboardService) -> Self {
        Self { dashboard }
    }

    pub fn stream_snapshots(&self, interval_ms: u64) -> mpsc::Receiver<DashboardSnapshot> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let dashboard = self.dashboard.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
            loop {
                ticker.tick().await;
                if tx.send(dashboard.snapshot()).await.is_err() {
                    tracing::debug!("snapshot stream closed by client");
                    break;
                }
            }
        });

        rx
    }
}
