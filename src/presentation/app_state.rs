// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::streaming_service::StreamingTimelineService;
use crate::application::timeline_service::TimelineService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub timeline: Arc<TimelineService>,
    pub dashboard: DashboardService,
    pub streaming: StreamingTimelineService,
}
