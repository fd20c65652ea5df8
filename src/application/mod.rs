// Application layer - use cases over the timeline models
pub mod dashboard_service;
pub mod record_source;
pub mod streaming_service;
pub mod timeline_service;
