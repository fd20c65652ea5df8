// Mapping between wire-format event records and domain event trees
use crate::domain::event::{EventKind, HintRecord, TraceEvent};
use crate::domain::highlight::Severity;
use serde::Deserialize;
use thiserror::Error;

/// One event record as it appears on the wire or in a capture dump.
/// Children carry the same shape recursively.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub kind: i32,
    pub time: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub children: Vec<EventRecord>,
    #[serde(default)]
    pub hints: Vec<HintWire>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HintWire {
    pub severity: i32,
    pub time: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("event record has non-finite time {0}")]
    NonFiniteTime(f64),
    #[error("event record has invalid duration {0}")]
    InvalidDuration(f64),
}

/// Builds a domain event tree from a wire record, preserving child order.
pub fn to_trace_event(record: &EventRecord) -> Result<TraceEvent, RecordError> {
    if !record.time.is_finite() {
        return Err(RecordError::NonFiniteTime(record.time));
    }
    if !record.duration.is_finite() || record.duration < 0.0 {
        return Err(RecordError::InvalidDuration(record.duration));
    }

    let mut event = TraceEvent::new(EventKind::from_code(record.kind), record.time, record.duration);
    for hint in &record.hints {
        event.hints.push(HintRecord {
            severity: severity_from_code(hint.severity),
            time: hint.time.unwrap_or(record.time),
            description: hint.description.clone().unwrap_or_default(),
        });
    }
    for child in &record.children {
        event.children.push(to_trace_event(child)?);
    }
    Ok(event)
}

pub fn severity_from_code(code: i32) -> Severity {
    match code {
        c if c >= 3 => Severity::Critical,
        2 => Severity::Warning,
        1 => Severity::Info,
        _ => Severity::None,
    }
}
