// Trace event domain model
use crate::domain::highlight::Severity;

/// Kind of a timelined browser event, matching the record type codes the
/// capturing instrumentation emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DomEvent,
    Layout,
    RecalcStyle,
    Paint,
    ParseHtml,
    TimerInstalled,
    TimerCleared,
    TimerFired,
    XhrReadyStateChange,
    XhrLoad,
    EvalScript,
    LogMessage,
    ResourceSendRequest,
    ResourceReceiveResponse,
    ResourceFinish,
    JavaScriptExecution,
    ResourceDataReceived,
    GarbageCollection,
    /// A record type this pipeline has no special handling for. The code
    /// is kept so the renderer can still label it.
    Other(i32),
}

impl EventKind {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::DomEvent,
            1 => Self::Layout,
            2 => Self::RecalcStyle,
            3 => Self::Paint,
            4 => Self::ParseHtml,
            5 => Self::TimerInstalled,
            6 => Self::TimerCleared,
            7 => Self::TimerFired,
            8 => Self::XhrReadyStateChange,
            9 => Self::XhrLoad,
            10 => Self::EvalScript,
            11 => Self::LogMessage,
            12 => Self::ResourceSendRequest,
            13 => Self::ResourceReceiveResponse,
            14 => Self::ResourceFinish,
            15 => Self::JavaScriptExecution,
            16 => Self::ResourceDataReceived,
            17 => Self::GarbageCollection,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::DomEvent => 0,
            Self::Layout => 1,
            Self::RecalcStyle => 2,
            Self::Paint => 3,
            Self::ParseHtml => 4,
            Self::TimerInstalled => 5,
            Self::TimerCleared => 6,
            Self::TimerFired => 7,
            Self::XhrReadyStateChange => 8,
            Self::XhrLoad => 9,
            Self::EvalScript => 10,
            Self::LogMessage => 11,
            Self::ResourceSendRequest => 12,
            Self::ResourceReceiveResponse => 13,
            Self::ResourceFinish => 14,
            Self::JavaScriptExecution => 15,
            Self::ResourceDataReceived => 16,
            Self::GarbageCollection => 17,
            Self::Other(code) => *code,
        }
    }
}

/// A rule-engine finding attached to an event (e.g. "uncompressed
/// resource", "frequent layout").
#[derive(Debug, Clone, PartialEq)]
pub struct HintRecord {
    pub severity: Severity,
    pub time: f64,
    pub description: String,
}

/// One node of a hierarchical, time-stamped event record. A parent's
/// duration may encompass its children's durations; `self_time` is the
/// derived remainder once children are subtracted.
///
/// Trees are append-only once constructed; annotation passes run over an
/// exclusively-owned tree via `&mut`.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    pub kind: EventKind,
    /// Start timestamp in ms.
    pub time: f64,
    /// Duration of event dispatch in ms.
    pub duration: f64,
    /// Duration minus the children's durations; written by the self-time
    /// annotation pass, 0 until then.
    pub self_time: f64,
    pub children: Vec<TraceEvent>,
    pub hints: Vec<HintRecord>,
    /// Whether this event (or a bounded number of its descendants) carries
    /// user log messages; written by the log annotation pass.
    pub has_user_logs: bool,
}

impl TraceEvent {
    pub fn new(kind: EventKind, time: f64, duration: f64) -> Self {
        Self {
            kind,
            time,
            duration,
            self_time: 0.0,
            children: Vec::new(),
            hints: Vec::new(),
            has_user_logs: false,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }

    pub fn has_hint_records(&self) -> bool {
        !self.hints.is_empty()
    }
}
