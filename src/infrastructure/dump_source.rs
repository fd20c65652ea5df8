// File-backed record source replaying saved capture dumps
use crate::application::record_source::RecordSource;
use crate::domain::event::TraceEvent;
use crate::infrastructure::record_mapper::{to_trace_event, EventRecord};
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Reads a capture dump with one JSON event record per line. Blank lines
/// and `//` comment lines are skipped.
pub struct FileDumpSource {
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

impl FileDumpSource {
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .with_context(|| format!("opening dump file {}", path.display()))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_number: 0,
        })
    }
}

#[async_trait]
impl RecordSource for FileDumpSource {
    async fn next_event(&mut self) -> anyhow::Result<Option<TraceEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            let record: EventRecord = serde_json::from_str(trimmed)
                .with_context(|| format!("parsing dump line {}", self.line_number))?;
            let event = to_trace_event(&record)
                .with_context(|| format!("mapping dump line {}", self.line_number))?;
            return Ok(Some(event));
        }
        Ok(None)
    }
}
