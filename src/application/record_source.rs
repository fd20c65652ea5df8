// Replayable source of captured event-tree records
use crate::application::timeline_service::TimelineService;
use crate::domain::event::TraceEvent;
use async_trait::async_trait;

/// A stream of event-tree roots feeding the intake pipeline, e.g. a saved
/// capture dump being replayed.
#[async_trait]
pub trait RecordSource: Send {
    /// The next event tree, or `None` when the source is exhausted.
    async fn next_event(&mut self) -> anyhow::Result<Option<TraceEvent>>;
}

/// Pumps a source to exhaustion into the timeline. Returns the number of
/// event trees ingested.
pub async fn replay_into(
    mut source: impl RecordSource,
    timeline: &TimelineService,
) -> anyhow::Result<usize> {
    let mut count = 0;
    while let Some(event) = source.next_event().await? {
        timeline.ingest(event);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventKind;

    struct VecSource(Vec<TraceEvent>);

    #[async_trait]
    impl RecordSource for VecSource {
        async fn next_event(&mut self) -> anyhow::Result<Option<TraceEvent>> {
            Ok(if self.0.is_empty() {
                None
            } else {
                Some(self.0.remove(0))
            })
        }
    }

    #[tokio::test]
    async fn test_replay_into_ingests_all() {
        let timeline = TimelineService::new(100.0);
        let source = VecSource(vec![
            TraceEvent::new(EventKind::DomEvent, 0.0, 10.0),
            TraceEvent::new(EventKind::TimerFired, 50.0, 5.0),
        ]);

        let count = replay_into(source, &timeline).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(timeline.summary().event_count, 2);
    }
}
