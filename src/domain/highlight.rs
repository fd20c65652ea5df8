// Highlight model - sparse severity overlay for the timeline
use thiserror::Error;

/// Severity of a highlighted point, ordered so collisions can keep the
/// worst value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    None = 0,
    Info = 1,
    Warning = 2,
    Critical = 3,
}

#[derive(Debug, Error, PartialEq)]
pub enum HighlightError {
    /// `max_x` has no answer on an empty model; 0 is a valid x value so a
    /// default would be indistinguishable from real data.
    #[error("highlight model is empty")]
    Empty,
}

/// An aggregated entry reported by `range_values`. The key is the x of the
/// first point in the bucket; the value is the worst severity seen within
/// the bucket's delta window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightEntry {
    pub x: f64,
    pub value: Severity,
}

/// Sparse keyed severity points, sorted by x, supporting windowed
/// worst-severity-in-bucket queries for overlay rendering.
#[derive(Debug, Default)]
pub struct HighlightModel {
    // Sorted by x under total ordering. Times are finite by the intake
    // contract, so total_cmp agrees with the usual order.
    values: Vec<(f64, Severity)>,
}

impl HighlightModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point. If the same x is added more than once, the largest
    /// severity is kept.
    pub fn add_data(&mut self, x: f64, value: Severity) {
        match self.values.binary_search_by(|(key, _)| key.total_cmp(&x)) {
            Ok(index) => {
                let existing = self.values[index].1;
                self.values[index].1 = existing.max(value);
            }
            Err(index) => self.values.insert(index, (x, value)),
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of unique x positions added. Aggregation in `range_values`
    /// may report fewer entries than this.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The maximum x value in the model. Fails loudly on an empty model.
    pub fn max_x(&self) -> Result<f64, HighlightError> {
        self.values
            .last()
            .map(|(x, _)| *x)
            .ok_or(HighlightError::Empty)
    }

    /// Lazy forward-only iteration over `[start, end)`, reporting the
    /// worst severity per delta-wide bucket. Buckets are anchored at each
    /// first unconsumed key, not on a fixed grid.
    pub fn range_values(&self, start: f64, end: f64, delta: f64) -> HighlightRange<'_> {
        let from = self.values.partition_point(|(x, _)| *x < start);
        let to = self.values.partition_point(|(x, _)| *x < end);
        HighlightRange {
            remaining: &self.values[from..to],
            delta,
        }
    }
}

/// Iterator produced by `HighlightModel::range_values`. Not restartable.
pub struct HighlightRange<'a> {
    remaining: &'a [(f64, Severity)],
    delta: f64,
}

impl Iterator for HighlightRange<'_> {
    type Item = HighlightEntry;

    fn next(&mut self) -> Option<HighlightEntry> {
        let (first_x, _) = *self.remaining.first()?;
        let mut max_value = Severity::None;
        let mut consumed = 0;
        for (x, value) in self.remaining {
            if *x - first_x >= self.delta {
                break;
            }
            max_value = max_value.max(*value);
            consumed += 1;
        }
        self.remaining = &self.remaining[consumed..];
        Some(HighlightEntry {
            x: first_x,
            value: max_value,
        })
    }
}
