// Graph model - indexes a sample sequence for range/point queries
use crate::domain::data::{DataPoint, ModelData};

/// Boundary guard when scanning a sample window, so a query does not pick
/// up the point sitting exactly on the next window's edge.
const RANGE_EPSILON: f64 = 1e-4;

/// Density assumption about the underlying samples, which drives the
/// nearest-index search strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleDensity {
    /// Points arrive at a near-uniform spacing of `interval_size`. Index
    /// lookup guesses by linear interpolation and walks to correct.
    Regular { interval_size: f64 },
    /// Points are irregular or sparse. Index lookup binary-searches, and
    /// queries never smooth between points.
    Sparse,
}

/// Axis label and unit, carried for the rendering layer.
#[derive(Debug, Clone, Default)]
pub struct Axis {
    pub label: String,
    pub unit: String,
}

impl Axis {
    pub fn new(label: &str, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            unit: unit.to_string(),
        }
    }
}

pub type ObserverId = usize;

/// A time series of (x, y) samples answering "what y corresponds to domain
/// value d, optionally maxed/averaged over a sample window".
///
/// Samples are added incrementally and never reordered. Observers are
/// notified synchronously on every insertion, not only when the domain
/// frontier advances; downstream consumers depend on that cadence.
pub struct GraphModel {
    data: ModelData,
    density: SampleDensity,
    x_axis: Axis,
    y_axis: Axis,
    // Cached lower bound of the domain; f64::MAX until the first point.
    min_x: f64,
    observers: Vec<(ObserverId, Box<dyn FnMut(f64) + Send>)>,
    next_observer: ObserverId,
}

impl GraphModel {
    pub fn regular(data: ModelData, x_axis: Axis, y_axis: Axis, interval_size: f64) -> Self {
        Self::with_density(data, x_axis, y_axis, SampleDensity::Regular { interval_size })
    }

    pub fn sparse(data: ModelData, x_axis: Axis, y_axis: Axis) -> Self {
        Self::with_density(data, x_axis, y_axis, SampleDensity::Sparse)
    }

    fn with_density(data: ModelData, x_axis: Axis, y_axis: Axis, density: SampleDensity) -> Self {
        let min_x = if data.is_empty() {
            f64::MAX
        } else {
            data.get(0).x()
        };
        Self {
            data,
            density,
            x_axis,
            y_axis,
            min_x,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Appends a sample and notifies all domain observers with `x`.
    pub fn add_data(&mut self, x: f64, y: f64) {
        if x < self.min_x {
            self.min_x = x;
        }
        self.data.add(DataPoint::new(x, y));
        for (_, observer) in &mut self.observers {
            observer(x);
        }
    }

    /// Registers a callback fired on each `add_data`. Returns an id for
    /// later removal.
    pub fn add_domain_observer(&mut self, observer: impl FnMut(f64) + Send + 'static) -> ObserverId {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn remove_domain_observer(&mut self, id: ObserverId) {
        self.observers.retain(|(observer_id, _)| *observer_id != id);
    }

    /// Erases all data, returning the model to its freshly-built state.
    pub fn clear(&mut self) {
        self.data.clear();
        self.min_x = f64::MAX;
    }

    pub fn data(&self) -> &ModelData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ModelData {
        &mut self.data
    }

    pub fn density(&self) -> SampleDensity {
        self.density
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn max_encountered_value(&self) -> f64 {
        self.data.max_encountered_value()
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        if self.data.is_empty() {
            self.min_x()
        } else {
            self.data.get(self.data.len() - 1).x()
        }
    }

    /// Convenience when no sample window is wanted.
    pub fn range_value(&self, domain_val: f64) -> f64 {
        self.range_value_sampled(domain_val, 0.0)
    }

    /// Derives a y value for the given x, simulating a continuous series
    /// over the underlying discrete samples. Queries before the first
    /// point read as 0 by policy: an empty stretch of timeline has no
    /// value, which is not an error.
    pub fn range_value_sampled(&self, domain_val: f64, sample_range: f64) -> f64 {
        match self.find_closest_index(domain_val) {
            Some(index) => self.interpolate_range_value(index, domain_val, sample_range),
            None => 0.0,
        }
    }

    /// Index of the last point with `x <= domain_val`, or `None` when the
    /// query lands before the first point (or the model is empty).
    pub fn find_closest_index(&self, domain_val: f64) -> Option<usize> {
        if self.data.is_empty() {
            return None;
        }
        match self.density {
            SampleDensity::Regular { .. } => self.find_closest_index_regular(domain_val),
            SampleDensity::Sparse => self.find_closest_index_sparse(domain_val),
        }
    }

    // Guesses an index assuming uniform spacing, then walks linearly to
    // correct for local irregularity. Near-constant time on truly regular
    // data, degrades to a linear scan in the worst case.
    fn find_closest_index_regular(&self, domain_val: f64) -> Option<usize> {
        if domain_val < self.min_x() {
            return None;
        }
        let index_range = self.data.len() - 1;

        let divisor = self.max_x() - self.min_x();
        let divisor = if divisor == 0.0 { 1.0 } else { divisor };
        // fraction of total domain * index range
        let mut guess = (((domain_val - self.min_x()) / divisor) * index_range as f64) as usize;

        if guess >= index_range {
            return Some(index_range);
        }

        let mut curr_domain_val = self.data.get(guess).x();
        if curr_domain_val < domain_val {
            while curr_domain_val < domain_val && guess < index_range {
                curr_domain_val = self.data.get(guess + 1).x();
                guess += 1;
            }
            // The walk may overshoot by one.
            if curr_domain_val > domain_val {
                guess -= 1;
            }
        } else {
            while curr_domain_val > domain_val && guess > 0 {
                curr_domain_val = self.data.get(guess - 1).x();
                guess -= 1;
            }
        }

        Some(guess)
    }

    // Binary search biased upward on ties, so a pair of duplicate x values
    // resolves to the later inserted index.
    fn find_closest_index_sparse(&self, domain_val: f64) -> Option<usize> {
        let mut lower = 0usize;
        let mut upper = self.data.len() - 1;

        while upper != lower {
            let mid = ((upper - lower) / 2).max(1);
            let index = lower + mid;

            let found = self.data.get(index).x();
            if found > domain_val {
                // move the pivot down
                upper -= mid;
            } else if found < domain_val {
                // move the pivot up
                lower = index;
            } else {
                lower = index;
                break;
            }
        }

        if self.data.get(lower).x() <= domain_val {
            Some(lower)
        } else {
            None
        }
    }

    fn interpolate_range_value(&self, closest_index: usize, domain_val: f64, sample_range: f64) -> f64 {
        match self.density {
            SampleDensity::Regular { interval_size } => {
                if sample_range <= interval_size {
                    self.average_closest_indices(closest_index, domain_val)
                } else {
                    self.find_max_value_in_range(closest_index, domain_val, sample_range)
                }
            }
            // Sparse data should not be smoothed.
            SampleDensity::Sparse => self.find_max_value_in_range(closest_index, domain_val, sample_range),
        }
    }

    // Linear interpolation between the two points straddling the target.
    fn average_closest_indices(&self, closest_index: usize, target_domain_val: f64) -> f64 {
        let end_index = if self.data.get(closest_index).x() > target_domain_val {
            closest_index as isize - 1
        } else {
            closest_index as isize + 1
        };

        if end_index < 0 || end_index as usize >= self.data.len() {
            return self.data.get(closest_index).y();
        }
        let end_index = end_index as usize;

        let x0 = self.data.get(closest_index).x();
        let y0 = self.data.get(closest_index).y();
        let x1 = self.data.get(end_index).x();
        let y1 = self.data.get(end_index).y();

        let divisor = x1 - x0;
        let divisor = if divisor == 0.0 { 1.0 } else { divisor };
        let fraction = ((target_domain_val - x0) / divisor).abs();

        (y1 - y0) * fraction + y0
    }

    /// Max y among points in `[target, target + sample_range)`, scanning
    /// forward from `closest_index`. Falls back to the closest point's own
    /// value when nothing qualifies.
    pub fn find_max_value_in_range(
        &self,
        closest_index: usize,
        target_domain_val: f64,
        sample_range: f64,
    ) -> f64 {
        let end_domain_val = target_domain_val + sample_range - RANGE_EPSILON;

        let mut max: Option<DataPoint> = None;
        let mut index = closest_index;
        while index < self.data.len() {
            let found = self.data.get(index);
            if found.x() > end_domain_val {
                break;
            }
            if found.x() >= target_domain_val
                && max.map_or(true, |m| found.y() > m.y())
            {
                max = Some(found);
            }
            index += 1;
        }

        max.unwrap_or_else(|| self.data.get(closest_index)).y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MIN_DATA_RESOLUTION;
    use std::sync::{Arc, Mutex};

    const SIMPLE_TEST_DATA: [(f64, f64); 5] = [(0.0, 1.0), (10.0, 4.0), (15.0, 3.0), (40.0, 10.0), (41.0, 2.0)];

    fn search_fixture() -> ModelData {
        let mut data = ModelData::new();
        data.add(DataPoint::new(1.0, 0.0)); // 0
        data.add(DataPoint::new(2.0, 1.0)); // 1
        data.add(DataPoint::new(3.0, 1.0)); // 2
        data.add(DataPoint::new(3.1, 5.0)); // 3
        data.add(DataPoint::new(4.0, 0.0)); // 4
        data
    }

    fn regular(data: ModelData) -> GraphModel {
        GraphModel::regular(data, Axis::default(), Axis::default(), MIN_DATA_RESOLUTION)
    }

    fn sparse(data: ModelData) -> GraphModel {
        GraphModel::sparse(data, Axis::default(), Axis::default())
    }

    #[test]
    fn test_construction() {
        let model = GraphModel::sparse(
            ModelData::new(),
            Axis::new("Time", "ms"),
            Axis::new("Utilization", "%"),
        );
        assert_eq!(model.x_axis().label, "Time");
        assert_eq!(model.x_axis().unit, "ms");
        assert_eq!(model.y_axis().label, "Utilization");
        assert_eq!(model.y_axis().unit, "%");
        // With no data added yet, min_x sits at the sentinel.
        assert_eq!(model.min_x(), f64::MAX);
        assert_eq!(model.max_x(), f64::MAX);
        assert!(model.is_empty());
    }

    #[test]
    fn test_min_x_tracks_minimum_ever_added() {
        let mut model = regular(ModelData::new());
        model.add_data(10.0, 1.0);
        assert_eq!(model.min_x(), 10.0);
        model.add_data(20.0, 1.0);
        assert_eq!(model.min_x(), 10.0);
        // An earlier point still lowers the cached bound.
        model.add_data(5.0, 1.0);
        assert_eq!(model.min_x(), 5.0);

        model.clear();
        assert_eq!(model.min_x(), f64::MAX);
    }

    #[test]
    fn test_observers_fire_on_every_insertion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut model = sparse(ModelData::new());
        let sink = seen.clone();
        let id = model.add_domain_observer(move |x| sink.lock().unwrap().push(x));

        model.add_data(10.0, 1.0);
        // Not a frontier extension, but observers are still told.
        model.add_data(5.0, 2.0);
        assert_eq!(*seen.lock().unwrap(), vec![10.0, 5.0]);

        model.remove_domain_observer(id);
        model.add_data(20.0, 3.0);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_regular_adding_data_points() {
        let mut model = regular(ModelData::new());
        for (x, y) in SIMPLE_TEST_DATA {
            model.add_data(x, y);
        }

        for (x, y) in SIMPLE_TEST_DATA {
            assert_eq!(model.range_value(x), y);
        }

        assert_eq!(model.min_x(), SIMPLE_TEST_DATA[0].0);
        assert_eq!(model.max_x(), SIMPLE_TEST_DATA[4].0);

        // Negative time should always give 0.
        assert_eq!(model.range_value(-1.0), 0.0);
    }

    #[test]
    fn test_regular_find_closest_index() {
        let model = regular(search_fixture());

        let expectations = [
            (-999.0, None),
            (0.5, None),
            (1.0, Some(0)),
            (1.5, Some(0)),
            (2.0, Some(1)),
            (2.9, Some(1)),
            (3.0, Some(2)),
            (3.09, Some(2)),
            (3.19, Some(3)),
            (4.0, Some(4)),
            (4.1, Some(4)),
            (999.0, Some(4)),
        ];
        for (query, expected) in expectations {
            assert_eq!(model.find_closest_index(query), expected, "search for {query}");
        }

        // Empty data model.
        let model = regular(ModelData::new());
        for query in [-999.0, 0.5, 4.1, 999.0] {
            assert_eq!(model.find_closest_index(query), None, "search for {query}");
        }

        // Single entry.
        let mut data = ModelData::new();
        data.add(DataPoint::new(-100.0, 0.0));
        let model = regular(data);
        assert_eq!(model.find_closest_index(-999.0), None);
        assert_eq!(model.find_closest_index(-100.0), Some(0));
        assert_eq!(model.find_closest_index(1.0), Some(0));
        assert_eq!(model.find_closest_index(999.0), Some(0));
    }

    #[test]
    fn test_sparse_find_closest_index() {
        let model = sparse(search_fixture());

        let expectations = [
            (-999.0, None),
            (0.5, None),
            (1.0, Some(0)),
            (1.5, Some(0)),
            (2.0, Some(1)),
            (2.9, Some(1)),
            (3.0, Some(2)),
            (3.09, Some(2)),
            (3.19, Some(3)),
            (4.0, Some(4)),
            (4.1, Some(4)),
            (999.0, Some(4)),
        ];
        for (query, expected) in expectations {
            assert_eq!(model.find_closest_index(query), expected, "search for {query}");
        }

        let model = sparse(ModelData::new());
        assert_eq!(model.find_closest_index(999.0), None);
    }

    #[test]
    fn test_sparse_duplicate_x_resolves_to_rightmost() {
        let mut model = sparse(ModelData::new());
        model.add_data(5.0, 1.0);
        model.add_data(5.0, 2.0);
        assert_eq!(model.find_closest_index(5.0), Some(1));
        assert_eq!(model.range_value(5.0), 2.0);
    }

    #[test]
    fn test_regular_interpolation_is_linear() {
        let mut model = regular(ModelData::new());
        for (x, y) in SIMPLE_TEST_DATA {
            model.add_data(x, y);
        }

        // Querying the midpoint of two adjacent points returns their
        // average.
        for pair in SIMPLE_TEST_DATA.windows(2) {
            let domain = (pair[0].0 + pair[1].0) / 2.0;
            let expected = (pair[0].1 + pair[1].1) / 2.0;
            assert_eq!(model.range_value(domain), expected);
        }

        // Off the right edge of the data set the last value holds.
        let (last_x, last_y) = SIMPLE_TEST_DATA[4];
        assert_eq!(model.range_value(last_x + 1.0), last_y);
        assert_eq!(model.range_value(last_x + 55.0), last_y);
    }

    #[test]
    fn test_sparse_never_blends() {
        let mut model = sparse(ModelData::new());
        for (x, y) in SIMPLE_TEST_DATA {
            model.add_data(x, y);
        }

        let existing: Vec<f64> = SIMPLE_TEST_DATA.iter().map(|(_, y)| *y).collect();
        // Any query resolves to some existing point's value, never a blend.
        for query in [0.0, 3.0, 5.0, 12.5, 27.5, 40.5, 50.0] {
            let value = model.range_value(query);
            assert!(
                existing.contains(&value),
                "query {query} produced blended value {value}"
            );
        }
    }

    #[test]
    fn test_find_max_value_in_range() {
        let mut data = ModelData::new();
        data.add(DataPoint::new(1.0, 0.0)); // 0
        data.add(DataPoint::new(1.0, 1.0)); // 1
        data.add(DataPoint::new(1.0, 1.0)); // 2
        data.add(DataPoint::new(1.0, 5.0)); // 3
        data.add(DataPoint::new(1.0, 0.0)); // 4
        let model = sparse(data);

        assert_eq!(model.find_max_value_in_range(0, 0.0, 3.0), 5.0);
        // Nothing in [-5, -2): fall back to the closest point's value.
        assert_eq!(model.find_max_value_in_range(0, -5.0, 3.0), 0.0);
        assert_eq!(model.find_max_value_in_range(4, 5.0, 3.0), 0.0);
    }

    #[test]
    fn test_empty_model_reads_as_zero() {
        let model = sparse(ModelData::new());
        assert_eq!(model.range_value(0.0), 0.0);
        assert_eq!(model.range_value_sampled(100.0, 35.0), 0.0);
    }
}
