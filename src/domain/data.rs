// Sample storage backing a graph model

/// A single (x, y) sample. x is conventionally elapsed time in ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    x: f64,
    y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Ordered, append-only sequence of data points with running-max tracking.
///
/// Owned by exactly one `GraphModel`. Points are only ever appended or
/// removed as a contiguous suffix (`truncate_by`), never reordered.
#[derive(Debug, Default)]
pub struct ModelData {
    points: Vec<DataPoint>,
    max_encountered_value: f64,
}

impl ModelData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, point: DataPoint) {
        if point.y() > self.max_encountered_value {
            self.max_encountered_value = point.y();
        }
        self.points.push(point);
    }

    pub fn get(&self, index: usize) -> DataPoint {
        self.points[index]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Removes the last `count` points.
    ///
    /// The running max is intentionally NOT recomputed here. The value
    /// reported by `max_encountered_value` covers everything ever added,
    /// including points that have since been truncated away. Downstream
    /// graph scaling relies on this.
    pub fn truncate_by(&mut self, count: usize) {
        let new_len = self.points.len().saturating_sub(count);
        self.points.truncate(new_len);
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.max_encountered_value = 0.0;
    }

    /// The largest y value ever added, truncation notwithstanding.
    pub fn max_encountered_value(&self) -> f64 {
        self.max_encountered_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> ModelData {
        let mut data = ModelData::new();
        data.add(DataPoint::new(1.0, 0.0));
        data.add(DataPoint::new(2.0, 1.0));
        data.add(DataPoint::new(3.0, 1.0));
        data.add(DataPoint::new(3.1, 5.0));
        data.add(DataPoint::new(4.0, 0.0));
        data
    }

    #[test]
    fn test_add_preserves_order() {
        let data = fixture();
        assert_eq!(data.len(), 5);
        assert_eq!(data.get(0).x(), 1.0);
        assert_eq!(data.get(0).y(), 0.0);
        assert_eq!(data.get(3).x(), 3.1);
        assert_eq!(data.get(3).y(), 5.0);
        assert_eq!(data.get(4).x(), 4.0);
        assert_eq!(data.get(4).y(), 0.0);
    }

    #[test]
    fn test_max_encountered_value() {
        let mut data = fixture();
        assert_eq!(data.max_encountered_value(), 5.0);

        data.add(DataPoint::new(4.5, 11.0));
        assert_eq!(data.max_encountered_value(), 11.0);
    }

    #[test]
    fn test_max_survives_truncation() {
        let mut data = fixture();
        data.add(DataPoint::new(4.5, 11.0));
        assert_eq!(data.max_encountered_value(), 11.0);

        // Truncate away the points that produced the max. The reported max
        // must not decrease.
        data.truncate_by(3);
        assert_eq!(data.max_encountered_value(), 11.0);
    }

    #[test]
    fn test_truncate_by() {
        let mut data = fixture();
        assert_eq!(data.len(), 5);
        data.truncate_by(1);
        assert_eq!(data.len(), 4);
        data.truncate_by(4);
        assert_eq!(data.len(), 0);
        // Truncating more than we have is a no-op past empty.
        data.truncate_by(1);
        assert_eq!(data.len(), 0);
    }

    #[test]
    fn test_clear_resets_max() {
        let mut data = fixture();
        data.clear();
        assert!(data.is_empty());
        assert_eq!(data.max_encountered_value(), 0.0);
    }
}
