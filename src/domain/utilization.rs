// Sliding-window utilization of the instrumented UI thread
use crate::domain::MIN_DATA_RESOLUTION;
use crate::domain::graph::GraphModel;

/// Width of the sliding window in ms.
pub const WINDOW_WIDTH: f64 = 75.0;

/// How far the window advances per slide.
pub const WINDOW_SLIDE_INCREMENT: f64 = MIN_DATA_RESOLUTION;

/// Time between warm-down ticks in ms.
pub const WARM_DOWN_TICK_MS: u64 = 500;

// Weights for the utilization average over the last three windows, most
// recent last. Tuned by hand against instrumented capture data.
const WINDOW_WEIGHTS: [f64; 3] = [0.1, 0.2, 0.7];

// Below this fraction of the ceiling, warm-down snaps to zero and stops.
const IDLE_FRACTION: f64 = 0.005;

/// Converts discrete "thread blocked" intervals into a continuous 0-100%
/// utilization metric plotted on an owned `GraphModel`.
///
/// Utilization approximates the fraction of a trailing `WINDOW_WIDTH`
/// window spent blocked, smoothed over the last three windows. Re-entrant
/// blocking and out-of-order arrivals are normal inputs here: events are
/// buffered up in the capturing browser and can reach us late, in which
/// case the samples recorded for the intervening stretch are invalidated
/// and recomputed.
pub struct ThreadUtilization {
    // Time spent blocked in the current window.
    blocked_time_in_window: f64,
    // Current position within the window.
    current_marker: f64,
    // Begin point of the current window.
    current_window_start: f64,
    // Number of active blocking events; re-entrant enters nest.
    event_depth: i32,
    graph: GraphModel,
    // Utilization samples are scaled up to [0, max_utilization].
    max_utilization: f64,
    scaled_weighted_utilization: f64,
    // History of the last 3 windows, most recent last.
    window_history: [f64; 3],
    // Whether the warm-down ticker still has work to do.
    warm_down_armed: bool,
}

impl ThreadUtilization {
    pub fn new(graph: GraphModel, max_utilization: f64) -> Self {
        Self {
            blocked_time_in_window: 0.0,
            current_marker: 0.0,
            current_window_start: 0.0,
            event_depth: 0,
            graph,
            max_utilization,
            scaled_weighted_utilization: 0.0,
            window_history: [0.0; 3],
            warm_down_armed: false,
        }
    }

    /// Called when an event starts busying the thread. The thread state is
    /// assumed unchanged up to `at`.
    pub fn enter_blocking(&mut self, at: f64) {
        self.slide_window_to(at);
        // at is now within the window bounds.
        if self.event_depth > 0 {
            // Already blocking: account the stretch since the marker.
            self.blocked_time_in_window = at - self.current_marker;
        }
        self.current_marker = at;
        self.event_depth += 1;
        self.warm_down_armed = true;
    }

    /// Called when an event is done busying the thread.
    pub fn release_blocking(&mut self, at: f64) {
        self.slide_window_to(at);
        self.blocked_time_in_window = at - self.current_marker;
        self.current_marker = at;
        self.event_depth -= 1;
        self.warm_down_armed = true;
    }

    /// The current scaled, weighted utilization.
    pub fn utilization(&self) -> f64 {
        self.scaled_weighted_utilization
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn is_warming_down(&self) -> bool {
        self.warm_down_armed
    }

    /// One tick of the warm-down: with no events arriving, keep sliding so
    /// utilization decays toward zero rather than freezing at its last
    /// value. Returns whether another tick is needed.
    pub fn warm_down_tick(&mut self) -> bool {
        if !self.warm_down_armed {
            return false;
        }
        self.slide_window_to(self.current_window_start + WINDOW_WIDTH + WARM_DOWN_TICK_MS as f64);
        if self.utilization() > IDLE_FRACTION * self.max_utilization {
            // Keep going until we can be idle.
            true
        } else {
            self.window_history = [0.0; 3];
            self.update_weighted_utilization();
            self.warm_down_armed = false;
            false
        }
    }

    // Slides the window until `to_time` falls inside it, computing one
    // utilization sample per slide and appending it to the graph at the
    // marker position.
    //
    // A `to_time` before the current window start means a buffered event
    // arrived late: the samples recorded for that stretch assumed the
    // thread was idle and are now wrong, so they are truncated off the
    // graph and the window rewound before recomputing forward.
    fn slide_window_to(&mut self, to_time: f64) {
        if to_time < self.current_window_start {
            let time_to_go_back = self.current_window_start - to_time;
            let invalid = (time_to_go_back / WINDOW_SLIDE_INCREMENT).ceil() as usize;
            let invalid = invalid.min(self.graph.data().len());

            self.graph.data_mut().truncate_by(invalid);
            self.current_window_start -= invalid as f64 * WINDOW_SLIDE_INCREMENT;
            self.current_marker = self.current_window_start;
        }

        loop {
            let window_end = self.current_window_start + WINDOW_WIDTH;
            if to_time < window_end {
                break;
            }
            // to_time is at or past the right edge of the window.
            let remainder_in_window = window_end - self.current_marker;
            if self.event_depth > 0 {
                // Blocking all the way through the remainder.
                self.blocked_time_in_window =
                    WINDOW_WIDTH.min(self.blocked_time_in_window + remainder_in_window);
            } else {
                // Not blocking, so the remainder of the window is idle.
                self.blocked_time_in_window =
                    (self.blocked_time_in_window - remainder_in_window).max(0.0);
            }

            self.current_window_start += WINDOW_SLIDE_INCREMENT;
            // Pull the marker along if the slide passed it.
            self.current_marker = self.current_marker.max(self.current_window_start);

            self.window_history[0] = self.window_history[1];
            self.window_history[1] = self.window_history[2];
            self.window_history[2] = self.blocked_time_in_window / WINDOW_WIDTH;
            self.update_weighted_utilization();

            // Log the sample at the marker so peaks line up with the
            // events that caused them.
            let value = self.utilization();
            self.graph.add_data(self.current_marker, value);
        }
    }

    fn update_weighted_utilization(&mut self) {
        let weighted: f64 = self
            .window_history
            .iter()
            .zip(WINDOW_WEIGHTS)
            .map(|(window, weight)| window * weight)
            .sum();
        self.scaled_weighted_utilization = weighted * self.max_utilization;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::data::ModelData;
    use crate::domain::graph::Axis;

    const MAX_UTILIZATION: f64 = 100.0;

    fn utilization() -> ThreadUtilization {
        let graph = GraphModel::regular(
            ModelData::new(),
            Axis::default(),
            Axis::default(),
            MIN_DATA_RESOLUTION,
        );
        ThreadUtilization::new(graph, MAX_UTILIZATION)
    }

    fn assert_near(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.0001,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_saturation() {
        let mut utilization = utilization();
        utilization.enter_blocking(0.0);

        // The minimum time to reach 100% is filling 3 sliding windows:
        // two slides plus a window width.
        let release_time = WINDOW_WIDTH + 2.0 * WINDOW_SLIDE_INCREMENT;
        utilization.release_blocking(release_time);

        assert_near(utilization.graph().max_encountered_value(), MAX_UTILIZATION);
        assert_near(utilization.graph().range_value(release_time), MAX_UTILIZATION);
    }

    #[test]
    fn test_re_entrancy() {
        let mut utilization = utilization();
        utilization.enter_blocking(0.0);
        utilization.release_blocking(200.0);
        // Re-entrant pair with timestamps inside the released interval.
        utilization.enter_blocking(150.0);
        utilization.release_blocking(190.0);

        let max = utilization.graph().max_encountered_value();
        assert_near(max, 100.0);
        assert_near(utilization.graph().range_value(200.0), max);
        assert_near(utilization.graph().range_value(150.0), max);
    }

    #[test]
    fn test_out_of_order_invalidation() {
        let mut utilization = utilization();
        utilization.enter_blocking(0.0);
        utilization.release_blocking(100.0);

        // A far-future zero-width event forces the window forward,
        // cooling utilization off the same way the warm-down would.
        utilization.enter_blocking(600.0);
        utilization.release_blocking(600.0);
        assert_near(utilization.graph().range_value(600.0), 0.0);

        // A late-arriving blocking interval occupies the cooled stretch;
        // the stale samples must be invalidated and recomputed.
        utilization.enter_blocking(150.0);
        utilization.release_blocking(400.0);

        assert_near(utilization.graph().range_value(400.0), 100.0);
        assert_near(utilization.graph().range_value(600.0), 100.0);
    }

    #[test]
    fn test_convergence_toward_duty_cycle() {
        let mut utilization = utilization();

        // Alternate blocked/idle at half a window each, shooting for
        // convergence around 50%.
        let half_window = WINDOW_WIDTH / 2.0;
        utilization.enter_blocking(0.0);
        utilization.release_blocking(half_window);
        utilization.enter_blocking(2.0 * half_window);
        utilization.release_blocking(3.0 * half_window);
        utilization.enter_blocking(4.0 * half_window);
        utilization.release_blocking(5.0 * half_window);

        let target = 50.0;
        let threshold = 20.0;
        let within = |value: f64| (value - target).abs() <= threshold;

        assert!(within(utilization.graph().range_value(4.0 * half_window)));
        assert!(within(utilization.graph().range_value(5.0 * half_window)));
        assert!(within(utilization.graph().max_encountered_value()));
    }

    #[test]
    fn test_warm_down_converges_to_zero() {
        let mut utilization = utilization();
        utilization.enter_blocking(0.0);
        let release_time = WINDOW_WIDTH + 2.0 * WINDOW_SLIDE_INCREMENT;
        utilization.release_blocking(release_time);
        assert!(utilization.is_warming_down());

        let mut ticks = 0;
        while utilization.warm_down_tick() {
            ticks += 1;
            assert!(ticks < 100, "warm-down failed to converge");
        }

        assert!(!utilization.is_warming_down());
        assert_near(utilization.utilization(), 0.0);
        assert_near(
            utilization
                .graph()
                .range_value(release_time + WARM_DOWN_TICK_MS as f64),
            0.0,
        );
        // Disarmed: further ticks are no-ops.
        assert!(!utilization.warm_down_tick());
    }
}
