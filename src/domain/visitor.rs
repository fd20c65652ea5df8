// Visitor dispatch over trace event trees
use crate::domain::event::{EventKind, TraceEvent};
use std::collections::HashMap;

/// Maximum number of log-carrying children tolerated before we stop
/// marking them, a guard against auto-opening huge trees in the viewer.
pub const CHILDREN_WITH_LOGS_THRESHOLD: usize = 20;

/// A visitor applied to each node of an event tree. `post_process` runs
/// once after the full traversal.
pub trait EventVisitor {
    fn visit(&mut self, event: &mut TraceEvent);

    fn post_process(&mut self) {}
}

/// Walks the tree once, applying all pre-order visitors on the way down
/// and all post-order visitors on the way up, then runs each visitor's
/// post-processing step.
pub fn traverse(
    pre_order: &mut [&mut dyn EventVisitor],
    event: &mut TraceEvent,
    post_order: &mut [&mut dyn EventVisitor],
) {
    traverse_impl(pre_order, event, post_order);
    for visitor in pre_order.iter_mut() {
        visitor.post_process();
    }
    for visitor in post_order.iter_mut() {
        visitor.post_process();
    }
}

pub fn traverse_pre_order(pre_order: &mut [&mut dyn EventVisitor], event: &mut TraceEvent) {
    traverse(pre_order, event, &mut []);
}

pub fn traverse_post_order(event: &mut TraceEvent, post_order: &mut [&mut dyn EventVisitor]) {
    traverse(&mut [], event, post_order);
}

fn traverse_impl(
    pre_order: &mut [&mut dyn EventVisitor],
    event: &mut TraceEvent,
    post_order: &mut [&mut dyn EventVisitor],
) {
    for visitor in pre_order.iter_mut() {
        visitor.visit(event);
    }
    for child in event.children.iter_mut() {
        traverse_impl(pre_order, child, post_order);
    }
    for visitor in post_order.iter_mut() {
        visitor.visit(event);
    }
}

/// Post-order visitor computing each node's self time (duration minus the
/// children's durations) and accumulating per-kind self-time totals.
#[derive(Debug, Default)]
pub struct SelfTimeVisitor {
    type_durations: HashMap<EventKind, f64>,
}

impl SelfTimeVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_durations(&self) -> &HashMap<EventKind, f64> {
        &self.type_durations
    }

    pub fn into_type_durations(self) -> HashMap<EventKind, f64> {
        self.type_durations
    }
}

impl EventVisitor for SelfTimeVisitor {
    fn visit(&mut self, event: &mut TraceEvent) {
        let child_time: f64 = event.children.iter().map(|child| child.duration).sum();
        event.self_time = event.duration - child_time;
        *self.type_durations.entry(event.kind).or_insert(0.0) += event.self_time;
    }
}

/// Post-order visitor propagating `has_user_logs` upward from log-message
/// nodes, capped at `CHILDREN_WITH_LOGS_THRESHOLD` marked children per
/// parent.
#[derive(Debug, Default)]
pub struct UserLogVisitor;

impl EventVisitor for UserLogVisitor {
    fn visit(&mut self, event: &mut TraceEvent) {
        // Children were already visited, so their flags reflect their
        // whole subtrees.
        let mut count = 0;
        for child in event.children.iter_mut() {
            if child.has_user_logs {
                count += 1;
                if count > CHILDREN_WITH_LOGS_THRESHOLD {
                    child.has_user_logs = false;
                }
            }
        }
        event.has_user_logs = event.kind == EventKind::LogMessage || count > 0;
    }
}

/// Runs the self-time annotation pass over an owned tree and returns the
/// per-kind self-time totals.
pub fn annotate_self_time(root: &mut TraceEvent) -> HashMap<EventKind, f64> {
    let mut visitor = SelfTimeVisitor::new();
    traverse_post_order(root, &mut [&mut visitor]);
    visitor.into_type_durations()
}

pub fn annotate_user_logs(root: &mut TraceEvent) {
    let mut visitor = UserLogVisitor;
    traverse_post_order(root, &mut [&mut visitor]);
}
