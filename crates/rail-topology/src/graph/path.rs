//! Drawable station sequences for classified components.
//!
//! Simple shapes are walked neighbour by neighbour. Branching shapes get a
//! depth-first tour bounded by the component's edge count.
//!
//! ## Edge budget
//!
//! The tour spends one unit of budget per station entered, and stops as soon
//! as it has entered `edge_count + 1` stations. Trees are fully covered, but
//! every loop closing edge is entered from both sides, so a component with
//! loops can lose stations at the tail of the tour. Downstream rendering is
//! built around this shape; do not widen the budget to a full Euler tour.

use crate::graph::component::Component;
use crate::models::types::TopologyKind;

/// Station sequence produced for one component
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentPath {
    pub kind: TopologyKind,
    /// Railway-local station indices in drawing order. Empty for [`TopologyKind::None`].
    pub stations: Vec<usize>,
}

/// Classify `component` and trace its path
pub fn generate_path(component: &Component) -> ComponentPath {
    let kind = component.kind();

    let slots = match (kind, component.pick_start()) {
        (TopologyKind::None, _) | (_, None) => Vec::new(),
        (TopologyKind::LinearList, Some(start)) => walk_open(component, start),
        (TopologyKind::Circle, Some(start)) => walk_closed(component, start),
        (TopologyKind::WithLoop, Some(start)) => walk_lollipop(component, start),
        (TopologyKind::WithBranches, Some(start)) => tour(component, start),
    };

    ComponentPath {
        kind,
        stations: slots.into_iter().map(|slot| component.node(slot).station).collect(),
    }
}

/// Next slot when leaving `current`, having arrived from `previous`:
/// the first neighbour unless we came from it, otherwise the second.
fn step(component: &Component, current: usize, previous: Option<usize>) -> Option<usize> {
    let neighbors = &component.node(current).neighbors;
    match neighbors.first() {
        Some(&first) if Some(first) != previous => Some(first),
        Some(_) => neighbors.get(1).copied(),
        None => None,
    }
}

fn walk_open(component: &Component, start: usize) -> Vec<usize> {
    let mut path = vec![start];
    let mut previous = None;
    let mut current = start;

    while path.len() < component.len() {
        let Some(next) = step(component, current, previous) else {
            break;
        };
        path.push(next);
        previous = Some(current);
        current = next;
    }

    path
}

fn walk_closed(component: &Component, start: usize) -> Vec<usize> {
    let mut path = vec![start];
    let mut previous = None;
    let mut current = start;

    while path.len() <= component.len() {
        let Some(next) = step(component, current, previous) else {
            break;
        };
        path.push(next);
        if next == start {
            break;
        }
        previous = Some(current);
        current = next;
    }

    path
}

/// Walk from the free end, once around the loop, and stop on returning to
/// the junction.
fn walk_lollipop(component: &Component, start: usize) -> Vec<usize> {
    let mut path = vec![start];
    let mut previous = None;
    let mut current = start;
    let mut junction_seen = false;

    while path.len() <= 2 * component.len() {
        let Some(next) = step(component, current, previous) else {
            break;
        };
        path.push(next);

        if component.node(next).degree == 3 {
            if junction_seen {
                break;
            }
            junction_seen = true;
        }

        previous = Some(current);
        current = next;
    }

    path
}

struct Frame {
    slot: usize,
    predecessor: Option<usize>,
    cursor: usize,
}

/// Budgeted depth-first tour. Each station is appended on entry and again
/// after each child returns; already-visited stations are appended but not
/// expanded.
fn tour(component: &Component, start: usize) -> Vec<usize> {
    let mut budget = component.edge_count();
    let mut visited = vec![false; component.len()];
    let mut path = vec![start];

    if budget == 0 {
        return path;
    }
    budget -= 1;
    visited[start] = true;

    let mut stack = vec![Frame {
        slot: start,
        predecessor: None,
        cursor: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let neighbors = &component.node(frame.slot).neighbors;
        let child = loop {
            match neighbors.get(frame.cursor) {
                Some(&n) => {
                    frame.cursor += 1;
                    if Some(n) != frame.predecessor {
                        break Some(n);
                    }
                }
                None => break None,
            }
        };

        let Some(child) = child else {
            stack.pop();
            if let Some(parent) = stack.last() {
                path.push(parent.slot);
            }
            continue;
        };

        let parent = frame.slot;
        path.push(child);
        if budget == 0 {
            break;
        }
        budget -= 1;

        if visited[child] {
            path.push(parent);
        } else {
            visited[child] = true;
            stack.push(Frame {
                slot: child,
                predecessor: Some(parent),
                cursor: 0,
            });
        }
    }

    path
}
