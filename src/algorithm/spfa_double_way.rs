use std::collections::VecDeque;

use super::graph::{trace_back, FaceGraph};
use crate::math::Vector3;
use crate::navigation_mesh::FaceIndex;

/// Weight of the direction bias in the queue order. `0.0` orders by
/// distance alone.
const PRIORITY_SCALE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Forward,
    Backward,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Side::Forward => Side::Backward,
            Side::Backward => Side::Forward,
        }
    }
}

struct Search {
    dist: Vec<f32>,
    priority: Vec<Option<f32>>,
    prev_forward: Vec<Option<FaceIndex>>,
    prev_backward: Vec<Option<FaceIndex>>,
    claimed: Vec<Option<Side>>,
    queued: Vec<bool>,
}

impl Search {
    fn penalty(&self, face: FaceIndex) -> f32 {
        let slot = usize::from(face);
        self.dist[slot] - self.priority[slot].unwrap_or(0.0) * PRIORITY_SCALE
    }
}

/// Bidirectional SPFA that stops at the first meeting of the two searches.
///
/// Both endpoints are seeded into one queue and share a distance array. A
/// face reached from one side is claimed by that side; the search ends as
/// soon as a side looks at a face claimed by the other. The result always
/// connects the endpoints but is not guaranteed to be the shortest chain.
///
/// Queue order uses the Small Label First rule on a penalized distance that
/// favours faces lying further along the straight line between the endpoint
/// centers.
pub(super) fn search(graph: &FaceGraph, from: FaceIndex, to: FaceIndex) -> Option<Vec<FaceIndex>> {
    if from == to {
        return Some(vec![from]);
    }

    let len = graph.len();
    let mut state = Search {
        dist: vec![f32::INFINITY; len],
        priority: vec![None; len],
        prev_forward: vec![None; len],
        prev_backward: vec![None; len],
        claimed: vec![None; len],
        queued: vec![false; len],
    };

    let source = graph.center(from);
    let target = graph.center(to);
    let direction = (target - source)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros);

    let mut queue = VecDeque::new();
    for (face, side) in [(from, Side::Forward), (to, Side::Backward)] {
        let slot = usize::from(face);
        state.dist[slot] = 0.0;
        state.priority[slot] = Some(0.0);
        state.queued[slot] = true;
        state.claimed[slot] = Some(side);
        queue.push_back((face, side));
    }

    let (forward_end, backward_start) = 'meet: loop {
        let (face, side) = queue.pop_front()?;
        state.queued[usize::from(face)] = false;
        let cost = state.dist[usize::from(face)];

        for link in graph.links(face) {
            let next = link.face;
            let slot = usize::from(next);

            if state.claimed[slot] == Some(side.other()) {
                break 'meet match side {
                    Side::Forward => (face, next),
                    Side::Backward => (next, face),
                };
            }
            state.claimed[slot] = Some(side);

            let alt = cost + link.weight;
            if alt >= state.dist[slot] {
                continue;
            }
            state.dist[slot] = alt;

            let offset = graph.center(next);
            match side {
                Side::Forward => {
                    state.prev_forward[slot] = Some(face);
                    state.priority[slot]
                        .get_or_insert_with(|| direction.dot(&(offset - source)).max(0.0));
                }
                Side::Backward => {
                    state.prev_backward[slot] = Some(face);
                    state.priority[slot]
                        .get_or_insert_with(|| (-direction.dot(&(offset - target))).max(0.0));
                }
            }

            if !state.queued[slot] {
                state.queued[slot] = true;
                match queue.front() {
                    Some(&(front, _)) if state.penalty(next) < state.penalty(front) => {
                        queue.push_front((next, side));
                    }
                    _ => queue.push_back((next, side)),
                }
            }
        }
    };

    let mut path = trace_back(&state.prev_forward, forward_end);
    let mut current = Some(backward_start);
    while let Some(face) = current {
        path.push(face);
        current = state.prev_backward[usize::from(face)];
    }
    Some(path)
}
