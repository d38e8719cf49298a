use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::graph::{shortest_chain, FaceGraph};
use crate::navigation_mesh::FaceIndex;

/// Heap entry. Ordered so that [`BinaryHeap`] pops the smallest cost first,
/// and the smallest face index among equal costs.
#[derive(Debug, Clone, Copy)]
struct State {
    cost: f32,
    face: FaceIndex,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.face.cmp(&self.face))
    }
}

/// Shortest face chain from `from` to `to`, both inclusive.
pub(super) fn search(graph: &FaceGraph, from: FaceIndex, to: FaceIndex) -> Option<Vec<FaceIndex>> {
    let mut dist = vec![f32::INFINITY; graph.len()];
    let mut prev: Vec<Option<FaceIndex>> = vec![None; graph.len()];
    let mut heap = BinaryHeap::new();

    dist[usize::from(from)] = 0.0;
    heap.push(State {
        cost: 0.0,
        face: from,
    });

    while let Some(State { cost, face }) = heap.pop() {
        if face == to {
            return Some(shortest_chain(graph, &dist, &prev, from, to));
        }
        if cost > dist[usize::from(face)] {
            continue;
        }

        for link in graph.links(face) {
            let alt = cost + link.weight;
            let slot = usize::from(link.face);
            if alt < dist[slot] {
                dist[slot] = alt;
                prev[slot] = Some(face);
                heap.push(State {
                    cost: alt,
                    face: link.face,
                });
            }
        }
    }
    None
}
