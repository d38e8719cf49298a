use std::collections::VecDeque;

use super::graph::{shortest_chain, FaceGraph};
use crate::navigation_mesh::FaceIndex;

/// Shortest face chain from `from` to `to` using SPFA with the Small Label
/// First rule: a relaxed face goes to the front of the queue when its
/// distance is below that of the current front, otherwise to the back.
pub(super) fn search(graph: &FaceGraph, from: FaceIndex, to: FaceIndex) -> Option<Vec<FaceIndex>> {
    let mut dist = vec![f32::INFINITY; graph.len()];
    let mut prev: Vec<Option<FaceIndex>> = vec![None; graph.len()];
    let mut queued = vec![false; graph.len()];
    let mut queue = VecDeque::from([from]);

    dist[usize::from(from)] = 0.0;
    queued[usize::from(from)] = true;

    while let Some(face) = queue.pop_front() {
        queued[usize::from(face)] = false;
        let cost = dist[usize::from(face)];

        for link in graph.links(face) {
            let slot = usize::from(link.face);
            let alt = cost + link.weight;
            if alt >= dist[slot] {
                continue;
            }
            dist[slot] = alt;
            prev[slot] = Some(face);

            if !queued[slot] {
                queued[slot] = true;
                match queue.front() {
                    Some(&front) if alt < dist[usize::from(front)] => queue.push_front(link.face),
                    _ => queue.push_back(link.face),
                }
            }
        }
    }

    dist[usize::from(to)]
        .is_finite()
        .then(|| shortest_chain(graph, &dist, &prev, from, to))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::algorithm::dijkstra;
    use crate::test_support::{grid, islands, jittered_grid, strip};

    #[test]
    fn corridor_walks_every_face() {
        let mesh = strip(3);
        let graph = FaceGraph::build(&mesh);
        assert_eq!(search(&graph, 1, 4).unwrap(), vec![1, 0, 3, 2, 5, 4]);
    }

    #[test]
    fn unreachable_target() {
        let mesh = islands();
        let graph = FaceGraph::build(&mesh);
        assert!(search(&graph, 3, 9).is_none());
    }

    #[test]
    fn source_is_target() {
        let mesh = strip(1);
        let graph = FaceGraph::build(&mesh);
        assert_eq!(search(&graph, 1, 1).unwrap(), vec![1]);
    }

    #[test]
    fn agrees_with_dijkstra_on_symmetric_grid() {
        let ticks = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mesh = grid(&ticks, &ticks, 0.0, &[]);
        let graph = FaceGraph::build(&mesh);
        for from in mesh.face_indices() {
            for to in mesh.face_indices() {
                assert_eq!(
                    search(&graph, from, to),
                    dijkstra::search(&graph, from, to),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn agrees_with_dijkstra() {
        let mesh = jittered_grid(6, 5, 29);
        let graph = FaceGraph::build(&mesh);
        let faces: Vec<_> = mesh.face_indices().collect();
        for &from in faces.iter().step_by(7) {
            for &to in faces.iter().step_by(5) {
                assert_eq!(
                    search(&graph, from, to),
                    dijkstra::search(&graph, from, to),
                    "{from} -> {to}"
                );
            }
        }
    }
}
