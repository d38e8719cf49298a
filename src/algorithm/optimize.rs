use super::waypoint::{WayPoint, WayPointList};
use crate::math::segment_2d::segments_cross_2d;
use crate::math::{plane_basis, Point2, Point3};
use crate::navigation_mesh::NavigationMesh;

/// Drops waypoints that can be skipped in a straight line.
///
/// Works on a path returned by a [`PathFinder`](super::PathFinder). From
/// each kept waypoint, the walk jumps to the furthest later waypoint whose
/// face center is reachable by a straight segment that crosses every edge
/// the path enters through in between. Segments are tested in the plane
/// perpendicular to gravity. The first and last waypoints are always kept,
/// and kept waypoints are returned unchanged.
#[must_use]
pub fn optimize_waypoints(mesh: &NavigationMesh, waypoints: &[WayPoint]) -> WayPointList {
    if waypoints.len() <= 2 {
        return waypoints.to_vec();
    }
    let Some((u, v)) = plane_basis(&mesh.gravity_vector()) else {
        return waypoints.to_vec();
    };
    let project = |p: &Point3| Point2::new(p.coords.dot(&u), p.coords.dot(&v));

    let center = |wp: &WayPoint| {
        mesh.face(wp.navigation_mesh_face_index())
            .map(|face| project(&face.center))
    };
    let portal = |wp: &WayPoint| {
        let edge = mesh.edge(wp.entry_edge()?)?;
        let [a, b] = edge.vertex;
        Some((
            project(&mesh.vertex(a)?.coordinates),
            project(&mesh.vertex(b)?.coordinates),
        ))
    };
    let visible = |from: usize, to: usize| {
        let (Some(start), Some(end)) = (center(&waypoints[from]), center(&waypoints[to])) else {
            return false;
        };
        waypoints[from + 1..=to].iter().all(|wp| {
            portal(wp).is_some_and(|(a, b)| segments_cross_2d(&start, &end, &a, &b))
        })
    };

    let last = waypoints.len() - 1;
    let mut kept = vec![waypoints[0]];
    let mut anchor = 0;
    while anchor < last {
        let reach = (anchor + 2..=last)
            .take_while(|&k| visible(anchor, k))
            .last()
            .unwrap_or(anchor + 1);
        kept.push(waypoints[reach]);
        anchor = reach;
    }
    kept
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::algorithm::{PathFinder, PathFinderAlgorithm};
    use crate::test_support::{grid, strip};

    #[test]
    fn straight_corridor_collapses_to_endpoints() {
        let mesh = strip(4);
        let finder = PathFinder::new(&mesh, PathFinderAlgorithm::DEFAULT);
        let path = finder.find_path(1, 6);
        assert_eq!(path.len(), 8);

        let optimized = optimize_waypoints(&mesh, &path);
        assert_eq!(optimized.len(), 2);
        assert_eq!(optimized[0], path[0]);
        assert_eq!(optimized[1], path[7]);
    }

    #[test]
    fn corner_is_kept() {
        // L shape: bottom row plus left column
        let mesh = grid(
            &[0.0, 1.0, 2.0, 3.0],
            &[0.0, 1.0, 2.0, 3.0],
            0.0,
            &[(1, 1), (2, 1), (1, 2), (2, 2)],
        );
        let finder = PathFinder::new(&mesh, PathFinderAlgorithm::DEFAULT);
        let from = 5; // upper triangle of cell (2, 0)
        let to = mesh.face_indices().last().unwrap(); // cell (0, 2)
        let path = finder.find_path(from, to);
        assert!(path.len() > 3);

        let optimized = optimize_waypoints(&mesh, &path);
        assert!(optimized.len() >= 3);
        assert!(optimized.len() < path.len());
        assert_eq!(optimized.first(), path.first());
        assert_eq!(optimized.last(), path.last());

        // Kept waypoints are a subsequence of the path
        let mut rest = path.iter();
        for wp in &optimized {
            assert!(rest.any(|p| p == wp));
        }
    }

    #[test]
    fn short_paths_are_unchanged() {
        let mesh = strip(1);
        let finder = PathFinder::new(&mesh, PathFinderAlgorithm::DEFAULT);
        let path = finder.find_path(0, 1);
        assert_eq!(optimize_waypoints(&mesh, &path), path);
        assert!(optimize_waypoints(&mesh, &[]).is_empty());
    }
}
