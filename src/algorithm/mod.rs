mod dijkstra;
mod graph;
mod optimize;
mod spfa;
mod spfa_double_way;
mod waypoint;

pub use optimize::optimize_waypoints;
pub use waypoint::{WayPoint, WayPointList};

use tracing::trace;

use self::graph::FaceGraph;
use crate::error::{NavMeshError, Result};
use crate::math::Point3;
use crate::navigation_mesh::{EdgeIndex, FaceIndex, NavigationMesh};

/// Search strategy of a [`PathFinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathFinderAlgorithm {
    /// Dijkstra's algorithm. Always returns a shortest face chain.
    #[default]
    DijkstraShortestPath,
    /// SPFA with the Small Label First queue rule. Returns the same chains
    /// as [`DijkstraShortestPath`](Self::DijkstraShortestPath).
    Spfa,
    /// Bidirectional SPFA that stops at the first meeting. Uses less work
    /// per query but may return a longer chain than the other two.
    SpfaDoubleWay,
}

impl PathFinderAlgorithm {
    /// The algorithm used when none is specified.
    pub const DEFAULT: Self = Self::DijkstraShortestPath;
}

impl TryFrom<u32> for PathFinderAlgorithm {
    type Error = NavMeshError;

    /// Maps `0`, `1` and `2` to the algorithms in declaration order.
    fn try_from(id: u32) -> Result<Self> {
        match id {
            0 => Ok(Self::DijkstraShortestPath),
            1 => Ok(Self::Spfa),
            2 => Ok(Self::SpfaDoubleWay),
            _ => Err(NavMeshError::InvalidAlgorithm(id)),
        }
    }
}

/// Finds paths between faces, or between points above the floor, of a
/// [`NavigationMesh`].
///
/// Borrows the mesh for its whole lifetime. The face graph is built once
/// in [`PathFinder::new`] and reflects the mesh at that time.
#[derive(Debug)]
pub struct PathFinder<'a> {
    mesh: &'a NavigationMesh,
    graph: FaceGraph,
    algorithm: PathFinderAlgorithm,
}

impl<'a> PathFinder<'a> {
    /// Builds the face graph of `mesh` for the given algorithm.
    #[must_use]
    pub fn new(mesh: &'a NavigationMesh, algorithm: PathFinderAlgorithm) -> Self {
        let graph = FaceGraph::build(mesh);
        trace!(?algorithm, faces = graph.len(), "built path finder");
        Self {
            mesh,
            graph,
            algorithm,
        }
    }

    /// Like [`PathFinder::new`], with the algorithm given by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`NavMeshError::InvalidAlgorithm`] for an unknown id.
    pub fn with_algorithm_id(mesh: &'a NavigationMesh, id: u32) -> Result<Self> {
        Ok(Self::new(mesh, PathFinderAlgorithm::try_from(id)?))
    }

    /// The algorithm chosen at construction.
    #[must_use]
    pub fn algorithm(&self) -> PathFinderAlgorithm {
        self.algorithm
    }

    /// The mesh this path finder searches.
    #[must_use]
    pub fn navigation_mesh(&self) -> &'a NavigationMesh {
        self.mesh
    }

    /// Finds a chain of adjacent faces from `from` to `to`, both inclusive.
    ///
    /// Each waypoint sits at its face center. The list is empty if either
    /// face does not exist or no path connects them; `from == to` gives a
    /// single waypoint.
    #[must_use]
    pub fn find_path(&self, from: FaceIndex, to: FaceIndex) -> WayPointList {
        if !self.graph.contains(from) || !self.graph.contains(to) {
            trace!(from, to, "path endpoint out of range");
            return WayPointList::new();
        }
        if !self.graph.connected(from, to) {
            trace!(from, to, "path endpoints are not connected");
            return WayPointList::new();
        }

        let faces = match self.algorithm {
            PathFinderAlgorithm::DijkstraShortestPath => dijkstra::search(&self.graph, from, to),
            PathFinderAlgorithm::Spfa => spfa::search(&self.graph, from, to),
            PathFinderAlgorithm::SpfaDoubleWay => spfa_double_way::search(&self.graph, from, to),
        };
        let Some(faces) = faces else {
            trace!(from, to, "no path found");
            return WayPointList::new();
        };
        trace!(from, to, len = faces.len(), "found path");

        let mut previous = None;
        faces
            .into_iter()
            .map(|face| {
                let entry_edge = previous.and_then(|p| self.graph.shared_edge(p, face));
                previous = Some(face);
                self.centered_waypoint(face, entry_edge)
            })
            .collect()
    }

    /// Finds a path between two scene-space points.
    ///
    /// Both points are resolved to the floor below them with
    /// [`NavigationMesh::find_floor`]. The first and last waypoints are moved
    /// to those floor points; the rest sit at their face centers. When both
    /// points land on the same face the path has two waypoints on that face.
    /// The list is empty if either point has no floor below it or the faces
    /// are not connected.
    #[must_use]
    pub fn find_path_between(&self, from: &Point3, to: &Point3) -> WayPointList {
        let Some(start) = self.mesh.find_floor(from) else {
            trace!(?from, "no floor below path start");
            return WayPointList::new();
        };
        let Some(end) = self.mesh.find_floor(to) else {
            trace!(?to, "no floor below path end");
            return WayPointList::new();
        };

        let mut waypoints = if start.face == end.face {
            let waypoint = self.centered_waypoint(start.face, None);
            vec![waypoint, waypoint]
        } else {
            self.find_path(start.face, end.face)
        };

        if let Some(first) = waypoints.first_mut() {
            first.place_at(start.position);
        }
        if let Some(last) = waypoints.last_mut() {
            last.place_at(end.position);
        }
        waypoints
    }

    fn centered_waypoint(&self, face: FaceIndex, entry_edge: Option<EdgeIndex>) -> WayPoint {
        let center = self.mesh.point_local_to_scene(&self.graph.center(face));
        WayPoint::new(face, center, entry_edge)
    }
}
