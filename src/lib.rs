pub mod algorithm;
pub mod error;
pub mod loader;
pub mod math;
pub mod navigation_mesh;

#[cfg(test)]
mod test_support;

pub use algorithm::{optimize_waypoints, PathFinder, PathFinderAlgorithm, WayPoint, WayPointList};
pub use error::{FormatError, NavMeshError, Result, TopologyError};
pub use loader::NavigationMeshFactory;
pub use navigation_mesh::{
    Edge, EdgeIndex, Face, FaceIndex, FloorHit, FloorSearchParams, NavigationMesh,
    NavigationMeshBuilder, Vertex, VertexIndex, NULL_EDGE, NULL_FACE,
};
