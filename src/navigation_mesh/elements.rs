use crate::math::{Point3, Vector3};

/// Index of a vertex in a [`NavigationMesh`](super::NavigationMesh).
pub type VertexIndex = u16;

/// Index of an edge in a [`NavigationMesh`](super::NavigationMesh).
pub type EdgeIndex = u16;

/// Index of a face in a [`NavigationMesh`](super::NavigationMesh).
pub type FaceIndex = u16;

/// Sentinel face index marking a mesh boundary in [`Edge::face`].
pub const NULL_FACE: FaceIndex = u16::MAX;

/// Sentinel edge index.
pub const NULL_EDGE: EdgeIndex = u16::MAX;

/// Upper bound on vertex, edge and face counts.
///
/// Keeps every valid index strictly below the sentinels.
pub const MAX_ELEMENT_COUNT: usize = u16::MAX as usize;

/// A mesh vertex in local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position of the vertex.
    pub coordinates: Point3,
}

/// A mesh edge joining two vertices, with the faces on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// The two end vertices.
    pub vertex: [VertexIndex; 2],
    /// The faces sharing this edge. [`NULL_FACE`] marks a missing side.
    pub face: [FaceIndex; 2],
}

impl Edge {
    /// Returns `true` if the edge borders only one face.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.face.contains(&NULL_FACE)
    }

    /// Returns the face on the other side of the edge from `face`.
    ///
    /// `None` if the edge is a boundary or does not border `face` at all.
    #[must_use]
    pub fn opposite_face(&self, face: FaceIndex) -> Option<FaceIndex> {
        let other = match self.face {
            [a, b] if a == face => b,
            [a, b] if b == face => a,
            _ => return None,
        };
        (other != NULL_FACE && other != face).then_some(other)
    }
}

/// A triangular mesh face.
///
/// `edge[i]` joins `vertex[i]` and `vertex[(i + 1) % 3]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Corner vertices.
    pub vertex: [VertexIndex; 3],
    /// Side edges, co-indexed with `vertex`.
    pub edge: [EdgeIndex; 3],
    /// Unit normal.
    pub normal: Vector3,
    /// Barycentric center.
    pub center: Point3,
}
