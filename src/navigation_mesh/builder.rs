use std::collections::HashMap;

use tracing::debug;

use super::{check_count, Edge, Face, NavigationMesh, Vertex, NULL_FACE};
use crate::error::{Result, TopologyError};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Builds a [`NavigationMesh`] from raw triangles.
///
/// Vertices with identical coordinates are merged onto the first of them,
/// so triangles that were split apart by per-corner attributes in an
/// authoring tool still come out connected. Faces and edges reference the
/// merged vertex; the vertex array itself is kept as given, so later
/// duplicates are left unreferenced.
#[derive(Debug, Clone)]
pub struct NavigationMeshBuilder {
    positions: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
    gravity: Vector3,
}

impl NavigationMeshBuilder {
    /// Creates a builder over vertex positions and triangles indexing them.
    ///
    /// Gravity defaults to `(0, 0, -1)`.
    #[must_use]
    pub fn new(positions: Vec<Point3>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            positions,
            triangles,
            gravity: Vector3::new(0.0, 0.0, -1.0),
        }
    }

    /// Sets the down direction. It is normalized on build.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builds the mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if a triangle indexes a missing vertex or is
    /// degenerate, an edge is shared by more than two triangles, an element
    /// count exceeds [`MAX_ELEMENT_COUNT`](super::MAX_ELEMENT_COUNT), or gravity has zero length.
    pub fn build(&self) -> Result<NavigationMesh> {
        check_count("vertex", self.positions.len())?;
        check_count("face", self.triangles.len())?;
        let gravity = self
            .gravity
            .try_normalize(f32::EPSILON)
            .ok_or(TopologyError::ZeroGravity)?;

        let canonical = self.canonical_vertices();

        let mut edge_lookup: HashMap<(usize, usize), usize> = HashMap::new();
        let mut edge_vertices: Vec<[usize; 2]> = Vec::new();
        let mut edge_faces: Vec<Vec<usize>> = Vec::new();
        let mut faces = Vec::with_capacity(self.triangles.len());

        for (index, triangle) in self.triangles.iter().enumerate() {
            let corners = self.corners(index, triangle)?;
            let [a, b, c] = corners;
            let normal = (b - a).cross(&(c - a));
            let area2 = normal.norm();
            let key = triangle.map(|v| canonical[v]);
            if area2 < TOLERANCE * TOLERANCE || key[0] == key[1] || key[1] == key[2] || key[2] == key[0]
            {
                return Err(TopologyError::DegenerateFace(index).into());
            }

            let mut face_edges = [0usize; 3];
            for i in 0..3 {
                let (v0, v1) = (key[i], key[(i + 1) % 3]);
                let edge_key = (v0.min(v1), v0.max(v1));
                let edge = *edge_lookup.entry(edge_key).or_insert_with(|| {
                    edge_vertices.push([v0, v1]);
                    edge_faces.push(Vec::with_capacity(2));
                    edge_vertices.len() - 1
                });
                if edge_faces[edge].len() == 2 {
                    return Err(TopologyError::NonManifoldEdge(edge_key.0, edge_key.1).into());
                }
                edge_faces[edge].push(index);
                face_edges[i] = edge;
            }

            faces.push((
                key,
                face_edges,
                normal / area2,
                Point3::from((a.coords + b.coords + c.coords) / 3.0),
            ));
        }
        check_count("edge", edge_vertices.len())?;

        let vertices = self
            .positions
            .iter()
            .map(|&coordinates| Vertex { coordinates })
            .collect();
        let edges = edge_vertices
            .iter()
            .zip(&edge_faces)
            .map(|(&[v0, v1], sides)| Edge {
                vertex: [narrow(v0), narrow(v1)],
                face: [
                    sides.first().map_or(NULL_FACE, |&f| narrow(f)),
                    sides.get(1).map_or(NULL_FACE, |&f| narrow(f)),
                ],
            })
            .collect::<Vec<_>>();
        let faces = faces
            .into_iter()
            .map(|(vertex, edge, normal, center)| Face {
                vertex: vertex.map(narrow),
                edge: edge.map(narrow),
                normal,
                center,
            })
            .collect();

        debug!(
            vertices = self.positions.len(),
            edges = edges.len(),
            faces = self.triangles.len(),
            "built navigation mesh from triangles"
        );
        NavigationMesh::from_parts(vertices, edges, faces, gravity)
    }

    /// Maps each vertex to the first vertex with the same coordinates.
    fn canonical_vertices(&self) -> Vec<usize> {
        let mut first_seen: HashMap<[u32; 3], usize> = HashMap::new();
        self.positions
            .iter()
            .enumerate()
            .map(|(index, p)| {
                // Adding zero folds -0.0 into 0.0
                let key = [p.x + 0.0, p.y + 0.0, p.z + 0.0].map(f32::to_bits);
                *first_seen.entry(key).or_insert(index)
            })
            .collect()
    }

    fn corners(&self, index: usize, triangle: &[usize; 3]) -> Result<[Point3; 3]> {
        let mut corners = [Point3::origin(); 3];
        for (corner, &vertex) in corners.iter_mut().zip(triangle) {
            *corner = *self.positions.get(vertex).ok_or(TopologyError::IndexOutOfRange {
                kind: "face",
                index,
                target: "vertex",
                value: vertex,
                limit: self.positions.len(),
            })?;
        }
        Ok(corners)
    }
}

/// Narrows an index already checked against [`MAX_ELEMENT_COUNT`](super::MAX_ELEMENT_COUNT).
#[allow(clippy::cast_possible_truncation)]
fn narrow(index: usize) -> u16 {
    index as u16
}
