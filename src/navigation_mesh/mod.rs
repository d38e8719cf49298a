mod builder;
mod elements;
mod floor;

pub use builder::NavigationMeshBuilder;
pub use elements::{
    Edge, EdgeIndex, Face, FaceIndex, Vertex, VertexIndex, MAX_ELEMENT_COUNT, NULL_EDGE,
    NULL_FACE,
};
pub use floor::{FloorHit, FloorSearchParams};

use std::cell::Cell;

use crate::error::{NavMeshError, Result, TopologyError};
use crate::loader::format;
use crate::math::{transform_direction, transform_point, Matrix4, Point3, Vector3, Vector4};

/// Forward and inverse scene transforms, with the Y flip already folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SceneTransform {
    matrix: Matrix4,
    local_to_scene: Matrix4,
    scene_to_local: Matrix4,
}

impl SceneTransform {
    fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
            local_to_scene: Matrix4::identity(),
            scene_to_local: Matrix4::identity(),
        }
    }

    fn new(matrix: Matrix4) -> Option<Self> {
        let inverse = matrix.try_inverse()?;
        let flip = Matrix4::from_diagonal(&Vector4::new(1.0, -1.0, 1.0, 1.0));
        Some(Self {
            matrix,
            local_to_scene: flip * matrix * flip,
            scene_to_local: flip * inverse * flip,
        })
    }
}

/// A triangulated walkable surface.
///
/// Owns the vertex, edge and face arrays loaded from a navigation mesh blob
/// together with the gravity vector baked in at export time. Geometry lives
/// in the mesh's local authoring space; callers work in scene space, related
/// to local space by the transform given to [`set_scene_transform`].
///
/// The scene uses a Y-down axis convention, so the scene transform is applied
/// in a frame with the Y axis flipped on both sides.
///
/// The scene transform and the last successful floor face are interior
/// state: floor queries take `&self` but update that state, which makes the
/// mesh `!Sync`.
///
/// [`set_scene_transform`]: NavigationMesh::set_scene_transform
#[derive(Debug, Clone)]
pub struct NavigationMesh {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    gravity: Vector3,
    transform: Cell<SceneTransform>,
    floor_params: FloorSearchParams,
    current_face: Cell<Option<FaceIndex>>,
}

impl NavigationMesh {
    /// Assembles a mesh from raw element arrays, checking every cross reference.
    ///
    /// # Errors
    ///
    /// Returns an error if a count exceeds [`MAX_ELEMENT_COUNT`], an index
    /// points past its array, a face side names an edge that does not join
    /// the side's two corners, or the gravity vector has zero length.
    pub fn from_parts(
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
        faces: Vec<Face>,
        gravity: Vector3,
    ) -> Result<Self> {
        check_count("vertex", vertices.len())?;
        check_count("edge", edges.len())?;
        check_count("face", faces.len())?;

        if !(gravity.norm_squared() > f32::EPSILON) {
            return Err(TopologyError::ZeroGravity.into());
        }

        for (index, edge) in edges.iter().enumerate() {
            for &vertex in &edge.vertex {
                check_index("edge", index, "vertex", vertex, vertices.len())?;
            }
            for &face in &edge.face {
                if face != NULL_FACE {
                    check_index("edge", index, "face", face, faces.len())?;
                }
            }
        }

        for (index, face) in faces.iter().enumerate() {
            for &vertex in &face.vertex {
                check_index("face", index, "vertex", vertex, vertices.len())?;
            }
            for &edge in &face.edge {
                check_index("face", index, "edge", edge, edges.len())?;
            }
            for (side, &edge) in face.edge.iter().enumerate() {
                let [a, b] = edges[usize::from(edge)].vertex;
                let (u, v) = (face.vertex[side], face.vertex[(side + 1) % 3]);
                if !((a == u && b == v) || (a == v && b == u)) {
                    return Err(TopologyError::MismatchedEdge {
                        face: index,
                        side,
                        edge: usize::from(edge),
                    }
                    .into());
                }
            }
        }

        Ok(Self {
            vertices,
            edges,
            faces,
            gravity,
            transform: Cell::new(SceneTransform::identity()),
            floor_params: FloorSearchParams::default(),
            current_face: Cell::new(None),
        })
    }

    // --- Element access ---

    /// Number of vertices.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // bounded by MAX_ELEMENT_COUNT
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of edges.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // bounded by MAX_ELEMENT_COUNT
    pub fn edge_count(&self) -> u32 {
        self.edges.len() as u32
    }

    /// Number of faces.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // bounded by MAX_ELEMENT_COUNT
    pub fn face_count(&self) -> u32 {
        self.faces.len() as u32
    }

    /// Returns the vertex at `index`, or `None` if out of range.
    #[must_use]
    pub fn vertex(&self, index: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(usize::from(index))
    }

    /// Returns the edge at `index`, or `None` if out of range.
    #[must_use]
    pub fn edge(&self, index: EdgeIndex) -> Option<&Edge> {
        self.edges.get(usize::from(index))
    }

    /// Returns the face at `index`, or `None` if out of range.
    #[must_use]
    pub fn face(&self, index: FaceIndex) -> Option<&Face> {
        self.faces.get(usize::from(index))
    }

    /// All vertices, in index order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All edges, in index order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All faces, in index order.
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Iterates over every valid face index.
    pub fn face_indices(&self) -> impl Iterator<Item = FaceIndex> {
        (0..=u16::MAX).take(self.faces.len())
    }

    /// Corner positions of a face in local space.
    #[must_use]
    pub fn face_vertices(&self, index: FaceIndex) -> Option<[Point3; 3]> {
        let face = self.face(index)?;
        let [a, b, c] = face.vertex;
        Some([
            self.vertex(a)?.coordinates,
            self.vertex(b)?.coordinates,
            self.vertex(c)?.coordinates,
        ])
    }

    /// Faces across each of the face's three edges, co-indexed with
    /// [`Face::edge`]. `None` entries are mesh boundaries.
    #[must_use]
    pub fn neighbour_faces(&self, index: FaceIndex) -> Option<[Option<FaceIndex>; 3]> {
        let face = self.face(index)?;
        let mut neighbours = [None; 3];
        for (slot, &edge) in neighbours.iter_mut().zip(&face.edge) {
            *slot = self.edge(edge).and_then(|e| e.opposite_face(index));
        }
        Some(neighbours)
    }

    /// The down direction in local space, as authored.
    ///
    /// Not affected by the scene transform.
    #[must_use]
    pub fn gravity_vector(&self) -> Vector3 {
        self.gravity
    }

    // --- Scene transform ---

    /// Replaces the transform mapping local space into scene space.
    ///
    /// Each call fully replaces the previous transform.
    ///
    /// # Errors
    ///
    /// Returns [`NavMeshError::SingularTransform`] if the matrix has no
    /// inverse. The previous transform stays in effect.
    pub fn set_scene_transform(&self, transform: Matrix4) -> Result<()> {
        let transform = SceneTransform::new(transform).ok_or(NavMeshError::SingularTransform)?;
        self.transform.set(transform);
        Ok(())
    }

    /// The transform last set with [`set_scene_transform`](Self::set_scene_transform).
    #[must_use]
    pub fn scene_transform(&self) -> Matrix4 {
        self.transform.get().matrix
    }

    /// Maps a scene-space point into local space.
    #[must_use]
    pub fn point_scene_to_local(&self, point: &Point3) -> Point3 {
        transform_point(&self.transform.get().scene_to_local, point)
    }

    /// Maps a local-space point into scene space.
    #[must_use]
    pub fn point_local_to_scene(&self, point: &Point3) -> Point3 {
        transform_point(&self.transform.get().local_to_scene, point)
    }

    /// Maps a scene-space direction into local space.
    #[must_use]
    pub fn direction_scene_to_local(&self, direction: &Vector3) -> Vector3 {
        transform_direction(&self.transform.get().scene_to_local, direction)
    }

    /// Maps a local-space direction into scene space.
    #[must_use]
    pub fn direction_local_to_scene(&self, direction: &Vector3) -> Vector3 {
        transform_direction(&self.transform.get().local_to_scene, direction)
    }

    // --- Floor search state ---

    /// Current floor search tuning.
    #[must_use]
    pub fn floor_search_params(&self) -> FloorSearchParams {
        self.floor_params
    }

    /// Replaces the floor search tuning.
    pub fn set_floor_search_params(&mut self, params: FloorSearchParams) {
        self.floor_params = params;
    }

    /// The face found by the last successful floor query, if any.
    #[must_use]
    pub fn current_face(&self) -> Option<FaceIndex> {
        self.current_face.get()
    }

    /// Forgets the last successful floor face.
    pub fn reset_current_face(&self) {
        self.current_face.set(None);
    }

    // --- Serialization ---

    /// Encodes the mesh in the binary navigation mesh format.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        format::encode(self)
    }
}

fn check_count(kind: &'static str, count: usize) -> std::result::Result<(), TopologyError> {
    if count > MAX_ELEMENT_COUNT {
        return Err(TopologyError::TooManyElements {
            kind,
            count,
            max: MAX_ELEMENT_COUNT,
        });
    }
    Ok(())
}

fn check_index(
    kind: &'static str,
    index: usize,
    target: &'static str,
    value: u16,
    limit: usize,
) -> std::result::Result<(), TopologyError> {
    if usize::from(value) >= limit {
        return Err(TopologyError::IndexOutOfRange {
            kind,
            index,
            target,
            value: usize::from(value),
            limit,
        });
    }
    Ok(())
}
