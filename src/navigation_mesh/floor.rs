use std::collections::VecDeque;

use tracing::trace;

use super::{FaceIndex, NavigationMesh};
use crate::math::intersect_3d::ray_triangle_intersect;
use crate::math::{Point3, Vector3, TOLERANCE};

/// Tuning for floor queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorSearchParams {
    /// How far above the query point (against gravity) the floor ray starts,
    /// in local units.
    ///
    /// A point resting on the floor, or sunk into it by less than this,
    /// still resolves to that floor.
    pub probe_height: f32,
}

impl Default for FloorSearchParams {
    fn default() -> Self {
        Self { probe_height: 0.01 }
    }
}

/// A successful floor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorHit {
    /// Point on the floor, in scene space.
    pub position: Point3,
    /// Face containing the point.
    pub face: FaceIndex,
}

impl NavigationMesh {
    /// Finds the floor directly below a scene-space point.
    ///
    /// Casts a ray along gravity through every face and keeps the closest
    /// hit. Returns `None` over holes and outside the mesh.
    #[must_use]
    pub fn find_floor(&self, position: &Point3) -> Option<FloorHit> {
        let local = self.point_scene_to_local(position);
        let Some((face, point)) = self.find_floor_local(&local) else {
            trace!(?position, "no floor below point");
            return None;
        };
        Some(self.remember(face, &point))
    }

    /// Finds the floor below a scene-space point, starting at a known face.
    ///
    /// - `start_face == None` runs the full search of [`find_floor`],
    ///   ignoring the last successful face.
    /// - A point above `start_face` resolves to it directly.
    /// - Otherwise, with `dont_check_neighbours` set the query fails; without
    ///   it, faces are searched breadth-first across edges starting from
    ///   `start_face`'s neighbours, and the first one below the point wins.
    ///
    /// [`find_floor`]: NavigationMesh::find_floor
    #[must_use]
    pub fn find_floor_for_face(
        &self,
        position: &Point3,
        start_face: Option<FaceIndex>,
        dont_check_neighbours: bool,
    ) -> Option<FloorHit> {
        let Some(start_face) = start_face else {
            return self.find_floor(position);
        };
        self.face(start_face)?;

        let local = self.point_scene_to_local(position);
        if let Some((_, point)) = self.floor_on_face(&local, start_face) {
            return Some(self.remember(start_face, &point));
        }
        if dont_check_neighbours {
            return None;
        }

        let (face, point) = self.search_neighbours(&local, start_face)?;
        Some(self.remember(face, &point))
    }

    /// Finds the floor using the last successful face as a starting point.
    ///
    /// Meant for per-frame agent updates, where the agent is usually still
    /// on the same face or a nearby one. Falls back to the full search when
    /// there is no last face or the neighbour search fails.
    #[must_use]
    pub fn find_floor_nearby(&self, position: &Point3) -> Option<FloorHit> {
        self.current_face()
            .and_then(|face| self.find_floor_for_face(position, Some(face), false))
            .or_else(|| self.find_floor(position))
    }

    /// Casts a scene-space ray against every face.
    ///
    /// Returns the face with the closest hit in front of the origin.
    #[must_use]
    pub fn ray_face_intersect(&self, origin: &Point3, direction: &Vector3) -> Option<FaceIndex> {
        let origin = self.point_scene_to_local(origin);
        let direction = self.direction_scene_to_local(direction);

        self.face_indices()
            .filter_map(|face| {
                let triangle = self.face_vertices(face)?;
                let hit = ray_triangle_intersect(&origin, &direction, &triangle)?;
                (hit.t >= 0.0).then_some((hit.t, face))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, face)| face)
    }

    /// Full search in local space: the closest face below the point.
    fn find_floor_local(&self, local: &Point3) -> Option<(FaceIndex, Point3)> {
        self.face_indices()
            .filter_map(|face| {
                self.floor_on_face(local, face)
                    .map(|(t, point)| (t, face, point))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, face, point)| (face, point))
    }

    /// Casts the floor ray for a local point against one face.
    ///
    /// Returns the ray distance and the local hit point.
    fn floor_on_face(&self, local: &Point3, face: FaceIndex) -> Option<(f32, Point3)> {
        let triangle = self.face_vertices(face)?;
        let down = self.gravity.normalize();
        let origin = local - down * self.floor_params.probe_height;

        let hit = ray_triangle_intersect(&origin, &down, &triangle)?;
        (hit.t >= -TOLERANCE).then(|| (hit.t, hit.point_on(&triangle)))
    }

    fn search_neighbours(&self, local: &Point3, start: FaceIndex) -> Option<(FaceIndex, Point3)> {
        let mut visited = vec![false; self.faces.len()];
        visited[usize::from(start)] = true;
        let mut queue = VecDeque::from([start]);

        while let Some(face) = queue.pop_front() {
            for neighbour in self.neighbour_faces(face)?.into_iter().flatten() {
                let seen = &mut visited[usize::from(neighbour)];
                if *seen {
                    continue;
                }
                *seen = true;

                if let Some((_, point)) = self.floor_on_face(local, neighbour) {
                    return Some((neighbour, point));
                }
                queue.push_back(neighbour);
            }
        }
        None
    }

    fn remember(&self, face: FaceIndex, local_point: &Point3) -> FloorHit {
        self.current_face.set(Some(face));
        FloorHit {
            position: self.point_local_to_scene(local_point),
            face,
        }
    }
}
