use crate::math::{Point2, Point3};
use crate::navigation_mesh::{EdgeIndex, FaceIndex};

/// One step of a path: a face of the navigation mesh and a position on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WayPoint {
    face: FaceIndex,
    scene_position: Point3,
    face_local_space_position: Point2,
    entry_edge: Option<EdgeIndex>,
}

/// Ordered list of waypoints, source first.
pub type WayPointList = Vec<WayPoint>;

impl WayPoint {
    pub(crate) fn new(face: FaceIndex, scene_position: Point3, entry_edge: Option<EdgeIndex>) -> Self {
        Self {
            face,
            scene_position,
            face_local_space_position: Point2::origin(),
            entry_edge,
        }
    }

    /// Moves the waypoint off the face center onto a floor point.
    pub(crate) fn place_at(&mut self, scene_position: Point3) {
        self.face_local_space_position = Point2::new(
            self.scene_position.x - scene_position.x,
            self.scene_position.y - scene_position.y,
        );
        self.scene_position = scene_position;
    }

    /// The face this waypoint lies on.
    #[must_use]
    pub fn navigation_mesh_face_index(&self) -> FaceIndex {
        self.face
    }

    /// Position in scene space.
    ///
    /// The face center for intermediate waypoints; the floor point found
    /// below the query position for the endpoints of a position-to-position
    /// path.
    #[must_use]
    pub fn scene_position(&self) -> Point3 {
        self.scene_position
    }

    /// Offset of the face center from the waypoint in the scene XY plane.
    ///
    /// Zero for waypoints placed at the face center.
    #[must_use]
    pub fn face_local_space_position(&self) -> Point2 {
        self.face_local_space_position
    }

    /// The edge crossed to enter this face from the previous waypoint.
    ///
    /// `None` for the first waypoint.
    #[must_use]
    pub fn entry_edge(&self) -> Option<EdgeIndex> {
        self.entry_edge
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn centered_waypoint_has_zero_offset() {
        let wp = WayPoint::new(4, Point3::new(1.0, 2.0, 3.0), Some(7));
        assert_eq!(wp.navigation_mesh_face_index(), 4);
        assert_eq!(wp.entry_edge(), Some(7));
        assert_eq!(wp.face_local_space_position(), Point2::origin());
    }

    #[test]
    fn placing_records_offset_from_center() {
        let mut wp = WayPoint::new(0, Point3::new(1.0, 2.0, 3.0), None);
        wp.place_at(Point3::new(0.25, 2.5, 3.0));
        assert_eq!(wp.scene_position(), Point3::new(0.25, 2.5, 3.0));
        assert_relative_eq!(wp.face_local_space_position(), Point2::new(0.75, -0.5));
    }
}
