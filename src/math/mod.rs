pub mod intersect_3d;
pub mod segment_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f32>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f32>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f32>;

/// Homogeneous 4D vector type.
pub type Vector4 = nalgebra::Vector4<f32>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f32>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Navigation meshes are stored in single precision, so this is far looser
/// than a double-precision kernel would use.
pub const TOLERANCE: f32 = 1e-5;

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}

/// Transforms a direction vector by a 4x4 matrix (ignoring translation).
#[must_use]
pub fn transform_direction(matrix: &Matrix4, dir: &Vector3) -> Vector3 {
    let v = matrix * Vector4::new(dir.x, dir.y, dir.z, 0.0);
    Vector3::new(v.x, v.y, v.z)
}

/// Returns two orthonormal vectors spanning the plane perpendicular to `normal`.
///
/// Returns `None` for a zero-length normal.
#[must_use]
pub fn plane_basis(normal: &Vector3) -> Option<(Vector3, Vector3)> {
    let normal = normal.try_normalize(f32::EPSILON)?;

    // Choose a reference vector not parallel to the normal
    let reference = if normal.x.abs() < 0.9 {
        Vector3::new(1.0, 0.0, 0.0)
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    };

    let u_dir = normal.cross(&reference).normalize();
    let v_dir = normal.cross(&u_dir);
    Some((u_dir, v_dir))
}
