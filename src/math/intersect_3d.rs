use super::{Point3, Vector3, TOLERANCE};

/// A ray hit on a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter of the hit, so the hit point is `origin + direction * t`.
    pub t: f32,
    /// Barycentric weight of the triangle's second vertex.
    pub u: f32,
    /// Barycentric weight of the triangle's third vertex.
    pub v: f32,
}

impl TriangleHit {
    /// Reconstructs the hit point from the barycentric coordinates.
    ///
    /// This lands on the triangle's plane even when the ray parameter
    /// carries rounding error.
    #[must_use]
    pub fn point_on(&self, triangle: &[Point3; 3]) -> Point3 {
        let [a, b, c] = triangle;
        a + (b - a) * self.u + (c - a) * self.v
    }
}

/// Intersects the line `origin + t * direction` with a triangle.
///
/// Two-sided Moller-Trumbore test. Hits on edges and vertices count, within
/// [`TOLERANCE`] in barycentric space. The returned `t` may be negative (hit
/// behind the origin); callers decide which half of the line they want.
/// Returns `None` when the line is parallel to the triangle's plane or misses.
#[must_use]
pub fn ray_triangle_intersect(
    origin: &Point3,
    direction: &Vector3,
    triangle: &[Point3; 3],
) -> Option<TriangleHit> {
    let e1 = triangle[1] - triangle[0];
    let e2 = triangle[2] - triangle[0];

    let p = direction.cross(&e2);
    let det = e1.dot(&p);
    if det.abs() < f32::EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = origin - triangle[0];
    let u = s.dot(&p) * inv_det;
    if !(-TOLERANCE..=1.0 + TOLERANCE).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = direction.dot(&q) * inv_det;
    if v < -TOLERANCE || u + v > 1.0 + TOLERANCE {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    Some(TriangleHit { t, u, v })
}
