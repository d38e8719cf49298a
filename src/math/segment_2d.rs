use super::{Point2, TOLERANCE};

/// 2D cross product of `(b - a)` and `(c - a)`.
///
/// Positive when `c` lies to the left of the directed line `a -> b`.
#[inline]
#[must_use]
pub fn orientation_2d(a: &Point2, b: &Point2, c: &Point2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns `true` if segments `a0-a1` and `b0-b1` cross or touch.
///
/// Touching within [`TOLERANCE`] counts as crossing. Collinear segments
/// cross only where their extents overlap.
#[must_use]
pub fn segments_cross_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let d1 = orientation_2d(b0, b1, a0);
    let d2 = orientation_2d(b0, b1, a1);
    let d3 = orientation_2d(a0, a1, b0);
    let d4 = orientation_2d(a0, a1, b1);

    if [d1, d2, d3, d4].iter().all(|d| d.abs() <= TOLERANCE) {
        return collinear_overlap(a0, a1, b0, b1);
    }
    straddles(d1, d2) && straddles(d3, d4)
}

/// Overlap of two collinear segments, compared along the longer one.
fn collinear_overlap(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let (origin, axis) = if (a1 - a0).norm_squared() >= (b1 - b0).norm_squared() {
        (a0, a1 - a0)
    } else {
        (b0, b1 - b0)
    };
    let length2 = axis.norm_squared();
    if length2 <= TOLERANCE * TOLERANCE {
        // Both segments are points
        return (b0 - a0).norm() <= TOLERANCE;
    }
    let along = |p: &Point2| (p - origin).dot(&axis) / length2;
    let (a_min, a_max) = min_max(along(a0), along(a1));
    let (b_min, b_max) = min_max(along(b0), along(b1));
    let slack = TOLERANCE / length2.sqrt();
    a_min <= b_max + slack && b_min <= a_max + slack
}

#[inline]
fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[inline]
fn straddles(a: f32, b: f32) -> bool {
    (a <= TOLERANCE && b >= -TOLERANCE) || (a >= -TOLERANCE && b <= TOLERANCE)
}
