#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use tracing_subscriber::EnvFilter;

use crate::math::Point3;
use crate::navigation_mesh::{NavigationMesh, NavigationMeshBuilder};

/// Routes `tracing` output to the test harness, filtered by `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct Soup {
    positions: Vec<Point3>,
    triangles: Vec<[usize; 3]>,
}

impl Soup {
    /// Appends a grid of `cols x rows` cells. Vertex `(c, r)` of the grid is
    /// produced by `vertex(c, r)`; cells listed in `holes` get no triangles.
    fn add_grid(
        &mut self,
        cols: usize,
        rows: usize,
        holes: &[(usize, usize)],
        vertex: impl Fn(usize, usize) -> Point3,
    ) {
        let base = self.positions.len();
        for r in 0..=rows {
            for c in 0..=cols {
                self.positions.push(vertex(c, r));
            }
        }
        let at = |c: usize, r: usize| base + r * (cols + 1) + c;
        for r in 0..rows {
            for c in 0..cols {
                if holes.contains(&(c, r)) {
                    continue;
                }
                let (v00, v10, v11, v01) = (at(c, r), at(c + 1, r), at(c + 1, r + 1), at(c, r + 1));
                self.triangles.push([v00, v10, v11]);
                self.triangles.push([v00, v11, v01]);
            }
        }
    }

    fn build(self) -> NavigationMesh {
        NavigationMeshBuilder::new(self.positions, self.triangles)
            .build()
            .unwrap()
    }
}

/// Flat grid at height `z` over the given column and row coordinates.
///
/// Each cell, in row-major order, becomes the triangles
/// `[v00, v10, v11]` and `[v00, v11, v01]`.
pub(crate) fn grid(xs: &[f32], ys: &[f32], z: f32, holes: &[(usize, usize)]) -> NavigationMesh {
    let mut soup = Soup::default();
    soup.add_grid(xs.len() - 1, ys.len() - 1, holes, |c, r| {
        Point3::new(xs[c], ys[r], z)
    });
    soup.build()
}

/// One row of `cells` unit squares along +x.
pub(crate) fn strip(cells: usize) -> NavigationMesh {
    let xs: Vec<f32> = (0..=cells).map(|c| c as f32).collect();
    grid(&xs, &[0.0, 1.0], 0.0, &[])
}

/// Unit grid with every vertex nudged by a deterministic pseudo-random offset,
/// so that no two routes across it have exactly the same length.
pub(crate) fn jittered_grid(cols: usize, rows: usize, seed: u64) -> NavigationMesh {
    let mut soup = Soup::default();
    soup.add_grid(cols, rows, &[], |c, r| {
        Point3::new(
            c as f32 + 0.15 * jitter(seed, c, r, 0),
            r as f32 + 0.15 * jitter(seed, c, r, 1),
            0.05 * jitter(seed, c, r, 2),
        )
    });
    soup.build()
}

/// Ground floor `[0, 4] x [0, 3]` at z = 0 with an unconnected deck over
/// `[0, 2] x [0, 3]` at z = 2.
pub(crate) fn two_storey() -> NavigationMesh {
    let mut soup = Soup::default();
    soup.add_grid(4, 3, &[], |c, r| Point3::new(c as f32, r as f32, 0.0));
    soup.add_grid(2, 3, &[], |c, r| Point3::new(c as f32, r as f32, 2.0));
    soup.build()
}

/// Two four-cell strips, `x` in `[0, 4]` and `[10, 14]`, that share no edge.
pub(crate) fn islands() -> NavigationMesh {
    let mut soup = Soup::default();
    soup.add_grid(4, 1, &[], |c, r| Point3::new(c as f32, r as f32, 0.0));
    soup.add_grid(4, 1, &[], |c, r| Point3::new(10.0 + c as f32, r as f32, 0.0));
    soup.build()
}

/// Value in `[-1, 1)` hashed from the inputs.
#[allow(clippy::cast_possible_truncation)]
fn jitter(seed: u64, c: usize, r: usize, channel: u64) -> f32 {
    let mut x = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (c as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (r as u64).wrapping_mul(0x1656_67B1_9E37_79F9)
        ^ channel.wrapping_mul(0x27D4_EB2F_1656_67C5);
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    x = x.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    x ^= x >> 33;
    (x >> 40) as f32 / (1u64 << 23) as f32 - 1.0
}
