//! Edge function triangle rasterization over the sub-sample grid.
//!
//! # Algorithm Overview
//!
//! For every triangle in connectivity order:
//! 1. Project its three vertices into sub-pixel image space
//! 2. Reject triangles behind the camera, degenerate in image space, or
//!    (optionally) back-facing
//! 3. Walk the sample grid inside the triangle's bounding box, testing each
//!    sample centre with three edge functions
//! 4. Depth-test covered samples and interpolate the nodal field on a pass
//!
//! # Edge Function
//!
//! For an edge from point A to point B, the edge function at point P is:
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! the 2D cross product (P - A) x (B - A). The three edge values divided by
//! the triangle's signed area are the barycentric weights used for both the
//! coverage test and interpolation.
//!
//! # Winding
//!
//! Connectivity fixes the winding: a triangle wound with its outward world
//! normal (right-hand rule) pointing toward the camera projects with
//! negative signed area in the y-down image plane. Back-face removal drops
//! triangles with positive area. With removal off, both windings are
//! filled.
//!
//! # Visibility and ties
//!
//! The depth buffer keeps the nearest surface at every sample: a sample is
//! overwritten only when the incoming interpolated depth is strictly
//! smaller than the stored one. Samples exactly on a shared edge can be
//! covered by both adjacent triangles; with coplanar neighbours at equal
//! depth the first writer in traversal order wins. This one-sample seam is
//! an accepted approximation; there is no edge-ownership rule.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)

use crate::camera::CameraData;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::render::framebuffer::Buffer2d;
use crate::render::interp;

/// Signed image-space areas below this are treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// Per-frame rasterization counters, reported through the `log` facade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Triangles taken from connectivity.
    pub triangles_in: u64,
    /// Triangles with a vertex at or behind the image plane.
    pub clipped_behind: u64,
    /// Triangles with (near-)zero projected area.
    pub degenerate: u64,
    /// Triangles removed by back-face culling.
    pub culled_backface: u64,
    /// Sub-pixel samples that passed coverage and the depth test.
    pub samples_written: u64,
}

/// Computes the edge function value for point P relative to edge (A -> B).
///
/// Zero when P lies exactly on the line through AB; the sign tells which
/// side of the edge P falls on.
#[inline]
fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f64 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Rasterizes one frame of a mesh into the sub-pixel depth and field
/// buffers.
///
/// `depth_subpx` must be initialized to `+inf` ("nothing rendered yet") and
/// both buffers must match the camera's sub-sample grid. `coords` and
/// `field` are per-node arrays for the frame being rendered; connectivity
/// indices are trusted here because [`crate::mesh::RenderMesh`] validated
/// them at construction.
pub fn rasterize_frame(
    camera: &CameraData,
    coords: &[Vec3],
    connectivity: &[[usize; 3]],
    field: &[f64],
    depth_subpx: &mut Buffer2d,
    field_subpx: &mut Buffer2d,
) -> RasterStats {
    let [grid_w, grid_h] = camera.subpx_dims();
    debug_assert_eq!(depth_subpx.width(), grid_w);
    debug_assert_eq!(depth_subpx.height(), grid_h);

    let mut stats = RasterStats {
        triangles_in: connectivity.len() as u64,
        ..RasterStats::default()
    };

    for nodes in connectivity {
        let p0 = camera.project_point(coords[nodes[0]]);
        let p1 = camera.project_point(coords[nodes[1]]);
        let p2 = camera.project_point(coords[nodes[2]]);

        if !(p0.visible && p1.visible && p2.visible) {
            stats.clipped_behind += 1;
            continue;
        }

        let (v0, v1, v2) = (p0.image, p1.image, p2.image);
        let area = edge_function(v0, v1, v2);
        if area.abs() < DEGENERATE_AREA {
            stats.degenerate += 1;
            continue;
        }
        // Front faces project with negative signed area (see module docs).
        if camera.back_face_removal() && area > 0.0 {
            stats.culled_backface += 1;
            continue;
        }
        let inv_area = 1.0 / area;

        let depths = [p0.depth, p1.depth, p2.depth];
        let values = [field[nodes[0]], field[nodes[1]], field[nodes[2]]];

        // Bounding box on the sample grid, clipped to the frame.
        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i64).max(0) as usize;
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i64).max(0) as usize;
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i64).min(grid_w as i64 - 1);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i64).min(grid_h as i64 - 1);
        if max_x < min_x as i64 || max_y < min_y as i64 {
            continue;
        }

        for y in min_y..=max_y as usize {
            for x in min_x..=max_x as usize {
                // Sample at cell centre
                let p = Vec2::new(x as f64 + 0.5, y as f64 + 0.5);

                let w0 = edge_function(v1, v2, p) * inv_area;
                let w1 = edge_function(v2, v0, p) * inv_area;
                let w2 = edge_function(v0, v1, p) * inv_area;

                // Covered iff all weights are in [0, 1]; edges inclusive.
                if !(0.0..=1.0).contains(&w0)
                    || !(0.0..=1.0).contains(&w1)
                    || !(0.0..=1.0).contains(&w2)
                {
                    continue;
                }

                let weights = [w0, w1, w2];
                let depth = interp::interpolate(weights, depths);
                if depth < depth_subpx.get(x, y) {
                    depth_subpx.set(x, y, depth);
                    field_subpx.set(x, y, interp::interpolate(weights, values));
                    stats.samples_written += 1;
                }
            }
        }
    }

    stats
}

// =============================================================================
// Tests
// =============================================================================
