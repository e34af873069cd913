//! Coverage: bounding boxes and edge-function barycentrics

use std::ops::Range;

use super::project::ProjectedVertex;

/// Integer screen-space box around a projected triangle. May extend
/// outside the framebuffer; call [`BoundingBox::clamp`] before iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Pixel ranges to visit inside a `width` x `height` buffer.
    /// Upper bounds are exclusive, so a box entirely off-screen yields
    /// empty ranges.
    pub fn clamp(&self, width: usize, height: usize) -> (Range<usize>, Range<usize>) {
        (clamp_axis(self.min_x, self.max_x, width), clamp_axis(self.min_y, self.max_y, height))
    }
}

fn clamp_axis(min: i32, max: i32, size: usize) -> Range<usize> {
    let lo = min.max(0) as usize;
    let hi = if max <= 0 { 0 } else { (max as usize).min(size) };
    lo.min(hi)..hi
}

/// Floor of the minimum and ceiling of the maximum vertex coordinates
pub fn compute_bounding_box(verts: &[ProjectedVertex; 3]) -> BoundingBox {
    let min_x = verts[0].x.min(verts[1].x).min(verts[2].x);
    let min_y = verts[0].y.min(verts[1].y).min(verts[2].y);
    let max_x = verts[0].x.max(verts[1].x).max(verts[2].x);
    let max_y = verts[0].y.max(verts[1].y).max(verts[2].y);

    // `as` saturates, so huge coordinates from near-plane vertices stay finite
    BoundingBox {
        min_x: min_x.floor() as i32,
        min_y: min_y.floor() as i32,
        max_x: max_x.ceil() as i32,
        max_y: max_y.ceil() as i32,
    }
}

/// Signed edge function of the directed edge a -> b evaluated at (x, y)
fn edge(a: &ProjectedVertex, b: &ProjectedVertex, x: f32, y: f32) -> f32 {
    (a.y - b.y) * x + (b.x - a.x) * y + (a.x * b.y - a.y * b.x)
}

/// Barycentric weights of pixel (x, y), or `None` when it is not covered.
///
/// A pixel is covered when all three edge functions are >= 0, so pixels
/// lying exactly on an edge count as inside. Triangles wound the other way
/// cover nothing, and so do zero-area triangles.
pub fn barycentric(verts: &[ProjectedVertex; 3], x: f32, y: f32) -> Option<[f32; 3]> {
    let f01 = edge(&verts[0], &verts[1], x, y);
    let f12 = edge(&verts[1], &verts[2], x, y);
    let f20 = edge(&verts[2], &verts[0], x, y);

    if f01 < 0.0 || f12 < 0.0 || f20 < 0.0 {
        return None;
    }

    // Twice the triangle area; also rejects NaN
    let area = f01 + f12 + f20;
    if !(area > 0.0) {
        return None;
    }

    // Each vertex is weighted by the edge opposite to it
    Some([f12 / area, f20 / area, f01 / area])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pv(x: f32, y: f32) -> ProjectedVertex {
        ProjectedVertex { x, y, z: 0.0, w: 1.0 }
    }

    fn triangle() -> [ProjectedVertex; 3] {
        [pv(10.0, 10.0), pv(50.0, 12.0), pv(20.0, 40.5)]
    }

    #[test]
    fn test_bounding_box_floor_ceil() {
        let bb = compute_bounding_box(&[pv(1.5, 2.2), pv(7.1, -3.7), pv(4.0, 9.01)]);
        assert_eq!(bb, BoundingBox { min_x: 1, min_y: -4, max_x: 8, max_y: 10 });
    }

    #[test]
    fn test_clamp_to_framebuffer() {
        let bb = BoundingBox { min_x: -5, min_y: 3, max_x: 400, max_y: 300 };
        assert_eq!(bb.clamp(320, 240), (0..320, 3..240));

        let off_screen = BoundingBox { min_x: 500, min_y: -50, max_x: 600, max_y: -10 };
        let (xs, ys) = off_screen.clamp(320, 240);
        assert!(xs.is_empty() && ys.is_empty());
    }

    #[test]
    fn test_barycentric_inside_weights_sum_to_one() {
        let tri = triangle();
        let bb = compute_bounding_box(&tri);
        let mut covered = 0;
        for y in bb.min_y..bb.max_y {
            for x in bb.min_x..bb.max_x {
                if let Some(w) = barycentric(&tri, x as f32, y as f32) {
                    covered += 1;
                    assert!(w.iter().all(|&wi| wi >= 0.0));
                    assert!((w[0] + w[1] + w[2] - 1.0).abs() < 1e-5);
                }
            }
        }
        assert!(covered > 0);
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let tri = triangle();
        let w = barycentric(&tri, 10.0, 10.0).unwrap();
        assert!((w[0] - 1.0).abs() < 1e-5);
        let w = barycentric(&tri, 50.0, 12.0).unwrap();
        assert!((w[1] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_barycentric_outside() {
        assert_eq!(barycentric(&triangle(), 0.0, 0.0), None);
        assert_eq!(barycentric(&triangle(), 49.0, 39.0), None);
    }

    #[test]
    fn test_reverse_winding_covers_nothing() {
        let t = triangle();
        let reversed = [t[0], t[2], t[1]];
        assert_eq!(barycentric(&reversed, 25.0, 20.0), None);
        assert!(barycentric(&t, 25.0, 20.0).is_some());
    }

    #[test]
    fn test_split_square_shares_only_the_diagonal() {
        // Square split along its diagonal, both halves wound the same way
        let a = [pv(0.0, 0.0), pv(8.0, 0.0), pv(8.0, 8.0)];
        let b = [pv(0.0, 0.0), pv(8.0, 8.0), pv(0.0, 8.0)];
        for y in 0..8 {
            for x in 0..8 {
                let hits = [&a, &b]
                    .iter()
                    .filter(|t| barycentric(t, x as f32, y as f32).is_some())
                    .count();
                // Pixels exactly on the shared edge belong to both halves
                let expected = if x == y { 2 } else { 1 };
                assert_eq!(hits, expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_degenerate_triangle_no_coverage() {
        let collinear = [pv(0.0, 0.0), pv(5.0, 5.0), pv(10.0, 10.0)];
        assert_eq!(barycentric(&collinear, 5.0, 5.0), None);
        let point = [pv(3.0, 3.0); 3];
        assert_eq!(barycentric(&point, 3.0, 3.0), None);
    }
}
