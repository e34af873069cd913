//! World to screen projection

use super::math::{Mat4, Vec3};

/// Scale divisor used by the orthographic fallback
const ORTHO_SCALE: f32 = 5.0;

/// A triangle vertex after projection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectedVertex {
    /// Screen x in pixels
    pub x: f32,
    /// Screen y in pixels
    pub y: f32,
    /// Normalized device depth, [-1, 1] for in-range points
    pub z: f32,
    /// Clip-space w before the divide
    pub w: f32,
}

/// Framebuffer size plus the valid depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    pub near: f32,
    pub far: f32,
}

impl Viewport {
    fn to_pixels(&self, ndc_x: f32, ndc_y: f32) -> (f32, f32) {
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;
        (ndc_x * half_w + half_w, ndc_y * half_h + half_h)
    }

    /// Strict (near, far) test on clip-space w
    pub fn w_in_range(&self, w: f32) -> bool {
        w > self.near && w < self.far
    }
}

/// Outcome of perspective projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Every vertex lies outside (near, far); draw nothing
    Rejected,
    /// Not rejected, but the divide produced non-finite screen positions
    Unusable,
    Projected([ProjectedVertex; 3]),
}

/// Project a triangle through `view_projection`.
///
/// Known approximation: the triangle is only rejected when all three
/// vertices fail the near/far test. With one or two vertices out of range
/// the projected positions are returned as-is and rasterized without
/// clipping, which can smear geometry that crosses the near plane.
pub fn project_perspective(positions: &[Vec3; 3], view_projection: &Mat4, viewport: &Viewport) -> Projection {
    let mut projected = [ProjectedVertex::default(); 3];
    let mut out_of_range = 0;

    for (out, pos) in projected.iter_mut().zip(positions) {
        let clip = view_projection.transform_point(*pos);
        let (x, y) = viewport.to_pixels(clip.x / clip.w, clip.y / clip.w);
        *out = ProjectedVertex { x, y, z: clip.z / clip.w, w: clip.w };

        if !viewport.w_in_range(clip.w) {
            out_of_range += 1;
        }
    }

    if out_of_range == projected.len() {
        return Projection::Rejected;
    }
    if projected.iter().any(|v| !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite())) {
        return Projection::Unusable;
    }
    Projection::Projected(projected)
}

/// Naive orthographic projection that ignores the camera entirely.
pub fn project_orthographic(positions: &[Vec3; 3], viewport: &Viewport) -> [ProjectedVertex; 3] {
    let aspect = viewport.height as f32 / viewport.width as f32;
    positions.map(|p| {
        let (x, y) = viewport.to_pixels(p.x / ORTHO_SCALE, p.y / (ORTHO_SCALE * aspect));
        ProjectedVertex { x, y, z: p.z, w: 1.0 }
    })
}
