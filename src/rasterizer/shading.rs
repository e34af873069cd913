//! Triangle fillers for each shading mode
//!
//! Flat, Gouraud and Phong share one traversal: walk the clamped bounding
//! box in scan order, skip uncovered pixels, interpolate depth, and only
//! compute a color for pixels that pass the depth test. They differ in how
//! often the illumination model runs. Texture coordinates and normals are
//! blended linearly in screen space (no perspective correction).

use super::lighting::{phong, resolve_material, resolve_normal, ResolvedMaterial};
use super::math::{Vec2, Vec3};
use super::project::ProjectedVertex;
use super::raster::{barycentric, compute_bounding_box};
use super::render::{FrameUniforms, Framebuffer};
use super::types::{Color, Reflection, Triangle};

/// Screen-space distance between wireframe samples
pub const WIRE_STEP: f32 = 0.5;

/// Depth-tested fill. `shade` receives the barycentric weights of each
/// visible pixel. Returns the number of pixels written.
fn fill<F>(fb: &mut Framebuffer, projected: &[ProjectedVertex; 3], mut shade: F) -> usize
where
    F: FnMut([f32; 3]) -> Color,
{
    let (xs, ys) = compute_bounding_box(projected).clamp(fb.width, fb.height);
    let mut written = 0;

    for y in ys {
        for x in xs.clone() {
            let w = match barycentric(projected, x as f32, y as f32) {
                Some(w) => w,
                None => continue,
            };

            let z = w[0] * projected[0].z + w[1] * projected[1].z + w[2] * projected[2].z;
            if !(z < fb.depth_at(x, y)) {
                continue;
            }

            if fb.set_pixel_with_depth(x, y, z, shade(w)) {
                written += 1;
            }
        }
    }

    written
}

/// One lighting evaluation at the face centroid with the averaged normal.
/// Textured triangles re-resolve the material per pixel, since the sampled
/// reflectance changes even though the geometry does not.
pub fn draw_flat(
    fb: &mut Framebuffer,
    projected: &[ProjectedVertex; 3],
    tri: &Triangle,
    uniforms: &FrameUniforms,
    defaults: &Reflection,
) -> usize {
    let third = 1.0 / 3.0;
    let normal = (tri.normals[0] + tri.normals[1] + tri.normals[2]) * third;
    let centroid = (tri.positions[0] + tri.positions[1] + tri.positions[2]) * third;
    let light_face = |material: &ResolvedMaterial| {
        phong(centroid, uniforms.eye, normal, uniforms.light, material)
    };

    match tri.uvs {
        None => {
            let color = light_face(&resolve_material(None, &tri.material, defaults));
            fill(fb, projected, |_| color)
        }
        Some(uvs) => fill(fb, projected, |w| {
            let uv = Vec2::blend(&uvs, w);
            light_face(&resolve_material(Some(uv), &tri.material, defaults))
        }),
    }
}

/// Lighting per vertex, colors blended per pixel.
pub fn draw_gouraud(
    fb: &mut Framebuffer,
    projected: &[ProjectedVertex; 3],
    tri: &Triangle,
    uniforms: &FrameUniforms,
    defaults: &Reflection,
) -> usize {
    let light_vertices = |material: &ResolvedMaterial| -> [Color; 3] {
        [0, 1, 2].map(|i| phong(tri.positions[i], uniforms.eye, tri.normals[i], uniforms.light, material))
    };

    match tri.uvs {
        None => {
            let colors = light_vertices(&resolve_material(None, &tri.material, defaults));
            fill(fb, projected, |w| Color::blend(&colors, w))
        }
        // Constant uv: the reflectance cannot change across the face
        Some(uvs) if uvs[0] == uvs[1] && uvs[1] == uvs[2] => {
            let colors = light_vertices(&resolve_material(Some(uvs[0]), &tri.material, defaults));
            fill(fb, projected, |w| Color::blend(&colors, w))
        }
        Some(uvs) => fill(fb, projected, |w| {
            let material = resolve_material(Some(Vec2::blend(&uvs, w)), &tri.material, defaults);
            Color::blend(&light_vertices(&material), w)
        }),
    }
}

/// Lighting per pixel with interpolated position and normal. Textured
/// triangles take the normal from the material's normal map when it has one.
pub fn draw_phong(
    fb: &mut Framebuffer,
    projected: &[ProjectedVertex; 3],
    tri: &Triangle,
    uniforms: &FrameUniforms,
    defaults: &Reflection,
) -> usize {
    let untextured = resolve_material(None, &tri.material, defaults);

    fill(fb, projected, |w| {
        let point = Vec3::blend(&tri.positions, w);
        let (material, normal) = match tri.uvs {
            Some(uvs) => {
                let uv = Vec2::blend(&uvs, w);
                let normal = resolve_normal(uv, &tri.material)
                    .unwrap_or_else(|| Vec3::blend(&tri.normals, w));
                (resolve_material(Some(uv), &tri.material, defaults), normal)
            }
            None => (untextured, Vec3::blend(&tri.normals, w)),
        };
        phong(point, uniforms.eye, normal, uniforms.light, &material)
    })
}

/// Parameter span of `origin + dir * t` that can round onto a pixel of a
/// `width` x `height` buffer, intersected with `[0, len]`.
fn visible_span(origin: (f64, f64), dir: (f64, f64), len: f64, width: usize, height: usize) -> Option<(f64, f64)> {
    let mut t_min = 0.0f64;
    let mut t_max = len;

    for (o, d, size) in [(origin.0, dir.0, width as f64), (origin.1, dir.1, height as f64)] {
        if d == 0.0 {
            if o < -1.0 || o > size + 1.0 {
                return None;
            }
            continue;
        }
        let t1 = (-1.0 - o) / d;
        let t2 = (size + 1.0 - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if t_min <= t_max {
        Some((t_min, t_max))
    } else {
        None
    }
}

/// Walk each edge in `WIRE_STEP` increments, rounding to the nearest
/// pixel. No fill, no depth test, and the depth buffer is left untouched.
pub fn draw_wire(fb: &mut Framebuffer, projected: &[ProjectedVertex; 3], color: Color) -> usize {
    let step = WIRE_STEP as f64;
    let mut written = 0;

    // f64 so edges with far-off endpoints still step in exact half pixels
    for i in 0..3 {
        let a = projected[(i + 1) % 3];
        let b = projected[(i + 2) % 3];
        let (ax, ay) = (a.x as f64, a.y as f64);

        let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
        let len = (dx * dx + dy * dy).sqrt();
        if !(len > 0.0) || !len.is_finite() {
            continue;
        }
        let dir = (dx / len, dy / len);

        // Skip the stretch of a long edge that lies off-screen
        let (start, end) = match visible_span((ax, ay), dir, len, fb.width, fb.height) {
            Some(span) => span,
            None => continue,
        };

        let mut k = (start / step).floor().max(0.0) as u64;
        loop {
            let j = k as f64 * step;
            if j >= len || j > end {
                break;
            }
            let x = (ax + dir.0 * j + 0.5).floor();
            let y = (ay + dir.1 * j + 0.5).floor();
            if x >= 0.0 && y >= 0.0 && fb.set_pixel(x as usize, y as usize, color) {
                written += 1;
            }
            k += 1;
        }
    }

    written
}
