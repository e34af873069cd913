//! Indexed triangle meshes and built-in primitives

use std::f32::consts::{PI, TAU};

use crate::rasterizer::{Vec2, Vec3, Vertex};

/// Indexed triangle mesh. Faces are wound counter-clockwise when seen from
/// outside, which is the side the rasterizer draws.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[usize; 3]>,
    /// Whether the vertex uvs are meaningful
    pub has_uvs: bool,
}

impl Mesh {
    /// Panics if a face references a vertex that does not exist.
    pub fn new(vertices: Vec<Vertex>, faces: Vec<[usize; 3]>, has_uvs: bool) -> Self {
        for (i, face) in faces.iter().enumerate() {
            assert!(
                face.iter().all(|&idx| idx < vertices.len()),
                "face {} {:?} indexes past {} vertices",
                i,
                face,
                vertices.len()
            );
        }
        Self { vertices, faces, has_uvs }
    }

    /// Axis-aligned cube with one flat-shaded quad (two triangles) per side
    pub fn cube(center: Vec3, half_size: f32) -> Self {
        let sides = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut faces = Vec::with_capacity(12);

        for normal in sides {
            // u x v == normal, so corners listed in (u, v) order wind outward
            let u = if normal.y.abs() < 0.5 {
                Vec3::UP.cross(normal)
            } else {
                Vec3::new(1.0, 0.0, 0.0).cross(normal)
            };
            let v = normal.cross(u);

            let base = vertices.len();
            for (cu, cv) in corners {
                let pos = center + (normal + u * cu + v * cv) * half_size;
                let uv = Vec2::new((cu + 1.0) * 0.5, (cv + 1.0) * 0.5);
                vertices.push(Vertex::new(pos, uv, normal));
            }
            faces.push([base, base + 1, base + 2]);
            faces.push([base, base + 2, base + 3]);
        }

        Self::new(vertices, faces, true)
    }

    /// UV sphere with smooth normals. `stacks` run pole to pole, `slices`
    /// around the Y axis; u wraps with the slice angle and v with the stack.
    pub fn sphere(center: Vec3, radius: f32, stacks: usize, slices: usize) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let mut vertices = Vec::with_capacity((stacks + 1) * (slices + 1));

        for i in 0..=stacks {
            let theta = PI * i as f32 / stacks as f32;
            for j in 0..=slices {
                let phi = TAU * j as f32 / slices as f32;
                let normal = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                let uv = Vec2::new(j as f32 / slices as f32, i as f32 / stacks as f32);
                vertices.push(Vertex::new(center + normal * radius, uv, normal));
            }
        }

        let row = slices + 1;
        let mut faces = Vec::with_capacity(stacks * slices * 2);
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * row + j;
                let b = a + 1;
                let c = a + row + 1;
                let d = a + row;
                // Triangles touching a pole collapse to zero area and draw nothing
                faces.push([a, b, c]);
                faces.push([a, c, d]);
            }
        }

        Self::new(vertices, faces, true)
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }
}
