//! Phong illumination and material resolution

use super::math::{Vec2, Vec3};
use super::types::{Channel, Color, Material, Reflection};

/// Reflectance at one shading point, with every channel filled in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMaterial {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
}

/// Phong reflection model: ambient + diffuse + specular, unclamped.
pub fn phong(point: Vec3, viewer: Vec3, normal: Vec3, light: Vec3, material: &ResolvedMaterial) -> Color {
    let normal = normal.normalize();
    let light_dir = (light - point).normalize();

    let mut color = material.diffuse * normal.dot(light_dir).max(0.0);
    color += material.ambient;

    let reflect_dir = (-light_dir).reflect(normal);
    let view_dir = (viewer - point).normalize();
    let spec = view_dir.dot(reflect_dir).max(0.0).powf(material.shininess);
    color += material.specular * spec;

    color
}

fn resolve_channel(channel: Option<&Channel>, uv: Option<Vec2>, default: Color) -> Color {
    match (channel, uv) {
        (Some(Channel::Color(c)), _) => *c,
        (Some(Channel::Image(tex)), Some(uv)) => tex.sample_nearest(uv),
        // Image channels need a uv; without one (or with no channel) use the default
        _ => default,
    }
}

/// Pick the reflectance for a shading point.
///
/// Ambient and shininess come from the material when it sets them and from
/// `defaults` otherwise. Diffuse and specular are sampled from their image
/// when both an image and `uv` are available.
pub fn resolve_material(uv: Option<Vec2>, material: &Material, defaults: &Reflection) -> ResolvedMaterial {
    ResolvedMaterial {
        ambient: material.ambient.unwrap_or(defaults.ambient),
        diffuse: resolve_channel(material.diffuse.as_ref(), uv, defaults.diffuse),
        specular: resolve_channel(material.specular.as_ref(), uv, defaults.specular),
        shininess: material.shininess.unwrap_or(defaults.shininess),
    }
}

/// Normal-map lookup, decoding each channel from [0, 1] to [-1, 1]
pub fn resolve_normal(uv: Vec2, material: &Material) -> Option<Vec3> {
    let map = material.normal_map.as_ref()?;
    let c = map.sample_nearest(uv);
    Some(Vec3::new(c.r * 2.0 - 1.0, c.g * 2.0 - 1.0, c.b * 2.0 - 1.0).normalize())
}
