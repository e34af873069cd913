//! Core types for the rasterizer

use std::ops::{Add, AddAssign, Mul, MulAssign};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::math::{Vec2, Vec3};

/// Linear RGB color with unclamped `f32` channels.
///
/// Lighting accumulates freely above 1.0; values are only clamped when a
/// pixel is exported for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0 };
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0 };
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channels (0-255 maps to 0.0-1.0)
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Weighted sum of three colors (barycentric blend)
    pub fn blend(c: &[Color; 3], w: [f32; 3]) -> Color {
        c[0] * w[0] + c[1] * w[1] + c[2] * w[2]
    }

    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Clamp and quantize to RGBA8 (opaque)
    pub fn to_bytes(self) -> [u8; 4] {
        let c = self.clamped();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            255,
        ]
    }

    /// Largest per-channel absolute difference
    pub fn max_diff(self, other: Color) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, other: Color) -> Color {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

impl Mul<f32> for Color {
    type Output = Color;
    fn mul(self, s: f32) -> Color {
        Color {
            r: self.r * s,
            g: self.g * s,
            b: self.b * s,
        }
    }
}

impl MulAssign<f32> for Color {
    fn mul_assign(&mut self, s: f32) {
        self.r *= s;
        self.g *= s;
        self.b *= s;
    }
}

/// Component-wise product
impl Mul for Color {
    type Output = Color;
    fn mul(self, other: Color) -> Color {
        Color {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
        }
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, other: Color) {
        self.r *= other.r;
        self.g *= other.g;
        self.b *= other.b;
    }
}

/// Error type for texture decoding
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {0} has no pixels")]
    Empty(String),

    #[error("texture {name} expects {expected} pixels, got {actual}")]
    SizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Decoded RGB image used as a material channel or normal map
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    /// Wrap an already decoded pixel grid (row-major)
    pub fn new(width: usize, height: usize, pixels: Vec<Color>, name: String) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(name));
        }
        if pixels.len() != width * height {
            return Err(TextureError::SizeMismatch {
                name,
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels, name })
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let img = image::open(path).map_err(|source| TextureError::Decode {
            name: path.display().to_string(),
            source,
        })?;

        Self::from_image(img, name)
    }

    /// Load texture from raw encoded bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
            name: name.clone(),
            source,
        })?;

        Self::from_image(img, name)
    }

    fn from_image(img: image::DynamicImage, name: String) -> Result<Self, TextureError> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels: Vec<Color> = rgb
            .pixels()
            .map(|p| Color::from_rgb8(p[0], p[1], p[2]))
            .collect();

        Self::new(width as usize, height as usize, pixels, name)
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, cell: usize, color1: Color, color2: Color) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }

    /// Nearest-sample lookup at `(floor(u*(w-1)), floor(v*(h-1)))`.
    /// No filtering and no mipmapping. Coordinates that drift outside
    /// [0, 1] during interpolation are clamped to the edge texel.
    pub fn sample_nearest(&self, uv: Vec2) -> Color {
        let tx = texel_index(uv.x, self.width);
        let ty = texel_index(uv.y, self.height);
        self.get_pixel(tx, ty)
    }
}

fn texel_index(t: f32, size: usize) -> usize {
    let max = size.saturating_sub(1);
    let i = (t * max as f32).floor();
    if i.is_nan() || i <= 0.0 {
        0
    } else {
        (i as usize).min(max)
    }
}

/// A reflectance channel: either a constant color or an image looked up by uv
#[derive(Debug, Clone, PartialEq)]
pub enum Channel {
    Color(Color),
    Image(Arc<Texture>),
}

/// Surface reflectance description shared by many triangles.
///
/// Any channel left `None` falls back to the global [`Reflection`] default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub ambient: Option<Color>,
    pub diffuse: Option<Channel>,
    pub specular: Option<Channel>,
    pub shininess: Option<f32>,
    /// Tangent-free normal map, `n = 2c - 1`, used by per-pixel shading
    pub normal_map: Option<Arc<Texture>>,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ambient(mut self, color: Color) -> Self {
        self.ambient = Some(color);
        self
    }

    pub fn with_diffuse(mut self, channel: Channel) -> Self {
        self.diffuse = Some(channel);
        self
    }

    pub fn with_specular(mut self, channel: Channel) -> Self {
        self.specular = Some(channel);
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = Some(shininess);
        self
    }

    pub fn with_normal_map(mut self, texture: Arc<Texture>) -> Self {
        self.normal_map = Some(texture);
        self
    }
}

/// A vertex with position, texture coordinate, and normal
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }
}

/// One world-space triangle ready to be drawn
#[derive(Debug, Clone)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    /// `None` means the triangle is untextured
    pub uvs: Option<[Vec2; 3]>,
    pub material: Arc<Material>,
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], normals: [Vec3; 3], material: Arc<Material>) -> Self {
        Self { positions, normals, uvs: None, material }
    }

    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }
}

/// Shading mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadingMode {
    Wire,     // Edges only, no depth
    Flat,     // One light calculation per face
    Gouraud,  // Light per vertex, interpolate colors
    Phong,    // Light per pixel, interpolate normals
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 4] = [
        ShadingMode::Wire,
        ShadingMode::Flat,
        ShadingMode::Gouraud,
        ShadingMode::Phong,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShadingMode::Wire => "Wire",
            ShadingMode::Flat => "Flat",
            ShadingMode::Gouraud => "Gouraud",
            ShadingMode::Phong => "Phong",
        }
    }

    /// Parse a mode name. Unknown names yield `None`, which renders nothing.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Global reflectance defaults used when a material omits a channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reflection {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Default for Reflection {
    fn default() -> Self {
        Self {
            ambient: Color::BLACK,
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            shininess: 20.0,
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSettings {
    /// Vertices whose clip-space w is not strictly inside (near, far) are out of range
    pub near: f32,
    pub far: f32,
    /// Active mode; `None` draws nothing
    pub shading: Option<ShadingMode>,
    /// Material fallbacks
    pub reflection: Reflection,
    /// Edge color in wireframe mode
    pub wire_color: Color,
    /// Pixel value after a clear
    pub background: Color,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            near: 0.3,
            far: 1000.0,
            shading: Some(ShadingMode::Phong),
            reflection: Reflection::default(),
            wire_color: Color::RED,
            background: Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Texture {
        let pixels = vec![Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        Texture::new(2, 2, pixels, "quad".to_string()).unwrap()
    }

    #[test]
    fn test_color_accumulates_unclamped() {
        let mut c = Color::new(0.8, 0.5, 0.0);
        c += Color::new(0.8, 0.0, 0.25);
        assert!((c.r - 1.6).abs() < 0.0001);
        assert_eq!(c.to_bytes(), [255, 128, 64, 255]);
    }

    #[test]
    fn test_color_component_mul() {
        let c = Color::new(0.5, 1.0, 0.25) * Color::new(0.5, 0.5, 4.0);
        assert!(c.max_diff(Color::new(0.25, 0.5, 1.0)) < 0.0001);
    }

    #[test]
    fn test_color_component_mul_assign() {
        let mut c = Color::new(0.5, 1.0, 0.25);
        c *= Color::new(0.5, 0.5, 4.0);
        assert!(c.max_diff(Color::new(0.25, 0.5, 1.0)) < 0.0001);
        c *= 2.0;
        assert!(c.max_diff(Color::new(0.5, 1.0, 2.0)) < 0.0001);
    }

    #[test]
    fn test_nearest_sample_uses_dim_minus_one() {
        let tex = two_by_two();
        assert_eq!(tex.sample_nearest(Vec2::new(0.0, 0.0)), Color::RED);
        // floor(0.99 * (2 - 1)) == 0
        assert_eq!(tex.sample_nearest(Vec2::new(0.99, 0.99)), Color::RED);
        assert_eq!(tex.sample_nearest(Vec2::new(1.0, 1.0)), Color::WHITE);
        assert_eq!(tex.sample_nearest(Vec2::new(1.0, 0.0)), Color::GREEN);
    }

    #[test]
    fn test_sample_clamps_out_of_range_uv() {
        let tex = two_by_two();
        assert_eq!(tex.sample_nearest(Vec2::new(-0.2, 5.0)), Color::BLUE);
    }

    #[test]
    fn test_texture_size_checked() {
        assert!(matches!(
            Texture::new(2, 2, vec![Color::BLACK; 3], "bad".to_string()),
            Err(TextureError::SizeMismatch { expected: 4, actual: 3, .. })
        ));
        assert!(matches!(
            Texture::new(0, 4, Vec::new(), "empty".to_string()),
            Err(TextureError::Empty(_))
        ));
    }

    #[test]
    fn test_texture_from_garbage_bytes() {
        let err = Texture::from_bytes(b"not an image", "junk".to_string());
        assert!(matches!(err, Err(TextureError::Decode { .. })));
    }

    #[test]
    fn test_shading_mode_names() {
        assert_eq!(ShadingMode::from_name("gouraud"), Some(ShadingMode::Gouraud));
        assert_eq!(ShadingMode::from_name("Wire"), Some(ShadingMode::Wire));
        assert_eq!(ShadingMode::from_name("Toon"), None);
        assert_eq!(ShadingMode::from_name(""), None);
    }
}
