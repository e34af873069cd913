//! Framebuffer ownership and per-triangle dispatch

use log::{debug, info, trace, warn};

use super::math::{Mat4, Vec3};
use super::project::{project_orthographic, project_perspective, Projection, Viewport};
use super::shading::{draw_flat, draw_gouraud, draw_phong, draw_wire};
use super::types::{Color, RasterSettings, ShadingMode, Triangle};
use crate::scene::Scene;

/// Pixel buffer and depth buffer of identical size.
///
/// Both are allocated, resized and cleared together. Depth is cleared to
/// +1.0 (far) and a fill may only replace a pixel when its depth is
/// strictly smaller.
pub struct Framebuffer {
    pub pixels: Vec<Color>, // Unclamped linear RGB
    pub zbuffer: Vec<f32>,  // NDC depth
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Color::BLACK; width * height],
            zbuffer: vec![1.0; width * height],
            width,
            height,
        }
    }

    /// Reallocate both buffers; contents are reset to `background` / far
    pub fn resize(&mut self, width: usize, height: usize, background: Color) {
        self.width = width;
        self.height = height;
        self.pixels = vec![background; width * height];
        self.zbuffer = vec![1.0; width * height];
    }

    pub fn clear(&mut self, background: Color) {
        self.pixels.fill(background);
        self.zbuffer.fill(1.0);
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        if x < self.width && y < self.height {
            self.zbuffer[y * self.width + x]
        } else {
            f32::NEG_INFINITY
        }
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }

    /// Write a color without touching depth (wireframe). Returns false when
    /// (x, y) is outside the buffer.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) -> bool {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
            return true;
        }
        false
    }

    /// Depth-tested write: commits color and depth together when `z` is
    /// strictly closer than the stored value. Ties keep the existing pixel.
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                self.pixels[idx] = color;
                return true;
            }
        }
        false
    }

    /// Clamped RGBA8 bytes, row-major, for presentation
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color.to_bytes());
        }
        bytes
    }
}

/// Per-frame constants shared by every triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view_projection: Mat4,
    /// Camera position, the viewpoint for specular highlights
    pub eye: Vec3,
    pub light: Vec3,
}

/// Counters for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    /// Entirely outside the near/far range
    pub rejected: usize,
    /// Drawn with the orthographic fallback
    pub fallback: usize,
    pub pixels_written: usize,
}

/// Rendering context: owns the framebuffer and the active settings.
pub struct Renderer {
    pub fb: Framebuffer,
    pub settings: RasterSettings,
    stats: FrameStats,
}

impl Renderer {
    pub fn new(width: usize, height: usize, settings: RasterSettings) -> Self {
        let mut fb = Framebuffer::new(width, height);
        fb.clear(settings.background);
        Self { fb, settings, stats: FrameStats::default() }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.fb.width,
            height: self.fb.height,
            near: self.settings.near,
            far: self.settings.far,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.fb.width && height == self.fb.height {
            return;
        }
        info!("resizing framebuffer {}x{} -> {}x{}", self.fb.width, self.fb.height, width, height);
        self.fb.resize(width, height, self.settings.background);
    }

    pub fn mode(&self) -> Option<ShadingMode> {
        self.settings.shading
    }

    pub fn set_mode(&mut self, mode: Option<ShadingMode>) {
        self.settings.shading = mode;
    }

    /// Select a mode by name. Unknown names leave the renderer drawing nothing.
    pub fn set_mode_by_name(&mut self, name: &str) {
        let mode = ShadingMode::from_name(name);
        if mode.is_none() {
            warn!("unknown shading mode {:?}, triangles will not be drawn", name);
        }
        self.settings.shading = mode;
    }

    /// Stats accumulated since the last `begin_frame`
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Clear pixels to the background, depth to far, and reset stats
    pub fn begin_frame(&mut self) {
        self.fb.clear(self.settings.background);
        self.stats = FrameStats::default();
    }

    /// Project, then rasterize one triangle with the active shading mode.
    pub fn draw_triangle(&mut self, tri: &Triangle, uniforms: &FrameUniforms) {
        self.stats.triangles += 1;
        let viewport = self.viewport();

        let projected = match project_perspective(&tri.positions, &uniforms.view_projection, &viewport) {
            Projection::Rejected => {
                self.stats.rejected += 1;
                return;
            }
            Projection::Unusable => {
                trace!("perspective divide unusable, falling back to orthographic");
                self.stats.fallback += 1;
                project_orthographic(&tri.positions, &viewport)
            }
            Projection::Projected(verts) => verts,
        };

        let defaults = &self.settings.reflection;
        let written = match self.settings.shading {
            Some(ShadingMode::Wire) => draw_wire(&mut self.fb, &projected, self.settings.wire_color),
            Some(ShadingMode::Flat) => draw_flat(&mut self.fb, &projected, tri, uniforms, defaults),
            Some(ShadingMode::Gouraud) => draw_gouraud(&mut self.fb, &projected, tri, uniforms, defaults),
            Some(ShadingMode::Phong) => draw_phong(&mut self.fb, &projected, tri, uniforms, defaults),
            None => 0,
        };
        self.stats.pixels_written += written;
    }

    /// Render a whole frame from a caller-provided triangle list
    pub fn render_triangles(&mut self, triangles: &[Triangle], uniforms: &FrameUniforms) -> FrameStats {
        self.begin_frame();
        for tri in triangles {
            self.draw_triangle(tri, uniforms);
        }
        self.finish_frame()
    }

    /// Render every mesh instance of `scene` in insertion order
    pub fn render(&mut self, scene: &Scene) -> FrameStats {
        self.begin_frame();

        let aspect = self.fb.width as f32 / self.fb.height.max(1) as f32;
        let uniforms = FrameUniforms {
            view_projection: scene.camera.view_projection(aspect, self.settings.near, self.settings.far),
            eye: scene.camera.position,
            light: scene.light_position(),
        };

        for tri in scene.triangles() {
            self.draw_triangle(&tri, &uniforms);
        }
        self.finish_frame()
    }

    fn finish_frame(&self) -> FrameStats {
        let s = self.stats;
        debug!(
            "frame {}x{} {:?}: {} triangles, {} rejected, {} fallback, {} pixels",
            self.fb.width, self.fb.height, self.settings.shading, s.triangles, s.rejected, s.fallback, s.pixels_written
        );
        s
    }
}
