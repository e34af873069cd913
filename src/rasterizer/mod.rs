//! CPU triangle rasterizer
//!
//! Features:
//! - Perspective projection with near/far rejection and an orthographic fallback
//! - Bounding-box traversal with edge-function barycentric coverage
//! - Z-buffer with strict less-than depth test
//! - Wireframe, Flat, Gouraud and Phong shading
//! - Per-pixel material resolution from constant colors or textures

mod lighting;
mod math;
mod project;
mod raster;
mod render;
mod shading;
mod types;

pub use lighting::*;
pub use math::*;
pub use project::*;
pub use raster::*;
pub use render::*;
pub use shading::*;
pub use types::*;

/// Default framebuffer size
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

/// High resolution dimensions (2x)
pub const WIDTH_HI: usize = 640;
pub const HEIGHT_HI: usize = 480;
