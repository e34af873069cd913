//! phong-raster: a software triangle rasterizer with Phong lighting
//!
//! [`rasterizer`] holds the pipeline, [`scene`] the camera and meshes that
//! feed it, and [`config`] the RON settings file read by the viewer.

pub mod config;
pub mod rasterizer;
pub mod scene;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
