//! phong-raster viewer
//!
//! Renders a demo scene into the software framebuffer and presents it with
//! nearest filtering. Pass a RON config path as the first argument.
//!
//! Keys: 1-4 shading mode, 0 disable drawing, arrows orbit, +/- zoom,
//! T texture, L light follows camera, R resolution.

use std::sync::Arc;

use log::{error, info, warn};
use macroquad::prelude::*;
use phong_raster::config::RenderConfig;
use phong_raster::rasterizer::{
    Channel, Color as RasterColor, Material, Renderer, ShadingMode, Texture, Vec3 as RasterVec3, HEIGHT, HEIGHT_HI,
    WIDTH, WIDTH_HI,
};
use phong_raster::scene::{Mesh as RasterMesh, MeshInstance, Scene};
use phong_raster::VERSION;

/// Radians per second for arrow-key orbiting
const ORBIT_SPEED: f32 = 1.5;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("phong-raster v{}", VERSION),
        window_width: WIDTH as i32 * 3,
        window_height: HEIGHT as i32 * 3,
        window_resizable: true,
        ..Default::default()
    }
}

fn load_config() -> RenderConfig {
    let Some(path) = std::env::args().nth(1) else {
        return RenderConfig::default();
    };
    match RenderConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load config {}: {}, using defaults", path, e);
            RenderConfig::default()
        }
    }
}

fn load_texture(config: &RenderConfig) -> Arc<Texture> {
    let checker = || {
        Texture::checkerboard(64, 64, 8, RasterColor::new(0.9, 0.9, 0.9), RasterColor::new(0.8, 0.2, 0.1))
    };
    let texture = match &config.texture {
        Some(path) => Texture::from_file(path).unwrap_or_else(|e| {
            warn!("{}, falling back to checkerboard", e);
            checker()
        }),
        None => checker(),
    };
    info!("texture {} ({}x{})", texture.name, texture.width, texture.height);
    Arc::new(texture)
}

fn populate(scene: &mut Scene, texture: &Arc<Texture>, textured: bool) {
    scene.clear();

    let sphere_diffuse = if textured {
        Channel::Image(Arc::clone(texture))
    } else {
        Channel::Color(RasterColor::new(0.9, 0.5, 0.2))
    };
    let sphere = Material::new().with_diffuse(sphere_diffuse).with_shininess(30.0);
    let mut instance = MeshInstance::new(
        Arc::new(RasterMesh::sphere(RasterVec3::new(-1.6, 0.0, 0.0), 1.4, 16, 24)),
        Arc::new(sphere),
    );
    instance.textured = textured;
    scene.add_instance(instance);

    let cube = Material::new()
        .with_ambient(RasterColor::new(0.05, 0.05, 0.1))
        .with_diffuse(Channel::Color(RasterColor::new(0.2, 0.4, 0.9)))
        .with_specular(Channel::Color(RasterColor::new(0.5, 0.5, 0.5)));
    scene.add_instance(
        MeshInstance::new(Arc::new(RasterMesh::cube(RasterVec3::new(1.8, 0.0, 0.0), 1.0)), Arc::new(cube))
            .untextured(),
    );
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let config = load_config();
    let texture = load_texture(&config);
    let mut renderer = Renderer::new(config.width, config.height, config.raster_settings());

    let mut scene = Scene::new(config.camera());
    scene.light = config.light;
    scene.light_follows_camera = config.light_follows_camera;

    let mut textured = true;
    populate(&mut scene, &texture, textured);
    info!("phong-raster v{}: {} triangles", VERSION, scene.triangle_count());

    loop {
        let dt = get_frame_time();

        for (key, mode) in [
            (KeyCode::Key1, ShadingMode::Wire),
            (KeyCode::Key2, ShadingMode::Flat),
            (KeyCode::Key3, ShadingMode::Gouraud),
            (KeyCode::Key4, ShadingMode::Phong),
        ] {
            if is_key_pressed(key) {
                renderer.set_mode(Some(mode));
            }
        }
        if is_key_pressed(KeyCode::Key0) {
            renderer.set_mode(None);
        }

        let mut yaw = 0.0;
        let mut pitch = 0.0;
        if is_key_down(KeyCode::Left) {
            yaw -= ORBIT_SPEED * dt;
        }
        if is_key_down(KeyCode::Right) {
            yaw += ORBIT_SPEED * dt;
        }
        if is_key_down(KeyCode::Up) {
            pitch += ORBIT_SPEED * dt;
        }
        if is_key_down(KeyCode::Down) {
            pitch -= ORBIT_SPEED * dt;
        }
        if yaw != 0.0 || pitch != 0.0 {
            scene.camera.orbit(yaw, pitch);
        }
        if is_key_down(KeyCode::Equal) {
            scene.camera.zoom(1.0 - dt);
        }
        if is_key_down(KeyCode::Minus) {
            scene.camera.zoom(1.0 + dt);
        }

        if is_key_pressed(KeyCode::T) {
            textured = !textured;
            populate(&mut scene, &texture, textured);
        }
        if is_key_pressed(KeyCode::L) {
            scene.light_follows_camera = !scene.light_follows_camera;
        }
        if is_key_pressed(KeyCode::R) {
            if renderer.fb.width == WIDTH_HI {
                renderer.resize(WIDTH, HEIGHT);
            } else {
                renderer.resize(WIDTH_HI, HEIGHT_HI);
            }
        }

        let stats = renderer.render(&scene);

        let fb = &renderer.fb;
        let frame = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.to_rgba8());
        frame.set_filter(FilterMode::Nearest);

        // Letterbox to the framebuffer aspect
        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        let draw_w = fb.width as f32 * scale;
        let draw_h = fb.height as f32 * scale;

        clear_background(BLACK);
        draw_texture_ex(
            &frame,
            (screen_width() - draw_w) * 0.5,
            (screen_height() - draw_h) * 0.5,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        let mode = renderer.mode().map(ShadingMode::name).unwrap_or("Off");
        let hud = format!(
            "{} {}x{} | {} tris, {} rejected, {} px | light {}",
            mode,
            fb.width,
            fb.height,
            stats.triangles,
            stats.rejected,
            stats.pixels_written,
            if scene.light_follows_camera { "camera" } else { "fixed" },
        );
        draw_text(&hud, 10.0, 20.0, 20.0, WHITE);

        next_frame().await
    }
}
