//! Scene graph: a camera, one point light, and mesh instances
//!
//! Instances are drawn in insertion order. Each face of an instance becomes
//! a [`Triangle`] carrying the instance's material.

mod camera;
mod mesh;

pub use camera::*;
pub use mesh::*;

use std::sync::Arc;

use crate::rasterizer::{Material, Triangle, Vec3};

/// A mesh placed in the scene with a material
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub mesh: Arc<Mesh>,
    pub material: Arc<Material>,
    /// Pass uvs through to the rasterizer; only honoured when the mesh has them
    pub textured: bool,
}

impl MeshInstance {
    pub fn new(mesh: Arc<Mesh>, material: Arc<Material>) -> Self {
        let textured = mesh.has_uvs;
        Self { mesh, material, textured }
    }

    pub fn untextured(mut self) -> Self {
        self.textured = false;
        self
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let with_uvs = self.textured && self.mesh.has_uvs;
        self.mesh.faces.iter().map(move |face| {
            let verts = face.map(|i| self.mesh.vertices[i]);
            let tri = Triangle::new(
                verts.map(|v| v.pos),
                verts.map(|v| v.normal),
                Arc::clone(&self.material),
            );
            if with_uvs {
                tri.with_uvs(verts.map(|v| v.uv))
            } else {
                tri
            }
        })
    }
}

/// Everything needed to render a frame
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    /// World-space point light
    pub light: Vec3,
    /// When set, the light sits at the camera position every frame
    pub light_follows_camera: bool,
    instances: Vec<MeshInstance>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            light: Vec3::new(10.0, 10.0, -10.0),
            light_follows_camera: true,
            instances: Vec::new(),
        }
    }

    pub fn add_instance(&mut self, instance: MeshInstance) -> usize {
        self.instances.push(instance);
        self.instances.len() - 1
    }

    pub fn remove_instance(&mut self, index: usize) -> Option<MeshInstance> {
        if index < self.instances.len() {
            Some(self.instances.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut [MeshInstance] {
        &mut self.instances
    }

    /// Effective light position for the current camera
    pub fn light_position(&self) -> Vec3 {
        if self.light_follows_camera {
            self.camera.position
        } else {
            self.light
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.instances.iter().flat_map(|inst| inst.triangles())
    }

    pub fn triangle_count(&self) -> usize {
        self.instances.iter().map(|inst| inst.mesh.triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_instance() -> MeshInstance {
        MeshInstance::new(Arc::new(Mesh::cube(Vec3::ZERO, 1.0)), Arc::new(Material::new()))
    }

    #[test]
    fn test_triangles_follow_instances() {
        let mut scene = Scene::new(Camera::default());
        scene.add_instance(cube_instance());
        scene.add_instance(cube_instance().untextured());
        assert_eq!(scene.triangle_count(), 24);

        let tris: Vec<Triangle> = scene.triangles().collect();
        assert_eq!(tris.len(), 24);
        assert!(tris[..12].iter().all(|t| t.uvs.is_some()));
        assert!(tris[12..].iter().all(|t| t.uvs.is_none()));
    }

    #[test]
    fn test_triangle_carries_face_data() {
        let inst = cube_instance();
        let face = inst.mesh.faces[0];
        let tri = inst.triangles().next().unwrap();
        assert_eq!(tri.positions[1], inst.mesh.vertices[face[1]].pos);
        assert_eq!(tri.normals[2], inst.mesh.vertices[face[2]].normal);
        assert!(Arc::ptr_eq(&tri.material, &inst.material));
    }

    #[test]
    fn test_remove_instance() {
        let mut scene = Scene::new(Camera::default());
        scene.add_instance(cube_instance());
        assert!(scene.remove_instance(3).is_none());
        assert!(scene.remove_instance(0).is_some());
        assert_eq!(scene.triangles().count(), 0);
    }

    #[test]
    fn test_light_follows_camera() {
        let mut scene = Scene::new(Camera::default());
        assert_eq!(scene.light_position(), scene.camera.position);
        scene.light_follows_camera = false;
        assert_eq!(scene.light_position(), Vec3::new(10.0, 10.0, -10.0));
    }
}
