//! Scene (retained drawable state) types.
//!
//! Responsibilities:
//! - store renderer-agnostic mesh/light data on the CPU side
//! - keep geometry helpers isolated per entity file
//!
//! The render driver owns exactly one `Scene` while active and rebuilds it
//! from scratch on every activation; renderers consume it read-only apart
//! from buffer uploads.

mod light;
mod mesh;

pub use light::PointLight;
pub use mesh::{Material, Mesh, Vertex};

use glam::Vec3;

use crate::paint::Color;

/// Rotation applied to every mesh on each animation tick, in radians.
///
/// The increment is per tick, not per second: frame pacing comes from the
/// present mode, and the cube is expected to turn one step per presented
/// frame.
pub const ROTATION_STEP: f32 = 0.01;

/// Root container for everything the viewer draws.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    lights: Vec<PointLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the fixed cube-and-light scene the driver animates.
    pub fn cube_demo() -> Self {
        let mut scene = Scene::new();
        scene.push_mesh(Mesh::unit_cube(Material::solid(Color::from_srgb_u8(0, 255, 0))));
        scene.push_light(PointLight::white(Vec3::ZERO));
        scene
    }

    pub fn push_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn push_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Advances every mesh's rotation by `(dx, dy)` radians around X and Y.
    pub fn rotate_meshes(&mut self, dx: f32, dy: f32) {
        for mesh in &mut self.meshes {
            mesh.rotate(dx, dy);
        }
    }
}
