use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Vec3};

use crate::paint::Color;

/// GPU-visible vertex: object-space position only.
///
/// The cube material is flat-colored, so normals and UVs would be dead weight
/// in the vertex stream.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        0 => Float32x3  // position
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Solid-color surface description.
///
/// Unlit: scene lights do not modulate it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
}

impl Material {
    pub const fn solid(color: Color) -> Self {
        Self { color }
    }
}

/// Indexed triangle mesh with a per-mesh Euler rotation.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    rotation: Vec3,
    material: Material,
}

impl Mesh {
    /// Axis-aligned cube with 1.0 edges, centered on the origin.
    ///
    /// 8 corner vertices, 12 triangles, CCW winding viewed from outside.
    pub fn unit_cube(material: Material) -> Self {
        Self {
            vertices: CUBE_VERTICES.to_vec(),
            indices: CUBE_INDICES.to_vec(),
            rotation: Vec3::ZERO,
            material,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Accumulated rotation in radians (X, Y, Z).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Adds `(dx, dy)` radians to the X and Y rotation.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rotation.x += dx;
        self.rotation.y += dy;
    }

    /// Object-to-world transform from the accumulated rotation.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

const CUBE_VERTICES: [Vertex; 8] = [
    Vertex { position: [-0.5, -0.5, -0.5] },
    Vertex { position: [ 0.5, -0.5, -0.5] },
    Vertex { position: [ 0.5,  0.5, -0.5] },
    Vertex { position: [-0.5,  0.5, -0.5] },
    Vertex { position: [-0.5, -0.5,  0.5] },
    Vertex { position: [ 0.5, -0.5,  0.5] },
    Vertex { position: [ 0.5,  0.5,  0.5] },
    Vertex { position: [-0.5,  0.5,  0.5] },
];

const CUBE_INDICES: [u16; 36] = [
    4, 5, 6, 4, 6, 7, // front  (+Z)
    1, 0, 3, 1, 3, 2, // back   (-Z)
    5, 1, 2, 5, 2, 6, // right  (+X)
    0, 4, 7, 0, 7, 3, // left   (-X)
    7, 6, 2, 7, 2, 3, // top    (+Y)
    0, 1, 5, 0, 5, 4, // bottom (-Y)
];

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Mesh {
        Mesh::unit_cube(Material::solid(Color::WHITE))
    }

    #[test]
    fn unit_cube_dimensions() {
        let mesh = cube();
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.index_count(), 36);
        for v in mesh.vertices() {
            for c in v.position {
                assert_eq!(c.abs(), 0.5);
            }
        }
        assert!(mesh.indices().iter().all(|&i| (i as usize) < 8));
    }

    #[test]
    fn unit_cube_faces_wind_outward() {
        // Every triangle normal must point away from the cube center, or
        // back-face culling would eat visible faces.
        let mesh = cube();
        for tri in mesh.indices().chunks(3) {
            let p = |i: u16| Vec3::from_array(mesh.vertices()[i as usize].position);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward-facing triangle {tri:?}");
        }
    }

    #[test]
    fn rotation_starts_at_zero_and_accumulates() {
        let mut mesh = cube();
        assert_eq!(mesh.rotation(), Vec3::ZERO);
        assert_eq!(mesh.model_matrix(), Mat4::IDENTITY);

        mesh.rotate(0.01, 0.01);
        assert_eq!(mesh.rotation(), Vec3::new(0.01, 0.01, 0.0));

        mesh.rotate(0.01, 0.01);
        assert_eq!(mesh.rotation(), Vec3::new(0.02, 0.02, 0.0));
    }

    #[test]
    fn model_matrix_rotates_only() {
        // A pure rotation keeps lengths; translation must stay zero.
        let mut mesh = cube();
        mesh.rotate(0.3, 1.2);
        let m = mesh.model_matrix();

        assert_eq!(m.w_axis, glam::Vec4::W);
        let moved = m.transform_point3(Vec3::new(0.5, 0.5, 0.5));
        assert!((moved.length() - Vec3::new(0.5, 0.5, 0.5).length()).abs() < 1e-6);
    }
}
