//! Procedural mesh primitives
//!
//! Generated meshes are cached under parameter-encoded names
//! (`"Sphere(1, 12)"`, `"Cube(1, 2, 3)"`), so requesting the same primitive
//! twice returns the same instance.

use std::sync::Arc;

use crate::foundation::math::constants::{PI, TAU};
use crate::render::material::Material;
use crate::render::mesh::{Mesh, Vertex};
use crate::render::mesh_builder::MeshCache;

/// Create (or fetch) a UV sphere of the given radius
///
/// `steps` controls both the ring count and the segments per ring. The
/// sphere is built as a top pole vertex, `steps - 1` latitude rings of
/// `steps` vertices, and a bottom pole vertex.
pub fn create_sphere(
    cache: &mut MeshCache,
    material: Arc<Material>,
    radius: f32,
    steps: u32,
) -> Option<Arc<Mesh>> {
    let name = format!("Sphere({}, {})", radius, steps);
    if let Some(mesh) = cache.get_mesh(&name) {
        return Some(mesh);
    }

    let steps = steps.max(3);
    let vert_count = steps * (steps - 1) + 2;
    let delta_theta = PI / steps as f32;
    let delta_phi = TAU / steps as f32;

    let mut vertices = Vec::with_capacity(vert_count as usize);
    let mut indices = Vec::new();

    vertices.push(Vertex::new([0.0, radius, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]));

    for ring in 1..steps {
        let theta = ring as f32 * delta_theta;
        for segment in 0..steps {
            let phi = segment as f32 * delta_phi;
            let position = [
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            ];
            let inv_len = 1.0 / radius;
            let normal = [
                position[0] * inv_len,
                position[1] * inv_len,
                position[2] * inv_len,
            ];
            vertices.push(Vertex::new(position, normal, [0.0, 0.0]));
        }
    }

    vertices.push(Vertex::new([0.0, -radius, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0]));

    // Top cap: first ring starts at index 1
    for segment in 0..steps {
        let v0 = 1 + segment;
        let v1 = 1 + (segment + 1) % steps;
        indices.extend_from_slice(&[v0, v1, 0]);
    }

    // Middle quads between consecutive rings
    for ring in 1..steps - 1 {
        let base = 1 + (ring - 1) * steps;
        for segment in 0..steps {
            let v0 = base + segment;
            let v1 = base + (segment + 1) % steps;
            let v2 = v1 + steps;
            let v3 = v0 + steps;
            indices.extend_from_slice(&[v0, v1, v2, v2, v3, v0]);
        }
    }

    // Bottom cap
    let last_ring = 1 + (steps - 2) * steps;
    let bottom = vert_count - 1;
    for segment in 0..steps {
        let v0 = last_ring + segment;
        let v1 = last_ring + (segment + 1) % steps;
        indices.extend_from_slice(&[v0, v1, bottom]);
    }

    cache.build_mesh(vertices, indices, &name, material)
}

/// Create (or fetch) an axis-aligned box with the given dimensions
pub fn create_cube(
    cache: &mut MeshCache,
    material: Arc<Material>,
    width: f32,
    height: f32,
    depth: f32,
) -> Option<Arc<Mesh>> {
    let name = format!("Cube({}, {}, {})", width, height, depth);
    if let Some(mesh) = cache.get_mesh(&name) {
        return Some(mesh);
    }

    let hw = width / 2.0;
    let hh = height / 2.0;
    let hd = depth / 2.0;

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // 4 corners per face so each face carries its own normal
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // Front (-Z)
        (
            [0.0, 0.0, -1.0],
            [[-hw, hh, -hd], [hw, hh, -hd], [hw, -hh, -hd], [-hw, -hh, -hd]],
        ),
        // Back (+Z)
        (
            [0.0, 0.0, 1.0],
            [[hw, hh, hd], [-hw, hh, hd], [-hw, -hh, hd], [hw, -hh, hd]],
        ),
        // Left (-X)
        (
            [-1.0, 0.0, 0.0],
            [[-hw, hh, hd], [-hw, hh, -hd], [-hw, -hh, -hd], [-hw, -hh, hd]],
        ),
        // Right (+X)
        (
            [1.0, 0.0, 0.0],
            [[hw, hh, -hd], [hw, hh, hd], [hw, -hh, hd], [hw, -hh, -hd]],
        ),
        // Top (+Y)
        (
            [0.0, 1.0, 0.0],
            [[-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd]],
        ),
        // Bottom (-Y)
        (
            [0.0, -1.0, 0.0],
            [[-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd]],
        ),
    ];

    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            vertices.push(Vertex::new(corner, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    cache.build_mesh(vertices, indices, &name, material)
}
