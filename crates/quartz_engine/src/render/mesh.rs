//! Mesh representation for 3D models
//!
//! Vertex layout and the immutable mesh resource produced by the mesh
//! builder. Meshes are shared via `Arc` out of the process-wide cache, so
//! identity equality doubles as deduplication proof.

use std::sync::Arc;

use crate::render::material::Material;

/// 3D vertex data structure for rendering
///
/// # Memory Layout
/// The `#[repr(C)]` attribute ensures consistent memory layout across
/// platforms, which is essential for GPU buffer uploads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Tangent vector for normal mapping, accumulated during import and
    /// orthonormalized by the tangent pass
    pub tangent: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],

    /// Padding for alignment (brings the total to 48 bytes)
    pub _padding: f32,
}

// Safe to implement Pod and Zeroable for Vertex since it only contains f32s
unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

impl Vertex {
    /// Create a new vertex with a zero tangent (filled in by the tangent pass)
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tangent: [0.0, 0.0, 0.0],
            tex_coord,
            _padding: 0.0,
        }
    }

    /// Create a new vertex with an explicit tangent
    pub fn new_with_tangent(
        position: [f32; 3],
        normal: [f32; 3],
        tex_coord: [f32; 2],
        tangent: [f32; 3],
    ) -> Self {
        Self {
            position,
            normal,
            tangent,
            tex_coord,
            _padding: 0.0,
        }
    }
}

/// Immutable 3D mesh resource
///
/// Owns finalized vertex data (tangents included), triangle indices (always
/// a multiple of 3), the material it is drawn with, the cache name it was
/// registered under, and a sequential index used for draw ordering. Built
/// exclusively through [`crate::render::MeshCache::build_mesh`].
#[derive(Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    name: String,
    material: Arc<Material>,
    draw_index: usize,
}

impl Mesh {
    pub(crate) fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        name: String,
        material: Arc<Material>,
        draw_index: usize,
    ) -> Self {
        debug_assert!(indices.len() % 3 == 0, "index count must be a multiple of 3");
        Self {
            vertices,
            indices,
            name,
            material,
            draw_index,
        }
    }

    /// Finalized vertex data
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Cache name this mesh is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Material the mesh is drawn with
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Sequential index used for draw ordering
    pub fn draw_index(&self) -> usize {
        self.draw_index
    }

    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
