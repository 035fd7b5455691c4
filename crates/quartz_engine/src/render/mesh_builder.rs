//! Mesh builder and name-keyed deduplication cache
//!
//! Every mesh in the process goes through [`MeshCache::build_mesh`], which
//! runs the tangent pass and registers the result under its cache name.
//! Repeated requests for the same name return the already-built instance,
//! so procedurally generated primitives and re-imported files never
//! allocate twice.

use std::collections::HashMap;
use std::sync::Arc;

use crate::render::geometry::compute_tangents;
use crate::render::material::Material;
use crate::render::mesh::{Mesh, Vertex};

/// Process-wide mesh store, keyed by mesh name
///
/// Append-only: meshes live for the lifetime of the cache.
pub struct MeshCache {
    meshes: HashMap<String, Arc<Mesh>>,
    next_draw_index: usize,
}

impl MeshCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            meshes: HashMap::new(),
            next_draw_index: 0,
        }
    }

    /// Look up a mesh by name
    pub fn get_mesh(&self, name: &str) -> Option<Arc<Mesh>> {
        self.meshes.get(name).map(Arc::clone)
    }

    /// Number of cached meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Build a mesh from raw vertex and index data
    ///
    /// Returns the cached instance when `name` is already registered.
    /// Empty vertex or index data produces no mesh and returns `None`
    /// without logging above debug level.
    pub fn build_mesh(
        &mut self,
        mut vertices: Vec<Vertex>,
        indices: Vec<u32>,
        name: &str,
        material: Arc<Material>,
    ) -> Option<Arc<Mesh>> {
        if vertices.is_empty() || indices.is_empty() {
            log::debug!("build_mesh('{}'): empty vertex or index data, skipping", name);
            return None;
        }

        if let Some(cached) = self.meshes.get(name) {
            return Some(Arc::clone(cached));
        }

        compute_tangents(&mut vertices, &indices);

        let draw_index = self.next_draw_index;
        self.next_draw_index += 1;

        let mesh = Arc::new(Mesh::new(
            vertices,
            indices,
            name.to_string(),
            material,
            draw_index,
        ));
        self.meshes.insert(name.to_string(), Arc::clone(&mesh));
        log::debug!("Built mesh '{}' (draw index {})", name, draw_index);

        Some(mesh)
    }
}

impl Default for MeshCache {
    fn default() -> Self {
        Self::new()
    }
}
