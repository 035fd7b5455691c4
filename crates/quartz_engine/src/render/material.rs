//! Material definitions and the name-keyed material registry

use std::collections::HashMap;
use std::sync::Arc;

/// Shader used when a material does not specify one
pub const DEFAULT_SHADER: &str = "shaders/unlit";

/// Placeholder texture assigned to materials registered by the importer
pub const DEFAULT_DIFFUSE_MAP: &str = "resources/textures/uv_grid.png";

/// Name of the material every registry contains from construction
pub const DEFAULT_MATERIAL_NAME: &str = "default";

/// CPU-side material description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Registry name of the material
    pub name: String,
    /// Shader identifier the material is rendered with
    pub shader: String,
    /// Optional diffuse texture path
    pub diffuse_map: Option<String>,
}

impl Material {
    /// Create a material rendered with the given shader and no textures
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            diffuse_map: None,
        }
    }

    /// Create the default-textured material the OBJ importer registers for
    /// every `usemtl` it encounters
    pub fn default_textured(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: DEFAULT_SHADER.to_string(),
            diffuse_map: Some(DEFAULT_DIFFUSE_MAP.to_string()),
        }
    }

    /// Builder pattern: set the diffuse texture
    pub fn with_diffuse_map(mut self, path: impl Into<String>) -> Self {
        self.diffuse_map = Some(path.into());
        self
    }
}

/// Process-wide, name-keyed material store
///
/// Always contains a `"default"` material so callers that resolve a
/// material name never index into an empty collection.
pub struct MaterialRegistry {
    materials: HashMap<String, Arc<Material>>,
}

impl MaterialRegistry {
    /// Create a registry pre-populated with the default material
    pub fn new() -> Self {
        let mut registry = Self {
            materials: HashMap::new(),
        };
        registry.add_material(
            DEFAULT_MATERIAL_NAME,
            Material::default_textured(DEFAULT_MATERIAL_NAME),
        );
        registry
    }

    /// Register a material under `name`, returning the shared handle
    ///
    /// Re-registering a name replaces the previous material (existing
    /// meshes keep the handle they were built with).
    pub fn add_material(&mut self, name: impl Into<String>, material: Material) -> Arc<Material> {
        let name = name.into();
        let handle = Arc::new(material);
        if self.materials.insert(name.clone(), Arc::clone(&handle)).is_some() {
            log::debug!("Replaced material '{}'", name);
        }
        handle
    }

    /// Look up a material by name
    pub fn get_material(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).map(Arc::clone)
    }

    /// Look up a material by name, falling back to the default material
    pub fn get_or_default(&self, name: &str) -> Arc<Material> {
        self.materials
            .get(name)
            .or_else(|| self.materials.get(DEFAULT_MATERIAL_NAME))
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::new(Material::default_textured(DEFAULT_MATERIAL_NAME)))
    }

    /// Number of registered materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_always_has_default() {
        let registry = MaterialRegistry::new();
        assert!(registry.get_material(DEFAULT_MATERIAL_NAME).is_some());
    }

    #[test]
    fn test_get_or_default_falls_back() {
        let registry = MaterialRegistry::new();
        let material = registry.get_or_default("missing");
        assert_eq!(material.name, DEFAULT_MATERIAL_NAME);
    }

    #[test]
    fn test_add_and_get_material() {
        let mut registry = MaterialRegistry::new();
        let added = registry.add_material("brick", Material::default_textured("brick"));
        let fetched = registry.get_material("brick").unwrap();
        assert!(Arc::ptr_eq(&added, &fetched));
    }
}
