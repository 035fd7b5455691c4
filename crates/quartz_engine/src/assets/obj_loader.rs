//! OBJ file loader for 3D models
//!
//! Streams the file line by line and accumulates positions, UVs, normals
//! and triangulated faces into vertex/index groups. Groups close on `o` and
//! `usemtl` records and at end of stream; every completed group goes
//! through the mesh builder tagged with the source path, so re-importing a
//! file hits the dedup cache.
//!
//! Coordinate conventions: the engine is left-handed with a top-left UV
//! origin, so positions are ingested with z negated and UVs with v flipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::render::material::{Material, MaterialRegistry, DEFAULT_MATERIAL_NAME};
use crate::render::mesh::{Mesh, Vertex};
use crate::render::mesh_builder::MeshCache;

/// Errors produced while importing an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// File could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A numeric token failed to parse
    #[error("Parse error: {0}")]
    Parse(String),
    /// Structurally invalid content (bad face arity, out-of-range index)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// In-progress vertex/index group, closed into a mesh at group boundaries
///
/// Transient import-time intermediate; consumed by the mesh builder and
/// never persisted.
#[derive(Debug, Default)]
pub struct MeshGroup {
    /// Optional `o` name of the group
    pub name: Option<String>,
    /// Material name the group is drawn with
    pub material_name: String,
    /// Accumulated vertices
    pub vertices: Vec<Vertex>,
    /// Accumulated triangle indices
    pub indices: Vec<u32>,
}

/// Streaming OBJ importer
pub struct ObjLoader;

impl ObjLoader {
    /// Parse an OBJ file into one mesh per object/material group
    ///
    /// Side effects on success: every `usemtl` name is registered in the
    /// material registry with a default texture, and each completed group
    /// is built and cached under `"<path>:<object name or group index>"`.
    /// On error nothing is registered: parsing completes before any cache
    /// is touched.
    pub fn parse_file<P: AsRef<Path>>(
        path: P,
        meshes: &mut MeshCache,
        materials: &mut MaterialRegistry,
    ) -> Result<Vec<Arc<Mesh>>, ObjError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut uvs: Vec<[f32; 2]> = Vec::new();

        let mut groups: Vec<MeshGroup> = Vec::new();
        let mut material_names: Vec<String> = Vec::new();
        let mut current = MeshGroup::default();
        let mut current_material: Option<String> = None;
        let mut next_name: Option<String> = None;

        // The pending `o` name is only consumed when a group actually closes,
        // so a `usemtl` that precedes the first face does not discard it.
        let close_group = |current: &mut MeshGroup,
                           groups: &mut Vec<MeshGroup>,
                           material: &Option<String>,
                           name: &mut Option<String>| {
            if !current.vertices.is_empty() && !current.indices.is_empty() {
                let mut finished = std::mem::take(current);
                finished.material_name = material
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MATERIAL_NAME.to_string());
                finished.name = name.take();
                groups.push(finished);
            }
        };

        for line in reader.lines() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };

            match keyword {
                "#" => {} // comment
                "v" => {
                    let [x, y, z] = parse_floats(&mut tokens, "v")?;
                    // Right-handed source, left-handed engine: mirror Z
                    positions.push([x, y, -z]);
                }
                "vt" => {
                    let [u, v] = parse_floats(&mut tokens, "vt")?;
                    // Flip V for the top-left texture origin
                    uvs.push([u, 1.0 - v]);
                }
                "vn" => {
                    let [x, y, z] = parse_floats(&mut tokens, "vn")?;
                    normals.push([x, y, z]);
                }
                "f" => {
                    let refs: Vec<&str> = tokens.collect();
                    if refs.len() != 3 {
                        return Err(ObjError::InvalidFormat(format!(
                            "face with {} vertex references (triangulated faces only)",
                            refs.len()
                        )));
                    }
                    for vertex_ref in refs {
                        let vertex = resolve_vertex(vertex_ref, &positions, &uvs, &normals)?;
                        current.vertices.push(vertex);
                        current.indices.push(current.vertices.len() as u32 - 1);
                    }
                }
                "o" => {
                    close_group(&mut current, &mut groups, &current_material, &mut next_name);
                    next_name = tokens.next().map(str::to_string);
                }
                "usemtl" => {
                    let name = tokens
                        .next()
                        .ok_or_else(|| ObjError::InvalidFormat("usemtl without a name".to_string()))?
                        .to_string();

                    // The in-progress group was drawn with the previous material
                    close_group(&mut current, &mut groups, &current_material, &mut next_name);

                    current_material = Some(name.clone());
                    material_names.push(name);
                }
                _ => {} // unsupported records are ignored
            }
        }

        close_group(&mut current, &mut groups, &current_material, &mut next_name);

        // Parsing succeeded; only now mutate the registries
        for name in material_names {
            materials.add_material(name.clone(), Material::default_textured(name));
        }

        let mut result = Vec::with_capacity(groups.len());
        for (index, group) in groups.into_iter().enumerate() {
            let key = match &group.name {
                Some(name) => format!("{}:{}", path.display(), name),
                None => format!("{}:{}", path.display(), index),
            };
            let material = materials.get_or_default(&group.material_name);
            if let Some(mesh) = meshes.build_mesh(group.vertices, group.indices, &key, material) {
                result.push(mesh);
            }
        }

        log::info!("Imported {} mesh(es) from '{}'", result.len(), path.display());
        Ok(result)
    }
}

/// Parse N whitespace-separated floats for the given record keyword
fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    keyword: &str,
) -> Result<[f32; N], ObjError> {
    let mut values = [0.0; N];
    for value in &mut values {
        let token = tokens
            .next()
            .ok_or_else(|| ObjError::Parse(format!("'{}' record is missing a component", keyword)))?;
        *value = token
            .parse()
            .map_err(|_| ObjError::Parse(format!("invalid float '{}' in '{}' record", token, keyword)))?;
    }
    Ok(values)
}

/// Resolve a `position[/uv][/normal]` face reference into a vertex
///
/// Indices are 1-based; out-of-range references are rejected rather than
/// preserved as unchecked indexing.
fn resolve_vertex(
    vertex_ref: &str,
    positions: &[[f32; 3]],
    uvs: &[[f32; 2]],
    normals: &[[f32; 3]],
) -> Result<Vertex, ObjError> {
    let mut parts = vertex_ref.split('/');

    let position_token = parts.next().unwrap_or_default();
    let position = *lookup(positions, position_token, "position")?;

    let uv = match parts.next() {
        Some(token) if !token.is_empty() => *lookup(uvs, token, "texcoord")?,
        _ => [0.0, 0.0],
    };

    let normal = match parts.next() {
        Some(token) if !token.is_empty() => *lookup(normals, token, "normal")?,
        _ => [0.0, 1.0, 0.0],
    };

    Ok(Vertex::new(position, normal, uv))
}

fn lookup<'a, T>(entries: &'a [T], token: &str, what: &str) -> Result<&'a T, ObjError> {
    let index: usize = token
        .parse()
        .map_err(|_| ObjError::Parse(format!("invalid {} index '{}'", what, token)))?;
    index
        .checked_sub(1)
        .and_then(|i| entries.get(i))
        .ok_or_else(|| ObjError::InvalidFormat(format!("{} index {} out of range", what, index)))
}
