//! # Quartz Engine
//!
//! A modular game engine core written in Rust.
//!
//! ## Features
//!
//! - **Scene Graph**: Hierarchical game objects with transform components
//! - **Physics Integration**: Rigid-body components synchronized with an
//!   external physics scene (actors, shapes, constraints, forces)
//! - **Mesh Pipeline**: OBJ import, tangent-space construction, and
//!   name-keyed mesh/material deduplication
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quartz_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new(EngineConfig::default());
//!
//!     let ground = scene.create_object("ground");
//!     scene.attach_rigid_body(ground, RigidBodyComponent::new(true));
//!
//!     let crate_obj = scene.create_object("crate");
//!     scene.set_position(crate_obj, Vec3::new(0.0, 5.0, 0.0));
//!     scene.attach_rigid_body(crate_obj, RigidBodyComponent::new(false));
//!
//!     scene.start();
//!     scene.update(1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod physics;
pub mod scene;
pub mod render;
pub mod assets;

mod config;

pub use config::{AssetConfig, ConfigError, EngineConfig, PhysicsConfig};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{ObjError, ObjLoader},
        config::{AssetConfig, EngineConfig, PhysicsConfig},
        foundation::math::{Mat4, Quat, Vec2, Vec3},
        physics::{AxisLock, ForceMode, Geometry, PhysicsMaterial, PhysicsScene, Pose},
        render::{Material, MaterialRegistry, Mesh, MeshCache, Vertex},
        scene::{GameObjectKey, RigidBodyComponent, Scene, TransformComponent},
    };
}
