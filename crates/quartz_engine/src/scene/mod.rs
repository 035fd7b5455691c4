//! Scene graph: game objects, transforms and physics components
//!
//! The scene owns a mutable hierarchy of game objects. Spatial state is
//! co-owned by two components: the transform is authoritative until physics
//! activation, after which dynamic bodies' poses are owned by the physics
//! actor and pulled back each frame.

pub mod game_object;
pub mod rigid_body;
pub mod scene;
pub mod schema;
pub mod transform;

pub use game_object::{GameObject, GameObjectKey};
pub use rigid_body::{BodyId, ColliderDesc, ColliderInfo, RigidBodyComponent};
pub use scene::Scene;
pub use schema::{ComponentState, Field, FieldValue, Schema, SchemaError};
pub use transform::TransformComponent;
