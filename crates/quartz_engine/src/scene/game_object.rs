//! Game object: a named node in the scene hierarchy
//!
//! Every object owns exactly one transform. Physics is an explicit optional
//! capability (`rigid_body`), resolved when the component is attached;
//! there is no runtime type-keyed component lookup.

use slotmap::new_key_type;

use crate::scene::rigid_body::RigidBodyComponent;
use crate::scene::transform::TransformComponent;

new_key_type! {
    /// Handle to a game object owned by a [`crate::scene::Scene`]
    pub struct GameObjectKey;
}

/// A node of the scene graph
pub struct GameObject {
    name: String,
    pub(crate) parent: Option<GameObjectKey>,
    pub(crate) children: Vec<GameObjectKey>,
    pub(crate) transform: TransformComponent,
    pub(crate) rigid_body: Option<RigidBodyComponent>,
}

impl GameObject {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: TransformComponent::identity(),
            rigid_body: None,
        }
    }

    /// Name of the object
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent object, if any
    pub fn parent(&self) -> Option<GameObjectKey> {
        self.parent
    }

    /// Child objects
    pub fn children(&self) -> &[GameObjectKey] {
        &self.children
    }

    /// The object's transform
    ///
    /// Mutations that must stay synchronized with physics go through the
    /// scene (`Scene::set_position` and friends).
    pub fn transform(&self) -> &TransformComponent {
        &self.transform
    }

    /// Whether the object carries the physics capability
    pub fn has_physics(&self) -> bool {
        self.rigid_body.is_some()
    }

    /// The object's rigid body, if attached
    pub fn rigid_body(&self) -> Option<&RigidBodyComponent> {
        self.rigid_body.as_ref()
    }
}
