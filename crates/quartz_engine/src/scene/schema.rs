//! Explicit per-component field schema
//!
//! Components expose a tagged list of named, typed fields that a generic
//! inspector or serializer can consume without reflection metadata. The
//! schema is the only persistence surface of the scene: it round-trips
//! component state through RON and nothing else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::{Quat, Vec3};
use crate::scene::rigid_body::RigidBodyComponent;
use crate::scene::transform::TransformComponent;

/// A typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Boolean flag
    Bool(bool),
    /// Scalar
    Float(f32),
    /// 3D vector
    Vec3(Vec3),
    /// Rotation quaternion
    Quat(Quat),
    /// Free-form text
    Text(String),
}

/// A named field of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within the component
    pub name: String,
    /// Current value
    pub value: FieldValue,
}

impl Field {
    fn new(name: &str, value: FieldValue) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Serialized form of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentState {
    /// Component type tag
    pub component: String,
    /// Field list in declaration order
    pub fields: Vec<Field>,
}

/// Errors from schema (de)serialization
#[derive(Debug, Error)]
pub enum SchemaError {
    /// RON emission failed
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    /// RON parsing failed
    #[error("deserialize error: {0}")]
    Deserialize(#[from] ron::error::SpannedError),
    /// The state block targets a different component type
    #[error("component mismatch: expected '{expected}', found '{found}'")]
    ComponentMismatch {
        /// Schema name of the component being applied to
        expected: String,
        /// Component tag found in the serialized state
        found: String,
    },
}

/// A component that exposes an explicit field schema
pub trait Schema {
    /// Stable component type tag
    fn component_name(&self) -> &'static str;

    /// Snapshot of the component's fields
    fn fields(&self) -> Vec<Field>;

    /// Apply a single field; returns whether the name/type pair matched
    fn apply(&mut self, name: &str, value: &FieldValue) -> bool;
}

/// Serialize a component's schema to RON
pub fn to_ron(component: &dyn Schema) -> Result<String, SchemaError> {
    let state = ComponentState {
        component: component.component_name().to_string(),
        fields: component.fields(),
    };
    Ok(ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::default())?)
}

/// Apply a RON state block produced by [`to_ron`]
///
/// Fields that no longer exist on the component are skipped with a
/// warning, so older scene files stay loadable.
pub fn apply_ron(component: &mut dyn Schema, text: &str) -> Result<(), SchemaError> {
    let state: ComponentState = ron::from_str(text)?;
    if state.component != component.component_name() {
        return Err(SchemaError::ComponentMismatch {
            expected: component.component_name().to_string(),
            found: state.component,
        });
    }
    for field in &state.fields {
        if !component.apply(&field.name, &field.value) {
            log::warn!(
                "Skipping unknown field '{}' on component '{}'",
                field.name,
                state.component
            );
        }
    }
    Ok(())
}

impl Schema for TransformComponent {
    fn component_name(&self) -> &'static str {
        "Transform"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("Position", FieldValue::Vec3(self.position())),
            Field::new("Rotation", FieldValue::Quat(self.rotation())),
            Field::new("Scale", FieldValue::Vec3(self.scale())),
        ]
    }

    fn apply(&mut self, name: &str, value: &FieldValue) -> bool {
        match (name, value) {
            ("Position", FieldValue::Vec3(v)) => self.set_position(*v),
            ("Rotation", FieldValue::Quat(q)) => self.set_rotation(*q),
            ("Scale", FieldValue::Vec3(v)) => self.set_scale(*v),
            _ => return false,
        }
        true
    }
}

impl Schema for RigidBodyComponent {
    fn component_name(&self) -> &'static str {
        "RigidBody"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("Static", FieldValue::Bool(self.is_static())),
            Field::new("Kinematic", FieldValue::Bool(self.is_kinematic())),
        ]
    }

    fn apply(&mut self, name: &str, value: &FieldValue) -> bool {
        match (name, value) {
            // Static/dynamic is fixed at construction; accept only a
            // matching value so stale files surface loudly
            ("Static", FieldValue::Bool(v)) => *v == self.is_static(),
            ("Kinematic", FieldValue::Bool(v)) => self.apply_kinematic_flag(*v),
            _ => false,
        }
    }
}
