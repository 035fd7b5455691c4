//! Plain data types shared across the physics boundary

use crate::foundation::math::{Quat, Vec3};
use bitflags::bitflags;

/// World-space position and orientation of an actor or shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position component
    pub position: Vec3,
    /// Orientation component
    pub rotation: Quat,
}

impl Pose {
    /// Create a pose from position and rotation
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Identity pose at the origin
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Static versus dynamic actor, fixed at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    /// Immovable actor (environment geometry)
    Static,
    /// Simulated actor (may also be kinematic)
    Dynamic,
}

/// How an applied force or torque is interpreted by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, mass-dependent (N)
    Force,
    /// Instantaneous impulse, mass-dependent (N*s)
    Impulse,
    /// Direct velocity change, mass-independent (m/s)
    VelocityChange,
}

impl ForceMode {
    /// Accumulator bucket index for this mode
    pub(crate) fn bucket(self) -> usize {
        match self {
            Self::Force => 0,
            Self::Impulse => 1,
            Self::VelocityChange => 2,
        }
    }
}

/// Collision geometry descriptor for a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Sphere of the given radius
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Axis-aligned box in shape-local space
    Box {
        /// Half-size along each local axis
        half_extents: Vec3,
    },
    /// Capsule aligned with the shape-local X axis
    Capsule {
        /// Capsule radius
        radius: f32,
        /// Half the length of the cylindrical segment
        half_height: f32,
    },
}

/// Surface response parameters for a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsMaterial {
    /// Friction coefficient while at rest
    pub static_friction: f32,
    /// Friction coefficient while sliding
    pub dynamic_friction: f32,
    /// Bounciness in [0, 1]
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            static_friction: 0.5,
            dynamic_friction: 0.5,
            restitution: 0.6,
        }
    }
}

/// Simulation and query filter words attached to every shape
///
/// Interpretation of the words is up to the collision-filter shader on the
/// physics side; the engine only forwards them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterData {
    /// Collision group bits
    pub word0: u32,
    /// Collision mask bits
    pub word1: u32,
    /// Reserved
    pub word2: u32,
    /// Reserved
    pub word3: u32,
}

impl Default for FilterData {
    fn default() -> Self {
        // Group 0, default-colliding
        Self {
            word0: 1,
            word1: 0,
            word2: 0,
            word3: 1,
        }
    }
}

bitflags! {
    /// Per-axis motion locks for a dynamic actor
    ///
    /// A set bit prevents simulated motion along (linear) or around
    /// (angular) that world axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AxisLock: u8 {
        /// Lock translation along X
        const LINEAR_X = 1 << 0;
        /// Lock translation along Y
        const LINEAR_Y = 1 << 1;
        /// Lock translation along Z
        const LINEAR_Z = 1 << 2;
        /// Lock rotation around X
        const ANGULAR_X = 1 << 3;
        /// Lock rotation around Y
        const ANGULAR_Y = 1 << 4;
        /// Lock rotation around Z
        const ANGULAR_Z = 1 << 5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_lock_all_covers_six_axes() {
        assert_eq!(AxisLock::all().bits().count_ones(), 6);
    }

    #[test]
    fn test_force_mode_buckets_are_distinct() {
        let buckets = [
            ForceMode::Force.bucket(),
            ForceMode::Impulse.bucket(),
            ForceMode::VelocityChange.bucket(),
        ];
        assert!(buckets[0] != buckets[1] && buckets[1] != buckets[2]);
    }
}
