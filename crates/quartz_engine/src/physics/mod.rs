//! Physics-engine boundary
//!
//! Models the surface of the external rigid-body SDK the engine integrates
//! with: actor creation at a pose, exclusive shape attachment, global pose
//! access, force/torque accumulation, per-axis locks, and the kinematic
//! flag. Simulation itself (integration, broad/narrow phase) is owned by
//! the external engine and is out of scope here; this module is the
//! bookkeeping side the components talk to around the once-per-frame step.

pub mod scene;
pub mod types;

pub use scene::{ActorKey, ActorState, PhysicsScene, ShapeKey};
pub use types::{ActorKind, AxisLock, FilterData, ForceMode, Geometry, PhysicsMaterial, Pose};
