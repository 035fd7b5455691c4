//! Physics scene: actor and shape storage behind the SDK boundary
//!
//! Actors and shapes live in generational arenas, so stale handles are
//! detected instead of aliasing freshly created objects. Actor lifetime is
//! an explicit state machine (`Attached` / `Detached`): removal from the
//! scene and release of the actor's resources are separate transitions,
//! which makes the teardown double-release guard testable.

use crate::foundation::math::Vec3;
use slotmap::{new_key_type, SlotMap};

use super::types::{ActorKind, AxisLock, FilterData, ForceMode, Geometry, PhysicsMaterial, Pose};

new_key_type! {
    /// Handle to an actor owned by a [`PhysicsScene`]
    pub struct ActorKey;

    /// Handle to a shape attached to an actor
    pub struct ShapeKey;
}

/// Whether an actor currently participates in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    /// The actor is part of the simulation scene
    Attached,
    /// The actor has been removed from the scene but not yet released
    Detached,
}

#[derive(Debug)]
struct ShapeData {
    actor: ActorKey,
    geometry: Geometry,
    material: PhysicsMaterial,
    local_pose: Pose,
    filter: FilterData,
    trigger: bool,
}

#[derive(Debug)]
struct ActorData {
    kind: ActorKind,
    state: ActorState,
    pose: Pose,
    kinematic: bool,
    locks: AxisLock,
    user_data: u64,
    shapes: Vec<ShapeKey>,
    // One accumulator per ForceMode bucket; cleared per mode
    force: [Vec3; 3],
    torque: [Vec3; 3],
}

impl ActorData {
    fn new(kind: ActorKind, pose: Pose) -> Self {
        Self {
            kind,
            state: ActorState::Attached,
            pose,
            kinematic: false,
            locks: AxisLock::empty(),
            user_data: 0,
            shapes: Vec::new(),
            force: [Vec3::zeros(); 3],
            torque: [Vec3::zeros(); 3],
        }
    }
}

/// The engine-side view of the external physics scene
///
/// Every operation is synchronous and bounded; the solver's own stepping
/// happens outside this type, between `update` calls of the scene graph.
pub struct PhysicsScene {
    actors: SlotMap<ActorKey, ActorData>,
    shapes: SlotMap<ShapeKey, ShapeData>,
    gravity: Vec3,
}

impl PhysicsScene {
    /// Create an empty physics scene with the given gravity vector
    pub fn new(gravity: Vec3) -> Self {
        log::info!("Creating physics scene (gravity: {:?})", gravity);
        Self {
            actors: SlotMap::with_key(),
            shapes: SlotMap::with_key(),
            gravity,
        }
    }

    /// Gravity vector the scene was created with
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Create an immovable actor at the given pose
    pub fn create_rigid_static(&mut self, pose: Pose) -> ActorKey {
        self.actors.insert(ActorData::new(ActorKind::Static, pose))
    }

    /// Create a simulated actor at the given pose
    pub fn create_rigid_dynamic(&mut self, pose: Pose) -> ActorKey {
        self.actors.insert(ActorData::new(ActorKind::Dynamic, pose))
    }

    /// Number of live (attached or detached) actors
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Whether the actor is static or dynamic
    pub fn actor_kind(&self, actor: ActorKey) -> ActorKind {
        self.actors[actor].kind
    }

    /// Current lifetime state of the actor, `None` if already released
    pub fn actor_state(&self, actor: ActorKey) -> Option<ActorState> {
        self.actors.get(actor).map(|a| a.state)
    }

    /// Store an opaque back-reference on the actor
    pub fn set_user_data(&mut self, actor: ActorKey, user_data: u64) {
        self.actors[actor].user_data = user_data;
    }

    /// Opaque back-reference stored on the actor
    pub fn user_data(&self, actor: ActorKey) -> u64 {
        self.actors[actor].user_data
    }

    /// Attach an exclusive shape to the actor
    pub fn attach_shape(
        &mut self,
        actor: ActorKey,
        geometry: Geometry,
        material: PhysicsMaterial,
        local_pose: Pose,
        filter: FilterData,
    ) -> ShapeKey {
        let shape = self.shapes.insert(ShapeData {
            actor,
            geometry,
            material,
            local_pose,
            filter,
            trigger: false,
        });
        self.actors[actor].shapes.push(shape);
        shape
    }

    /// Detach and release a shape previously attached to `actor`
    pub fn detach_shape(&mut self, actor: ActorKey, shape: ShapeKey) {
        match self.shapes.get(shape) {
            Some(data) if data.actor == actor => {
                self.actors[actor].shapes.retain(|&s| s != shape);
                self.shapes.remove(shape);
            }
            _ => log::warn!("detach_shape: shape is not attached to this actor"),
        }
    }

    /// Mark a shape as a trigger volume (no physical response)
    pub fn set_trigger(&mut self, shape: ShapeKey, trigger: bool) {
        self.shapes[shape].trigger = trigger;
    }

    /// Whether the shape is a trigger volume
    pub fn is_trigger(&self, shape: ShapeKey) -> bool {
        self.shapes[shape].trigger
    }

    /// Geometry descriptor of a shape
    pub fn shape_geometry(&self, shape: ShapeKey) -> Geometry {
        self.shapes[shape].geometry
    }

    /// Local pose of a shape relative to its actor
    pub fn shape_local_pose(&self, shape: ShapeKey) -> Pose {
        self.shapes[shape].local_pose
    }

    /// Number of shapes attached to the actor
    pub fn shape_count(&self, actor: ActorKey) -> usize {
        self.actors[actor].shapes.len()
    }

    /// Read the actor's world-space pose
    pub fn global_pose(&self, actor: ActorKey) -> Pose {
        self.actors[actor].pose
    }

    /// Overwrite the actor's world-space pose
    pub fn set_global_pose(&mut self, actor: ActorKey, pose: Pose) {
        self.actors[actor].pose = pose;
    }

    /// Accumulate a force on the actor under the given mode
    pub fn add_force(&mut self, actor: ActorKey, force: Vec3, mode: ForceMode) {
        self.actors[actor].force[mode.bucket()] += force;
    }

    /// Accumulate a torque on the actor under the given mode
    pub fn add_torque(&mut self, actor: ActorKey, torque: Vec3, mode: ForceMode) {
        self.actors[actor].torque[mode.bucket()] += torque;
    }

    /// Zero the actor's force accumulator for the given mode
    pub fn clear_force(&mut self, actor: ActorKey, mode: ForceMode) {
        self.actors[actor].force[mode.bucket()] = Vec3::zeros();
    }

    /// Zero the actor's torque accumulator for the given mode
    pub fn clear_torque(&mut self, actor: ActorKey, mode: ForceMode) {
        self.actors[actor].torque[mode.bucket()] = Vec3::zeros();
    }

    /// Currently accumulated force for the given mode
    pub fn accumulated_force(&self, actor: ActorKey, mode: ForceMode) -> Vec3 {
        self.actors[actor].force[mode.bucket()]
    }

    /// Currently accumulated torque for the given mode
    pub fn accumulated_torque(&self, actor: ActorKey, mode: ForceMode) -> Vec3 {
        self.actors[actor].torque[mode.bucket()]
    }

    /// Set or clear the actor's kinematic flag
    pub fn set_kinematic(&mut self, actor: ActorKey, kinematic: bool) {
        self.actors[actor].kinematic = kinematic;
    }

    /// Whether the actor is flagged kinematic
    pub fn is_kinematic(&self, actor: ActorKey) -> bool {
        self.actors[actor].kinematic
    }

    /// Lock or unlock motion along the given axes
    pub fn set_lock(&mut self, actor: ActorKey, axes: AxisLock, locked: bool) {
        let data = &mut self.actors[actor];
        if locked {
            data.locks |= axes;
        } else {
            data.locks -= axes;
        }
    }

    /// Currently locked axes of the actor
    pub fn lock_flags(&self, actor: ActorKey) -> AxisLock {
        self.actors[actor].locks
    }

    /// Remove the actor from the simulation scene
    ///
    /// The actor's resources stay allocated until [`Self::release_actor`];
    /// removing an already detached actor is a no-op.
    pub fn remove_actor(&mut self, actor: ActorKey) {
        if let Some(data) = self.actors.get_mut(actor) {
            data.state = ActorState::Detached;
        }
    }

    /// Release a detached actor and every shape still attached to it
    ///
    /// Returns `false` (and leaves the actor alive) if it is still attached
    /// to the scene or was already released.
    pub fn release_actor(&mut self, actor: ActorKey) -> bool {
        match self.actors.get(actor) {
            Some(data) if data.state == ActorState::Detached => {
                let shapes = self.actors.remove(actor).map(|a| a.shapes).unwrap_or_default();
                for shape in shapes {
                    self.shapes.remove(shape);
                }
                true
            }
            Some(_) => {
                log::warn!("release_actor: actor is still attached to the scene");
                false
            }
            None => false,
        }
    }
}
