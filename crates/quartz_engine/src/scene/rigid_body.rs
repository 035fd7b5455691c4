//! Rigid body component: physics actor ownership and collider lifecycle
//!
//! The component is authoritative for a game object's physics state. Before
//! activation it only buffers intent (collider descriptions, the kinematic
//! flag, an initial constraint mask); [`RigidBodyComponent::start`] creates
//! the actor and materializes everything in one step. Invalid operations
//! (forces on static or kinematic bodies, constraint changes on them,
//! removing a collider that belongs to another body) are warning-logged
//! no-ops, never errors.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::foundation::math::{Quat, Vec3};
use crate::physics::{
    ActorKey, ActorState, AxisLock, FilterData, ForceMode, Geometry, PhysicsMaterial,
    PhysicsScene, Pose, ShapeKey,
};

static NEXT_BODY_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a rigid body component, used to validate collider ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(u32);

impl BodyId {
    fn next() -> Self {
        Self(NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Description of a collider to attach to a body
#[derive(Debug, Clone)]
pub struct ColliderDesc {
    /// Collision geometry
    pub geometry: Geometry,
    /// Surface response parameters
    pub material: PhysicsMaterial,
    /// Trigger volumes report overlap without physical response
    pub trigger: bool,
    /// Pose of the shape relative to the actor
    pub local_pose: Pose,
}

impl ColliderDesc {
    /// Non-trigger collider with default material at the actor's origin
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            material: PhysicsMaterial::default(),
            trigger: false,
            local_pose: Pose::identity(),
        }
    }

    /// Builder pattern: mark as trigger volume
    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }

    /// Builder pattern: set the local pose
    pub fn with_local_pose(mut self, local_pose: Pose) -> Self {
        self.local_pose = local_pose;
        self
    }

    /// Builder pattern: set the physics material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }
}

/// A live collider attached to a body's actor
#[derive(Debug, Clone)]
pub struct ColliderInfo {
    id: u32,
    owner: BodyId,
    shape: ShapeKey,
    trigger: bool,
}

impl ColliderInfo {
    /// Identifier unique within the owning body
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Body this collider belongs to
    pub fn owner(&self) -> BodyId {
        self.owner
    }

    /// Shape handle in the physics scene
    pub fn shape(&self) -> ShapeKey {
        self.shape
    }

    /// Whether the collider is a trigger volume
    pub fn is_trigger(&self) -> bool {
        self.trigger
    }
}

// Collider queued before the actor exists; materialized at start
#[derive(Debug, Clone)]
struct ColliderIntent {
    desc: ColliderDesc,
    id: u32,
}

/// Rigid body component of a game object
pub struct RigidBodyComponent {
    body_id: BodyId,
    is_static: bool,
    kinematic: bool,
    actor: Option<ActorKey>,
    colliders: Vec<ColliderInfo>,
    pending: Vec<ColliderIntent>,
    initial_constraints: AxisLock,
    filter: FilterData,
}

impl RigidBodyComponent {
    /// Create a new body; static versus dynamic is fixed for its lifetime
    pub fn new(is_static: bool) -> Self {
        Self {
            body_id: BodyId::next(),
            is_static,
            kinematic: false,
            actor: None,
            colliders: Vec::new(),
            pending: Vec::new(),
            initial_constraints: AxisLock::empty(),
            filter: FilterData::default(),
        }
    }

    /// Identity of this body
    pub fn body_id(&self) -> BodyId {
        self.body_id
    }

    /// Whether the body was created static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether the body is flagged kinematic
    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    /// Actor handle once the body has been started
    pub fn actor(&self) -> Option<ActorKey> {
        self.actor
    }

    /// Live colliders attached to the actor
    pub fn colliders(&self) -> &[ColliderInfo] {
        &self.colliders
    }

    /// Constraint mask accumulated before activation
    pub fn initial_constraints(&self) -> AxisLock {
        self.initial_constraints
    }

    /// Collision filter words forwarded to every attached shape
    pub fn set_filter(&mut self, filter: FilterData) {
        self.filter = filter;
    }

    /// Request a collider
    ///
    /// With a live actor the shape is attached immediately; before `start`
    /// the request is buffered and materialized at activation. Returns the
    /// collider id: the explicit one if given, otherwise the next
    /// sequential id over queued and live colliders.
    pub fn add_collider(
        &mut self,
        physics: &mut PhysicsScene,
        desc: ColliderDesc,
        explicit_id: Option<u32>,
    ) -> u32 {
        let id = explicit_id.unwrap_or((self.pending.len() + self.colliders.len()) as u32);
        if let Some(actor) = self.actor {
            self.attach_collider(physics, actor, &desc, id);
        } else {
            self.pending.push(ColliderIntent { desc, id });
        }
        id
    }

    fn attach_collider(
        &mut self,
        physics: &mut PhysicsScene,
        actor: ActorKey,
        desc: &ColliderDesc,
        id: u32,
    ) {
        let shape = physics.attach_shape(
            actor,
            desc.geometry,
            desc.material,
            desc.local_pose,
            self.filter,
        );
        physics.set_trigger(shape, desc.trigger);
        self.colliders.push(ColliderInfo {
            id,
            owner: self.body_id,
            shape,
            trigger: desc.trigger,
        });
    }

    /// Remove a previously attached collider
    ///
    /// Validates ownership and membership; a mismatch logs a warning and
    /// leaves the body unchanged.
    pub fn remove_collider(&mut self, physics: &mut PhysicsScene, collider: &ColliderInfo) {
        if collider.owner != self.body_id {
            log::warn!("Failed to remove the given collider (incorrect owner)");
            return;
        }

        let Some(index) = self
            .colliders
            .iter()
            .position(|c| c.id == collider.id && c.shape == collider.shape)
        else {
            log::warn!("Failed to remove the given collider (collider not found on owner)");
            return;
        };

        let info = self.colliders.remove(index);
        if let Some(actor) = self.actor {
            physics.detach_shape(actor, info.shape);
        }
    }

    /// Look up a live collider by id
    pub fn collider(&self, id: u32) -> Option<&ColliderInfo> {
        self.colliders.iter().find(|c| c.id == id)
    }

    /// Activate the body: create the actor and materialize buffered colliders
    ///
    /// The actor is created at `pose` (the owner's world pose). For dynamic
    /// bodies the kinematic flag and the accumulated constraint mask are
    /// applied before any collider attaches. `user_data` is the opaque
    /// back-reference stored on the actor.
    pub fn start(&mut self, physics: &mut PhysicsScene, pose: Pose, user_data: u64) {
        let actor = match self.actor {
            Some(actor) => actor,
            None => {
                let actor = if self.is_static {
                    physics.create_rigid_static(pose)
                } else {
                    physics.create_rigid_dynamic(pose)
                };
                physics.set_user_data(actor, user_data);

                if !self.is_static {
                    physics.set_kinematic(actor, self.kinematic);
                    if !self.initial_constraints.is_empty() {
                        physics.set_lock(actor, AxisLock::all(), false);
                        physics.set_lock(actor, self.initial_constraints, true);
                    }
                }

                self.actor = Some(actor);
                actor
            }
        };

        let pending = std::mem::take(&mut self.pending);
        for intent in pending {
            self.attach_collider(physics, actor, &intent.desc, intent.id);
        }
    }

    /// Set or clear the kinematic flag
    ///
    /// A static body can never be kinematic; the request is rejected with
    /// a warning and no state changes.
    pub fn set_kinematic(&mut self, physics: &mut PhysicsScene, kinematic: bool) {
        if self.is_static && kinematic {
            log::warn!("A static rigid body can never be kinematic");
            return;
        }

        self.kinematic = kinematic;

        if let Some(actor) = self.actor {
            if !self.is_static {
                physics.set_kinematic(actor, kinematic);
            }
        }
    }

    // Offline kinematic toggle used by schema application (no actor yet to
    // update); enforces the same static-body rule as set_kinematic.
    pub(crate) fn apply_kinematic_flag(&mut self, kinematic: bool) -> bool {
        if self.is_static && kinematic {
            log::warn!("A static rigid body can never be kinematic");
            return false;
        }
        self.kinematic = kinematic;
        true
    }

    /// Constrain or free the given axes
    ///
    /// `enabled` means the axes are free to move; `false` locks them.
    /// Rejected on static or kinematic bodies. Without an actor the request
    /// accumulates into the initial constraint mask applied at `start`;
    /// with one, it is applied to the live actor immediately.
    pub fn set_constraint(&mut self, physics: &mut PhysicsScene, axes: AxisLock, enabled: bool) {
        if self.is_static || self.kinematic {
            log::warn!("Cannot constrain a static or kinematic actor");
            return;
        }

        if let Some(actor) = self.actor {
            physics.set_lock(actor, axes, !enabled);
        } else if enabled {
            self.initial_constraints -= axes;
        } else {
            self.initial_constraints |= axes;
        }
    }

    /// Accumulate a force on the live actor
    pub fn add_force(&self, physics: &mut PhysicsScene, force: Vec3, mode: ForceMode) {
        match self.actor {
            Some(actor) if !self.is_static && !self.kinematic => {
                physics.add_force(actor, force, mode);
            }
            _ => log::warn!("Cannot apply a force on a static or kinematic actor"),
        }
    }

    /// Accumulate a torque on the live actor
    pub fn add_torque(&self, physics: &mut PhysicsScene, torque: Vec3, mode: ForceMode) {
        match self.actor {
            Some(actor) if !self.is_static && !self.kinematic => {
                physics.add_torque(actor, torque, mode);
            }
            _ => log::warn!("Cannot apply torque on a static or kinematic actor"),
        }
    }

    /// Zero the actor's force accumulator for the given mode
    pub fn clear_force(&self, physics: &mut PhysicsScene, mode: ForceMode) {
        match self.actor {
            Some(actor) if !self.is_static && !self.kinematic => {
                physics.clear_force(actor, mode);
            }
            _ => log::warn!("Cannot clear force on a static or kinematic actor"),
        }
    }

    /// Zero the actor's torque accumulator for the given mode
    pub fn clear_torque(&self, physics: &mut PhysicsScene, mode: ForceMode) {
        match self.actor {
            Some(actor) if !self.is_static && !self.kinematic => {
                physics.clear_torque(actor, mode);
            }
            _ => log::warn!("Cannot clear torque on a static or kinematic actor"),
        }
    }

    /// Move the actor, preserving its orientation
    pub fn translate(&self, physics: &mut PhysicsScene, position: Vec3) {
        let Some(actor) = self.actor else {
            log::warn!("translate called before physics activation");
            return;
        };
        let mut pose = physics.global_pose(actor);
        pose.position = position;
        physics.set_global_pose(actor, pose);
    }

    /// Rotate the actor, preserving its position
    pub fn rotate(&self, physics: &mut PhysicsScene, rotation: Quat) {
        let Some(actor) = self.actor else {
            log::warn!("rotate called before physics activation");
            return;
        };
        let mut pose = physics.global_pose(actor);
        pose.rotation = rotation;
        physics.set_global_pose(actor, pose);
    }

    /// Live actor position, if the body has been started
    pub fn position(&self, physics: &PhysicsScene) -> Option<Vec3> {
        self.actor.map(|actor| physics.global_pose(actor).position)
    }

    /// Live actor rotation, if the body has been started
    pub fn rotation(&self, physics: &PhysicsScene) -> Option<Quat> {
        self.actor.map(|actor| physics.global_pose(actor).rotation)
    }

    /// Tear down the body's actor
    ///
    /// Detaches the actor from the physics scene, then releases it only
    /// once it reports the detached state; the scene may already have
    /// invalidated ownership during its own teardown.
    pub fn destroy(&mut self, physics: &mut PhysicsScene) {
        if let Some(actor) = self.actor.take() {
            physics.remove_actor(actor);
            if physics.actor_state(actor) == Some(ActorState::Detached) {
                physics.release_actor(actor);
            }
            self.colliders.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn physics() -> PhysicsScene {
        PhysicsScene::new(Vec3::new(0.0, -9.81, 0.0))
    }

    fn sphere_desc() -> ColliderDesc {
        ColliderDesc::new(Geometry::Sphere { radius: 0.5 })
    }

    #[test]
    fn test_colliders_buffered_until_start() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);

        let id0 = body.add_collider(&mut scene, sphere_desc(), None);
        let id1 = body.add_collider(&mut scene, sphere_desc().with_trigger(true), None);
        assert_eq!((id0, id1), (0, 1));
        assert!(body.colliders().is_empty());

        body.start(&mut scene, Pose::identity(), 7);

        assert_eq!(body.colliders().len(), 2);
        let actor = body.actor().unwrap();
        assert_eq!(scene.shape_count(actor), 2);
        assert_eq!(scene.user_data(actor), 7);
        assert!(body.collider(1).unwrap().is_trigger());
        assert!(scene.is_trigger(body.collider(1).unwrap().shape()));
    }

    #[test]
    fn test_start_twice_does_not_duplicate_state() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);
        body.add_collider(&mut scene, sphere_desc(), None);
        body.set_constraint(&mut scene, AxisLock::ANGULAR_Y, false);

        body.start(&mut scene, Pose::identity(), 0);
        let actor = body.actor().unwrap();
        body.start(&mut scene, Pose::identity(), 0);

        assert_eq!(body.actor(), Some(actor));
        assert_eq!(body.colliders().len(), 1);
        assert_eq!(scene.shape_count(actor), 1);
        assert_eq!(scene.lock_flags(actor), AxisLock::ANGULAR_Y);
    }

    #[test]
    fn test_explicit_collider_id_is_kept() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);

        let id = body.add_collider(&mut scene, sphere_desc(), Some(42));
        body.start(&mut scene, Pose::identity(), 0);

        assert_eq!(id, 42);
        assert!(body.collider(42).is_some());
    }

    #[test]
    fn test_add_collider_after_start_attaches_immediately() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(true);
        body.start(&mut scene, Pose::identity(), 0);

        body.add_collider(&mut scene, sphere_desc(), None);
        assert_eq!(body.colliders().len(), 1);
        assert_eq!(scene.shape_count(body.actor().unwrap()), 1);
    }

    #[test]
    fn test_remove_collider_with_wrong_owner_is_noop() {
        let mut scene = physics();
        let mut owner = RigidBodyComponent::new(false);
        let mut other = RigidBodyComponent::new(false);

        owner.add_collider(&mut scene, sphere_desc(), None);
        owner.start(&mut scene, Pose::identity(), 0);
        other.add_collider(&mut scene, sphere_desc(), None);
        other.start(&mut scene, Pose::identity(), 0);

        let foreign = other.colliders()[0].clone();
        owner.remove_collider(&mut scene, &foreign);

        assert_eq!(owner.colliders().len(), 1);
        assert_eq!(other.colliders().len(), 1);
    }

    #[test]
    fn test_remove_collider_detaches_shape() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);
        body.add_collider(&mut scene, sphere_desc(), None);
        body.start(&mut scene, Pose::identity(), 0);

        let info = body.colliders()[0].clone();
        body.remove_collider(&mut scene, &info);

        assert!(body.colliders().is_empty());
        assert_eq!(scene.shape_count(body.actor().unwrap()), 0);

        // Removing it again is a warning-logged no-op
        body.remove_collider(&mut scene, &info);
        assert!(body.colliders().is_empty());
    }

    #[test]
    fn test_static_body_rejects_kinematic() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(true);
        body.start(&mut scene, Pose::identity(), 0);

        body.set_kinematic(&mut scene, true);

        assert!(!body.is_kinematic());
        assert!(!scene.is_kinematic(body.actor().unwrap()));
    }

    #[test]
    fn test_constraints_accumulate_and_apply_at_start() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);

        body.set_constraint(&mut scene, AxisLock::ANGULAR_X | AxisLock::ANGULAR_Z, false);
        assert_eq!(
            body.initial_constraints(),
            AxisLock::ANGULAR_X | AxisLock::ANGULAR_Z
        );

        body.start(&mut scene, Pose::identity(), 0);

        let locks = scene.lock_flags(body.actor().unwrap());
        assert!(locks.contains(AxisLock::ANGULAR_X));
        assert!(locks.contains(AxisLock::ANGULAR_Z));
        assert!(!locks.contains(AxisLock::ANGULAR_Y));
        assert!(!locks.contains(AxisLock::LINEAR_X));
    }

    #[test]
    fn test_constraints_rejected_on_static_and_kinematic() {
        let mut scene = physics();

        let mut fixed = RigidBodyComponent::new(true);
        fixed.set_constraint(&mut scene, AxisLock::LINEAR_X, false);
        assert!(fixed.initial_constraints().is_empty());

        let mut driven = RigidBodyComponent::new(false);
        driven.set_kinematic(&mut scene, true);
        driven.set_constraint(&mut scene, AxisLock::LINEAR_X, false);
        assert!(driven.initial_constraints().is_empty());
    }

    #[test]
    fn test_forces_rejected_without_dynamic_actor() {
        let mut scene = physics();

        // Not started: no-op
        let body = RigidBodyComponent::new(false);
        body.add_force(&mut scene, Vec3::new(1.0, 0.0, 0.0), ForceMode::Force);

        // Static: no-op
        let mut fixed = RigidBodyComponent::new(true);
        fixed.start(&mut scene, Pose::identity(), 0);
        fixed.add_force(&mut scene, Vec3::new(1.0, 0.0, 0.0), ForceMode::Force);
        fixed.add_torque(&mut scene, Vec3::new(1.0, 0.0, 0.0), ForceMode::Force);
    }

    #[test]
    fn test_force_reaches_dynamic_actor() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);
        body.start(&mut scene, Pose::identity(), 0);

        body.add_force(&mut scene, Vec3::new(0.0, 10.0, 0.0), ForceMode::Impulse);
        assert_relative_eq!(
            scene.accumulated_force(body.actor().unwrap(), ForceMode::Impulse),
            Vec3::new(0.0, 10.0, 0.0)
        );

        body.clear_force(&mut scene, ForceMode::Impulse);
        assert_relative_eq!(
            scene.accumulated_force(body.actor().unwrap(), ForceMode::Impulse),
            Vec3::zeros()
        );
    }

    #[test]
    fn test_translate_preserves_rotation() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 1.0);
        body.start(&mut scene, Pose::new(Vec3::zeros(), rotation), 0);

        body.translate(&mut scene, Vec3::new(3.0, 0.0, 0.0));

        let pose = scene.global_pose(body.actor().unwrap());
        assert_relative_eq!(pose.position, Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(pose.rotation.angle(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_destroy_releases_actor_once() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);
        body.start(&mut scene, Pose::identity(), 0);
        let actor = body.actor().unwrap();

        body.destroy(&mut scene);
        assert!(body.actor().is_none());
        assert_eq!(scene.actor_state(actor), None);

        // Second destroy has nothing to do
        body.destroy(&mut scene);
    }

    #[test]
    fn test_destroy_after_scene_side_detach() {
        let mut scene = physics();
        let mut body = RigidBodyComponent::new(false);
        body.start(&mut scene, Pose::identity(), 0);
        let actor = body.actor().unwrap();

        // Scene teardown has already removed the actor
        scene.remove_actor(actor);
        body.destroy(&mut scene);

        assert_eq!(scene.actor_state(actor), None);
    }
}
