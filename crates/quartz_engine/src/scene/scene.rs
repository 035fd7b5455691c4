//! Scene: the editable hierarchy of game objects
//!
//! Owns the object arena, the physics scene and the shared resource
//! registries (dependency-injected; nothing here is a global singleton).
//! The scene mediates everything that needs more than one component:
//! parent-relative transform queries, transform-to-physics write routing,
//! activation, and the per-frame physics pose pull.
//!
//! Frame order is cooperative and single-threaded: gameplay mutations,
//! then the external physics step (outside this crate), then `update`,
//! which pulls actor poses and refreshes world matrices.

use slotmap::{Key, KeyData, SlotMap};

use crate::config::EngineConfig;
use crate::foundation::math::{Mat4, Quat, Vec3};
use crate::physics::{ActorKind, PhysicsScene, Pose};
use crate::render::{MaterialRegistry, MeshCache};
use crate::scene::game_object::{GameObject, GameObjectKey};
use crate::scene::rigid_body::RigidBodyComponent;

/// Scene graph host
pub struct Scene {
    objects: SlotMap<GameObjectKey, GameObject>,
    physics: PhysicsScene,
    materials: MaterialRegistry,
    meshes: MeshCache,
    started: bool,
}

impl Scene {
    /// Create an empty scene from the engine configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            objects: SlotMap::with_key(),
            physics: PhysicsScene::new(config.physics.gravity),
            materials: MaterialRegistry::new(),
            meshes: MeshCache::new(),
            started: false,
        }
    }

    /// Create a new root-level game object
    pub fn create_object(&mut self, name: impl Into<String>) -> GameObjectKey {
        self.objects.insert(GameObject::new(name))
    }

    /// Access a game object
    pub fn object(&self, key: GameObjectKey) -> Option<&GameObject> {
        self.objects.get(key)
    }

    /// Number of live game objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The physics scene backing this scene's rigid bodies
    pub fn physics(&self) -> &PhysicsScene {
        &self.physics
    }

    /// Mutable access to the physics scene
    pub fn physics_mut(&mut self) -> &mut PhysicsScene {
        &mut self.physics
    }

    /// The scene's material registry
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Mutable access to the material registry
    pub fn materials_mut(&mut self) -> &mut MaterialRegistry {
        &mut self.materials
    }

    /// The scene's mesh cache
    pub fn meshes(&self) -> &MeshCache {
        &self.meshes
    }

    /// Mutable access to the mesh cache
    pub fn meshes_mut(&mut self) -> &mut MeshCache {
        &mut self.meshes
    }

    /// Resolve the game object a physics actor points back to
    pub fn object_from_user_data(&self, user_data: u64) -> Option<GameObjectKey> {
        let key = GameObjectKey::from(KeyData::from_ffi(user_data));
        self.objects.contains_key(key).then_some(key)
    }

    /// Attach the physics capability to an object
    ///
    /// If the scene has already been started, the body is activated
    /// immediately at the object's current world pose.
    pub fn attach_rigid_body(&mut self, key: GameObjectKey, mut body: RigidBodyComponent) {
        if self.started {
            let pose = Pose::new(self.world_position(key), self.world_rotation(key));
            body.start(&mut self.physics, pose, key.data().as_ffi());
        }
        if let Some(object) = self.objects.get_mut(key) {
            if object.rigid_body.is_some() {
                log::warn!("Object '{}' already has a rigid body, replacing", object.name());
            }
            object.rigid_body = Some(body);
        }
    }

    /// Re-parent `child` under `parent` (or to the root with `None`)
    ///
    /// Cycles are rejected here, by construction of the hierarchy; the
    /// transform component itself never validates parent links. Returns
    /// whether the change was applied.
    pub fn set_parent(&mut self, child: GameObjectKey, parent: Option<GameObjectKey>) -> bool {
        if let Some(parent_key) = parent {
            if parent_key == child || self.is_ancestor(child, parent_key) {
                log::warn!("Rejected re-parent: would create a cycle");
                return false;
            }
            if !self.objects.contains_key(parent_key) {
                return false;
            }
        }
        if !self.objects.contains_key(child) {
            return false;
        }

        if let Some(old_parent) = self.objects[child].parent {
            let siblings = &mut self.objects[old_parent].children;
            siblings.retain(|&c| c != child);
        }

        self.objects[child].parent = parent;
        if let Some(parent_key) = parent {
            self.objects[parent_key].children.push(child);
        }

        // The child's cached world state no longer matches its ancestry
        self.mark_subtree_dirty(child);
        true
    }

    fn is_ancestor(&self, candidate: GameObjectKey, mut node: GameObjectKey) -> bool {
        while let Some(parent) = self.objects[node].parent {
            if parent == candidate {
                return true;
            }
            node = parent;
        }
        false
    }

    fn mark_subtree_dirty(&mut self, key: GameObjectKey) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(object) = self.objects.get_mut(current) {
                object.transform.mark_dirty();
                stack.extend(object.children.iter().copied());
            }
        }
    }

    /// World-space position: local position plus the parent chain's
    pub fn world_position(&self, key: GameObjectKey) -> Vec3 {
        let object = &self.objects[key];
        match object.parent {
            Some(parent) => object.transform.position() + self.world_position(parent),
            None => object.transform.position(),
        }
    }

    /// World-space rotation: parent chain's rotation composed with local
    pub fn world_rotation(&self, key: GameObjectKey) -> Quat {
        let object = &self.objects[key];
        match object.parent {
            Some(parent) => self.world_rotation(parent) * object.transform.rotation(),
            None => object.transform.rotation(),
        }
    }

    /// World matrix of the object, recomputing dirty ancestors first
    pub fn world_matrix(&mut self, key: GameObjectKey) -> Mat4 {
        let parent = self.objects[key].parent;
        let parent_world = parent.map(|p| self.world_matrix(p));
        self.objects[key].transform.refresh(parent_world.as_ref())
    }

    /// Set an object's local position
    ///
    /// If the object carries an active rigid body, the resulting world
    /// position is pushed to the physics actor so editor- and
    /// gameplay-driven moves stay synchronized with simulation state.
    pub fn set_position(&mut self, key: GameObjectKey, position: Vec3) {
        let Some(object) = self.objects.get_mut(key) else {
            return;
        };
        object.transform.set_position(position);
        self.mark_subtree_dirty(key);

        let world = self.world_position(key);
        let Self { objects, physics, .. } = self;
        if let Some(body) = objects[key].rigid_body.as_ref() {
            if body.actor().is_some() {
                body.translate(physics, world);
            }
        }
    }

    /// Set an object's local rotation, mirrored to physics like position
    pub fn set_rotation(&mut self, key: GameObjectKey, rotation: Quat) {
        let Some(object) = self.objects.get_mut(key) else {
            return;
        };
        object.transform.set_rotation(rotation);
        self.mark_subtree_dirty(key);

        let world = self.world_rotation(key);
        let Self { objects, physics, .. } = self;
        if let Some(body) = objects[key].rigid_body.as_ref() {
            if body.actor().is_some() {
                body.rotate(physics, world);
            }
        }
    }

    /// Set an object's local scale
    ///
    /// Scale has no physics counterpart: colliders cannot be rescaled at
    /// runtime, so nothing is pushed to the actor.
    pub fn set_scale(&mut self, key: GameObjectKey, scale: Vec3) {
        if let Some(object) = self.objects.get_mut(key) {
            object.transform.set_scale(scale);
            self.mark_subtree_dirty(key);
        }
    }

    /// Activate the scene
    ///
    /// Starts every rigid body at its owner's current world pose (creating
    /// actors and materializing buffered colliders), then refreshes all
    /// world matrices and direction vectors.
    pub fn start(&mut self) {
        let keys: Vec<GameObjectKey> = self.objects.keys().collect();
        for key in &keys {
            if self.objects[*key].rigid_body.is_none() {
                continue;
            }
            let pose = Pose::new(self.world_position(*key), self.world_rotation(*key));
            let Self { objects, physics, .. } = self;
            if let Some(body) = objects[*key].rigid_body.as_mut() {
                body.start(physics, pose, key.data().as_ffi());
            }
        }

        for key in keys {
            self.world_matrix(key);
        }

        self.started = true;
        log::info!("Scene started ({} objects)", self.objects.len());
    }

    /// Whether [`Self::start`] has run
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Per-frame synchronization, called after the external physics step
    ///
    /// Dynamic bodies own their pose once simulation starts: the actor's
    /// global pose is pulled back into the transform (converted to
    /// parent-local terms where needed), then every world matrix is
    /// refreshed.
    pub fn update(&mut self, _delta_time: f32) {
        let keys: Vec<GameObjectKey> = self.objects.keys().collect();

        for &key in &keys {
            let Some(actor) = self.objects[key]
                .rigid_body
                .as_ref()
                .and_then(RigidBodyComponent::actor)
            else {
                continue;
            };
            if self.physics.actor_kind(actor) != ActorKind::Dynamic {
                continue;
            }

            let pose = self.physics.global_pose(actor);
            let (local_position, local_rotation) = match self.objects[key].parent {
                Some(parent) => (
                    pose.position - self.world_position(parent),
                    self.world_rotation(parent).inverse() * pose.rotation,
                ),
                None => (pose.position, pose.rotation),
            };

            let object = &mut self.objects[key];
            object.transform.set_position(local_position);
            object.transform.set_rotation(local_rotation);
            self.mark_subtree_dirty(key);
        }

        for key in keys {
            self.world_matrix(key);
        }
    }

    /// Destroy an object, tearing down its physics actor
    ///
    /// Children are re-rooted rather than destroyed.
    pub fn destroy_object(&mut self, key: GameObjectKey) {
        let Some(mut object) = self.objects.remove(key) else {
            return;
        };

        if let Some(parent) = object.parent {
            if let Some(parent_object) = self.objects.get_mut(parent) {
                parent_object.children.retain(|&c| c != key);
            }
        }

        let children = std::mem::take(&mut object.children);
        for child in children {
            if let Some(child_object) = self.objects.get_mut(child) {
                child_object.parent = None;
                child_object.transform.mark_dirty();
            }
        }

        if let Some(body) = object.rigid_body.as_mut() {
            body.destroy(&mut self.physics);
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        // Detach every remaining actor before the physics scene goes away;
        // RigidBodyComponent::destroy tolerates the already-detached state.
        let keys: Vec<GameObjectKey> = self.objects.keys().collect();
        for key in keys {
            let Self { objects, physics, .. } = self;
            if let Some(body) = objects[key].rigid_body.as_mut() {
                body.destroy(physics);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ActorState, AxisLock};
    use approx::assert_relative_eq;

    fn scene() -> Scene {
        Scene::new(EngineConfig::default())
    }

    #[test]
    fn test_child_world_position_composes_additively() {
        let mut scene = scene();
        let parent = scene.create_object("parent");
        let child = scene.create_object("child");
        scene.set_parent(child, Some(parent));

        scene.set_position(parent, Vec3::new(1.0, 2.0, 3.0));
        scene.set_position(child, Vec3::new(0.0, 1.0, 0.0));

        assert_relative_eq!(scene.world_position(child), Vec3::new(1.0, 3.0, 3.0));
    }

    #[test]
    fn test_grandchild_world_position_composes_additively() {
        let mut scene = scene();
        let grandparent = scene.create_object("grandparent");
        let parent = scene.create_object("parent");
        let child = scene.create_object("child");
        scene.set_parent(parent, Some(grandparent));
        scene.set_parent(child, Some(parent));

        scene.set_position(grandparent, Vec3::new(10.0, 0.0, 0.0));
        scene.set_position(parent, Vec3::new(0.0, 5.0, 0.0));
        scene.set_position(child, Vec3::new(0.0, 0.0, 2.0));

        assert_relative_eq!(scene.world_position(child), Vec3::new(10.0, 5.0, 2.0));
    }

    #[test]
    fn test_world_rotation_composes_multiplicatively() {
        let mut scene = scene();
        let parent = scene.create_object("parent");
        let child = scene.create_object("child");
        scene.set_parent(child, Some(parent));

        let quarter = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::PI / 2.0);
        scene.set_rotation(parent, quarter);
        scene.set_rotation(child, quarter);

        // Two quarter turns compose into a half turn
        let world = scene.world_rotation(child);
        assert_relative_eq!(world.angle(), std::f32::consts::PI, epsilon = 1e-5);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let mut scene = scene();
        let a = scene.create_object("a");
        let b = scene.create_object("b");
        let c = scene.create_object("c");

        assert!(scene.set_parent(b, Some(a)));
        assert!(scene.set_parent(c, Some(b)));
        assert!(!scene.set_parent(a, Some(c)));
        assert!(!scene.set_parent(a, Some(a)));

        assert_eq!(scene.object(a).unwrap().parent(), None);
    }

    #[test]
    fn test_start_creates_actor_at_world_pose() {
        let mut scene = scene();
        let parent = scene.create_object("parent");
        let child = scene.create_object("child");
        scene.set_parent(child, Some(parent));
        scene.set_position(parent, Vec3::new(0.0, 10.0, 0.0));
        scene.set_position(child, Vec3::new(1.0, 0.0, 0.0));

        scene.attach_rigid_body(child, RigidBodyComponent::new(false));
        scene.start();

        let actor = scene.object(child).unwrap().rigid_body().unwrap().actor().unwrap();
        let pose = scene.physics().global_pose(actor);
        assert_relative_eq!(pose.position, Vec3::new(1.0, 10.0, 0.0));
    }

    #[test]
    fn test_actor_user_data_points_back_to_object() {
        let mut scene = scene();
        let key = scene.create_object("body");
        scene.attach_rigid_body(key, RigidBodyComponent::new(false));
        scene.start();

        let actor = scene.object(key).unwrap().rigid_body().unwrap().actor().unwrap();
        let user_data = scene.physics().user_data(actor);
        assert_eq!(scene.object_from_user_data(user_data), Some(key));
    }

    #[test]
    fn test_set_position_routes_to_active_actor() {
        let mut scene = scene();
        let key = scene.create_object("crate");
        scene.attach_rigid_body(key, RigidBodyComponent::new(false));
        scene.start();

        scene.set_position(key, Vec3::new(4.0, 5.0, 6.0));

        let actor = scene.object(key).unwrap().rigid_body().unwrap().actor().unwrap();
        assert_relative_eq!(
            scene.physics().global_pose(actor).position,
            Vec3::new(4.0, 5.0, 6.0)
        );
    }

    #[test]
    fn test_update_pulls_live_pose_into_transform() {
        let mut scene = scene();
        let key = scene.create_object("crate");
        scene.attach_rigid_body(key, RigidBodyComponent::new(false));
        scene.start();

        // The external solver moved the actor during its step
        let actor = scene.object(key).unwrap().rigid_body().unwrap().actor().unwrap();
        scene
            .physics_mut()
            .set_global_pose(actor, Pose::new(Vec3::new(0.0, -1.0, 0.0), Quat::identity()));

        scene.update(1.0 / 60.0);

        let transform = scene.object(key).unwrap().transform();
        assert_relative_eq!(transform.position(), Vec3::new(0.0, -1.0, 0.0));
        assert!(!transform.is_dirty());
    }

    #[test]
    fn test_constraints_survive_activation_via_scene() {
        let mut scene = scene();
        let key = scene.create_object("pillar");

        let mut body = RigidBodyComponent::new(false);
        body.set_constraint(scene.physics_mut(), AxisLock::LINEAR_Y, false);
        scene.attach_rigid_body(key, body);
        scene.start();

        let actor = scene.object(key).unwrap().rigid_body().unwrap().actor().unwrap();
        assert!(scene.physics().lock_flags(actor).contains(AxisLock::LINEAR_Y));
    }

    #[test]
    fn test_destroy_object_tears_down_actor_and_reroots_children() {
        let mut scene = scene();
        let parent = scene.create_object("parent");
        let child = scene.create_object("child");
        scene.set_parent(child, Some(parent));
        scene.attach_rigid_body(parent, RigidBodyComponent::new(false));
        scene.start();

        let actor = scene.object(parent).unwrap().rigid_body().unwrap().actor().unwrap();
        scene.destroy_object(parent);

        assert!(scene.object(parent).is_none());
        assert_eq!(scene.physics().actor_state(actor), None);
        assert_eq!(scene.object(child).unwrap().parent(), None);
    }

    #[test]
    fn test_attach_after_start_activates_immediately() {
        let mut scene = scene();
        scene.start();

        let key = scene.create_object("late");
        scene.set_position(key, Vec3::new(2.0, 0.0, 0.0));
        scene.attach_rigid_body(key, RigidBodyComponent::new(true));

        let body = scene.object(key).unwrap().rigid_body().unwrap();
        let actor = body.actor().unwrap();
        assert_eq!(scene.physics().actor_state(actor), Some(ActorState::Attached));
        assert_relative_eq!(
            scene.physics().global_pose(actor).position,
            Vec3::new(2.0, 0.0, 0.0)
        );
    }
}
