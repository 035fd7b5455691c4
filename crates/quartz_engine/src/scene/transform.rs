//! Transform component: hierarchical position/rotation/scale state
//!
//! The component caches its world matrix behind a dirty flag. There is a
//! single recompute path, [`TransformComponent::refresh`], which rebuilds
//! the matrix and the derived direction vectors together and clears the
//! flag; every local mutation sets it. Parent-relative composition is
//! mediated by the [`crate::scene::Scene`], which owns the hierarchy; the
//! transform itself never walks or validates parent links.

use crate::foundation::math::{extract_rotation, utils, Mat4, Quat, Vec3};

/// Spatial state of a game object
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,

    world_matrix: Mat4,
    dirty: bool,

    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            world_matrix: Mat4::identity(),
            // Starts dirty: the first refresh computes the real matrix
            dirty: true,
            forward: Vec3::new(0.0, 0.0, 1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl TransformComponent {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform from position, rotation and scale
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Default::default()
        }
    }

    /// Create a transform from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    /// Set the local rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Set the local rotation from Euler angles in degrees
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.set_rotation(Quat::from_euler_angles(
            utils::deg_to_rad(x),
            utils::deg_to_rad(y),
            utils::deg_to_rad(z),
        ));
    }

    /// Set the local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Whether the cached world matrix is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Recompute the world matrix and direction vectors if dirty
    ///
    /// `parent_world` is the parent transform's world matrix, if any. The
    /// matrix is `parent * translation * rotation * scale` (scale applied
    /// first). Direction vectors are derived from the rotation extracted
    /// out of the world matrix: forward = rot * +Z, right = rot * +X, and
    /// up = forward x right.
    pub fn refresh(&mut self, parent_world: Option<&Mat4>) -> Mat4 {
        if !self.dirty {
            return self.world_matrix;
        }

        let local = Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale);
        let world = parent_world.map_or(local, |parent| parent * local);
        self.world_matrix = world;

        let rotation = extract_rotation(&world);
        self.forward = rotation * Vec3::new(0.0, 0.0, 1.0);
        self.right = rotation * Vec3::new(1.0, 0.0, 0.0);
        self.up = self.forward.cross(&self.right);

        self.dirty = false;
        world
    }

    /// Cached world matrix (valid after the last [`Self::refresh`])
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    /// Cached forward direction (+Z rotated into world space)
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Cached right direction (+X rotated into world space)
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Cached up direction (forward x right)
    pub fn up(&self) -> Vec3 {
        self.up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_starts_dirty_and_refresh_clears() {
        let mut transform = TransformComponent::identity();
        assert!(transform.is_dirty());

        transform.refresh(None);
        assert!(!transform.is_dirty());
    }

    #[test]
    fn test_world_matrix_translation_row() {
        let mut transform = TransformComponent::from_position(Vec3::new(1.0, 2.0, 3.0));
        let matrix = transform.refresh(None);

        assert_relative_eq!(matrix.m14, 1.0);
        assert_relative_eq!(matrix.m24, 2.0);
        assert_relative_eq!(matrix.m34, 3.0);
    }

    #[test]
    fn test_every_setter_marks_dirty() {
        let mut transform = TransformComponent::identity();
        transform.refresh(None);

        transform.set_position(Vec3::new(1.0, 0.0, 0.0));
        assert!(transform.is_dirty());
        transform.refresh(None);

        transform.set_rotation(Quat::from_axis_angle(&Vec3::y_axis(), 0.1));
        assert!(transform.is_dirty());
        transform.refresh(None);

        transform.set_scale(Vec3::new(2.0, 2.0, 2.0));
        assert!(transform.is_dirty());
    }

    #[test]
    fn test_refresh_skips_recompute_when_clean() {
        let mut transform = TransformComponent::from_position(Vec3::new(5.0, 0.0, 0.0));
        let first = transform.refresh(None);

        // A clean transform ignores a different parent matrix: the cached
        // matrix is recomputed if and only if the dirty flag is set.
        let parent = Mat4::new_translation(&Vec3::new(100.0, 0.0, 0.0));
        let second = transform.refresh(Some(&parent));
        assert_relative_eq!(first, second);
    }

    #[test]
    fn test_parent_matrix_is_premultiplied() {
        let parent = Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0));
        let mut child = TransformComponent::from_position(Vec3::new(0.0, 0.0, 1.0));

        let world = child.refresh(Some(&parent));
        assert_relative_eq!(world.m14, 10.0);
        assert_relative_eq!(world.m34, 1.0);
    }

    #[test]
    fn test_direction_vectors_after_yaw() {
        let mut transform = TransformComponent::identity();
        transform.set_rotation(Quat::from_axis_angle(&Vec3::y_axis(), PI / 2.0));
        transform.refresh(None);

        // Yaw of 90 degrees turns +Z forward onto +X
        assert_relative_eq!(transform.forward(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(transform.right(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
        // Up stays +Y and is derived as forward x right
        assert_relative_eq!(transform.up(), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(
            transform.up(),
            transform.forward().cross(&transform.right()),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_directions_update_with_matrix_in_one_refresh() {
        let mut transform = TransformComponent::identity();
        transform.refresh(None);
        let forward_before = transform.forward();

        transform.set_rotation(Quat::from_axis_angle(&Vec3::y_axis(), PI));
        transform.refresh(None);

        // One refresh updates matrix and directions together
        assert_relative_eq!(transform.forward(), -forward_before, epsilon = 1e-5);
        assert!(!transform.is_dirty());
    }
}
