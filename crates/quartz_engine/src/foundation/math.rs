//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics and game development.
//!
//! The engine uses a left-handed, Y-up coordinate system: +X right, +Y up,
//! +Z forward (into the screen). Imported assets authored in right-handed
//! conventions are converted at the asset boundary (see the OBJ importer).

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Extract the rotation quaternion from a transformation matrix
///
/// Removes per-axis scale from the upper 3x3 block before conversion, so the
/// result is valid for matrices built from translation * rotation * scale.
pub fn extract_rotation(matrix: &Mat4) -> Quat {
    let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
    let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
    let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();

    let rotation_matrix = Matrix3::new(
        matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
        matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
        matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
    );

    Quat::from_matrix(&rotation_matrix)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_extract_rotation_from_scaled_matrix() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), constants::PI / 3.0);
        let matrix = Mat4::new_translation(&Vec3::new(4.0, -1.0, 2.0))
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 0.5, 3.0));

        let extracted = extract_rotation(&matrix);

        // Quaternions may differ in sign while representing the same rotation
        let dot = rotation.coords.dot(&extracted.coords);
        assert!(dot.abs() > 0.999, "rotation mismatch: dot product = {}", dot);
    }

    #[test]
    fn test_deg_rad_roundtrip() {
        assert_relative_eq!(utils::rad_to_deg(utils::deg_to_rad(137.5)), 137.5, epsilon = 1e-4);
    }
}
