/// 3D transformation matrices
use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a rotation of `angle` radians about `axis`
    pub fn rotation_matrix(axis: &Unit<Vector3<f32>>, angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(axis, angle)
    }

    /// Rotation about an axis passing through `pivot` instead of the origin
    pub fn rotation_about(pivot: &Point3<f32>, axis: &Unit<Vector3<f32>>, angle: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&pivot.coords)
            * Self::rotation_matrix(axis, angle)
            * Matrix4::new_translation(&-pivot.coords)
    }

    /// Compose translate * rotate * scale, the order applied to child offsets
    pub fn trs(
        translation: Vector3<f32>,
        rotation: Option<(Unit<Vector3<f32>>, f32)>,
        scale: Vector3<f32>,
    ) -> Matrix4<f32> {
        let rotation = rotation
            .map(|(axis, angle)| Self::rotation_matrix(&axis, angle))
            .unwrap_or_else(Matrix4::identity);
        Matrix4::new_translation(&translation) * rotation * Matrix4::new_nonuniform_scaling(&scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&Vector3::y_axis(), 0.0);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_trs_order() {
        let m = Transform::trs(
            Vector3::new(1.0, 0.0, 0.0),
            Some((Vector3::z_axis(), std::f32::consts::FRAC_PI_2)),
            Vector3::repeat(2.0),
        );
        // Scale first, then rotate x onto y, then translate
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(1.0, 2.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_rotation_about_pivot_keeps_pivot_fixed() {
        let pivot = Point3::new(0.0, 0.5, 0.0);
        let m = Transform::rotation_about(&pivot, &Vector3::x_axis(), 1.0);
        assert!((m.transform_point(&pivot) - pivot).norm() < 1e-6);
    }
}
