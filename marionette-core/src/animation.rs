/// Per-node animation rules advanced once per update
use nalgebra::{Matrix4, Point3, Unit, Vector3};

use crate::transform::Transform;

/// Phase period shared by every rule
pub const PERIOD: f32 = std::f32::consts::TAU;

/// A periodic law mapping a phase to a local transform adjustment.
///
/// Both variants are periodic in phase with period [`PERIOD`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationRule {
    /// Oscillate `amplitude * sin(phase)` radians about `axis` through `pivot`
    Swing {
        axis: Unit<Vector3<f32>>,
        pivot: Point3<f32>,
        amplitude: f32,
        rate: f32,
    },
    /// Rotate continuously about `axis`, one radian of phase per radian of angle
    Spin { axis: Unit<Vector3<f32>>, rate: f32 },
}

impl AnimationRule {
    /// Returns `None` when `axis` has no direction.
    pub fn swing(axis: Vector3<f32>, pivot: Point3<f32>, amplitude: f32, rate: f32) -> Option<Self> {
        Some(Self::Swing {
            axis: Unit::try_new(axis, f32::EPSILON)?,
            pivot,
            amplitude,
            rate,
        })
    }

    /// Returns `None` when `axis` has no direction.
    pub fn spin(axis: Vector3<f32>, rate: f32) -> Option<Self> {
        Some(Self::Spin {
            axis: Unit::try_new(axis, f32::EPSILON)?,
            rate,
        })
    }

    /// Phase increment applied by one update
    pub fn rate(&self) -> f32 {
        match *self {
            Self::Swing { rate, .. } | Self::Spin { rate, .. } => rate,
        }
    }

    /// Rotation angle in radians at `phase`
    pub fn angle(&self, phase: f32) -> f32 {
        match *self {
            Self::Swing { amplitude, .. } => amplitude * phase.sin(),
            Self::Spin { .. } => phase,
        }
    }

    pub fn matrix(&self, phase: f32) -> Matrix4<f32> {
        match self {
            Self::Swing { axis, pivot, .. } => Transform::rotation_about(pivot, axis, self.angle(phase)),
            Self::Spin { axis, .. } => Transform::rotation_matrix(axis, self.angle(phase)),
        }
    }
}
