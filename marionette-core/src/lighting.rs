/// Light sources passed through to the renderer with each draw call
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub color: Vector3<f32>,
    pub enabled: bool,
}

/// A cone light. Cutoffs are stored as cosines of the half-angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub color: Vector3<f32>,
    pub exponent: f32,
    inner_cutoff: f32,
    outer_cutoff: f32,
    pub enabled: bool,
}

impl SpotLight {
    pub fn new(position: Point3<f32>, direction: Vector3<f32>, color: Vector3<f32>) -> Self {
        let mut light = Self {
            position,
            direction,
            color,
            exponent: 1.0,
            inner_cutoff: 0.0,
            outer_cutoff: 0.0,
            enabled: false,
        };
        light.set_cone(30.0, 45.0);
        light
    }

    /// Set the inner and outer half-angles in degrees.
    ///
    /// Angles are clamped to [0, 90] and the outer angle never drops below
    /// the inner one.
    pub fn set_cone(&mut self, inner_degrees: f32, outer_degrees: f32) {
        let inner = inner_degrees.clamp(0.0, 90.0);
        let outer = outer_degrees.clamp(inner, 90.0);
        self.inner_cutoff = inner.to_radians().cos();
        self.outer_cutoff = outer.to_radians().cos();
    }

    pub fn cone_degrees(&self) -> (f32, f32) {
        (
            self.inner_cutoff.acos().to_degrees(),
            self.outer_cutoff.acos().to_degrees(),
        )
    }

    pub fn inner_cutoff(&self) -> f32 {
        self.inner_cutoff
    }

    pub fn outer_cutoff(&self) -> f32 {
        self.outer_cutoff
    }
}

/// The three lights of a scene, each toggled independently
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub point: PointLight,
    pub spot: SpotLight,
    pub directional: DirectionalLight,
}

/// Selects a light in [`LightRig::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Spot,
    Directional,
}

impl LightRig {
    /// Flip a light on or off, returning its new state
    pub fn toggle(&mut self, kind: LightKind) -> bool {
        let enabled = match kind {
            LightKind::Point => &mut self.point.enabled,
            LightKind::Spot => &mut self.spot.enabled,
            LightKind::Directional => &mut self.directional.enabled,
        };
        *enabled = !*enabled;
        *enabled
    }

    pub fn is_enabled(&self, kind: LightKind) -> bool {
        match kind {
            LightKind::Point => self.point.enabled,
            LightKind::Spot => self.spot.enabled,
            LightKind::Directional => self.directional.enabled,
        }
    }
}

impl Default for LightRig {
    fn default() -> Self {
        let dim = Vector3::repeat(0.1);
        Self {
            point: PointLight {
                position: Point3::new(0.0, -1.0, 1.0),
                color: dim,
                enabled: false,
            },
            spot: SpotLight::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -2.0), dim),
            directional: DirectionalLight {
                direction: Vector3::new(0.0, -1.0, 1.0),
                color: dim,
                enabled: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut lights = LightRig::default();
        assert!(!lights.is_enabled(LightKind::Spot));
        assert!(lights.toggle(LightKind::Spot));
        assert!(lights.is_enabled(LightKind::Spot));
        assert!(!lights.is_enabled(LightKind::Point));
        assert!(!lights.toggle(LightKind::Spot));
    }

    #[test]
    fn test_cone_cutoffs() {
        let mut spot = LightRig::default().spot;
        assert!((spot.inner_cutoff() - 30f32.to_radians().cos()).abs() < 1e-6);
        assert!((spot.outer_cutoff() - 45f32.to_radians().cos()).abs() < 1e-6);

        spot.set_cone(50.0, 20.0);
        let (inner, outer) = spot.cone_degrees();
        assert!((inner - 50.0).abs() < 1e-3);
        assert!((outer - 50.0).abs() < 1e-3);
    }
}
