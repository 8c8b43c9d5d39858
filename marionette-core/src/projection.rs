/// Camera and per-frame render context
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

use crate::lighting::LightRig;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Shading model requested from the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingModel {
    /// Color each vertex from its normal
    #[default]
    NormalColor,
    Phong,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 20.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 1000.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm() * (self.fov / 2.0).tan() * 2.0;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Rotate the camera position about the target around the up axis
    pub fn orbit(&mut self, yaw: f32) {
        let rotation = Rotation3::from_axis_angle(&nalgebra::Unit::new_normalize(self.up), yaw);
        self.position = self.target + rotation * (self.position - self.target);
    }

    /// Move towards (`factor < 1`) or away from the target
    pub fn zoom(&mut self, factor: f32) {
        let offset = (self.position - self.target) * factor;
        if offset.norm() > self.near {
            self.position = self.target + offset;
        }
    }

    /// Snapshot of everything the renderer needs for one frame
    pub fn render_context(&self, lights: &LightRig, shading: ShadingModel) -> RenderContext {
        RenderContext {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            camera_position: self.position,
            lights: *lights,
            shading,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Per-frame camera and lighting state passed explicitly into every draw
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub camera_position: Point3<f32>,
    pub lights: LightRig,
    pub shading: ShadingModel,
}

impl RenderContext {
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    /// Project an object-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with depth in normalized device coordinates,
    /// or `None` if the point falls outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.view_projection() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Behind the camera or degenerate
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Camera::default().render_context(&LightRig::default(), ShadingModel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let context = Camera::new(80, 40).render_context(&LightRig::default(), ShadingModel::Phong);
        let (x, y, depth) = context
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!((x - 40.0).abs() < 1e-3);
        assert!((y - 20.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let context = RenderContext::default();
        let behind = Point3::new(0.0, 0.0, 30.0);
        assert!(context
            .project_to_screen(&behind, &Matrix4::identity(), 80, 40)
            .is_none());
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::default();
        let before = (camera.position - camera.target).norm();
        camera.orbit(1.0);
        let after = (camera.position - camera.target).norm();
        assert!((before - after).abs() < 1e-4);
        assert!(camera.position.x.abs() > 1.0);
    }
}
