/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::Transform;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    pub fn toggle(self) -> Self {
        match self {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        }
    }
}

/// Camera looking at the origin of a z-up world.
///
/// Models are expected to fit inside the unit sphere (see
/// [`crate::Transform::tank_model_matrix`]).
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
    /// Distance at which the unit sphere fits the default field of view.
    pub const DISTANCE: f32 = 3.5;

    pub fn new(width: u32, height: u32) -> Self {
        Self::with_aspect(width as f32 / height.max(1) as f32)
    }

    /// Camera for a character grid. Terminal cells are roughly twice as
    /// tall as they are wide.
    pub fn for_terminal(columns: u16, rows: u16) -> Self {
        Self::with_aspect(f32::from(columns) / (2.0 * f32::from(rows.max(1))))
    }

    fn with_aspect(aspect: f32) -> Self {
        Self {
            position: Point3::new(0.0, -Self::DISTANCE, 0.0),
            target: Point3::origin(),
            up: Vector3::z(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect,
            near: 0.1,
            far: 100.0,
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
                // Match the perspective framing at the target distance.
                let distance = (self.position - self.target).norm();
                let height = 2.0 * distance * (self.fov / 2.0).tan();
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

    /// Project a 3D point to screen space as `(column, row, depth)`.
    ///
    /// Returns `None` for points behind the camera or outside the view.
    /// Smaller depth is closer.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = Transform::mvp_matrix(model_matrix, &self.view_matrix(), &self.projection_matrix());
        self.project_with(&mvp, point, width, height)
    }

    /// Same as [`Camera::project_to_screen`] with a precomputed MVP matrix.
    pub fn project_with(
        &self,
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();

        // Behind the camera or degenerate
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);

        let terminal = Camera::for_terminal(120, 40);
        assert_relative_eq!(terminal.aspect, 1.5);
    }

    #[test]
    fn test_origin_projects_to_center() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = Camera::for_terminal(80, 24);
            camera.mode = mode;
            let (x, y, _) = camera
                .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 24)
                .unwrap();
            assert_relative_eq!(x, 40.0, epsilon = 1e-3);
            assert_relative_eq!(y, 12.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_up_is_up_and_near_is_closer() {
        let camera = Camera::default();
        let identity = Matrix4::identity();
        let (_, top_row, _) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, 0.5), &identity, 800, 600)
            .unwrap();
        assert!(top_row < 300.0);

        let (_, _, near) = camera
            .project_to_screen(&Point3::new(0.0, -0.5, 0.0), &identity, 800, 600)
            .unwrap();
        let (_, _, far) = camera
            .project_to_screen(&Point3::new(0.0, 0.5, 0.0), &identity, 800, 600)
            .unwrap();
        assert!(near < far);
    }

    #[test]
    fn test_unit_sphere_is_visible() {
        let camera = Camera::for_terminal(80, 40);
        let identity = Matrix4::identity();
        for p in [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ] {
            assert!(camera.project_to_screen(&p, &identity, 80, 40).is_some());
        }
        assert!(camera
            .project_to_screen(&Point3::new(0.0, -10.0, 0.0), &identity, 80, 40)
            .is_none());
    }

    #[test]
    fn test_toggle_projection() {
        assert_eq!(
            ProjectionMode::Perspective.toggle(),
            ProjectionMode::Orthographic
        );
    }
}
