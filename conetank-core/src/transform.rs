/// Model transforms for viewing a tank (z-up world)
use nalgebra::{Matrix4, Vector3};

use crate::frustum::Frustum;

/// Orbit angles around the tank (in radians).
///
/// `azimuth` spins around the vertical axis, `elevation` tilts the tank
/// towards the viewer so the opening becomes visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitView {
    pub azimuth: f32,
    pub elevation: f32,
}

impl OrbitView {
    /// Tilt limit; beyond this the tank would flip over.
    pub const MAX_ELEVATION: f32 = std::f32::consts::FRAC_PI_2;

    pub fn new(azimuth: f32, elevation: f32) -> Self {
        Self {
            azimuth,
            elevation: elevation.clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION),
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth = (self.azimuth + d_azimuth).rem_euclid(std::f32::consts::TAU);
        self.elevation = (self.elevation + d_elevation)
            .clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
    }
}

impl Default for OrbitView {
    fn default() -> Self {
        Self::new(0.0, 0.35)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Spin around z, then tilt around x.
    pub fn rotation_matrix(view: &OrbitView) -> Matrix4<f32> {
        let spin = Matrix4::new_rotation(Vector3::new(0.0, 0.0, view.azimuth));
        let tilt = Matrix4::new_rotation(Vector3::new(view.elevation, 0.0, 0.0));
        tilt * spin
    }

    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Center the tank on the origin, shrink it into the unit sphere and
    /// apply the orbit rotation.
    pub fn tank_model_matrix(frustum: &Frustum, view: &OrbitView) -> Matrix4<f32> {
        let half_height = (frustum.height() / 2.0) as f32;
        let top = frustum.top_radius() as f32;
        let extent = (top * top + half_height * half_height).sqrt().max(f32::EPSILON);
        let scale = 1.0 / extent;

        let center = Self::translation_matrix(0.0, 0.0, -half_height);
        let fit = Self::scale_matrix(scale, scale, scale);
        Self::rotation_matrix(view) * fit * center
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
