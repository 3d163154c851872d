/// Surface-of-revolution sampling for the vessel wall and the liquid body
use std::f64::consts::TAU;

use log::trace;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, Result, TankError};
use crate::frustum::Frustum;

/// Number of height and angular samples used to revolve a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshResolution {
    pub height_samples: usize,
    pub angular_samples: usize,
}

impl MeshResolution {
    pub const VESSEL: Self = Self::new(50, 50);
    pub const LIQUID: Self = Self::new(30, 50);
    /// Upper bound per axis; keeps a grid within a million points.
    pub const MAX_SAMPLES: usize = 1024;

    pub const fn new(height_samples: usize, angular_samples: usize) -> Self {
        Self {
            height_samples,
            angular_samples,
        }
    }

    /// At least two rings and a triangle's worth of angles, at most
    /// [`MeshResolution::MAX_SAMPLES`] along either axis.
    pub fn validate(&self) -> Result<()> {
        let heights = 2..=Self::MAX_SAMPLES;
        let angles = 3..=Self::MAX_SAMPLES;
        if !heights.contains(&self.height_samples) || !angles.contains(&self.angular_samples) {
            return Err(TankError::InvalidResolution {
                height_samples: self.height_samples,
                angular_samples: self.angular_samples,
            });
        }
        Ok(())
    }
}

impl Default for MeshResolution {
    fn default() -> Self {
        Self::VESSEL
    }
}

/// A `rows x cols` grid of points, row-major by height then angle.
///
/// Adjacent rows and columns form quads. The first and last column sit
/// on the same angle, so the seam is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    rows: usize,
    cols: usize,
    points: Vec<Point3<f64>>,
}

impl SurfaceGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn point(&self, row: usize, col: usize) -> Option<&Point3<f64>> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.points.get(row * self.cols + col)
    }

    /// All points of one height sample.
    pub fn ring(&self, row: usize) -> Option<&[Point3<f64>]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.points[start..start + self.cols])
    }

    /// Height of the topmost ring.
    pub fn max_height(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.z)
    }

    /// True when the grid collapsed into a single ring.
    pub fn is_flat(&self) -> bool {
        self.rows < 2
    }

    /// Index quads `[a, b, c, d]` in counter-clockwise order (seen from
    /// outside), one per pair of adjacent rows and columns.
    pub fn quads(&self) -> impl Iterator<Item = [usize; 4]> + '_ {
        let cols = self.cols;
        (0..self.rows.saturating_sub(1)).flat_map(move |i| {
            (0..cols.saturating_sub(1)).map(move |j| {
                let a = i * cols + j;
                let b = a + 1;
                let c = b + cols;
                let d = a + cols;
                [a, b, c, d]
            })
        })
    }

    /// Flat `[x0, y0, z0, x1, ...]` buffer for external renderers.
    pub fn flat_coordinates(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

/// `n` evenly spaced samples over `[start, end]`, endpoints included.
fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (end - start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| if i + 1 == n { end } else { start + step * i as f64 })
}

/// Revolve the frustum's radius profile between `z = 0` and `z_max`.
///
/// `z_max` is clamped to `[0, H]`. A zero `z_max` yields a single ring
/// of radius `r` at the bottom.
pub fn revolve(frustum: &Frustum, z_max: f64, resolution: MeshResolution) -> Result<SurfaceGrid> {
    resolution.validate()?;
    let z_max = frustum.clamp_fill(ensure_finite("mesh height", z_max)?);

    let rows = if z_max > 0.0 {
        resolution.height_samples
    } else {
        1
    };
    let cols = resolution.angular_samples;

    let angles: Vec<(f64, f64)> = linspace(0.0, TAU, cols)
        .map(|theta| (theta.cos(), theta.sin()))
        .collect();

    let capacity = rows.checked_mul(cols).ok_or(TankError::InvalidResolution {
        height_samples: resolution.height_samples,
        angular_samples: resolution.angular_samples,
    })?;
    let mut points = Vec::with_capacity(capacity);
    for z in linspace(0.0, z_max, rows) {
        let rho = frustum.radius_at(z);
        points.extend(
            angles
                .iter()
                .map(|&(cos, sin)| Point3::new(rho * cos, rho * sin, z)),
        );
    }

    trace!("revolved {}x{} grid up to z={}", rows, cols, z_max);
    Ok(SurfaceGrid { rows, cols, points })
}

/// The full vessel wall, `z` in `[0, H]`.
pub fn vessel_surface(frustum: &Frustum, resolution: MeshResolution) -> Result<SurfaceGrid> {
    revolve(frustum, frustum.height(), resolution)
}

/// The wetted wall of the liquid body, `z` in `[0, h]`.
pub fn liquid_surface(
    frustum: &Frustum,
    fill_height: f64,
    resolution: MeshResolution,
) -> Result<SurfaceGrid> {
    revolve(frustum, fill_height, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tank() -> Frustum {
        Frustum::new(2.0, 0.15, 2.0).unwrap()
    }

    #[test]
    fn test_grid_dimensions_and_order() {
        let grid = vessel_surface(&tank(), MeshResolution::new(5, 8)).unwrap();
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.cols(), 8);
        assert_eq!(grid.points().len(), 40);

        // Row-major by height: every point in a ring shares its z.
        for row in 0..grid.rows() {
            let ring = grid.ring(row).unwrap();
            let z = ring[0].z;
            assert!(ring.iter().all(|p| p.z == z));
        }
        assert_relative_eq!(grid.point(0, 0).unwrap().z, 0.0);
        assert_relative_eq!(grid.point(4, 0).unwrap().z, 2.0);
        assert_relative_eq!(grid.max_height(), 2.0);
    }

    #[test]
    fn test_points_lie_on_profile() {
        let frustum = tank();
        let grid = liquid_surface(&frustum, 1.3, MeshResolution::LIQUID).unwrap();
        for p in grid.points() {
            let rho = (p.x * p.x + p.y * p.y).sqrt();
            assert_relative_eq!(rho, frustum.radius_at(p.z), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_seam_is_closed() {
        let grid = vessel_surface(&tank(), MeshResolution::new(3, 12)).unwrap();
        let first = grid.point(2, 0).unwrap();
        let last = grid.point(2, 11).unwrap();
        assert_relative_eq!(first.x, last.x, epsilon = 1e-12);
        assert_relative_eq!(first.y, last.y, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_tank_collapses_to_bottom_ring() {
        let grid = liquid_surface(&tank(), 0.0, MeshResolution::LIQUID).unwrap();
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.cols(), 50);
        assert!(grid.is_flat());
        assert_eq!(grid.quads().count(), 0);
        for p in grid.points() {
            assert_eq!(p.z, 0.0);
            assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), 0.15, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_overfill_mesh_stops_at_rim() {
        let grid = liquid_surface(&tank(), 7.0, MeshResolution::new(4, 6)).unwrap();
        assert_relative_eq!(grid.max_height(), 2.0);
    }

    #[test]
    fn test_quad_count() {
        let grid = vessel_surface(&tank(), MeshResolution::new(4, 6)).unwrap();
        assert_eq!(grid.quads().count(), 3 * 5);
        let last = grid.quads().last().unwrap();
        assert_eq!(last, [16, 17, 23, 22]);
    }

    #[test]
    fn test_rejects_coarse_resolution() {
        assert!(matches!(
            vessel_surface(&tank(), MeshResolution::new(1, 50)),
            Err(TankError::InvalidResolution { .. })
        ));
        assert!(vessel_surface(&tank(), MeshResolution::new(10, 2)).is_err());
        assert!(vessel_surface(&tank(), MeshResolution::new(usize::MAX / 2, 8)).is_err());
        assert!(vessel_surface(&tank(), MeshResolution::new(50, 1025)).is_err());
        assert!(vessel_surface(&tank(), MeshResolution::new(1024, 3)).is_ok());
    }

    #[test]
    fn test_flat_coordinates_layout() {
        let grid = vessel_surface(&tank(), MeshResolution::new(2, 3)).unwrap();
        let flat = grid.flat_coordinates();
        assert_eq!(flat.len(), 18);
        assert_relative_eq!(flat[0], 0.15);
        assert_relative_eq!(flat[2], 0.0);
        assert_relative_eq!(flat[17], 2.0);
    }
}
