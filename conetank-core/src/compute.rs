/// One full recomputation: volume plus both surfaces for a fill height
use log::debug;

use crate::error::{ensure_finite, Result, TankError};
use crate::frustum::Frustum;
use crate::mesh::{liquid_surface, vessel_surface, MeshResolution, SurfaceGrid};

/// Everything a front end needs to display one tank state.
#[derive(Debug, Clone)]
pub struct TankSnapshot {
    pub frustum: Frustum,
    /// Fill height after clamping into `[0, H]`.
    pub fill_height: f64,
    pub volume: f64,
    pub vessel: SurfaceGrid,
    pub liquid: SurfaceGrid,
}

impl TankSnapshot {
    /// Share of the tank's capacity currently filled, in `[0, 1]`.
    pub fn fill_ratio(&self) -> f64 {
        let full = self.frustum.full_volume();
        if full > 0.0 {
            self.volume / full
        } else {
            0.0
        }
    }
}

/// Compute with the default vessel and liquid resolutions.
pub fn compute(frustum: &Frustum, fill_height: f64) -> Result<TankSnapshot> {
    compute_with(
        frustum,
        fill_height,
        MeshResolution::VESSEL,
        MeshResolution::LIQUID,
    )
}

/// Compute the volume and both meshes.
///
/// Both meshes must share their angular sample count so the liquid's
/// seam lines up with the vessel's.
pub fn compute_with(
    frustum: &Frustum,
    fill_height: f64,
    vessel_resolution: MeshResolution,
    liquid_resolution: MeshResolution,
) -> Result<TankSnapshot> {
    let fill_height = frustum.clamp_fill(ensure_finite("fill height", fill_height)?);

    if vessel_resolution.angular_samples != liquid_resolution.angular_samples {
        return Err(TankError::MismatchedAngularSamples {
            vessel: vessel_resolution.angular_samples,
            liquid: liquid_resolution.angular_samples,
        });
    }

    let volume = frustum.volume(fill_height);
    let vessel = vessel_surface(frustum, vessel_resolution)?;
    let liquid = liquid_surface(frustum, fill_height, liquid_resolution)?;

    debug!(
        "R={} r={} H={} h={} -> volume {}",
        frustum.top_radius(),
        frustum.bottom_radius(),
        frustum.height(),
        fill_height,
        volume
    );

    Ok(TankSnapshot {
        frustum: *frustum,
        fill_height,
        volume,
        vessel,
        liquid,
    })
}
