/// Inverted truncated cone geometry and the liquid volume formula
use std::f64::consts::PI;

use crate::error::{ensure_finite, Result, TankError};

/// A tank shaped like a truncated cone standing on its narrow end.
///
/// Heights are measured upwards from the bottom (narrow) face. The top
/// radius is never smaller than the bottom radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    top_radius: f64,
    bottom_radius: f64,
    height: f64,
}

impl Frustum {
    /// Validate and build a frustum.
    ///
    /// Fails when any value is non-finite, `height <= 0`, a radius is
    /// negative, or `bottom_radius > top_radius`.
    pub fn new(top_radius: f64, bottom_radius: f64, height: f64) -> Result<Self> {
        let top_radius = ensure_finite("top radius", top_radius)?;
        let bottom_radius = ensure_finite("bottom radius", bottom_radius)?;
        let height = ensure_finite("total height", height)?;

        if height <= 0.0 {
            return Err(TankError::NonPositiveHeight(height));
        }
        if bottom_radius < 0.0 {
            return Err(TankError::NegativeRadius {
                name: "bottom radius",
                value: bottom_radius,
            });
        }
        if top_radius < 0.0 {
            return Err(TankError::NegativeRadius {
                name: "top radius",
                value: top_radius,
            });
        }
        if bottom_radius > top_radius {
            return Err(TankError::InvertedFrustum {
                top: top_radius,
                bottom: bottom_radius,
            });
        }

        Ok(Self {
            top_radius,
            bottom_radius,
            height,
        })
    }

    pub fn top_radius(&self) -> f64 {
        self.top_radius
    }

    pub fn bottom_radius(&self) -> f64 {
        self.bottom_radius
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Clamp a fill height into `[0, H]`. Overfilling is not an error.
    pub fn clamp_fill(&self, fill_height: f64) -> f64 {
        // `+ 0.0` turns -0.0 into 0.0
        fill_height.clamp(0.0, self.height) + 0.0
    }

    /// Cross-sectional radius at height `z`, linearly interpolated
    /// between the bottom and top radii.
    pub fn radius_at(&self, z: f64) -> f64 {
        let z = self.clamp_fill(z);
        self.bottom_radius + (self.top_radius - self.bottom_radius) * z / self.height
    }

    /// Volume of liquid filling the tank from the bottom up to `fill_height`.
    ///
    /// The liquid is itself a truncated cone from `r` to `radius_at(h)`.
    /// A NaN fill height yields NaN.
    pub fn volume(&self, fill_height: f64) -> f64 {
        let h = self.clamp_fill(fill_height);
        let r = self.bottom_radius;
        let r_h = self.radius_at(h);
        PI / 3.0 * h * (r * r + r * r_h + r_h * r_h)
    }

    /// Volume of the completely filled tank.
    pub fn full_volume(&self) -> f64 {
        self.volume(self.height)
    }
}

/// Liquid volume for the raw `(R, r, H, h)` tuple.
///
/// Geometry is validated up front; `h` must be finite and is clamped.
pub fn liquid_volume(
    top_radius: f64,
    bottom_radius: f64,
    height: f64,
    fill_height: f64,
) -> Result<f64> {
    let frustum = Frustum::new(top_radius, bottom_radius, height)?;
    let fill_height = ensure_finite("fill height", fill_height)?;
    Ok(frustum.volume(fill_height))
}
