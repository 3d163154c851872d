//! Error types for conetank-core.

use thiserror::Error;

/// Everything that can go wrong while describing or computing a tank.
#[derive(Error, Debug)]
pub enum TankError {
    /// A geometry or fill value is NaN or infinite.
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// Total height must be strictly positive.
    #[error("total height must be positive, got {0}")]
    NonPositiveHeight(f64),

    /// A radius is negative.
    #[error("{name} must not be negative, got {value}")]
    NegativeRadius { name: &'static str, value: f64 },

    /// Bottom radius exceeds top radius (frustum flipped the wrong way).
    #[error("bottom radius {bottom} exceeds top radius {top}")]
    InvertedFrustum { top: f64, bottom: f64 },

    /// Mesh sampling resolution is too coarse to form a surface or too fine to allocate.
    #[error("mesh resolution {height_samples}x{angular_samples} is out of range (2x3 up to 1024x1024)")]
    InvalidResolution {
        height_samples: usize,
        angular_samples: usize,
    },

    /// Vessel and liquid meshes must share their angular samples.
    #[error("angular samples differ: vessel {vessel}, liquid {liquid}")]
    MismatchedAngularSamples { vessel: usize, liquid: usize },

    /// Assignment input could not be parsed.
    #[error("cannot parse input near '{0}'")]
    Parse(String),

    /// A tank profile is internally inconsistent.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// No built-in profile with this name.
    #[error("unknown preset '{0}' (expected 'unit' or 'slurry')")]
    UnknownPreset(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for conetank-core operations.
pub type Result<T> = std::result::Result<T, TankError>;

/// Reject NaN and infinities with a named error.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TankError::NonFinite { name, value })
    }
}
