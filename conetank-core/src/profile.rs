//! Tank profiles: display units, slider ranges and mesh resolution.
//!
//! A profile replaces per-variant copies of the calculator. The built-in
//! presets cover the unit-less demo and a slurry tank measured in
//! centimeters with volumes shown in liters; anything else can be loaded
//! from JSON.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TankError};
use crate::mesh::MeshResolution;

/// Allowed range, initial value and keyboard step of one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl SliderRange {
    pub const fn new(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }

    /// Clamp into `[min, max]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn validate(&self, name: &str) -> Result<()> {
        let finite = [self.min, self.max, self.default, self.step]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(TankError::InvalidProfile(format!(
                "{name}: range values must be finite"
            )));
        }
        if !(self.min <= self.default && self.default <= self.max) {
            return Err(TankError::InvalidProfile(format!(
                "{name}: default {} outside [{}, {}]",
                self.default, self.min, self.max
            )));
        }
        if self.step <= 0.0 {
            return Err(TankError::InvalidProfile(format!(
                "{name}: step must be positive"
            )));
        }
        Ok(())
    }
}

/// Configuration of one calculator variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankProfile {
    pub name: String,
    pub title: String,
    /// Unit of the length inputs, e.g. `cm`.
    pub length_unit: String,
    /// Unit of the displayed volume, e.g. `liters`.
    pub volume_unit: String,
    /// Raw volume (cubed length unit) is divided by this for display.
    pub volume_divisor: f64,
    pub top_radius: SliderRange,
    /// Upper bound is additionally limited by the current top radius.
    pub bottom_radius: SliderRange,
    pub height: SliderRange,
    /// Upper bound is additionally limited by the current total height.
    pub fill_height: SliderRange,
    pub vessel_resolution: MeshResolution,
    pub liquid_resolution: MeshResolution,
}

impl TankProfile {
    pub const PRESETS: [&'static str; 2] = ["unit", "slurry"];

    /// Unit-less demo tank.
    pub fn unit_demo() -> Self {
        Self {
            name: "unit".to_string(),
            title: "Inverted Truncated Cone Volume Calculator".to_string(),
            length_unit: "units".to_string(),
            volume_unit: "cubic units".to_string(),
            volume_divisor: 1.0,
            top_radius: SliderRange::new(1.0, 5.0, 2.0, 0.05),
            bottom_radius: SliderRange::new(0.1, 5.0, 0.15, 0.05),
            height: SliderRange::new(1.0, 5.0, 2.0, 0.05),
            fill_height: SliderRange::new(0.0, 5.0, 1.0, 0.05),
            vessel_resolution: MeshResolution::VESSEL,
            liquid_resolution: MeshResolution::LIQUID,
        }
    }

    /// Slurry tank: centimeter inputs, volume shown in liters.
    pub fn slurry_tank() -> Self {
        Self {
            name: "slurry".to_string(),
            title: "Slurry Tank Volume Calculator".to_string(),
            length_unit: "cm".to_string(),
            volume_unit: "liters".to_string(),
            volume_divisor: 1000.0,
            top_radius: SliderRange::new(50.0, 300.0, 150.0, 5.0),
            bottom_radius: SliderRange::new(5.0, 300.0, 15.0, 1.0),
            height: SliderRange::new(50.0, 400.0, 200.0, 5.0),
            fill_height: SliderRange::new(0.0, 400.0, 100.0, 5.0),
            vessel_resolution: MeshResolution::VESSEL,
            liquid_resolution: MeshResolution::LIQUID,
        }
    }

    /// Look up a built-in profile by name.
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "unit" => Ok(Self::unit_demo()),
            "slurry" => Ok(Self::slurry_tank()),
            other => Err(TankError::UnknownPreset(other.to_string())),
        }
    }

    /// Parse and validate a JSON profile. Missing fields take the
    /// unit-demo values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON profile from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let profile = Self::from_json_str(&json)?;
        info!("loaded tank profile '{}' from {}", profile.name, path.display());
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        self.top_radius.validate("top_radius")?;
        self.bottom_radius.validate("bottom_radius")?;
        self.height.validate("height")?;
        self.fill_height.validate("fill_height")?;

        if self.height.min <= 0.0 {
            return Err(TankError::InvalidProfile(
                "height: minimum must be positive".to_string(),
            ));
        }
        if self.bottom_radius.min < 0.0 {
            return Err(TankError::InvalidProfile(
                "bottom_radius: minimum must not be negative".to_string(),
            ));
        }
        if self.bottom_radius.min > self.top_radius.min {
            return Err(TankError::InvalidProfile(
                "bottom_radius: minimum exceeds the smallest top radius".to_string(),
            ));
        }
        if !(self.volume_divisor.is_finite() && self.volume_divisor > 0.0) {
            return Err(TankError::InvalidProfile(
                "volume_divisor must be positive".to_string(),
            ));
        }
        self.vessel_resolution.validate()?;
        self.liquid_resolution.validate()?;
        if self.vessel_resolution.angular_samples != self.liquid_resolution.angular_samples {
            return Err(TankError::MismatchedAngularSamples {
                vessel: self.vessel_resolution.angular_samples,
                liquid: self.liquid_resolution.angular_samples,
            });
        }
        Ok(())
    }

    /// Convert a raw volume into the display unit.
    pub fn display_volume(&self, volume: f64) -> f64 {
        volume / self.volume_divisor
    }

    /// One-line result text for a fill height and its raw volume.
    pub fn volume_summary(&self, fill_height: f64, volume: f64) -> String {
        format!(
            "Volume of liquid at height {:.2} {} is: {:.2} {}",
            fill_height,
            self.length_unit,
            self.display_volume(volume),
            self.volume_unit
        )
    }
}

impl Default for TankProfile {
    fn default() -> Self {
        Self::unit_demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for name in TankProfile::PRESETS {
            let profile = TankProfile::preset(name).unwrap();
            profile.validate().unwrap();
            assert_eq!(profile.name, name);
        }
        assert!(matches!(
            TankProfile::preset("sphere"),
            Err(TankError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_summary_converts_units() {
        let profile = TankProfile::slurry_tank();
        assert_eq!(
            profile.volume_summary(100.0, 865_901.475),
            "Volume of liquid at height 100.00 cm is: 865.90 liters"
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let profile = TankProfile::from_json_str(
            r#"{ "name": "tote", "volume_unit": "gallons", "volume_divisor": 231.0 }"#,
        )
        .unwrap();
        assert_eq!(profile.name, "tote");
        assert_eq!(profile.volume_divisor, 231.0);
        assert_eq!(profile.top_radius, TankProfile::unit_demo().top_radius);
    }

    #[test]
    fn test_json_round_trip_keeps_slurry_values() {
        let slurry = TankProfile::slurry_tank();
        let json = slurry.to_json_string().unwrap();
        assert_eq!(TankProfile::from_json_str(&json).unwrap(), slurry);
    }

    #[test]
    fn test_rejects_bad_profiles() {
        let bad_default = r#"{ "height": { "min": 1.0, "max": 2.0, "default": 3.0, "step": 0.1 } }"#;
        assert!(matches!(
            TankProfile::from_json_str(bad_default),
            Err(TankError::InvalidProfile(_))
        ));

        let zero_divisor = r#"{ "volume_divisor": 0.0 }"#;
        assert!(TankProfile::from_json_str(zero_divisor).is_err());

        let mismatched = r#"{ "liquid_resolution": { "height_samples": 30, "angular_samples": 40 } }"#;
        assert!(matches!(
            TankProfile::from_json_str(mismatched),
            Err(TankError::MismatchedAngularSamples { .. })
        ));

        assert!(matches!(
            TankProfile::from_json_str("{ not json"),
            Err(TankError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_resolution() {
        let huge = r#"{ "vessel_resolution": { "height_samples": 4611686018427387904, "angular_samples": 8 } }"#;
        assert!(matches!(
            TankProfile::from_json_str(huge),
            Err(TankError::InvalidResolution { .. })
        ));

        let just_over = r#"{ "liquid_resolution": { "height_samples": 1025, "angular_samples": 50 } }"#;
        assert!(matches!(
            TankProfile::from_json_str(just_over),
            Err(TankError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            TankProfile::load("/nonexistent/tank-profile.json"),
            Err(TankError::Io(_))
        ));
    }
}
