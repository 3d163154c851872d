/// ConeTank Web - WASM bindings for browser front ends
///
/// The page owns the sliders and the 3D surface plot; this module turns
/// the four slider values into a volume and two flat point grids.
use conetank_core::{compute_with, Frustum, TankError, TankInputs, TankProfile, TankSnapshot};
use log::debug;
use wasm_bindgen::prelude::*;

fn to_js(err: TankError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Calculator bound to one tank profile.
#[wasm_bindgen]
pub struct TankCalculator {
    profile: TankProfile,
}

#[wasm_bindgen]
impl TankCalculator {
    /// Create a calculator from a built-in preset (`unit` or `slurry`).
    #[wasm_bindgen(constructor)]
    pub fn new(preset: &str) -> Result<TankCalculator, JsValue> {
        let profile = TankProfile::preset(preset).map_err(to_js)?;
        Ok(Self { profile })
    }

    /// Create a calculator from a JSON profile.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<TankCalculator, JsValue> {
        let profile = TankProfile::from_json_str(json).map_err(to_js)?;
        Ok(Self { profile })
    }

    /// Profile as JSON, for building the sliders.
    #[wasm_bindgen(js_name = profileJson)]
    pub fn profile_json(&self) -> Result<String, JsValue> {
        self.profile.to_json_string().map_err(to_js)
    }

    /// Recompute for the current slider values.
    ///
    /// Geometry that is invalid on its own (non-finite values, `H <= 0`,
    /// `r > R`) is rejected. Valid values are then clamped into the
    /// profile's slider ranges the same way the terminal front end does,
    /// so an `H` beyond the slider maximum or `h > H` is capped.
    pub fn compute(
        &self,
        top_radius: f64,
        bottom_radius: f64,
        height: f64,
        fill_height: f64,
    ) -> Result<TankFrame, JsValue> {
        let frame = self
            .frame(top_radius, bottom_radius, height, fill_height)
            .map_err(to_js)?;
        Ok(frame)
    }
}

impl TankCalculator {
    fn frame(
        &self,
        top_radius: f64,
        bottom_radius: f64,
        height: f64,
        fill_height: f64,
    ) -> conetank_core::Result<TankFrame> {
        let profile = &self.profile;
        Frustum::new(top_radius, bottom_radius, height)?;

        let mut inputs = TankInputs::from_profile(profile);
        inputs.top_radius = top_radius;
        inputs.bottom_radius = bottom_radius;
        inputs.height = height;
        inputs.fill_height = fill_height;
        // Apply in dependency order so each bound sees its final parent.
        for parameter in conetank_core::Parameter::ALL {
            inputs.set(parameter, inputs.get(parameter), profile)?;
        }

        let snapshot = compute_with(
            &inputs.frustum()?,
            inputs.fill_height,
            profile.vessel_resolution,
            profile.liquid_resolution,
        )?;
        debug!("web frame: volume {}", snapshot.volume);
        Ok(TankFrame::new(snapshot, profile))
    }
}

/// One computed state, flattened for JavaScript.
#[wasm_bindgen]
pub struct TankFrame {
    snapshot: TankSnapshot,
    display_volume: f64,
    summary: String,
}

impl TankFrame {
    fn new(snapshot: TankSnapshot, profile: &TankProfile) -> Self {
        Self {
            display_volume: profile.display_volume(snapshot.volume),
            summary: profile.volume_summary(snapshot.fill_height, snapshot.volume),
            snapshot,
        }
    }
}

#[wasm_bindgen]
impl TankFrame {
    /// Raw volume in cubed length units.
    #[wasm_bindgen(getter)]
    pub fn volume(&self) -> f64 {
        self.snapshot.volume
    }

    /// Volume divided by the profile's display divisor.
    #[wasm_bindgen(getter, js_name = displayVolume)]
    pub fn display_volume(&self) -> f64 {
        self.display_volume
    }

    #[wasm_bindgen(getter, js_name = fillHeight)]
    pub fn fill_height(&self) -> f64 {
        self.snapshot.fill_height
    }

    #[wasm_bindgen(getter)]
    pub fn summary(&self) -> String {
        self.summary.clone()
    }

    /// Vessel wall as `[x0, y0, z0, x1, ...]`, row-major by height then angle.
    #[wasm_bindgen(js_name = vesselPositions)]
    pub fn vessel_positions(&self) -> Vec<f64> {
        self.snapshot.vessel.flat_coordinates()
    }

    #[wasm_bindgen(getter, js_name = vesselRows)]
    pub fn vessel_rows(&self) -> usize {
        self.snapshot.vessel.rows()
    }

    #[wasm_bindgen(getter, js_name = vesselCols)]
    pub fn vessel_cols(&self) -> usize {
        self.snapshot.vessel.cols()
    }

    /// Liquid body as `[x0, y0, z0, x1, ...]`, row-major by height then angle.
    #[wasm_bindgen(js_name = liquidPositions)]
    pub fn liquid_positions(&self) -> Vec<f64> {
        self.snapshot.liquid.flat_coordinates()
    }

    #[wasm_bindgen(getter, js_name = liquidRows)]
    pub fn liquid_rows(&self) -> usize {
        self.snapshot.liquid.rows()
    }

    #[wasm_bindgen(getter, js_name = liquidCols)]
    pub fn liquid_cols(&self) -> usize {
        self.snapshot.liquid.cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_slurry_frame() {
        let calculator = TankCalculator {
            profile: TankProfile::slurry_tank(),
        };
        let frame = calculator.frame(150.0, 15.0, 200.0, 100.0).unwrap();
        assert_relative_eq!(frame.volume(), 865_901.475_145_686_7, max_relative = 1e-12);
        assert_relative_eq!(frame.display_volume(), 865.901_475_145_686_7, max_relative = 1e-12);
        assert_eq!(frame.summary(), "Volume of liquid at height 100.00 cm is: 865.90 liters");

        assert_eq!(frame.vessel_positions().len(), frame.vessel_rows() * frame.vessel_cols() * 3);
        assert_eq!(frame.liquid_rows(), 30);
        assert_eq!(frame.liquid_cols(), frame.vessel_cols());
    }

    #[test]
    fn test_inputs_clamp_like_sliders() {
        let calculator = TankCalculator {
            profile: TankProfile::unit_demo(),
        };
        let frame = calculator.frame(2.0, 2.0, 2.0, 9.0).unwrap();
        // h is capped at H, giving a full cylinder.
        assert_relative_eq!(frame.fill_height(), 2.0);
        assert_relative_eq!(frame.volume(), std::f64::consts::PI * 4.0 * 2.0, max_relative = 1e-12);

        // H beyond the slider maximum is capped too.
        let tall = calculator.frame(2.0, 2.0, 9.0, 9.0).unwrap();
        assert_relative_eq!(tall.fill_height(), 5.0);
    }

    #[test]
    fn test_bottom_wider_than_top_is_rejected() {
        let calculator = TankCalculator {
            profile: TankProfile::unit_demo(),
        };
        assert!(matches!(
            calculator.frame(2.0, 3.0, 2.0, 9.0),
            Err(TankError::InvertedFrustum { .. })
        ));
        assert!(matches!(
            calculator.frame(2.0, 0.15, 0.0, 1.0),
            Err(TankError::NonPositiveHeight(_))
        ));
        assert!(matches!(
            calculator.frame(2.0, 0.15, 2.0, f64::NAN),
            Err(TankError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_empty_tank_is_a_single_ring() {
        let calculator = TankCalculator {
            profile: TankProfile::unit_demo(),
        };
        let frame = calculator.frame(2.0, 0.15, 2.0, 0.0).unwrap();
        assert_eq!(frame.volume(), 0.0);
        assert_eq!(frame.liquid_rows(), 1);
        assert_eq!(frame.liquid_positions().len(), frame.liquid_cols() * 3);
    }
}
