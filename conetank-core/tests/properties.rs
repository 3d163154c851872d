//! Property tests for the volume formula and the mesh generator.

use std::f64::consts::PI;

use approx::relative_eq;
use conetank_core::{compute_with, Frustum, MeshResolution};
use proptest::prelude::*;

/// Valid `(R, r, H)` with `R >= r > 0` and `H > 0`.
fn frustum_strategy() -> impl Strategy<Value = Frustum> {
    (0.01f64..500.0, 0.0f64..=1.0, 0.01f64..500.0).prop_map(|(top, ratio, height)| {
        let bottom = (top * ratio).max(1e-3).min(top);
        Frustum::new(top, bottom, height).expect("strategy yields valid geometry")
    })
}

proptest! {
    #[test]
    fn empty_tank_holds_nothing(frustum in frustum_strategy()) {
        prop_assert_eq!(frustum.volume(0.0), 0.0);
    }

    #[test]
    fn volume_is_monotone_in_fill(frustum in frustum_strategy(), a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let h = frustum.height();
        prop_assert!(frustum.volume(lo * h) <= frustum.volume(hi * h));
    }

    #[test]
    fn overfill_clamps(frustum in frustum_strategy(), extra in 1e-6f64..1e4) {
        let h = frustum.height();
        prop_assert_eq!(frustum.volume(h + extra), frustum.volume(h));
    }

    #[test]
    fn full_tank_matches_frustum_formula(frustum in frustum_strategy()) {
        let (big, small, h) = (frustum.top_radius(), frustum.bottom_radius(), frustum.height());
        let expected = PI / 3.0 * h * (small * small + small * big + big * big);
        prop_assert!(relative_eq!(frustum.full_volume(), expected, max_relative = 1e-9));
    }

    #[test]
    fn cylinder_is_base_times_height(radius in 0.01f64..100.0, height in 0.01f64..100.0, t in 0.0f64..=1.0) {
        let cylinder = Frustum::new(radius, radius, height).unwrap();
        let fill = t * height;
        let expected = PI * radius * radius * fill;
        prop_assert!(relative_eq!(cylinder.volume(fill), expected, max_relative = 1e-9, epsilon = 1e-12));
    }

    #[test]
    fn mesh_points_sit_on_the_wall(
        frustum in frustum_strategy(),
        t in 0.0f64..=1.2,
        rows in 2usize..40,
        cols in 3usize..40,
    ) {
        let resolution = MeshResolution::new(rows, cols);
        let snapshot = compute_with(&frustum, t * frustum.height(), resolution, resolution).unwrap();
        for grid in [&snapshot.vessel, &snapshot.liquid] {
            prop_assert_eq!(grid.cols(), cols);
            for p in grid.points() {
                let rho = (p.x * p.x + p.y * p.y).sqrt();
                let expected = frustum.radius_at(p.z);
                prop_assert!(relative_eq!(rho, expected, max_relative = 1e-9, epsilon = 1e-9));
                prop_assert!(p.z >= 0.0 && p.z <= frustum.height());
            }
        }
    }
}
