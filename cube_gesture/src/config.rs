//! Controller thresholds and scales.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tunables for [`GestureController`](crate::GestureController).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Pinch strength a hand must exceed to grab.
    pub pinch_threshold: f32,
    /// Thumb–index distance (normalised image units) at which pinch strength
    /// reaches 0.
    pub pinch_cutoff: f32,
    /// Twist magnitude (degrees) a release must exceed to commit a move.
    pub snap_threshold_deg: f32,
    /// Fraction of the remaining orbit distance covered per frame.
    pub orbit_easing: f32,
    /// Degrees of orbit per cube-space unit of average hand position.
    pub orbit_scale_deg: f32,
    /// Orbit targets are clamped to ±this many degrees.
    pub orbit_limit_deg: f32,
    /// Per-frame multiplier applied to the angular velocity.
    pub friction: f32,
    /// Cube-space units per normalised image unit, x and y.
    pub planar_scale: f32,
    /// Cube-space units per unit of landmark depth.
    pub depth_scale: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            pinch_threshold:    0.5,
            pinch_cutoff:       0.1,
            snap_threshold_deg: 30.0,
            orbit_easing:       0.1,
            orbit_scale_deg:    90.0,
            orbit_limit_deg:    180.0,
            friction:           0.95,
            planar_scale:       4.0,
            depth_scale:        3.0,
        }
    }
}

impl ControllerConfig {
    /// Replace every unusable field with its default.
    ///
    /// After this the orbit clamp bounds are ordered and finite, and no
    /// scale, easing or threshold can turn finite hand input into NaN.
    pub fn validated(mut self) -> Self {
        let d = ControllerConfig::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let unit     = |v: f32| (0.0..1.0).contains(&v);

        fix("pinch_threshold",    &mut self.pinch_threshold,    d.pinch_threshold,    unit);
        fix("pinch_cutoff",       &mut self.pinch_cutoff,       d.pinch_cutoff,       positive);
        fix("snap_threshold_deg", &mut self.snap_threshold_deg, d.snap_threshold_deg, |v| positive(v) && v < 90.0);
        fix("orbit_easing",       &mut self.orbit_easing,       d.orbit_easing,       |v| positive(v) && v <= 1.0);
        fix("orbit_scale_deg",    &mut self.orbit_scale_deg,    d.orbit_scale_deg,    positive);
        fix("orbit_limit_deg",    &mut self.orbit_limit_deg,    d.orbit_limit_deg,    positive);
        fix("friction",           &mut self.friction,           d.friction,           unit);
        fix("planar_scale",       &mut self.planar_scale,       d.planar_scale,       positive);
        fix("depth_scale",        &mut self.depth_scale,        d.depth_scale,        positive);
        self
    }
}

fn fix(name: &str, value: &mut f32, default: f32, ok: impl Fn(f32) -> bool) {
    if !ok(*value) {
        warn!("{} {} out of range, using {}", name, value, default);
        *value = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_validation() {
        assert_eq!(ControllerConfig::default().validated(), ControllerConfig::default());
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let bad = ControllerConfig {
            pinch_threshold:    1.5,
            pinch_cutoff:       0.0,
            snap_threshold_deg: f32::NAN,
            orbit_easing:       f32::NAN,
            orbit_scale_deg:    f32::INFINITY,
            orbit_limit_deg:    -10.0,
            friction:           1.5,
            planar_scale:       -4.0,
            depth_scale:        f32::NAN,
        };
        assert_eq!(bad.validated(), ControllerConfig::default());
    }

    #[test]
    fn good_values_are_kept() {
        let cfg = ControllerConfig {
            orbit_easing:    1.0,
            orbit_limit_deg: 45.0,
            friction:        0.0,
            ..Default::default()
        };
        assert_eq!(cfg.validated(), cfg);
    }
}
