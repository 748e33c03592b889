//! Per-hand pose derived fresh from landmarks every frame.

use crate::config::ControllerConfig;
use crate::landmarks::{HandLandmarks, Landmark, INDEX_TIP, THUMB_TIP};
use crate::{distance, Vec3};

/// Cube-space positions are clamped to ±this on every axis.
pub const POSITION_BOUND: f32 = 4.0;

/// Where a hand is relative to the cube and how hard it pinches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    pub position: Vec3,
    /// 0.0 = open, 1.0 = fingertips touching.
    pub pinch: f32,
}

impl HandPose {
    /// `None` when the wrist landmark is not finite; such a hand counts as
    /// absent.
    pub fn from_landmarks(hand: &HandLandmarks, cfg: &ControllerConfig) -> Option<HandPose> {
        let wrist = hand.wrist();
        if !wrist.is_finite() {
            return None;
        }
        let gap = distance(hand.point(THUMB_TIP).to_array(), hand.point(INDEX_TIP).to_array());
        Some(HandPose {
            position: cube_position(wrist, cfg),
            pinch:    pinch_strength(gap, cfg.pinch_cutoff),
        })
    }
}

/// Map thumb–index distance to a strength in [0, 1]: 1 when touching,
/// falling linearly to 0 at `cutoff` and beyond.
pub fn pinch_strength(gap: f32, cutoff: f32) -> f32 {
    if !gap.is_finite() || cutoff <= 0.0 {
        return 0.0;
    }
    (1.0 - (gap / cutoff).min(1.0)).clamp(0.0, 1.0)
}

/// Affine remap of a wrist landmark into cube space: image x grows right and
/// y grows down, so y is inverted; depth is scaled separately.
pub fn cube_position(wrist: Landmark, cfg: &ControllerConfig) -> Vec3 {
    let clamp = |v: f32| v.clamp(-POSITION_BOUND, POSITION_BOUND);
    [
        clamp((wrist.x - 0.5) * cfg.planar_scale),
        clamp((0.5 - wrist.y) * cfg.planar_scale),
        clamp(wrist.z * cfg.depth_scale),
    ]
}

/// Inverse of [`cube_position`] for positions inside the bound.
pub fn camera_landmark(position: Vec3, cfg: &ControllerConfig) -> Landmark {
    Landmark::new(
        position[0] / cfg.planar_scale + 0.5,
        0.5 - position[1] / cfg.planar_scale,
        position[2] / cfg.depth_scale,
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
