//! Grab zones: where a pinch has to happen to take hold of a face, and how
//! the hands' relative position is read as a twist about that face's axis.

use cube_engine::Face;

use crate::pose::HandPose;
use crate::{distance, Vec3};

/// Below this planar magnitude the hands are treated as coincident and the
/// twist reads 0.
const MIN_TWIST_SPAN: f32 = 1e-6;

// ════════════════════════════════════════════════════════════════════════════
// RotationAxis
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

impl RotationAxis {
    pub fn unit(self) -> Vec3 {
        match self {
            RotationAxis::X => [1.0, 0.0, 0.0],
            RotationAxis::Y => [0.0, 1.0, 0.0],
            RotationAxis::Z => [0.0, 0.0, 1.0],
        }
    }

    /// The `(numerator, denominator)` pair of the hand delta fed to `atan2`
    /// for a twist about this axis.
    fn planar(self, delta: Vec3) -> (f32, f32) {
        let [dx, dy, dz] = delta;
        match self {
            RotationAxis::Y => (dz, dx),
            RotationAxis::X => (dz, dy),
            RotationAxis::Z => (dy, dx),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GrabZone
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabZone {
    pub face:   Face,
    pub center: Vec3,
    pub radius: f32,
    pub axis:   RotationAxis,
}

impl GrabZone {
    const fn new(face: Face, center: Vec3, axis: RotationAxis) -> Self {
        GrabZone { face, center, radius: 0.3, axis }
    }

    /// The zone belonging to `face`.
    pub fn for_face(face: Face) -> &'static GrabZone {
        let slot = match face {
            Face::Up    => 0,
            Face::Down  => 1,
            Face::Left  => 2,
            Face::Right => 3,
            Face::Front => 4,
            Face::Back  => 5,
        };
        &GRAB_ZONES[slot]
    }

    /// Strictly inside the capture radius.
    pub fn contains(&self, position: Vec3) -> bool {
        distance(position, self.center) < self.radius
    }
}

/// One zone per face, in evaluation order.
pub const GRAB_ZONES: [GrabZone; 6] = [
    GrabZone::new(Face::Up,    [ 0.0,  1.0,  0.0], RotationAxis::Y),
    GrabZone::new(Face::Down,  [ 0.0, -1.0,  0.0], RotationAxis::Y),
    GrabZone::new(Face::Left,  [-1.0,  0.0,  0.0], RotationAxis::X),
    GrabZone::new(Face::Right, [ 1.0,  0.0,  0.0], RotationAxis::X),
    GrabZone::new(Face::Front, [ 0.0,  0.0,  1.0], RotationAxis::Z),
    GrabZone::new(Face::Back,  [ 0.0,  0.0, -1.0], RotationAxis::Z),
];

// ════════════════════════════════════════════════════════════════════════════
// Detection
// ════════════════════════════════════════════════════════════════════════════

/// The face being grabbed this frame, if any.
///
/// The left hand is checked before the right; within a hand the first zone
/// in [`GRAB_ZONES`] order that contains it wins.  A hand only counts when
/// its pinch strength exceeds `pinch_threshold`.
pub fn detect_grabbed_face(
    left:  Option<HandPose>,
    right: Option<HandPose>,
    pinch_threshold: f32,
) -> Option<Face> {
    [left, right]
        .into_iter()
        .flatten()
        .filter(|pose| pose.pinch > pinch_threshold)
        .find_map(|pose| {
            GRAB_ZONES.iter().find(|z| z.contains(pose.position)).map(|z| z.face)
        })
}

/// Signed twist in degrees, read from the right hand's offset from the left
/// hand projected onto the plane of `axis`.
///
/// This is an absolute reading of the current hand geometry, not an
/// integrated rotation.  Returns 0 when either hand is missing or the hands
/// coincide in that plane.
pub fn twist_angle(left: Option<Vec3>, right: Option<Vec3>, axis: RotationAxis) -> f32 {
    let (Some(l), Some(r)) = (left, right) else {
        return 0.0;
    };
    let delta = [r[0] - l[0], r[1] - l[1], r[2] - l[2]];
    let (num, den) = axis.planar(delta);
    if !(num.is_finite() && den.is_finite()) || num.hypot(den) < MIN_TWIST_SPAN {
        return 0.0;
    }
    num.atan2(den).to_degrees()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn pinching(position: Vec3) -> Option<HandPose> {
        Some(HandPose { position, pinch: 1.0 })
    }

    #[test]
    fn every_face_has_its_zone() {
        for face in Face::ALL {
            assert_eq!(GrabZone::for_face(face).face, face);
        }
    }

    #[test]
    fn axes_are_unit() {
        for zone in GRAB_ZONES {
            let n = distance(zone.axis.unit(), [0.0; 3]);
            assert!((n - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn grab_at_zone_centre() {
        for zone in GRAB_ZONES {
            assert_eq!(detect_grabbed_face(pinching(zone.center), None, 0.5), Some(zone.face));
            assert_eq!(detect_grabbed_face(None, pinching(zone.center), 0.5), Some(zone.face));
        }
    }

    #[test]
    fn no_grab_just_outside_radius() {
        let up = GrabZone::for_face(Face::Up);
        let edge = [up.center[0] + up.radius + 1e-4, up.center[1], up.center[2]];
        assert_eq!(detect_grabbed_face(pinching(edge), None, 0.5), None);
    }

    #[test]
    fn weak_pinch_does_not_grab() {
        let pose = Some(HandPose { position: [0.0, 1.0, 0.0], pinch: 0.5 });
        assert_eq!(detect_grabbed_face(pose, None, 0.5), None);
    }

    #[test]
    fn left_hand_wins() {
        let got = detect_grabbed_face(pinching([0.0, 0.0, 1.0]), pinching([0.0, 1.0, 0.0]), 0.5);
        assert_eq!(got, Some(Face::Front));
    }

    #[test]
    fn right_hand_used_when_left_misses() {
        let got = detect_grabbed_face(pinching([3.0, 3.0, 3.0]), pinching([-1.0, 0.0, 0.0]), 0.5);
        assert_eq!(got, Some(Face::Left));
    }

    #[test]
    fn twist_about_vertical_uses_x_and_z() {
        let a = 35f32.to_radians();
        let t = twist_angle(Some([0.0, 1.0, 0.0]), Some([a.cos(), 1.0, a.sin()]), RotationAxis::Y);
        assert!((t - 35.0).abs() < 1e-3, "{}", t);
        let t = twist_angle(Some([0.0, 1.0, 0.0]), Some([a.cos(), 1.0, -a.sin()]), RotationAxis::Y);
        assert!((t + 35.0).abs() < 1e-3, "{}", t);
    }

    #[test]
    fn twist_about_x_and_z() {
        assert!((twist_angle(Some([0.0; 3]), Some([0.0, 1.0, 1.0]), RotationAxis::X) - 45.0).abs() < 1e-3);
        assert!((twist_angle(Some([0.0; 3]), Some([1.0, 1.0, 0.0]), RotationAxis::Z) - 45.0).abs() < 1e-3);
    }

    #[test]
    fn twist_is_zero_without_both_hands() {
        assert_eq!(twist_angle(Some([0.0; 3]), None, RotationAxis::Y), 0.0);
        assert_eq!(twist_angle(None, Some([1.0, 0.0, 0.0]), RotationAxis::Y), 0.0);
    }

    #[test]
    fn twist_is_zero_for_coincident_hands() {
        let p = [0.2, 0.4, 0.6];
        assert_eq!(twist_angle(Some(p), Some(p), RotationAxis::Z), 0.0);
        // Offset only along the axis itself is degenerate too.
        assert_eq!(twist_angle(Some(p), Some([0.2, 1.4, 0.6]), RotationAxis::Y), 0.0);
    }
}
