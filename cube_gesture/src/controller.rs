//! The grab / twist / release state machine, idle orbit and residual spin.

use std::fmt;

use cube_engine::{Face, Move, Turn};
use tracing::{debug, info};

use crate::config::ControllerConfig;
use crate::landmarks::HandFrame;
use crate::pose::HandPose;
use crate::zones::{detect_grabbed_face, twist_angle, GrabZone};
use crate::Vec3;

// ════════════════════════════════════════════════════════════════════════════
// Outputs
// ════════════════════════════════════════════════════════════════════════════

/// A committed quarter turn, emitted on release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDecision {
    pub face:      Face,
    pub clockwise: bool,
    /// Twist at the moment of release, degrees.
    pub angle_deg: f32,
}

impl MoveDecision {
    pub fn to_move(self) -> Move {
        Move::new(self.face, Turn::from_clockwise(self.clockwise))
    }
}

impl fmt::Display for MoveDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}°)", self.to_move(), self.angle_deg)
    }
}

/// State-machine edge taken this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Idle → Grabbing.
    Grabbed { face: Face, at: f64 },
    /// Grabbing → Idle.  `snapped` is true when a decision was emitted.
    Released { face: Face, twist_deg: f32, snapped: bool },
}

/// What one call to [`GestureController::update`] produced besides the new
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutput {
    pub decision:   Option<MoveDecision>,
    pub transition: Option<Transition>,
}

// ════════════════════════════════════════════════════════════════════════════
// GestureSession
// ════════════════════════════════════════════════════════════════════════════

/// Continuous state carried from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub grabbed:          Option<Face>,
    /// Degrees; meaningful only while `grabbed` is set.
    pub twist_deg:        f32,
    /// Frame timestamp of the current grab.
    pub grab_started_at:  Option<f64>,
    /// View pitch, degrees.
    pub rotation_x:       f32,
    /// View yaw, degrees.
    pub rotation_y:       f32,
    /// Accumulates the third velocity component.
    pub roll:             f32,
    /// Degrees per frame about x, y, z.
    pub angular_velocity: Vec3,
    pub friction:         f32,
}

impl GestureSession {
    pub fn new(friction: f32) -> Self {
        GestureSession {
            grabbed:          None,
            twist_deg:        0.0,
            grab_started_at:  None,
            rotation_x:       0.0,
            rotation_y:       0.0,
            roll:             0.0,
            angular_velocity: [0.0; 3],
            friction,
        }
    }

    pub fn is_grabbing(&self) -> bool { self.grabbed.is_some() }

    /// `(pitch, yaw)` in degrees.
    pub fn orbit(&self) -> (f32, f32) { (self.rotation_x, self.rotation_y) }

    /// Add a spin impulse (degrees per frame).  Non-finite impulses are
    /// ignored.
    pub fn kick(&mut self, impulse: Vec3) {
        if impulse.iter().all(|v| v.is_finite()) {
            for (v, i) in self.angular_velocity.iter_mut().zip(impulse) {
                *v += i;
            }
        }
    }

    /// Magnitude of the angular velocity.
    pub fn spin(&self) -> f32 {
        let [x, y, z] = self.angular_velocity;
        (x * x + y * y + z * z).sqrt()
    }

    /// Twist as a 0–1 feedback level, saturating at 90°.
    pub fn twist_strength(&self) -> f32 {
        (self.twist_deg.abs() / 90.0).min(1.0)
    }

    /// Integrate the angular velocity into the orientation, then damp it.
    pub fn step_physics(&mut self) {
        self.rotation_x += self.angular_velocity[0];
        self.rotation_y += self.angular_velocity[1];
        self.roll       += self.angular_velocity[2];
        for v in &mut self.angular_velocity {
            *v *= self.friction;
        }
    }

    /// One-line status for the presentation layer.
    pub fn mode_text(&self) -> String {
        match self.grabbed {
            Some(face) => {
                let direction = if self.twist_deg > 0.0 { "clockwise" } else { "counter-clockwise" };
                format!(
                    "HOLDING {} - twist {} to rotate ({:.0} deg)",
                    face.letter(), direction, self.twist_deg.abs(),
                )
            }
            None => "Move hands to rotate cube, pinch near a face to grab".to_string(),
        }
    }
}

impl Default for GestureSession {
    fn default() -> Self {
        GestureSession::new(ControllerConfig::default().friction)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureController
// ════════════════════════════════════════════════════════════════════════════

/// Stateless frame processor; all continuity lives in [`GestureSession`].
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    config: ControllerConfig,
}

impl GestureController {
    /// Out-of-range config fields are replaced by their defaults.
    pub fn new(config: ControllerConfig) -> Self {
        GestureController { config: config.validated() }
    }

    pub fn config(&self) -> &ControllerConfig { &self.config }

    /// A fresh idle session using the configured friction.
    pub fn new_session(&self) -> GestureSession {
        GestureSession::new(self.config.friction)
    }

    /// Advance `session` by one frame.
    ///
    /// Every `(state, frame)` pair has a defined result; absent or malformed
    /// hands simply contribute nothing.
    pub fn update(&self, mut session: GestureSession, frame: &HandFrame) -> (GestureSession, FrameOutput) {
        let cfg = &self.config;
        let left  = frame.left.as_ref().and_then(|h| HandPose::from_landmarks(h, cfg));
        let right = frame.right.as_ref().and_then(|h| HandPose::from_landmarks(h, cfg));

        let detected = detect_grabbed_face(left, right, cfg.pinch_threshold);
        let mut out = FrameOutput::default();

        match (session.grabbed, detected) {
            (None, Some(face)) => {
                info!("grabbed {} face", face.letter());
                session.grabbed         = Some(face);
                session.twist_deg       = 0.0;
                session.grab_started_at = Some(frame.timestamp);
                out.transition = Some(Transition::Grabbed { face, at: frame.timestamp });
            }
            (Some(face), None) => {
                let twist = session.twist_deg;
                let snapped = twist.abs() > cfg.snap_threshold_deg;
                if snapped {
                    let decision = MoveDecision { face, clockwise: twist > 0.0, angle_deg: twist };
                    info!("released {} face: snap {}", face.letter(), decision);
                    out.decision = Some(decision);
                } else {
                    info!("released {} face at {:.1}°, below snap threshold", face.letter(), twist);
                }
                session.grabbed         = None;
                session.twist_deg       = 0.0;
                session.grab_started_at = None;
                out.transition = Some(Transition::Released { face, twist_deg: twist, snapped });
            }
            _ => {}
        }

        if let Some(face) = session.grabbed {
            let axis = GrabZone::for_face(face).axis;
            session.twist_deg = twist_angle(left.map(|p| p.position), right.map(|p| p.position), axis);
            debug!("twisting {}: {:.1}°", face.letter(), session.twist_deg);
        } else if let (Some(l), Some(r)) = (left, right) {
            let avg_x = (l.position[0] + r.position[0]) / 2.0;
            let avg_y = (l.position[1] + r.position[1]) / 2.0;
            let limit = cfg.orbit_limit_deg;
            let target_yaw   = (avg_x * cfg.orbit_scale_deg).clamp(-limit, limit);
            let target_pitch = (avg_y * cfg.orbit_scale_deg).clamp(-limit, limit);
            session.rotation_x += (target_pitch - session.rotation_x) * cfg.orbit_easing;
            session.rotation_y += (target_yaw   - session.rotation_y) * cfg.orbit_easing;
        }

        session.step_physics();
        (session, out)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{HandLandmarks, Handedness};
    use crate::pose::camera_landmark;

    const OPEN: f32 = 0.3;
    const SHUT: f32 = 0.0;

    fn hand(handedness: Handedness, position: Vec3, gap: f32) -> Option<HandLandmarks> {
        let cfg = ControllerConfig::default();
        Some(HandLandmarks::posed(handedness, camera_landmark(position, &cfg), gap))
    }

    /// Left hand on the Up zone, right hand at `twist` degrees around Y.
    fn holding_up(t: f64, twist: f32, left_gap: f32) -> HandFrame {
        let a = twist.to_radians();
        HandFrame::new(
            t,
            hand(Handedness::Left, [0.0, 1.0, 0.0], left_gap),
            hand(Handedness::Right, [1.5 * a.cos(), 1.0, 1.5 * a.sin()], OPEN),
        )
    }

    fn run(ctl: &GestureController, frames: &[HandFrame]) -> (GestureSession, Vec<FrameOutput>) {
        let mut session = ctl.new_session();
        let mut outs = Vec::new();
        for f in frames {
            let (s, out) = ctl.update(session, f);
            session = s;
            outs.push(out);
        }
        (session, outs)
    }

    #[test]
    fn idle_with_no_hands_stays_idle() {
        let ctl = GestureController::default();
        let (s, outs) = run(&ctl, &[HandFrame::empty(0.0), HandFrame::empty(0.1)]);
        assert_eq!(s.grabbed, None);
        assert!(outs.iter().all(|o| *o == FrameOutput::default()));
    }

    #[test]
    fn pinch_on_zone_grabs() {
        let ctl = GestureController::default();
        let (s, outs) = run(&ctl, &[holding_up(2.5, 10.0, SHUT)]);
        assert_eq!(s.grabbed, Some(Face::Up));
        assert_eq!(s.grab_started_at, Some(2.5));
        assert_eq!(outs[0].transition, Some(Transition::Grabbed { face: Face::Up, at: 2.5 }));
        assert!(outs[0].decision.is_none());
        // Twist is read on the grab frame itself.
        assert!((s.twist_deg - 10.0).abs() < 1e-2, "{}", s.twist_deg);
    }

    #[test]
    fn open_hand_on_zone_does_not_grab() {
        let ctl = GestureController::default();
        let (s, _) = run(&ctl, &[holding_up(0.0, 10.0, OPEN)]);
        assert_eq!(s.grabbed, None);
    }

    #[test]
    fn release_above_threshold_snaps_clockwise() {
        let ctl = GestureController::default();
        let (s, outs) = run(&ctl, &[
            holding_up(0.0, 5.0, SHUT),
            holding_up(0.1, 35.0, SHUT),
            holding_up(0.2, 35.0, OPEN),
        ]);
        let decision = outs[2].decision.unwrap();
        assert_eq!(decision.face, Face::Up);
        assert!(decision.clockwise);
        assert!((decision.angle_deg - 35.0).abs() < 1e-2);
        assert_eq!(decision.to_move(), Move::cw(Face::Up));
        assert_eq!(s.grabbed, None);
        assert_eq!(s.twist_deg, 0.0);
        assert_eq!(outs.iter().filter(|o| o.decision.is_some()).count(), 1);
    }

    #[test]
    fn release_above_threshold_snaps_counter_clockwise() {
        let ctl = GestureController::default();
        let (_, outs) = run(&ctl, &[holding_up(0.0, -35.0, SHUT), holding_up(0.1, -35.0, OPEN)]);
        let decision = outs[1].decision.unwrap();
        assert_eq!(decision.face, Face::Up);
        assert!(!decision.clockwise);
        assert_eq!(decision.to_move(), Move::ccw(Face::Up));
    }

    #[test]
    fn release_below_threshold_cancels() {
        let ctl = GestureController::default();
        let (s, outs) = run(&ctl, &[holding_up(0.0, 29.0, SHUT), holding_up(0.1, 29.0, OPEN)]);
        assert!(outs[1].decision.is_none());
        match outs[1].transition {
            Some(Transition::Released { face, twist_deg, snapped }) => {
                assert_eq!(face, Face::Up);
                assert!((twist_deg - 29.0).abs() < 1e-2);
                assert!(!snapped);
            }
            other => panic!("expected release, got {:?}", other),
        }
        assert_eq!(s.twist_deg, 0.0);
        assert_eq!(s.grab_started_at, None);
    }

    #[test]
    fn hands_vanishing_releases() {
        let ctl = GestureController::default();
        let (s, outs) = run(&ctl, &[holding_up(0.0, 40.0, SHUT), HandFrame::empty(0.1)]);
        assert_eq!(s.grabbed, None);
        assert!(outs[1].decision.is_some());
    }

    #[test]
    fn twist_is_recomputed_not_accumulated() {
        let ctl = GestureController::default();
        let (s, _) = run(&ctl, &[
            holding_up(0.0, 20.0, SHUT),
            holding_up(0.1, 20.0, SHUT),
            holding_up(0.2, 20.0, SHUT),
        ]);
        assert!((s.twist_deg - 20.0).abs() < 1e-2);
    }

    #[test]
    fn held_face_is_kept_while_another_zone_is_pinched() {
        let ctl = GestureController::default();
        let front = HandFrame::new(1.0, hand(Handedness::Left, [0.0, 0.0, 1.0], SHUT), None);
        let (s, outs) = run(&ctl, &[holding_up(0.0, 0.0, SHUT), front]);
        assert_eq!(s.grabbed, Some(Face::Up));
        assert!(outs[1].transition.is_none());
        // Only one hand present: twist reads 0.
        assert_eq!(s.twist_deg, 0.0);
    }

    #[test]
    fn orbit_eases_toward_average_hand_position() {
        let ctl = GestureController::default();
        let frame = HandFrame::new(
            0.0,
            hand(Handedness::Left,  [0.5, 0.5, 0.0], OPEN),
            hand(Handedness::Right, [1.5, 0.5, 0.0], OPEN),
        );
        let (s1, _) = ctl.update(ctl.new_session(), &frame);
        // target yaw = 1.0 * 90, pitch = 0.5 * 90; first step covers 10 %.
        assert!((s1.rotation_y - 9.0).abs() < 1e-3, "{}", s1.rotation_y);
        assert!((s1.rotation_x - 4.5).abs() < 1e-3, "{}", s1.rotation_x);

        let mut s = s1;
        for _ in 0..200 { s = ctl.update(s, &frame).0; }
        assert!((s.rotation_y - 90.0).abs() < 1e-2);
        assert!((s.rotation_x - 45.0).abs() < 1e-2);
    }

    #[test]
    fn orbit_needs_both_hands() {
        let ctl = GestureController::default();
        let frame = HandFrame::new(0.0, hand(Handedness::Left, [1.0, 1.0, 0.5], OPEN), None);
        let (s, _) = ctl.update(ctl.new_session(), &frame);
        assert_eq!(s.orbit(), (0.0, 0.0));
    }

    #[test]
    fn orbit_target_is_clamped() {
        let cfg = ControllerConfig { orbit_scale_deg: 1000.0, orbit_easing: 1.0, ..Default::default() };
        let ctl = GestureController::new(cfg);
        let frame = HandFrame::new(
            0.0,
            hand(Handedness::Left,  [2.0, -2.0, 0.0], OPEN),
            hand(Handedness::Right, [2.0, -2.0, 0.0], OPEN),
        );
        let (s, _) = ctl.update(ctl.new_session(), &frame);
        assert_eq!(s.orbit(), (-180.0, 180.0));
    }

    #[test]
    fn unusable_orbit_config_does_not_panic_or_nan() {
        let cfg = ControllerConfig { orbit_limit_deg: -10.0, orbit_easing: f32::NAN, ..Default::default() };
        let ctl = GestureController::new(cfg);
        let frame = HandFrame::new(
            0.0,
            hand(Handedness::Left,  [1.0, 1.0, 0.0], OPEN),
            hand(Handedness::Right, [1.0, 1.0, 0.0], OPEN),
        );
        let (s, _) = ctl.update(ctl.new_session(), &frame);
        let (pitch, yaw) = s.orbit();
        assert!(pitch.is_finite() && yaw.is_finite());
        assert!(yaw > 0.0);
    }

    #[test]
    fn spin_decays_geometrically() {
        let ctl = GestureController::default();
        let mut s = ctl.new_session();
        s.kick([2.0, -1.0, 0.5]);
        let start_spin = s.spin();
        let mut prev = start_spin;
        for n in 1..=60 {
            s = ctl.update(s, &HandFrame::empty(n as f64)).0;
            assert!(s.spin() < prev);
            let expected = start_spin * 0.95f32.powi(n);
            assert!((s.spin() - expected).abs() < 1e-4);
            prev = s.spin();
        }
    }

    #[test]
    fn spin_settles_at_fixed_point() {
        let ctl = GestureController::default();
        let mut s = ctl.new_session();
        s.kick([1.0, 0.0, 0.0]);
        for n in 0..1000 { s = ctl.update(s, &HandFrame::empty(n as f64)).0; }
        // Σ 0.95ⁿ = 20
        assert!((s.rotation_x - 20.0).abs() < 1e-2, "{}", s.rotation_x);
    }

    #[test]
    fn physics_runs_while_grabbing() {
        let ctl = GestureController::default();
        let mut s = ctl.new_session();
        s.kick([0.0, 4.0, 0.0]);
        let (s, _) = ctl.update(s, &holding_up(0.0, 10.0, SHUT));
        assert!(s.is_grabbing());
        assert!((s.rotation_y - 4.0).abs() < 1e-5);
        assert!((s.angular_velocity[1] - 3.8).abs() < 1e-5);
    }

    #[test]
    fn kick_ignores_nan() {
        let mut s = GestureSession::default();
        s.kick([f32::NAN, 1.0, 0.0]);
        assert_eq!(s.angular_velocity, [0.0; 3]);
    }

    #[test]
    fn nan_landmarks_never_reach_session() {
        let ctl = GestureController::default();
        let mut bad = HandLandmarks::posed(Handedness::Left, crate::Landmark::new(0.5, 0.25, 0.0), 0.0);
        bad.points[0].x = f32::NAN;
        let frame = HandFrame::new(0.0, Some(bad), hand(Handedness::Right, [0.0, 1.0, 0.0], SHUT));
        let (s, _) = ctl.update(ctl.new_session(), &frame);
        assert_eq!(s.grabbed, Some(Face::Up));
        assert!(s.twist_deg.is_finite() && s.rotation_x.is_finite() && s.rotation_y.is_finite());
    }

    #[test]
    fn mode_text_reflects_state() {
        let mut s = GestureSession::default();
        assert!(s.mode_text().starts_with("Move hands"));
        s.grabbed = Some(Face::Right);
        s.twist_deg = -42.0;
        assert_eq!(s.mode_text(), "HOLDING R - twist counter-clockwise to rotate (42 deg)");
        assert!((s.twist_strength() - 42.0 / 90.0).abs() < 1e-6);
    }

    #[test]
    fn decision_display() {
        let d = MoveDecision { face: Face::Front, clockwise: false, angle_deg: -47.4 };
        assert_eq!(d.to_string(), "F' (-47°)");
    }
}
