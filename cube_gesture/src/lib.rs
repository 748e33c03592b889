//! # cube_gesture
//!
//! Turns per-frame hand landmarks into cube moves.
//!
//! The controller is a pure function of `(session, frame)`: it holds no
//! hidden state, performs no I/O and never blocks.  Hosts keep the
//! [`GestureSession`] and feed it back each tick.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hands | Effect |
//! |---|---|---|
//! | Open hands, moved around | Both | Orbit the view toward the hands' average position |
//! | Pinch near a face's grab zone | Either (Left checked first) | Grab that face |
//! | Move hands apart/around while holding | Both | Twist angle follows the hands' relative position |
//! | Open the pinch | Either | Release: snap a quarter turn if \|twist\| > 30°, otherwise cancel |
//!
//! ## Per-frame order
//!
//! 1. Derive a [`HandPose`] (cube-space position, pinch strength) per hand.
//! 2. Find the first pinching hand inside a [`GrabZone`].
//! 3. Apply the Idle ⇄ Grabbing transition; a release may yield a
//!    [`MoveDecision`].
//! 4. Recompute the twist (holding) or ease the orbit (idle, both hands).
//! 5. Integrate and damp the residual spin.

pub mod config;
pub mod controller;
pub mod landmarks;
pub mod pose;
pub mod zones;

pub use config::ControllerConfig;
pub use controller::{FrameOutput, GestureController, GestureSession, MoveDecision, Transition};
pub use landmarks::{HandFrame, HandLandmarks, Handedness, HandednessError, Landmark, LANDMARK_COUNT};
pub use pose::HandPose;
pub use zones::{GrabZone, RotationAxis, GRAB_ZONES};

/// A point or direction in cube space.
pub type Vec3 = [f32; 3];

pub(crate) fn distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
