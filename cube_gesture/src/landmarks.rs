//! The per-frame input contract: up to two labelled sets of 21 hand points.
//!
//! Coordinates are image-relative: `x` and `y` roughly in 0–1 with `y`
//! growing downward, `z` a relative depth.  Point order follows the common
//! 21-point hand model (wrist, then four joints per finger from thumb to
//! little finger).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

/// Points per hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_TIP:  usize = 8;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] { [self.x, self.y, self.z] }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Handedness
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left  => "Left",
            Self::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown hand label {0:?} (expected \"Left\" or \"Right\")")]
pub struct HandednessError(pub String);

impl FromStr for Handedness {
    type Err = HandednessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Left"  => Ok(Self::Left),
            "Right" => Ok(Self::Right),
            other   => Err(HandednessError(other.to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    pub handedness: Handedness,
    pub points:     [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// `None` unless `points` holds exactly 21 entries.
    pub fn from_slice(handedness: Handedness, points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(HandLandmarks { handedness, points })
    }

    pub fn point(&self, index: usize) -> Landmark { self.points[index] }

    pub fn wrist(&self) -> Landmark { self.points[WRIST] }

    /// A synthetic hand with its wrist at `wrist` and thumb and index tips
    /// `pinch_gap` apart.  Used by simulated and scripted sources.
    pub fn posed(handedness: Handedness, wrist: Landmark, pinch_gap: f32) -> Self {
        // Fingers fan toward the thumb side, which is mirrored between hands.
        let side = match handedness {
            Handedness::Left  =>  1.0,
            Handedness::Right => -1.0,
        };
        let mut points = [wrist; LANDMARK_COUNT];
        for finger in 0..5 {
            for joint in 0..4 {
                let spread = (finger as f32 - 2.0) * 0.02 * side;
                let reach  = 0.03 * (joint as f32 + 1.0);
                points[1 + finger * 4 + joint] = Landmark::new(wrist.x + spread, wrist.y - reach, wrist.z);
            }
        }
        let index_tip = points[INDEX_TIP];
        points[THUMB_TIP] = Landmark::new(index_tip.x + pinch_gap * side, index_tip.y, index_tip.z);
        HandLandmarks { handedness, points }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything the hand source saw in one camera frame.  Either hand may be
/// absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandFrame {
    /// Seconds on the source's monotonic clock.
    pub timestamp: f64,
    pub left:      Option<HandLandmarks>,
    pub right:     Option<HandLandmarks>,
}

impl HandFrame {
    pub fn empty(timestamp: f64) -> Self {
        HandFrame { timestamp, left: None, right: None }
    }

    pub fn new(timestamp: f64, left: Option<HandLandmarks>, right: Option<HandLandmarks>) -> Self {
        HandFrame { timestamp, left, right }
    }

    /// Build a frame from raw labelled detections.
    ///
    /// Records with an unknown label, a point count other than 21, or a label
    /// already taken earlier in the same frame are dropped; the hand is then
    /// simply absent.
    pub fn from_detections<'a, I>(timestamp: f64, detections: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Landmark])>,
    {
        let mut frame = HandFrame::empty(timestamp);
        for (label, points) in detections {
            let handedness = match label.parse::<Handedness>() {
                Ok(h)  => h,
                Err(e) => { warn!("dropping hand record: {}", e); continue; }
            };
            let Some(hand) = HandLandmarks::from_slice(handedness, points) else {
                warn!("dropping {} hand record with {} points", handedness, points.len());
                continue;
            };
            let slot = match handedness {
                Handedness::Left  => &mut frame.left,
                Handedness::Right => &mut frame.right,
            };
            if slot.is_some() {
                warn!("dropping duplicate {} hand record", handedness);
                continue;
            }
            *slot = Some(hand);
        }
        frame
    }

    pub fn hand(&self, handedness: Handedness) -> Option<&HandLandmarks> {
        match handedness {
            Handedness::Left  => self.left.as_ref(),
            Handedness::Right => self.right.as_ref(),
        }
    }

    pub fn hand_count(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
