//! Hand sources: LeapMotion hardware, keyboard simulation and scripted replay.
//!
//! The public interface is [`SourceEvent`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether frames came from real hardware, the
//! keyboard simulator or a prepared script.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cube_engine::Face;
use cube_gesture::pose::{camera_landmark, POSITION_BOUND};
use cube_gesture::{
    ControllerConfig, GrabZone, HandFrame, HandLandmarks, Handedness, RotationAxis, Vec3,
};
use tracing::{debug, info};

/// Frame cadence of the simulated and scripted sources (~30 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Thumb–index gap of an open simulated hand, normalised image units.
const OPEN_GAP: f32 = 0.3;

/// Simulated hands stay inside ±this in cube space (the camera's view).
const SIM_REACH: f32 = 2.0;

/// Spin applied by [`AppCommand::Kick`] from the keyboard, degrees per frame.
const KICK_IMPULSE: Vec3 = [0.0, 12.0, 0.0];

// ════════════════════════════════════════════════════════════════════════════
// SourceEvent
// ════════════════════════════════════════════════════════════════════════════

/// Requests that bypass the gesture controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppCommand {
    Scramble,
    Reset,
    ApplySolution,
    /// Add a spin impulse to the view.
    Kick(Vec3),
}

/// Everything a source can deliver.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    Frame(HandFrame),
    Command(AppCommand),
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait: unified interface for hw, sim and scripts
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

// ════════════════════════════════════════════════════════════════════════════
// Spawn helpers
// ════════════════════════════════════════════════════════════════════════════

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<S: HandSource>(source: S) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    spawn_hand_source_into(source, tx);
    rx
}

/// Spawn a hand source that shares an existing channel with other sources.
pub fn spawn_hand_source_into<S: HandSource>(source: S, tx: Sender<SourceEvent>) -> JoinHandle<()> {
    thread::spawn(move || Box::new(source).run(tx))
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Each tracking frame is converted to the 21-point landmark layout: the palm
/// stands in for the wrist, followed by the four joints of each digit from
/// thumb to little finger.  Millimetres are mapped onto the normalised image
/// range by [`LEAP_SPAN_MM`].
#[cfg(feature = "leap")]
pub struct LeapHandSource;

/// Millimetres of LeapMotion space covering the 0–1 image range.
#[cfg(feature = "leap")]
pub const LEAP_SPAN_MM: f32 = 400.0;

#[cfg(feature = "leap")]
const LEAP_FLOOR_MM: f32 = 100.0;

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        use cube_gesture::{Landmark, LANDMARK_COUNT};
        use leaprs::*;

        let to_landmark = |x: f32, y: f32, z: f32| Landmark::new(
            0.5 + x / LEAP_SPAN_MM,
            1.0 - (y - LEAP_FLOOR_MM) / LEAP_SPAN_MM,
            z / LEAP_SPAN_MM,
        );

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                tracing::error!("failed to create LeapC connection: {:?}", e);
                let _ = tx.send(SourceEvent::Quit);
                return;
            }
        };
        if let Err(e) = connection.open() {
            tracing::error!("failed to open LeapMotion device: {:?}", e);
            let _ = tx.send(SourceEvent::Quit);
            return;
        }
        info!("LeapMotion connection open");

        let start = Instant::now();
        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut out = HandFrame::empty(start.elapsed().as_secs_f64());
                for hand in frame.hands() {
                    let handedness = if hand.hand_type() == HandType::Left {
                        Handedness::Left
                    } else {
                        Handedness::Right
                    };
                    let palm = hand.palm().position();
                    let mut points = [to_landmark(palm.x, palm.y, palm.z); LANDMARK_COUNT];
                    for (d, digit) in hand.digits().into_iter().enumerate().take(5) {
                        let joints = [
                            digit.metacarpal().next_joint(),
                            digit.proximal().next_joint(),
                            digit.intermediate().next_joint(),
                            digit.distal().next_joint(),
                        ];
                        for (j, p) in joints.iter().enumerate() {
                            points[1 + d * 4 + j] = to_landmark(p.x, p.y, p.z);
                        }
                    }
                    let slot = match handedness {
                        Handedness::Left  => &mut out.left,
                        Handedness::Right => &mut out.right,
                    };
                    if slot.is_none() {
                        *slot = Some(HandLandmarks { handedness, points });
                    }
                }
                if tx.send(SourceEvent::Frame(out)).is_err() { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Move a virtual hand by a cube-space offset.
    Nudge { hand: Handedness, delta: Vec3 },
    /// Jump the left hand onto a face's grab zone.
    PlaceLeft(Face),
    KeyDown(SimKey),
    KeyUp(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    PinchLeft,      // Space
    PinchRight,     // Enter
    ToggleLeft,     // H
    ToggleRight,    // J
    Scramble,       // N
    Reset,          // C
    Solve,          // V
    Kick,           // K
    Quit,           // Q / Esc
}

/// One virtual hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub position: Vec3,
    pub pinched:  bool,
    pub visible:  bool,
}

impl SimHand {
    fn at(position: Vec3) -> Self {
        SimHand { position, pinched: false, visible: true }
    }
}

/// The simulator's model of both hands.  Pure: inputs in, frames out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHands {
    pub left:  SimHand,
    pub right: SimHand,
}

impl Default for SimHands {
    fn default() -> Self {
        SimHands {
            left:  SimHand::at([-1.0, -1.0, 0.0]),
            right: SimHand::at([ 1.0, -1.0, 0.0]),
        }
    }
}

impl SimHands {
    fn hand_mut(&mut self, handedness: Handedness) -> &mut SimHand {
        match handedness {
            Handedness::Left  => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    /// Apply one input.  Returns the event it translates to, if any.
    pub fn apply(&mut self, input: SimInput) -> Option<SourceEvent> {
        match input {
            SimInput::Nudge { hand, delta } => {
                let h = self.hand_mut(hand);
                for (p, d) in h.position.iter_mut().zip(delta) {
                    *p = (*p + d).clamp(-SIM_REACH, SIM_REACH);
                }
                None
            }
            SimInput::PlaceLeft(face) => {
                self.left.position = GrabZone::for_face(face).center;
                self.left.visible  = true;
                None
            }
            SimInput::KeyDown(SimKey::PinchLeft)   => { self.left.pinched  = true;  None }
            SimInput::KeyUp(SimKey::PinchLeft)     => { self.left.pinched  = false; None }
            SimInput::KeyDown(SimKey::PinchRight)  => { self.right.pinched = true;  None }
            SimInput::KeyUp(SimKey::PinchRight)    => { self.right.pinched = false; None }
            SimInput::KeyDown(SimKey::ToggleLeft)  => { self.left.visible  = !self.left.visible;  None }
            SimInput::KeyDown(SimKey::ToggleRight) => { self.right.visible = !self.right.visible; None }
            SimInput::KeyDown(SimKey::Scramble) => Some(SourceEvent::Command(AppCommand::Scramble)),
            SimInput::KeyDown(SimKey::Reset)    => Some(SourceEvent::Command(AppCommand::Reset)),
            SimInput::KeyDown(SimKey::Solve)    => Some(SourceEvent::Command(AppCommand::ApplySolution)),
            SimInput::KeyDown(SimKey::Kick)     => Some(SourceEvent::Command(AppCommand::Kick(KICK_IMPULSE))),
            SimInput::KeyDown(SimKey::Quit)     => Some(SourceEvent::Quit),
            SimInput::KeyUp(_) => None,
        }
    }

    /// Render the hands as a landmark frame.
    pub fn frame(&self, timestamp: f64, cfg: &ControllerConfig) -> HandFrame {
        let render = |h: &SimHand, handedness| {
            h.visible.then(|| {
                let gap = if h.pinched { 0.0 } else { OPEN_GAP };
                HandLandmarks::posed(handedness, camera_landmark(h.position, cfg), gap)
            })
        };
        HandFrame::new(
            timestamp,
            render(&self.left,  Handedness::Left),
            render(&self.right, Handedness::Right),
        )
    }
}

/// Hand source driven by [`SimInput`] events (from the visualizer's window).
///
/// Inputs are applied as they arrive; a frame of the current hands is emitted
/// every [`FRAME_INTERVAL`].  With `emit_frames` off the source only
/// translates command keys, which lets the window drive commands while another
/// source supplies the hands.
pub struct SimHandSource {
    pub rx:          Receiver<SimInput>,
    pub config:      ControllerConfig,
    pub emit_frames: bool,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>, config: ControllerConfig) -> Self {
        SimHandSource { rx, config, emit_frames: true }
    }

    pub fn commands_only(rx: Receiver<SimInput>, config: ControllerConfig) -> Self {
        SimHandSource { rx, config, emit_frames: false }
    }
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let mut hands = SimHands::default();
        let start = Instant::now();
        let mut next_frame = start + FRAME_INTERVAL;

        loop {
            let timeout = next_frame.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(timeout) {
                Ok(input) => {
                    let Some(event) = hands.apply(input) else { continue };
                    let quit = event == SourceEvent::Quit;
                    if tx.send(event).is_err() || quit { return; }
                }
                Err(RecvTimeoutError::Timeout) => {
                    next_frame = Instant::now() + FRAME_INTERVAL;
                    if !self.emit_frames { continue; }
                    let frame = hands.frame(start.elapsed().as_secs_f64(), &self.config);
                    if tx.send(SourceEvent::Frame(frame)).is_err() { return; }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let _ = tx.send(SourceEvent::Quit);
                    return;
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedHandSource: replay prepared frames
// ════════════════════════════════════════════════════════════════════════════

/// Replays a list of frames at a fixed interval, then ends.
///
/// Timestamps are re-stamped from the source's own clock so concatenated
/// scripts stay monotonic.
pub struct ScriptedHandSource {
    pub frames:   Vec<HandFrame>,
    pub interval: Duration,
}

impl ScriptedHandSource {
    pub fn new(frames: Vec<HandFrame>, interval: Duration) -> Self {
        ScriptedHandSource { frames, interval }
    }

    /// A short showcase: three snapped turns and one cancelled twist.
    pub fn demo() -> Self {
        let frames = [
            (Face::Up,     50.0),
            (Face::Right, -50.0),
            (Face::Front,  15.0),
            (Face::Front,  60.0),
        ]
        .into_iter()
        .flat_map(|(face, angle)| grab_twist_release_script(face, angle))
        .collect();
        ScriptedHandSource::new(frames, FRAME_INTERVAL)
    }
}

impl HandSource for ScriptedHandSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        info!("replaying {} scripted frames", self.frames.len());
        let start = Instant::now();
        for mut frame in self.frames {
            frame.timestamp = start.elapsed().as_secs_f64();
            if tx.send(SourceEvent::Frame(frame)).is_err() { return; }
            if !self.interval.is_zero() { thread::sleep(self.interval); }
        }
        debug!("script finished");
    }
}

/// Frames in which the left hand pinches `face`'s grab zone, the right hand
/// sweeps from 0° to `angle_deg` around the face's axis, and the pinch opens.
///
/// Releasing past the snap threshold turns `face` clockwise for positive
/// angles and counter-clockwise for negative ones.
pub fn grab_twist_release_script(face: Face, angle_deg: f32) -> Vec<HandFrame> {
    const APPROACH: usize = 5;
    const SWEEP:    usize = 12;
    const HOLD:     usize = 3;
    const SETTLE:   usize = 3;

    let cfg  = ControllerConfig::default();
    let zone = GrabZone::for_face(face);
    let mut frames = Vec::with_capacity(APPROACH + SWEEP + HOLD + SETTLE + 1);
    let mut push = |left_pinched: bool, angle: f32| {
        let right = twist_offset(zone.center, zone.axis, angle);
        let t = frames.len() as f64 * FRAME_INTERVAL.as_secs_f64();
        let left_gap = if left_pinched { 0.0 } else { OPEN_GAP };
        frames.push(HandFrame::new(
            t,
            Some(HandLandmarks::posed(Handedness::Left, camera_landmark(zone.center, &cfg), left_gap)),
            Some(HandLandmarks::posed(Handedness::Right, camera_landmark(right, &cfg), OPEN_GAP)),
        ));
    };

    for _ in 0..APPROACH { push(false, 0.0); }
    for i in 0..=SWEEP   { push(true, angle_deg * i as f32 / SWEEP as f32); }
    for _ in 0..HOLD     { push(true, angle_deg); }
    for _ in 0..SETTLE   { push(false, angle_deg); }
    frames
}

/// A point one unit from `center` whose twist reading about `axis` is
/// `angle_deg`.
fn twist_offset(center: Vec3, axis: RotationAxis, angle_deg: f32) -> Vec3 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let offset = match axis {
        RotationAxis::Y => [c, 0.0, s],
        RotationAxis::X => [0.0, c, s],
        RotationAxis::Z => [c, s, 0.0],
    };
    let bound = POSITION_BOUND;
    [
        (center[0] + offset[0]).clamp(-bound, bound),
        (center[1] + offset[1]).clamp(-bound, bound),
        (center[2] + offset[2]).clamp(-bound, bound),
    ]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use cube_gesture::zones::twist_angle;
    use cube_gesture::{GestureController, HandPose};

    fn pose(frame: &HandFrame, h: Handedness) -> Option<HandPose> {
        frame.hand(h).and_then(|l| HandPose::from_landmarks(l, &ControllerConfig::default()))
    }

    #[test]
    fn twist_offset_reads_back_its_angle() {
        for face in Face::ALL {
            let zone = GrabZone::for_face(face);
            for angle in [-60.0f32, -35.0, 0.0, 20.0, 45.0] {
                let p = twist_offset(zone.center, zone.axis, angle);
                let got = twist_angle(Some(zone.center), Some(p), zone.axis);
                assert!((got - angle).abs() < 1e-3, "{:?} {}: {}", face, angle, got);
            }
        }
    }

    #[test]
    fn script_shape() {
        let frames = grab_twist_release_script(Face::Up, 45.0);
        let first = pose(&frames[0], Handedness::Left).unwrap();
        let mid   = pose(&frames[10], Handedness::Left).unwrap();
        let last  = pose(frames.last().unwrap(), Handedness::Left).unwrap();
        assert_eq!(first.pinch, 0.0);
        assert!(mid.pinch > 0.99);
        assert_eq!(last.pinch, 0.0);
        assert!(frames.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn script_drives_controller_to_snap() {
        let ctl = GestureController::default();
        let mut session = ctl.new_session();
        let mut decisions = Vec::new();
        for f in grab_twist_release_script(Face::Back, -45.0) {
            let (s, out) = ctl.update(session, &f);
            session = s;
            decisions.extend(out.decision);
        }
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].face, Face::Back);
        assert!(!decisions[0].clockwise);
    }

    #[test]
    fn sim_nudge_is_clamped() {
        let mut hands = SimHands::default();
        hands.apply(SimInput::Nudge { hand: Handedness::Right, delta: [10.0, 0.0, -10.0] });
        assert_eq!(hands.right.position, [SIM_REACH, -1.0, -SIM_REACH]);
        assert_eq!(hands.left, SimHands::default().left);
    }

    #[test]
    fn sim_pinch_and_toggle() {
        let mut hands = SimHands::default();
        hands.apply(SimInput::PlaceLeft(Face::Front));
        hands.apply(SimInput::KeyDown(SimKey::PinchLeft));
        hands.apply(SimInput::KeyDown(SimKey::ToggleRight));
        let frame = hands.frame(0.0, &ControllerConfig::default());
        assert!(frame.right.is_none());
        let left = pose(&frame, Handedness::Left).unwrap();
        assert!(left.pinch > 0.99);
        assert!((left.position[2] - 1.0).abs() < 1e-5);

        hands.apply(SimInput::KeyUp(SimKey::PinchLeft));
        let frame = hands.frame(0.1, &ControllerConfig::default());
        assert_eq!(pose(&frame, Handedness::Left).unwrap().pinch, 0.0);
    }

    #[test]
    fn sim_keys_map_to_commands() {
        let mut hands = SimHands::default();
        assert_eq!(hands.apply(SimInput::KeyDown(SimKey::Scramble)), Some(SourceEvent::Command(AppCommand::Scramble)));
        assert_eq!(hands.apply(SimInput::KeyDown(SimKey::Solve)), Some(SourceEvent::Command(AppCommand::ApplySolution)));
        assert_eq!(hands.apply(SimInput::KeyDown(SimKey::Quit)), Some(SourceEvent::Quit));
        assert_eq!(hands.apply(SimInput::KeyUp(SimKey::Scramble)), None);
    }

    #[test]
    fn sim_source_emits_frames_and_quits() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_hand_source(SimHandSource::new(sim_rx, ControllerConfig::default()));
        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(SourceEvent::Frame(f)) => assert_eq!(f.hand_count(), 2),
            other => panic!("expected a frame, got {:?}", other),
        }
        sim_tx.send(SimInput::KeyDown(SimKey::Quit)).unwrap();
        let quit = rx.iter().find(|e| !matches!(e, SourceEvent::Frame(_)));
        assert_eq!(quit, Some(SourceEvent::Quit));
    }

    #[test]
    fn commands_only_source_sends_no_frames() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_hand_source(SimHandSource::commands_only(sim_rx, ControllerConfig::default()));
        thread::sleep(FRAME_INTERVAL * 3);
        sim_tx.send(SimInput::KeyDown(SimKey::Reset)).unwrap();
        drop(sim_tx);
        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events, vec![SourceEvent::Command(AppCommand::Reset), SourceEvent::Quit]);
    }

    #[test]
    fn scripted_source_replays_everything_then_ends() {
        let frames = grab_twist_release_script(Face::Down, 40.0);
        let n = frames.len();
        let rx = spawn_hand_source(ScriptedHandSource::new(frames, Duration::ZERO));
        let got: Vec<_> = rx.iter().collect();
        assert_eq!(got.len(), n);
        assert!(got.iter().all(|e| matches!(e, SourceEvent::Frame(_))));
    }
}
