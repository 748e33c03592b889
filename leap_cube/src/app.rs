//! Top-level application state machine.
//!
//! `AppState` owns the `Cube`, the `GestureController` and its session.  It
//! processes `SourceEvent`s and hands a read-only view to the visualizer each
//! frame.

use std::fmt;
use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::Context;
use cube_engine::{format_sequence, Cube, Move};
use cube_gesture::{
    ControllerConfig, FrameOutput, GestureController, GestureSession, HandFrame, Transition,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::AppConfig;
use crate::source::{
    spawn_hand_source_into, AppCommand, ScriptedHandSource, SimHandSource, SimInput, SourceEvent,
};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// SessionStats
// ════════════════════════════════════════════════════════════════════════════

/// Printed when the application exits.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub gesture_moves: usize,
    pub scrambles:     usize,
    pub solves:        usize,
    pub elapsed:       Duration,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs();
        writeln!(f, "  Gesture moves : {}", self.gesture_moves)?;
        writeln!(f, "  Scrambles     : {}", self.scrambles)?;
        writeln!(f, "  Solves        : {}", self.solves)?;
        write!(f, "  Session time  : {}:{:02}", secs / 60, secs % 60)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── cube ──────────────────────────────────────────────────────────────
    cube:            Cube,
    /// Gesture moves made since the last scramble or reset.
    since_scramble:  Vec<Move>,
    scramble_length: usize,
    /// Seeded generator; `None` draws from the thread rng.
    rng:             Option<StdRng>,

    // ── gestures ──────────────────────────────────────────────────────────
    controller:      GestureController,
    session:         GestureSession,
    last_frame:      HandFrame,
    last_output:     FrameOutput,

    // ── stats ─────────────────────────────────────────────────────────────
    gesture_moves:   usize,
    scrambles:       usize,
    solves:          usize,
    started:         Instant,

    // ── status message ────────────────────────────────────────────────────
    pub status:      String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let controller = GestureController::new(cfg.controller);
        let session = controller.new_session();
        AppState {
            cube:            Cube::new(),
            since_scramble:  Vec::new(),
            scramble_length: cfg.scramble_length,
            rng:             cfg.scramble_seed.map(StdRng::seed_from_u64),
            controller,
            session,
            last_frame:      HandFrame::default(),
            last_output:     FrameOutput::default(),
            gesture_moves:   0,
            scrambles:       0,
            solves:          0,
            started:         Instant::now(),
            status:          "Ready - pinch near a face to grab it".to_string(),
        }
    }

    // ── process one hand frame ───────────────────────────────────────────

    /// Run one controller update and apply any committed turn to the cube.
    pub fn handle_frame(&mut self, frame: HandFrame) -> Option<Move> {
        let (session, out) = self.controller.update(self.session, &frame);
        self.session = session;

        match out.transition {
            Some(Transition::Grabbed { face, .. }) => {
                self.status = format!(
                    "GRAB {} - twist past {:.0} deg and release to turn",
                    face.name(), self.controller.config().snap_threshold_deg,
                );
            }
            Some(Transition::Released { face, twist_deg, snapped: false }) => {
                self.status = format!("Released {} at {:.0} deg - no turn", face.name(), twist_deg);
            }
            _ => {}
        }

        let applied = out.decision.map(|decision| {
            let mv = decision.to_move();
            self.cube.apply(mv);
            self.since_scramble.push(mv);
            self.gesture_moves += 1;
            self.status = format!("SNAP! Move {}: {}", self.cube.move_count(), decision);
            if self.cube.is_scrambled() && self.cube.mark_solved() {
                self.since_scramble.clear();
                self.solves += 1;
                info!("solved in {} moves", self.cube.move_count());
                self.status.push_str("  SOLVED!");
            }
            mv
        });

        self.last_frame  = frame;
        self.last_output = out;
        applied
    }

    // ── process one command ──────────────────────────────────────────────

    pub fn handle_command(&mut self, command: AppCommand) {
        match command {
            AppCommand::Scramble => {
                let n = self.scramble_length;
                let moves = match self.rng.as_mut() {
                    Some(rng) => self.cube.scramble(n, rng),
                    None      => self.cube.scramble(n, &mut rand::rng()),
                };
                self.since_scramble.clear();
                self.scrambles += 1;
                self.status = format!("Scrambled: {}", format_sequence(&moves));
            }

            AppCommand::Reset => {
                self.cube.reset();
                self.since_scramble.clear();
                info!("cube reset");
                self.status = "Reset to solved".to_string();
            }

            // Undo the gesture moves, then the recorded scramble.
            AppCommand::ApplySolution => {
                let mut moves: Vec<Move> = self.since_scramble.iter().rev().map(|m| m.inverse()).collect();
                for &mv in &moves {
                    self.cube.apply(mv);
                }
                moves.extend(self.cube.apply_solution());
                self.since_scramble.clear();
                info!("applied solution: {}", format_sequence(&moves));
                self.status = if moves.is_empty() {
                    "Nothing to solve".to_string()
                } else {
                    format!("Solution ({} moves): {}", moves.len(), format_sequence(&moves))
                };
            }

            AppCommand::Kick(impulse) => {
                self.session.kick(impulse);
                self.status = format!("Spin! {:.1} deg/frame", self.session.spin());
            }
        }
    }

    pub fn handle_event(&mut self, event: SourceEvent) {
        match event {
            SourceEvent::Frame(f)   => { self.handle_frame(f); }
            SourceEvent::Command(c) => self.handle_command(c),
            SourceEvent::Quit       => { /* handled in run loop */ }
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn cube(&self)        -> &Cube              { &self.cube }
    pub fn session(&self)     -> &GestureSession    { &self.session }
    pub fn last_frame(&self)  -> &HandFrame         { &self.last_frame }
    pub fn last_output(&self) -> &FrameOutput       { &self.last_output }
    pub fn config(&self)      -> &ControllerConfig  { self.controller.config() }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            gesture_moves: self.gesture_moves,
            scrambles:     self.scrambles,
            solves:        self.solves,
            elapsed:       self.started.elapsed(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Where hand frames come from.  The window keyboard always drives commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Keyboard-steered virtual hands.
    Simulation,
    /// Replay of [`ScriptedHandSource::demo`].
    Demo,
    /// Real LeapMotion hardware.
    #[cfg(feature = "leap")]
    Leap,
}

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the visualizer,
/// the hand source, and drives the event/render loop at ~60 fps until the
/// window closes or a source quits.
pub fn run(cfg: AppConfig, mode: SourceMode) -> anyhow::Result<SessionStats> {
    // ── Source channel ────────────────────────────────────────────────────
    let (event_tx, event_rx) = mpsc::channel::<SourceEvent>();
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    match mode {
        SourceMode::Simulation => {
            spawn_hand_source_into(SimHandSource::new(sim_rx, cfg.controller), event_tx);
        }
        SourceMode::Demo => {
            spawn_hand_source_into(SimHandSource::commands_only(sim_rx, cfg.controller), event_tx.clone());
            spawn_hand_source_into(ScriptedHandSource::demo(), event_tx);
        }
        #[cfg(feature = "leap")]
        SourceMode::Leap => {
            spawn_hand_source_into(SimHandSource::commands_only(sim_rx, cfg.controller), event_tx.clone());
            spawn_hand_source_into(crate::source::LeapHandSource, event_tx);
        }
    }
    info!("hand source: {:?}", mode);

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx).context("failed to open visualizer window")?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input → translate to SimInput
        if !vis.poll_input() { break; }

        // 2. Drain source events
        loop {
            match event_rx.try_recv() {
                Ok(SourceEvent::Quit)           => return Ok(app.stats()),
                Ok(event)                       => app.handle_event(event),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => return Ok(app.stats()),
            }
        }

        // 3. Render
        vis.render(&app);
    }

    Ok(app.stats())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::grab_twist_release_script;
    use cube_engine::Face;

    fn make_app() -> AppState {
        AppState::new(&AppConfig::default())
    }

    fn seeded_app(seed: u64, length: usize) -> AppState {
        AppState::new(&AppConfig {
            scramble_seed:   Some(seed),
            scramble_length: length,
            ..AppConfig::default()
        })
    }

    fn play(app: &mut AppState, face: Face, angle: f32) -> Vec<Move> {
        grab_twist_release_script(face, angle)
            .into_iter()
            .filter_map(|f| app.handle_frame(f))
            .collect()
    }

    #[test]
    fn clockwise_gesture_turns_face() {
        let mut app = make_app();
        let moves = play(&mut app, Face::Up, 45.0);
        assert_eq!(moves, vec![Move::cw(Face::Up)]);

        let mut expected = Cube::new();
        expected.apply(Move::cw(Face::Up));
        assert_eq!(app.cube().export_state(), expected.export_state());
        assert!(app.status.starts_with("SNAP! Move 1: U ("), "{}", app.status);
        assert_eq!(app.stats().gesture_moves, 1);
    }

    #[test]
    fn counter_clockwise_gesture_turns_face_back() {
        let mut app = make_app();
        assert_eq!(play(&mut app, Face::Right, -40.0), vec![Move::ccw(Face::Right)]);
        assert!(app.status.starts_with("SNAP! Move 1: R' ("), "{}", app.status);
    }

    #[test]
    fn small_twist_is_cancelled() {
        let mut app = make_app();
        assert!(play(&mut app, Face::Front, 20.0).is_empty());
        assert!(app.cube().is_solved());
        assert!(app.status.contains("no turn"), "{}", app.status);
        assert_eq!(app.session().grabbed, None);
    }

    #[test]
    fn every_face_is_reachable_by_gesture() {
        for face in Face::ALL {
            let mut app = make_app();
            assert_eq!(play(&mut app, face, 50.0), vec![Move::cw(face)], "{:?}", face);
        }
    }

    #[test]
    fn seeded_scramble_is_reproducible() {
        let mut a = seeded_app(42, 25);
        let mut b = seeded_app(42, 25);
        a.handle_command(AppCommand::Scramble);
        b.handle_command(AppCommand::Scramble);
        assert_eq!(a.cube().export_state(), b.cube().export_state());
        assert_eq!(a.cube().history().len(), 25);
        assert_eq!(a.stats().scrambles, 1);
    }

    #[test]
    fn unseeded_scramble_uses_configured_length() {
        let mut app = make_app();
        app.handle_command(AppCommand::Scramble);
        assert_eq!(app.cube().history().len(), 20);
        assert!(app.cube().is_scrambled());
    }

    #[test]
    fn solution_undoes_gestures_and_scramble() {
        let mut app = seeded_app(7, 15);
        app.handle_command(AppCommand::Scramble);
        play(&mut app, Face::Left, 45.0);
        play(&mut app, Face::Down, -45.0);
        app.handle_command(AppCommand::ApplySolution);
        assert!(app.cube().is_solved());
        assert!(app.status.starts_with("Solution (17 moves)"), "{}", app.status);
    }

    #[test]
    fn solving_by_gesture_is_counted() {
        let mut app = seeded_app(11, 1);
        app.handle_command(AppCommand::Scramble);
        let undo = app.cube().history()[0].inverse();
        let angle = if undo.is_clockwise() { 45.0 } else { -45.0 };
        play(&mut app, undo.face, angle);
        assert!(app.cube().is_solved());
        assert_eq!(app.stats().solves, 1);
        assert!(app.status.ends_with("SOLVED!"), "{}", app.status);
    }

    #[test]
    fn second_solution_leaves_cube_solved() {
        let mut app = seeded_app(7, 15);
        app.handle_command(AppCommand::Scramble);
        app.handle_command(AppCommand::ApplySolution);
        assert!(app.cube().is_solved());
        assert!(!app.cube().is_scrambled());

        app.handle_command(AppCommand::ApplySolution);
        assert!(app.cube().is_solved());
        assert_eq!(app.status, "Nothing to solve");
    }

    #[test]
    fn gestures_after_a_solve_are_undone_by_solution() {
        let mut app = seeded_app(7, 15);
        app.handle_command(AppCommand::Scramble);
        app.handle_command(AppCommand::ApplySolution);
        play(&mut app, Face::Back, 45.0);
        app.handle_command(AppCommand::ApplySolution);
        assert!(app.cube().is_solved());
        assert!(app.status.starts_with("Solution (1 moves)"), "{}", app.status);
    }

    #[test]
    fn undoing_a_turn_on_a_solved_cube_is_not_a_solve() {
        let mut app = seeded_app(11, 1);
        app.handle_command(AppCommand::Scramble);
        let undo = app.cube().history()[0].inverse();
        let angle = |mv: Move| if mv.is_clockwise() { 45.0 } else { -45.0 };
        play(&mut app, undo.face, angle(undo));
        assert_eq!(app.stats().solves, 1);

        play(&mut app, Face::Up, 45.0);
        play(&mut app, Face::Up, -45.0);
        assert!(app.cube().is_solved());
        assert_eq!(app.stats().solves, 1);
        assert!(!app.status.contains("SOLVED!"), "{}", app.status);
    }

    #[test]
    fn reset_restores_solved() {
        let mut app = seeded_app(3, 10);
        app.handle_command(AppCommand::Scramble);
        app.handle_command(AppCommand::Reset);
        assert!(app.cube().is_solved());
        assert!(!app.cube().is_scrambled());
        app.handle_command(AppCommand::ApplySolution);
        assert_eq!(app.status, "Nothing to solve");
    }

    #[test]
    fn kick_spins_the_view() {
        let mut app = make_app();
        app.handle_command(AppCommand::Kick([0.0, 10.0, 0.0]));
        app.handle_frame(HandFrame::empty(0.0));
        assert!((app.session().rotation_y - 10.0).abs() < 1e-5);
        assert!(app.session().spin() < 10.0);
    }

    #[test]
    fn quit_event_is_ignored_by_state() {
        let mut app = make_app();
        app.handle_event(SourceEvent::Quit);
        assert!(app.cube().is_solved());
        assert_eq!(app.stats().gesture_moves, 0);
    }

    #[test]
    fn stats_display() {
        let stats = SessionStats {
            gesture_moves: 4,
            scrambles:     1,
            solves:        0,
            elapsed:       Duration::from_secs(75),
        };
        let text = stats.to_string();
        assert!(text.contains("Gesture moves : 4"));
        assert!(text.ends_with("1:15"));
    }
}
