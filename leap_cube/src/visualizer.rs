//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────┬──────────────────────────────┐
//! │        [U]                       │  HANDS                       │
//! │   [L]  [F]  [R]  [B]             │   zone markers U D L R F/B   │
//! │        [D]                       │   left / right hand markers  │
//! │                                  │                              │
//! │  TWIST ◄────────┼────────►       │  PITCH  YAW  ROLL  SPIN      │
//! │  mode text                       │                              │
//! │  status bar                                                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The view reads [`AppState`] and never mutates it.

use std::sync::mpsc::Sender;

use cube_engine::Face;
use cube_gesture::{HandPose, Handedness, GRAB_ZONES};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::app::AppState;
use crate::source::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:       usize = 960;
pub const WIN_H:       usize = 540;
const CELL:            usize = 30;
const FACE_PX:         usize = CELL * 3;
const FACE_STEP:       usize = FACE_PX + 6;
const NET_X:           usize = 30;
const NET_Y:           usize = 40;
const NET_W:           usize = FACE_STEP * 4;
const GAUGE_Y:         usize = NET_Y + FACE_STEP * 3 + 40;
const GAUGE_H:         usize = 18;
const PANEL_X:         usize = NET_X + NET_W + 40;
const PANEL_Y:         usize = NET_Y;
const PANEL_W:         usize = WIN_W - PANEL_X - 30;
const PANEL_H:         usize = FACE_STEP * 3;
const STATUS_Y:        usize = WIN_H - 36;
const BG_COLOR:        u32   = 0xFF1A1A2E;
const PANEL_BG:        u32   = 0xFF16213E;
const GRAB_COLOR:      u32   = 0xFFFFD700;  // gold
const SNAP_OK_COLOR:   u32   = 0xFF3CCB5A;
const SNAP_LOW_COLOR:  u32   = 0xFFFF8C00;
const LEFT_HAND:       u32   = 0xFF40E0FF;
const RIGHT_HAND:      u32   = 0xFFFF50C8;
const TEXT_BG:         u32   = 0xFF0F3460;

/// Cube-space units shown across the hand panel, centred on the origin.
const PANEL_RANGE:     f32   = 4.0;

/// Cube-space distance a held movement key covers per window frame.
const NUDGE_STEP:      f32   = 0.04;

/// Net slot (column, row) of each face, in face units.
fn net_slot(face: Face) -> (usize, usize) {
    match face {
        Face::Up    => (1, 0),
        Face::Left  => (0, 1),
        Face::Front => (1, 1),
        Face::Right => (2, 1),
        Face::Back  => (3, 1),
        Face::Down  => (1, 2),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:   Window,
    buf:      Vec<u32>,
    sim_tx:   Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "Leap Cube - pinch, twist, release",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard inputs and translate to SimInput events.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let send = |input: SimInput| { let _ = self.sim_tx.send(input); };
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let released = |k: Key| self.window.is_key_released(k);
        let axis = |pos: Key, neg: Key| {
            let d = |k: Key| if self.window.is_key_down(k) { NUDGE_STEP } else { 0.0 };
            d(pos) - d(neg)
        };

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            send(SimInput::KeyDown(SimKey::Quit));
            return false;
        }

        // ── hands ─────────────────────────────────────────────────────────
        let left  = [axis(Key::D, Key::A), axis(Key::W, Key::S), axis(Key::R, Key::F)];
        let right = [axis(Key::Right, Key::Left), axis(Key::Up, Key::Down), axis(Key::PageUp, Key::PageDown)];
        if left != [0.0; 3] {
            send(SimInput::Nudge { hand: Handedness::Left, delta: left });
        }
        if right != [0.0; 3] {
            send(SimInput::Nudge { hand: Handedness::Right, delta: right });
        }

        let place_keys = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5, Key::Key6];
        for (key, zone) in place_keys.into_iter().zip(GRAB_ZONES) {
            if one_shot(key) { send(SimInput::PlaceLeft(zone.face)); }
        }

        for (key, sim) in [(Key::Space, SimKey::PinchLeft), (Key::Enter, SimKey::PinchRight)] {
            if one_shot(key) { send(SimInput::KeyDown(sim)); }
            if released(key) { send(SimInput::KeyUp(sim)); }
        }

        // ── toggles and commands ──────────────────────────────────────────
        for (key, sim) in [
            (Key::H, SimKey::ToggleLeft),
            (Key::J, SimKey::ToggleRight),
            (Key::N, SimKey::Scramble),
            (Key::C, SimKey::Reset),
            (Key::V, SimKey::Solve),
            (Key::K, SimKey::Kick),
        ] {
            if one_shot(key) { send(SimInput::KeyDown(sim)); }
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState) {
        self.buf.fill(BG_COLOR);

        // ── Net ───────────────────────────────────────────────────────────
        let grabbed = app.session().grabbed;
        for face in Face::ALL {
            self.draw_face(app, face, grabbed == Some(face));
        }

        // ── Twist gauge ───────────────────────────────────────────────────
        self.draw_twist_gauge(app);

        // ── Mode line ─────────────────────────────────────────────────────
        let mode = app.session().mode_text();
        self.draw_label(&mode, NET_X, GAUGE_Y + GAUGE_H + 24, 0xFFAADDFF);

        // ── Hand panel ────────────────────────────────────────────────────
        self.draw_hand_panel(app);

        // ── Orbit / cube readout ──────────────────────────────────────────
        let s = app.session();
        let orbit = format!(
            "PITCH {:.0}  YAW {:.0}  ROLL {:.0}  SPIN {:.1}",
            s.rotation_x, s.rotation_y, s.roll, s.spin(),
        );
        self.draw_label(&orbit, PANEL_X, PANEL_Y + PANEL_H + 16, 0xFFEEEEEE);

        let cube = app.cube();
        let cube_line = format!(
            "MOVES {}  {}  {}",
            cube.move_count(),
            if cube.is_scrambled() { "SCRAMBLED" } else { "-" },
            if cube.is_solved() { "SOLVED" } else { "UNSOLVED" },
        );
        self.draw_label(&cube_line, PANEL_X, PANEL_Y + PANEL_H + 30, 0xFFEEEEEE);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(&app.status, 10, STATUS_Y + 10, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "WASD/RF=left hand  arrows/PgUp/PgDn=right hand  1-6=left to U D L R F B  \
             Space/Enter=pinch  H/J=hide  N=scramble  C=reset  V=solve  K=spin  Q=quit",
            10, WIN_H - 12, 0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Net ───────────────────────────────────────────────────────────────

    fn draw_face(&mut self, app: &AppState, face: Face, held: bool) {
        let (col, row) = net_slot(face);
        let x0 = NET_X + col * FACE_STEP;
        let y0 = NET_Y + row * FACE_STEP;

        for (r, line) in app.cube().face(face).iter().enumerate() {
            for (c, color) in line.iter().enumerate() {
                let x = x0 + c * CELL;
                let y = y0 + r * CELL;
                self.fill_rect(x + 1, y + 1, CELL - 2, CELL - 2, color.argb());
            }
        }

        let letter = face.letter().to_string();
        self.draw_label(&letter, x0 + FACE_PX / 2 - 1, y0 + FACE_PX / 2 - 2, 0xFF000000);

        if held {
            for inset in 0..3 {
                self.draw_border(x0 - 3 + inset, y0 - 3 + inset, FACE_PX + 6 - 2 * inset, FACE_PX + 6 - 2 * inset, GRAB_COLOR);
            }
        }
    }

    // ── Twist gauge ───────────────────────────────────────────────────────

    fn draw_twist_gauge(&mut self, app: &AppState) {
        let half = NET_W / 2;
        let mid  = NET_X + half;
        self.fill_rect(NET_X, GAUGE_Y, NET_W, GAUGE_H, PANEL_BG);

        let session = app.session();
        let snap    = app.config().snap_threshold_deg;
        if session.grabbed.is_some() {
            let twist = session.twist_deg;
            let color = if twist.abs() > snap { SNAP_OK_COLOR } else { SNAP_LOW_COLOR };
            let len = (session.twist_strength() * half as f32) as usize;
            if twist >= 0.0 {
                self.fill_rect(mid, GAUGE_Y + 2, len, GAUGE_H - 4, color);
            } else {
                self.fill_rect(mid - len, GAUGE_Y + 2, len, GAUGE_H - 4, color);
            }
        }

        // Threshold ticks and centre line
        let tick = ((snap / 90.0).min(1.0) * half as f32) as usize;
        for x in [mid - tick, mid, mid + tick] {
            for y in GAUGE_Y..GAUGE_Y + GAUGE_H {
                self.set_pixel(x, y, 0xFFEEEEEE);
            }
        }
        self.draw_border(NET_X, GAUGE_Y, NET_W, GAUGE_H, 0xFF000000);

        let label = format!("TWIST {:.0} DEG  (SNAP > {:.0})", session.twist_deg, snap);
        self.draw_label(&label, NET_X, GAUGE_Y - 10, 0xFFEEEEEE);
    }

    // ── Hand panel ────────────────────────────────────────────────────────

    /// Front view (x right, y up) of the grab zones and both hands.
    fn draw_hand_panel(&mut self, app: &AppState) {
        self.fill_rect(PANEL_X, PANEL_Y, PANEL_W, PANEL_H, PANEL_BG);
        self.draw_label("HANDS", PANEL_X + 6, PANEL_Y + 6, GRAB_COLOR);

        let grabbed = app.session().grabbed;
        for zone in GRAB_ZONES {
            let (x, y) = panel_point(zone.center);
            let color = if grabbed == Some(zone.face) { GRAB_COLOR } else { 0xFF667799 };
            let r = ((zone.radius / PANEL_RANGE) * PANEL_H as f32) as usize;
            self.draw_diamond(x, y, r.max(3), color);
            // F and B share a spot in this view
            let dx = match zone.face { Face::Front => 6, Face::Back => 0, _ => 3 };
            let letter = zone.face.letter().to_string();
            self.draw_label(&letter, (x + dx).saturating_sub(4), y.saturating_sub(2), color);
        }

        let frame = app.last_frame();
        let mut line_y = PANEL_Y + PANEL_H - 24;
        for (handedness, color) in [(Handedness::Left, LEFT_HAND), (Handedness::Right, RIGHT_HAND)] {
            let pose = frame.hand(handedness).and_then(|h| HandPose::from_landmarks(h, app.config()));
            let text = match pose {
                Some(p) => {
                    let (x, y) = panel_point(p.position);
                    let fill = blend(color, 0xFFFFFFFF, p.pinch * 0.6);
                    self.fill_rect(x.saturating_sub(5), y.saturating_sub(5), 11, 11, fill);
                    if p.pinch > app.config().pinch_threshold {
                        self.draw_border(x.saturating_sub(7), y.saturating_sub(7), 15, 15, 0xFFFFFFFF);
                    }
                    format!(
                        "{}  X {:.2}  Y {:.2}  Z {:.2}  PINCH {:.2}",
                        handedness, p.position[0], p.position[1], p.position[2], p.pinch,
                    )
                }
                None => format!("{}  -", handedness),
            };
            self.draw_label(&text, PANEL_X + 6, line_y, color);
            line_y += 10;
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y+h).min(WIN_H) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            let dx = r as isize - dy;
            for &(sx, sy) in &[
                (cx as isize + dx, cy as isize + dy),
                (cx as isize - dx, cy as isize + dy),
                (cx as isize + dx, cy as isize - dy),
                (cx as isize - dx, cy as isize - dy),
            ] {
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// Minimal bitmap font: 3×5 characters for label rendering.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

/// Cube-space `(x, y)` to hand-panel pixels, clamped to the panel.
fn panel_point(p: [f32; 3]) -> (usize, usize) {
    let scale = PANEL_H as f32 / PANEL_RANGE;
    let cx = (PANEL_X + PANEL_W / 2) as f32;
    let cy = (PANEL_Y + PANEL_H / 2) as f32;
    let x = (cx + p[0] * scale).clamp(PANEL_X as f32, (PANEL_X + PANEL_W - 1) as f32);
    let y = (cy - p[1] * scale).clamp(PANEL_Y as f32, (PANEL_Y + PANEL_H - 1) as f32);
    (x as usize, y as usize)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '°' => [0b010, 0b101, 0b010, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}
