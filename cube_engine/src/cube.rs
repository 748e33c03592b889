//! The cube itself: a 54-sticker grid plus scramble bookkeeping.

use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::error::{MoveError, StateError};
use crate::facelet::{Color, Face, STICKER_COUNT};
use crate::moves::{format_sequence, parse_sequence, Move};
use crate::permutation::Permutation;

// ════════════════════════════════════════════════════════════════════════════
// Cube
// ════════════════════════════════════════════════════════════════════════════

/// A 3×3×3 cube.
///
/// The sticker grid only ever changes through [`Cube::apply`] (and the
/// sequence/scramble helpers built on it) or wholesale through
/// [`Cube::import_state`] / [`Cube::reset`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cube {
    stickers:   [Color; STICKER_COUNT],
    /// Last recorded scramble, in application order.
    history:    Vec<Move>,
    scrambled:  bool,
    /// Moves applied since the last scramble or reset.
    move_count: usize,
}

impl Cube {
    /// A solved cube.
    pub fn new() -> Self {
        Cube {
            stickers:   std::array::from_fn(|i| Face::ALL[i / 9].home_color()),
            history:    Vec::new(),
            scrambled:  false,
            move_count: 0,
        }
    }

    /// Return to the solved state and forget any scramble.
    pub fn reset(&mut self) {
        *self = Cube::new();
    }

    // ── moves ─────────────────────────────────────────────────────────────

    /// Apply one quarter turn.
    pub fn apply(&mut self, mv: Move) {
        self.stickers = Permutation::of(mv).apply(&self.stickers);
        self.move_count += 1;
    }

    /// Parse and apply a single notation token.  Unknown tokens leave the
    /// cube untouched.
    pub fn apply_token(&mut self, token: &str) -> Result<Move, MoveError> {
        let mv: Move = token.parse().inspect_err(|e| warn!("rejected move: {}", e))?;
        self.apply(mv);
        Ok(mv)
    }

    /// Parse and apply a whitespace-separated sequence.  The whole sequence
    /// is validated before the first move is applied.
    pub fn apply_sequence(&mut self, seq: &str) -> Result<Vec<Move>, MoveError> {
        let moves = parse_sequence(seq).inspect_err(|e| warn!("rejected sequence: {}", e))?;
        for &mv in &moves {
            self.apply(mv);
        }
        Ok(moves)
    }

    /// Apply `n` moves drawn uniformly (with replacement) from the 12-move
    /// alphabet and record them for [`Cube::solution`].  Returns the moves in
    /// the order they were applied.
    pub fn scramble<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Vec<Move> {
        let mut moves = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(&mv) = Move::ALL.choose(rng) {
                self.apply(mv);
                moves.push(mv);
            }
        }
        info!("scrambled with {} moves: {}", moves.len(), format_sequence(&moves));
        self.history    = moves.clone();
        self.scrambled  = true;
        self.move_count = 0;
        moves
    }

    // ── status ────────────────────────────────────────────────────────────

    /// True iff every face is a single color.
    pub fn is_solved(&self) -> bool {
        self.stickers
            .chunks_exact(9)
            .all(|face| face.iter().all(|&c| c == face[0]))
    }

    pub fn is_scrambled(&self) -> bool { self.scrambled }

    pub fn move_count(&self) -> usize { self.move_count }

    /// The last recorded scramble.
    pub fn history(&self) -> &[Move] { &self.history }

    /// The recorded scramble undone: reversed, each move inverted.
    ///
    /// This only returns the cube to solved if nothing but that scramble has
    /// been applied since it was solved.  It is not a solver.
    pub fn solution(&self) -> Vec<Move> {
        self.history.iter().rev().map(|m| m.inverse()).collect()
    }

    /// Apply [`Cube::solution`] and, if that leaves the cube solved, forget
    /// the scramble so a second call is a no-op.  Returns the moves applied.
    pub fn apply_solution(&mut self) -> Vec<Move> {
        let moves = self.solution();
        for &mv in &moves {
            self.apply(mv);
        }
        self.mark_solved();
        moves
    }

    /// Drop the recorded scramble once the cube is back to solved.  Returns
    /// false and changes nothing while any face is still mixed.
    pub fn mark_solved(&mut self) -> bool {
        if !self.is_solved() {
            return false;
        }
        self.history.clear();
        self.scrambled = false;
        true
    }

    // ── stickers ──────────────────────────────────────────────────────────

    pub fn stickers(&self) -> &[Color; STICKER_COUNT] { &self.stickers }

    pub fn sticker(&self, face: Face, row: usize, col: usize) -> Color {
        self.stickers[face.sticker(row, col)]
    }

    /// One face as a 3×3 grid, row-major as seen from outside.
    pub fn face(&self, face: Face) -> [[Color; 3]; 3] {
        std::array::from_fn(|r| std::array::from_fn(|c| self.sticker(face, r, c)))
    }

    // ── state strings ─────────────────────────────────────────────────────

    /// 54 ordinal digits: Up, Left, Front, Right, Back, Down, row-major.
    pub fn export_state(&self) -> String {
        self.stickers
            .iter()
            .map(|c| char::from(b'0' + c.ordinal()))
            .collect()
    }

    /// Build a cube from an [`export_state`](Cube::export_state) string.
    ///
    /// The string must hold exactly 54 digits `0`–`5` with nine of each.
    /// The result carries no scramble history.
    pub fn import_state(state: &str) -> Result<Cube, StateError> {
        let chars: Vec<char> = state.chars().collect();
        if chars.len() != STICKER_COUNT {
            return Err(StateError::Length(chars.len()));
        }

        let mut stickers = [Color::White; STICKER_COUNT];
        let mut census   = [0usize; 6];
        for (index, &ch) in chars.iter().enumerate() {
            let color = ch
                .to_digit(10)
                .and_then(|d| Color::from_ordinal(d as u8))
                .ok_or(StateError::Sticker { index, ch })?;
            stickers[index] = color;
            census[color.ordinal() as usize] += 1;
        }
        if let Some((ordinal, &count)) = census.iter().enumerate().find(|&(_, &n)| n != 9) {
            return Err(StateError::ColorCount { ordinal: ordinal as u8, count });
        }

        Ok(Cube { stickers, ..Cube::new() })
    }
}

impl Default for Cube {
    fn default() -> Self { Cube::new() }
}

/// Unfolded net with one color letter per sticker:
///
/// ```text
///       WWW
///       WWW
///       WWW
///   OOO GGG RRR BBB
///   ...
///       YYY
/// ```
impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |face: Face, r: usize| -> String {
            (0..3).map(|c| self.sticker(face, r, c).letter()).collect()
        };
        for r in 0..3 {
            writeln!(f, "    {}", row(Face::Up, r))?;
        }
        for r in 0..3 {
            writeln!(
                f, "{} {} {} {}",
                row(Face::Left, r), row(Face::Front, r), row(Face::Right, r), row(Face::Back, r),
            )?;
        }
        for r in 0..3 {
            writeln!(f, "    {}", row(Face::Down, r))?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
