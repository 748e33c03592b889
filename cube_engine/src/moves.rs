//! Quarter-turn moves and their notation.
//!
//! Exactly 12 tokens are accepted: `U U' D D' L L' R R' F F' B B'`.  Anything
//! else (lower case, double turns, unicode primes, whitespace) is rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::MoveError;
use crate::facelet::Face;

/// Rotation sense, as viewed from outside the turning face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
}

impl Turn {
    pub fn reversed(self) -> Turn {
        match self {
            Turn::Clockwise        => Turn::CounterClockwise,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }

    pub fn from_clockwise(clockwise: bool) -> Turn {
        if clockwise { Turn::Clockwise } else { Turn::CounterClockwise }
    }
}

/// One quarter turn of one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    /// All 12 moves in notation order.
    pub const ALL: [Move; 12] = [
        Move::cw(Face::Up),    Move::ccw(Face::Up),
        Move::cw(Face::Down),  Move::ccw(Face::Down),
        Move::cw(Face::Left),  Move::ccw(Face::Left),
        Move::cw(Face::Right), Move::ccw(Face::Right),
        Move::cw(Face::Front), Move::ccw(Face::Front),
        Move::cw(Face::Back),  Move::ccw(Face::Back),
    ];

    pub const fn new(face: Face, turn: Turn) -> Move {
        Move { face, turn }
    }

    pub const fn cw(face: Face) -> Move {
        Move { face, turn: Turn::Clockwise }
    }

    pub const fn ccw(face: Face) -> Move {
        Move { face, turn: Turn::CounterClockwise }
    }

    pub fn is_clockwise(self) -> bool { self.turn == Turn::Clockwise }

    /// The move that undoes this one (`U` ↔ `U'`).
    pub fn inverse(self) -> Move {
        Move { face: self.face, turn: self.turn.reversed() }
    }

    /// Slot of this move in the permutation table (0–11).
    pub fn index(self) -> usize {
        self.face.index() * 2 + usize::from(self.turn == Turn::CounterClockwise)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.turn {
            Turn::Clockwise        => write!(f, "{}", self.face.letter()),
            Turn::CounterClockwise => write!(f, "{}'", self.face.letter()),
        }
    }
}

impl FromStr for Move {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Move, MoveError> {
        let mut chars = s.chars();
        let face = chars.next().and_then(Face::from_letter);
        let turn = match (chars.next(), chars.next()) {
            (None, _)            => Some(Turn::Clockwise),
            (Some('\''), None)   => Some(Turn::CounterClockwise),
            _                    => None,
        };
        match (face, turn) {
            (Some(face), Some(turn)) => Ok(Move { face, turn }),
            _ => Err(MoveError::UnknownToken(s.to_string())),
        }
    }
}

/// Parse a whitespace-separated move sequence.  The first bad token rejects
/// the whole sequence.
pub fn parse_sequence(s: &str) -> Result<Vec<Move>, MoveError> {
    s.split_whitespace().map(str::parse).collect()
}

/// Render moves as space-separated notation.
pub fn format_sequence(moves: &[Move]) -> String {
    moves.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" ")
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_twelve_tokens_parse() {
        let tokens = ["U", "U'", "D", "D'", "L", "L'", "R", "R'", "F", "F'", "B", "B'"];
        for (tok, expected) in tokens.iter().zip(Move::ALL) {
            let mv: Move = tok.parse().unwrap();
            assert_eq!(mv, expected);
            assert_eq!(mv.to_string(), *tok);
        }
    }

    #[test]
    fn rejects_other_tokens() {
        for bad in ["", "u", "U2", "U''", "X", "R′", " R", "RU", "'"] {
            assert_eq!(
                bad.parse::<Move>(),
                Err(MoveError::UnknownToken(bad.to_string())),
                "{:?} should be rejected", bad,
            );
        }
    }

    #[test]
    fn indices_are_a_bijection() {
        let mut seen = [false; 12];
        for mv in Move::ALL {
            assert!(!seen[mv.index()]);
            seen[mv.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn inverse_flips_turn_only() {
        let f: Move = "F".parse().unwrap();
        assert_eq!(f.inverse().to_string(), "F'");
        assert_eq!(f.inverse().inverse(), f);
    }

    #[test]
    fn sequence_round_trip() {
        let moves = parse_sequence("R U  R'\tU'").unwrap();
        assert_eq!(moves.len(), 4);
        assert_eq!(format_sequence(&moves), "R U R' U'");
    }

    #[test]
    fn sequence_rejects_on_first_bad_token() {
        assert_eq!(
            parse_sequence("R U2 F"),
            Err(MoveError::UnknownToken("U2".to_string())),
        );
    }
}
