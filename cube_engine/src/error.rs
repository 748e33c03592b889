//! Rejection conditions reported by the engine.  None of them are fatal; the
//! cube is never mutated when one is returned.

use thiserror::Error;

/// A move token outside the 12-symbol notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("unrecognised move token {0:?} (expected one of U U' D D' L L' R R' F F' B B')")]
    UnknownToken(String),
}

/// A state string that cannot describe a cube.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state string has {0} stickers, expected 54")]
    Length(usize),

    #[error("invalid sticker {ch:?} at position {index} (expected a digit 0-5)")]
    Sticker { index: usize, ch: char },

    #[error("color {ordinal} appears {count} times, expected 9")]
    ColorCount { ordinal: u8, count: usize },
}
