//! # cube_engine
//!
//! Facelet model of a 3×3×3 twisty puzzle.  The cube is 54 stickers on six
//! faces; every one of the 12 quarter-turn moves is a fixed permutation of
//! those 54 positions, tabulated once and shared by every [`Cube`].
//!
//! ## Faces and colors
//!
//! | Face | Letter | Solved color | Ordinal |
//! |---|---|---|---|
//! | Up    | `U` | White  | 0 |
//! | Left  | `L` | Orange | 3 |
//! | Front | `F` | Green  | 4 |
//! | Right | `R` | Red    | 2 |
//! | Back  | `B` | Blue   | 5 |
//! | Down  | `D` | Yellow | 1 |
//!
//! Faces are listed in state-string order: [`Cube::export_state`] writes
//! Up, Left, Front, Right, Back, Down, each row-major, one ordinal digit per
//! sticker.
//!
//! ## Quick start
//!
//! ```rust
//! use cube_engine::{Cube, Move};
//! use rand::SeedableRng;
//!
//! let mut cube = Cube::new();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! cube.scramble(20, &mut rng);
//! assert!(!cube.is_solved());
//!
//! for mv in cube.solution() {
//!     cube.apply(mv);
//! }
//! assert!(cube.is_solved());
//!
//! let r: Move = "R".parse().unwrap();
//! cube.apply(r);
//! assert_eq!(
//!     cube.export_state(),
//!     "004004004333333333441441441222222222055055055115115115",
//! );
//! ```

pub mod cube;
pub mod error;
pub mod facelet;
pub mod moves;
pub mod permutation;

pub use cube::Cube;
pub use error::{MoveError, StateError};
pub use facelet::{Color, Face, STICKER_COUNT};
pub use moves::{format_sequence, parse_sequence, Move, Turn};
pub use permutation::Permutation;
