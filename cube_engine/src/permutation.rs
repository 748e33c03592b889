//! Sticker permutations and the per-move table.
//!
//! A [`Permutation`] is stored in gather form: after applying `p`, sticker
//! slot `i` holds what slot `p[i]` held before.  Each clockwise move is
//! written down once as a quarter turn of its own face plus a 4-cycle of
//! three-sticker strips on the neighbouring faces; the 12 full permutations
//! are built from that description the first time any move is applied.

use std::sync::LazyLock;

use crate::facelet::{Face, STICKER_COUNT};
use crate::moves::Move;

// ════════════════════════════════════════════════════════════════════════════
// Topology
// ════════════════════════════════════════════════════════════════════════════

/// Three sticker cells (row-major 0–8) on one face.
type Strip = (Face, [usize; 3]);

/// Destination of each cell when a face turns clockwise in place.
const QUARTER_TURN: [usize; 9] = [2, 5, 8, 1, 4, 7, 0, 3, 6];

/// For each face (in `Face` order), the strips carried by its clockwise turn.
/// Stickers in strip `k` move to the same position of strip `k + 1`; the last
/// strip wraps to the first.
const CLOCKWISE_CYCLES: [[Strip; 4]; 6] = [
    // U
    [(Face::Left, [0, 1, 2]), (Face::Back, [0, 1, 2]), (Face::Right, [0, 1, 2]), (Face::Front, [0, 1, 2])],
    // L
    [(Face::Up, [0, 3, 6]), (Face::Front, [0, 3, 6]), (Face::Down, [0, 3, 6]), (Face::Back, [8, 5, 2])],
    // F
    [(Face::Up, [6, 7, 8]), (Face::Right, [0, 3, 6]), (Face::Down, [2, 1, 0]), (Face::Left, [8, 5, 2])],
    // R
    [(Face::Up, [2, 5, 8]), (Face::Back, [6, 3, 0]), (Face::Down, [2, 5, 8]), (Face::Front, [2, 5, 8])],
    // B
    [(Face::Up, [0, 1, 2]), (Face::Left, [6, 3, 0]), (Face::Down, [8, 7, 6]), (Face::Right, [2, 5, 8])],
    // D
    [(Face::Left, [6, 7, 8]), (Face::Front, [6, 7, 8]), (Face::Right, [6, 7, 8]), (Face::Back, [6, 7, 8])],
];

static MOVE_TABLE: LazyLock<[Permutation; 12]> = LazyLock::new(|| {
    let mut table = [Permutation::identity(); 12];
    for face in Face::ALL {
        let cw = Permutation::clockwise(face);
        table[Move::cw(face).index()]  = cw;
        table[Move::ccw(face).index()] = cw.inverse();
    }
    table
});

// ════════════════════════════════════════════════════════════════════════════
// Permutation
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Permutation([u8; STICKER_COUNT]);

impl Permutation {
    pub fn identity() -> Self {
        let mut p = [0u8; STICKER_COUNT];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }
        Permutation(p)
    }

    /// The tabulated permutation for one move.
    pub fn of(mv: Move) -> &'static Permutation {
        &MOVE_TABLE[mv.index()]
    }

    /// The net permutation of a move sequence applied left to right.
    pub fn of_sequence(moves: &[Move]) -> Permutation {
        moves.iter().fold(Permutation::identity(), |acc, &mv| acc.then(Permutation::of(mv)))
    }

    fn clockwise(face: Face) -> Permutation {
        let mut p = Permutation::identity();
        for (src, &dst) in QUARTER_TURN.iter().enumerate() {
            p.0[face.index() * 9 + dst] = (face.index() * 9 + src) as u8;
        }
        let cycle = &CLOCKWISE_CYCLES[face.index()];
        for k in 0..4 {
            let (from_face, from) = cycle[k];
            let (to_face, to)     = cycle[(k + 1) % 4];
            for j in 0..3 {
                p.0[to_face.index() * 9 + to[j]] = (from_face.index() * 9 + from[j]) as u8;
            }
        }
        p
    }

    /// Rearrange `stickers` into a fresh grid.
    pub fn apply<T: Copy>(&self, stickers: &[T; STICKER_COUNT]) -> [T; STICKER_COUNT] {
        std::array::from_fn(|i| stickers[self.0[i] as usize])
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Permutation) -> Permutation {
        Permutation(std::array::from_fn(|i| self.0[next.0[i] as usize]))
    }

    pub fn inverse(&self) -> Permutation {
        let mut inv = [0u8; STICKER_COUNT];
        for (i, &src) in self.0.iter().enumerate() {
            inv[src as usize] = i as u8;
        }
        Permutation(inv)
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &src)| i == src as usize)
    }

    /// Number of stickers this permutation moves.
    pub fn support(&self) -> usize {
        self.0.iter().enumerate().filter(|&(i, &src)| i != src as usize).count()
    }

    /// Smallest `n ≥ 1` with `selfⁿ` the identity: the lcm of its cycle lengths.
    pub fn order(&self) -> u64 {
        let mut seen = [false; STICKER_COUNT];
        let mut order = 1u64;
        for start in 0..STICKER_COUNT {
            if seen[start] { continue; }
            let mut len = 0u64;
            let mut i = start;
            while !seen[i] {
                seen[i] = true;
                i = self.0[i] as usize;
                len += 1;
            }
            order = lcm(order, len);
        }
        order
    }
}

impl Default for Permutation {
    fn default() -> Self { Permutation::identity() }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn lcm(a: u64, b: u64) -> u64 {
    a / gcd(a, b) * b
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
