//! Walks through the engine: snapshots, move algebra, scramble and undo.

use cube_engine::{format_sequence, parse_sequence, Cube, Face, Move, Permutation};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    println!("\n=== Cube Engine Demo ===\n");

    // ── 1. Solved cube ────────────────────────────────────────────────────
    println!("1. Solved cube");
    let mut cube = Cube::new();
    println!("{}", cube);
    println!("   state: {}\n", cube.export_state());

    // ── 2. A single quarter turn ──────────────────────────────────────────
    println!("2. After R");
    cube.apply(Move::cw(Face::Right));
    println!("{}", cube);
    println!("   state: {}\n", cube.export_state());

    // ── 3. Order of common sequences ──────────────────────────────────────
    println!("3. Orders");
    for seq in ["R", "R U R' U'", "R U", "F R U R' U' F'"] {
        let moves = parse_sequence(seq).unwrap_or_default();
        let p = Permutation::of_sequence(&moves);
        println!("   {:<18} order {:>3}, moves {} stickers", seq, p.order(), p.support());
    }
    println!();

    // ── 4. Seeded scramble and its undo ───────────────────────────────────
    println!("4. Seeded scramble (seed 2024)");
    cube.reset();
    let scramble = cube.scramble(20, &mut StdRng::seed_from_u64(2024));
    println!("   scramble: {}", format_sequence(&scramble));
    println!("   solved?   {}", cube.is_solved());
    let solution = cube.solution();
    println!("   undo:     {}", format_sequence(&solution));
    for mv in solution { cube.apply(mv); }
    println!("   solved?   {}\n", cube.is_solved());

    // ── 5. Rejected input ─────────────────────────────────────────────────
    println!("5. Rejected tokens");
    for bad in ["U2", "x", "R'2"] {
        match cube.apply_token(bad) {
            Ok(mv) => println!("   {:<4} → applied {}", bad, mv),
            Err(e) => println!("   {:<4} → {}", bad, e),
        }
    }
    println!();
}
