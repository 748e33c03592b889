//! Interactive menu for turning, scrambling and inspecting a cube from the
//! terminal.

use cube_engine::{format_sequence, parse_sequence, Cube, Permutation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};

const MAX_SCRAMBLE_LENGTH: usize = 10_000;

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              Cube Engine Explorer                    ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let mut cube = Cube::new();

    loop {
        print_cube(&cube);
        print_menu();
        let choice = read_line("Command: ").trim().to_ascii_lowercase();

        match choice.as_str() {
            "1" => {
                let seq = read_line("  Moves (e.g. R U R' U'): ");
                match cube.apply_sequence(&seq) {
                    Ok(moves) => println!("  Applied {} move(s).", moves.len()),
                    Err(e)    => println!("  ⚠  {}", e),
                }
            }
            "2" => {
                let n = scramble_length(&read_line("  Scramble length (default 20): "));
                let seed = read_line("  Seed (blank = random): ");
                let moves = match seed.trim().parse::<u64>() {
                    Ok(s)  => cube.scramble(n, &mut StdRng::seed_from_u64(s)),
                    Err(_) => cube.scramble(n, &mut rand::rng()),
                };
                println!("  Scramble: {}", format_sequence(&moves));
            }
            "3" => {
                if cube.is_scrambled() {
                    println!("  Solution: {}", format_sequence(&cube.solution()));
                } else {
                    println!("  No scramble recorded.");
                }
            }
            "4" => {
                let solution = cube.apply_solution();
                println!("  Applied {} solution move(s).", solution.len());
            }
            "5" => {
                println!("  {}", cube.export_state());
            }
            "6" => {
                let s = read_line("  State string (54 digits): ");
                match Cube::import_state(s.trim()) {
                    Ok(c)  => { cube = c; println!("  Imported."); }
                    Err(e) => println!("  ⚠  {}", e),
                }
            }
            "7" => {
                let seq = read_line("  Sequence: ");
                match parse_sequence(&seq) {
                    Ok(moves) => {
                        let p = Permutation::of_sequence(&moves);
                        println!("  \"{}\" moves {} stickers and has order {}.",
                                 format_sequence(&moves), p.support(), p.order());
                    }
                    Err(e) => println!("  ⚠  {}", e),
                }
            }
            "8" => {
                cube.reset();
                println!("  Reset to solved.");
            }
            "q" | "quit" => {
                println!("\nGoodbye!\n");
                break;
            }
            _ => println!("  ⚠  Unknown command."),
        }
        println!();
    }
}

fn print_cube(cube: &Cube) {
    for line in cube.to_string().lines() {
        println!("    {}", line);
    }
    println!();
    println!(
        "  solved: {}   scrambled: {}   moves since scramble: {}",
        cube.is_solved(), cube.is_scrambled(), cube.move_count(),
    );
    println!();
}

fn print_menu() {
    println!("  ┌─────────────────────────────────────────────────────────┐");
    println!("  │  1. Apply moves               5. Export state string    │");
    println!("  │  2. Scramble                  6. Import state string    │");
    println!("  │  3. Show solution             7. Order of a sequence    │");
    println!("  │  4. Apply solution            8. Reset      q. Quit     │");
    println!("  └─────────────────────────────────────────────────────────┘");
}

/// Parse a scramble length, defaulting to 20 and clamped to `1..=MAX_SCRAMBLE_LENGTH`.
fn scramble_length(input: &str) -> usize {
    input.trim().parse::<usize>().unwrap_or(20).max(1).min(MAX_SCRAMBLE_LENGTH)
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
