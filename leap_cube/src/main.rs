//! leap_cube: interactive entry point.

use std::io::{self, Write};

use leap_cube::app::{run, SourceMode};
use leap_cube::config::{load_config, save_config, AppConfig, MAX_SCRAMBLE_LENGTH};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leap_cube=info,cube_gesture=info,cube_engine=info".into()),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Leap Cube - Pinch, Twist and Release to Solve         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let quick = args.iter().any(|a| a == "--quick");
    let demo  = args.iter().any(|a| a == "--demo");

    let mode = if demo {
        println!("  Mode: Scripted demo");
        SourceMode::Demo
    } else {
        default_mode()
    };
    println!();

    let cfg = if quick {
        println!("  Quick-start: default thresholds, 20-move scrambles\n");
        AppConfig::default()
    } else {
        configure_interactively(load_config())
    };

    println!();
    println!("  Opening visualizer window…");
    println!();
    info!("starting with {:?}", cfg);

    let stats = run(cfg, mode)?;

    println!();
    println!("  ── Session ──────────────────────────────────");
    println!("{}", stats);
    println!();
    Ok(())
}

#[cfg(feature = "leap")]
fn default_mode() -> SourceMode {
    println!("  Mode: LeapMotion hardware");
    SourceMode::Leap
}

#[cfg(not(feature = "leap"))]
fn default_mode() -> SourceMode {
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    SourceMode::Simulation
}

fn configure_interactively(mut cfg: AppConfig) -> AppConfig {
    let length = read_line(&format!(
        "  Scramble length 1–{} (default {}): ", MAX_SCRAMBLE_LENGTH, cfg.scramble_length,
    ));
    if let Ok(n) = length.trim().parse::<usize>() {
        cfg.scramble_length = n;
    }

    let seed = read_line("  Scramble seed (blank = random): ");
    cfg.scramble_seed = seed.trim().parse::<u64>().ok();

    let snap = read_line(&format!(
        "  Snap threshold in degrees (default {:.0}): ", cfg.controller.snap_threshold_deg,
    ));
    if let Ok(deg) = snap.trim().parse::<f32>() {
        cfg.controller.snap_threshold_deg = deg;
    }

    let cfg = cfg.validated();
    if read_line("  Save these settings? (y/N): ").trim().eq_ignore_ascii_case("y") {
        match save_config(&cfg) {
            Ok(())  => println!("  Saved."),
            Err(e)  => warn!("could not save config: {}", e),
        }
    }
    cfg
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
