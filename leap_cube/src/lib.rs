//! # leap_cube
//!
//! Hand-gesture controller for a virtual 3×3×3 cube, with a software-rendered
//! net view.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | Move both open hands | Both | Orbit the view |
//! | Pinch inside a face's grab zone | Either | Grab that face |
//! | Swing the other hand around the held face | Both | Twist (gauge shows angle) |
//! | Open the pinch past 30° of twist | Either | Snap a quarter turn |
//! | Open the pinch under 30° | Either | Cancel |
//!
//! ## Feature flags
//!
//! * default: **Simulation mode**, the keyboard steers two virtual hands.
//! * `leap`: **Hardware mode**, polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | `W` `A` `S` `D` / `R` `F` | Move left hand (up, left, down, right / near, far) |
//! | Arrows / `PgUp` `PgDn` | Move right hand |
//! | `1`–`6` | Put left hand on the U, D, L, R, F, B grab zone |
//! | `Space` (hold) | Pinch left hand |
//! | `Enter` (hold) | Pinch right hand |
//! | `H` / `J` | Hide / show left / right hand |
//! | `N` | Scramble |
//! | `C` | Reset to solved |
//! | `V` | Apply the solution |
//! | `K` | Spin the view |
//! | `Q` / `Esc` | Quit |

pub mod app;
pub mod config;
pub mod source;
pub mod visualizer;
