//! Sticker colors and the six faces.

use std::fmt;

/// Number of stickers on the cube (6 faces × 9).
pub const STICKER_COUNT: usize = 54;

// ════════════════════════════════════════════════════════════════════════════
// Color
// ════════════════════════════════════════════════════════════════════════════

/// One of the six sticker colors.  The discriminant is the ordinal written
/// into state strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White  = 0,
    Yellow = 1,
    Red    = 2,
    Orange = 3,
    Green  = 4,
    Blue   = 5,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White, Color::Yellow, Color::Red,
        Color::Orange, Color::Green, Color::Blue,
    ];

    /// Ordinal digit used in state strings (0–5).
    pub fn ordinal(self) -> u8 { self as u8 }

    pub fn from_ordinal(n: u8) -> Option<Color> {
        Color::ALL.get(n as usize).copied()
    }

    /// Single-letter tag for terminal output.
    pub fn letter(self) -> char {
        match self {
            Color::White  => 'W',
            Color::Yellow => 'Y',
            Color::Red    => 'R',
            Color::Orange => 'O',
            Color::Green  => 'G',
            Color::Blue   => 'B',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White  => "white",
            Color::Yellow => "yellow",
            Color::Red    => "red",
            Color::Orange => "orange",
            Color::Green  => "green",
            Color::Blue   => "blue",
        }
    }

    /// Linear RGB in 0.0–1.0, for renderers that take float colors.
    pub fn rgb(self) -> (f32, f32, f32) {
        match self {
            Color::White  => (1.0, 1.0, 1.0),
            Color::Yellow => (1.0, 1.0, 0.0),
            Color::Red    => (1.0, 0.0, 0.0),
            Color::Orange => (1.0, 0.5, 0.0),
            Color::Green  => (0.0, 1.0, 0.0),
            Color::Blue   => (0.0, 0.0, 1.0),
        }
    }

    /// Packed 0xAARRGGBB (alpha opaque) for software framebuffers.
    pub fn argb(self) -> u32 {
        let (r, g, b) = self.rgb();
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        0xFF00_0000 | (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Face
// ════════════════════════════════════════════════════════════════════════════

/// A side of the cube.  Declared in state-string order, so `face as usize * 9`
/// is the offset of the face's first sticker.
///
/// Each face is read as seen from outside the cube.  Up has row 0 against
/// Back; Down has row 0 against Front; the four side faces have row 0 against
/// Up and column 0 against their left-hand neighbour (Front→Left, Right→Front,
/// Back→Right, Left→Back).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Up,
    Left,
    Front,
    Right,
    Back,
    Down,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up, Face::Left, Face::Front, Face::Right, Face::Back, Face::Down,
    ];

    pub fn index(self) -> usize { self as usize }

    /// Index of sticker (`row`, `col`) of this face in the 54-sticker grid.
    pub fn sticker(self, row: usize, col: usize) -> usize {
        debug_assert!(row < 3 && col < 3);
        self.index() * 9 + row * 3 + col
    }

    /// Notation letter.
    pub fn letter(self) -> char {
        match self {
            Face::Up    => 'U',
            Face::Left  => 'L',
            Face::Front => 'F',
            Face::Right => 'R',
            Face::Back  => 'B',
            Face::Down  => 'D',
        }
    }

    pub fn from_letter(c: char) -> Option<Face> {
        Face::ALL.into_iter().find(|f| f.letter() == c)
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::Up    => "Up",
            Face::Left  => "Left",
            Face::Front => "Front",
            Face::Right => "Right",
            Face::Back  => "Back",
            Face::Down  => "Down",
        }
    }

    /// Color of this face on a solved cube.
    pub fn home_color(self) -> Color {
        match self {
            Face::Up    => Color::White,
            Face::Left  => Color::Orange,
            Face::Front => Color::Green,
            Face::Right => Color::Red,
            Face::Back  => Color::Blue,
            Face::Down  => Color::Yellow,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
